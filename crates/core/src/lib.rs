//! Shared building blocks for the chat relay: configuration, the error
//! taxonomy, the trigger event and response envelope, and wire types.

pub mod config;
pub mod envelope;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod proxy;
pub mod types;

pub use config::Config;
pub use envelope::{CorsPolicy, Envelope};
pub use error::{RelayError, UpstreamError};
pub use event::InboundEvent;
