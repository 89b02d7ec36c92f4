//! Process lifecycle for the HTTP host: logging setup and shutdown signals.

pub mod logging;
pub mod signal;
