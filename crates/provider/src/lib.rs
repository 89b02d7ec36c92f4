//! The upstream seam: one trait for "call the provider and hand back JSON",
//! plus the reqwest-backed OpenAI-compatible implementation.

pub mod common;
pub mod openai_compat;

use async_trait::async_trait;
use chat_relay_core::error::RelayError;
use serde_json::Value;

pub use openai_compat::OpenAICompatClient;

/// Chat completion endpoint, relative to the upstream base URL.
pub const CHAT_COMPLETIONS: &str = "chat/completions";
/// Model listing endpoint, relative to the upstream base URL.
pub const MODELS: &str = "models";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamMethod {
    Get,
    Post,
}

impl UpstreamMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// A single-shot call against the upstream API.
///
/// Implementations return the decoded JSON body on a 2xx reply. Failures are
/// `RelayError::Config` when the client cannot authenticate at all, otherwise
/// `RelayError::Upstream`. No retries.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn call(
        &self,
        endpoint: &str,
        method: UpstreamMethod,
        payload: Option<&Value>,
    ) -> Result<Value, RelayError>;
}
