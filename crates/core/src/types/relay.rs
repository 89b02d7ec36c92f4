//! Success payloads returned to relay callers. Field order here is the order
//! on the wire.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageSummary {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl From<Option<&super::openai::Usage>> for UsageSummary {
    fn from(usage: Option<&super::openai::Usage>) -> Self {
        let usage = usage.cloned().unwrap_or_default();
        Self {
            prompt_tokens: usage.prompt_tokens.unwrap_or(0),
            completion_tokens: usage.completion_tokens.unwrap_or(0),
            total_tokens: usage.total_tokens.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub content: String,
    pub model: String,
    pub usage: UsageSummary,
    pub finish_reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSummary {
    pub id: String,
    pub name: String,
}

impl ModelSummary {
    /// Summarize `id` if it lives under `prefix`; the display name is the
    /// remainder upper-cased.
    pub fn from_prefixed(id: &str, prefix: &str) -> Option<Self> {
        let rest = id.strip_prefix(prefix)?;
        Some(Self {
            id: id.to_string(),
            name: rest.to_uppercase(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelsResponse {
    pub success: bool,
    pub models: Vec<ModelSummary>,
    pub provider: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestResponse {
    pub success: bool,
    pub message: String,
    pub response: String,
    pub model: String,
}
