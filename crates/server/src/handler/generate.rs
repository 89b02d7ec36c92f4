use super::{decode_reply, first_choice, is_blank, optional_count, optional_number, optional_string};
use crate::AppState;
use crate::dispatch::Body;
use axum::http::StatusCode;
use chat_relay_core::config::Config;
use chat_relay_core::envelope::Envelope;
use chat_relay_core::error::RelayError;
use chat_relay_core::types::openai::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use chat_relay_core::types::relay::{GenerateResponse, UsageSummary};
use chat_relay_provider::{CHAT_COMPLETIONS, UpstreamMethod};

/// A validated `generate` request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub messages: Vec<ChatMessage>,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: Option<u64>,
}

impl GenerationRequest {
    pub fn from_body(body: &Body, config: &Config) -> Result<Self, RelayError> {
        let messages = match body.get("messages") {
            None => return Err(RelayError::Validation("messages is required".into())),
            Some(v) if is_blank(v) => {
                return Err(RelayError::Validation("messages is required".into()));
            }
            Some(v) => serde_json::from_value::<Vec<ChatMessage>>(v.clone()).map_err(|_| {
                RelayError::Validation(
                    "messages must be a list of {role, content} objects".into(),
                )
            })?,
        };

        let model = optional_string(body, "model")?.unwrap_or_else(|| config.default_model.clone());
        let temperature =
            optional_number(body, "temperature")?.unwrap_or(config.default_temperature);
        let max_tokens = optional_count(body, "max_tokens")?;

        if !model.starts_with(&config.model_prefix) {
            return Err(RelayError::Validation(format!(
                "This extension only supports OpenAI models ({}*)",
                config.model_prefix
            )));
        }

        Ok(Self {
            messages,
            model,
            temperature,
            max_tokens,
        })
    }

    fn into_upstream(self) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model,
            messages: self.messages,
            temperature: Some(self.temperature),
            max_tokens: self.max_tokens,
        }
    }
}

/// `?action=generate`: one chat completion, normalized.
pub async fn generate(state: &AppState, body: &Body) -> Result<Envelope, RelayError> {
    let request = GenerationRequest::from_body(body, &state.config)?;
    let requested_model = request.model.clone();

    let payload = serde_json::to_value(request.into_upstream())
        .map_err(|e| RelayError::Internal(format!("failed to encode request: {e}")))?;
    let reply = state
        .upstream
        .call(CHAT_COMPLETIONS, UpstreamMethod::Post, Some(&payload))
        .await?;

    let completion: ChatCompletionResponse = decode_reply(reply, "chat completion")?;
    let choice = first_choice(&completion)?;

    let response = GenerateResponse {
        success: true,
        content: choice.content().to_string(),
        model: completion.model.clone().unwrap_or(requested_model),
        usage: UsageSummary::from(completion.usage.as_ref()),
        finish_reason: choice.finish_reason().to_string(),
    };

    tracing::info!(
        model = %response.model,
        total_tokens = response.usage.total_tokens,
        finish_reason = %response.finish_reason,
        "Generation completed"
    );

    Ok(Envelope::json(StatusCode::OK, &response, &state.cors))
}
