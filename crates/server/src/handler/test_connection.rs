use super::{decode_reply, first_choice, optional_string};
use crate::AppState;
use crate::dispatch::Body;
use axum::http::StatusCode;
use chat_relay_core::envelope::Envelope;
use chat_relay_core::error::RelayError;
use chat_relay_core::types::openai::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use chat_relay_core::types::relay::TestResponse;
use chat_relay_provider::{CHAT_COMPLETIONS, UpstreamMethod};

pub const PROBE_PROMPT: &str = "Say 'OK' if you can hear me.";
pub const PROBE_MAX_TOKENS: u64 = 10;
pub const SUCCESS_MESSAGE: &str = "ChatGPT connection successful";

/// `?action=test`: a tiny fixed completion to prove the credentials work.
pub async fn test_connection(state: &AppState, body: &Body) -> Result<Envelope, RelayError> {
    let model = optional_string(body, "model")?.unwrap_or_else(|| state.config.default_model.clone());

    let probe = ChatCompletionRequest {
        model: model.clone(),
        messages: vec![ChatMessage::user(PROBE_PROMPT)],
        temperature: None,
        max_tokens: Some(PROBE_MAX_TOKENS),
    };
    let payload = serde_json::to_value(probe)
        .map_err(|e| RelayError::Internal(format!("failed to encode request: {e}")))?;

    let reply = state
        .upstream
        .call(CHAT_COMPLETIONS, UpstreamMethod::Post, Some(&payload))
        .await?;
    let completion: ChatCompletionResponse = decode_reply(reply, "chat completion")?;
    let choice = first_choice(&completion)?;

    let response = TestResponse {
        success: true,
        message: SUCCESS_MESSAGE.to_string(),
        response: choice.content().to_string(),
        model: completion.model.unwrap_or(model),
    };

    tracing::info!(model = %response.model, "Connection test succeeded");

    Ok(Envelope::json(StatusCode::OK, &response, &state.cors))
}
