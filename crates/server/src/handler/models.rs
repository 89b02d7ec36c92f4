use super::decode_reply;
use crate::AppState;
use crate::dispatch::Body;
use axum::http::StatusCode;
use chat_relay_core::envelope::Envelope;
use chat_relay_core::error::RelayError;
use chat_relay_core::types::openai::ModelList;
use chat_relay_core::types::relay::{ModelSummary, ModelsResponse};
use chat_relay_provider::{MODELS, UpstreamMethod};

/// `?action=models`: upstream models under the configured prefix.
pub async fn models(state: &AppState, _body: &Body) -> Result<Envelope, RelayError> {
    let reply = state.upstream.call(MODELS, UpstreamMethod::Get, None).await?;
    let list: ModelList = decode_reply(reply, "model list")?;

    let prefix = &state.config.model_prefix;
    let models: Vec<ModelSummary> = list
        .data
        .unwrap_or_default()
        .iter()
        .filter_map(|entry| ModelSummary::from_prefixed(entry.id.as_deref()?, prefix))
        .collect();

    tracing::debug!(count = models.len(), "Listed models");

    let response = ModelsResponse {
        success: true,
        models,
        provider: state.config.provider_name.clone(),
    };
    Ok(Envelope::json(StatusCode::OK, &response, &state.cors))
}
