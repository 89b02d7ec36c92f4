pub mod dispatch;
pub mod handler;
pub mod middleware;

use chat_relay_core::config::Config;
use chat_relay_core::envelope::CorsPolicy;
use chat_relay_core::error::RelayError;
use chat_relay_provider::{OpenAICompatClient, Upstream};
use axum::{Router, middleware as axum_mw};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub upstream: Arc<dyn Upstream>,
    pub cors: CorsPolicy,
}

impl AppState {
    pub fn new(config: Config, upstream: Arc<dyn Upstream>) -> Self {
        let cors = CorsPolicy::from_config(&config);
        Self {
            config: Arc::new(config),
            upstream,
            cors,
        }
    }

    /// State backed by the real OpenAI-compatible upstream client.
    pub fn from_config(config: Config) -> Result<Self, RelayError> {
        let upstream = OpenAICompatClient::new(&config.upstream)?;
        Ok(Self::new(config, Arc::new(upstream)))
    }
}

pub fn build_router(state: AppState) -> Router {
    let body_limit_bytes = state.config.body_limit_mb.saturating_mul(1024 * 1024);

    Router::new()
        .route(
            "/health",
            axum::routing::get(handler::health::health).options(handler::invoke::invoke),
        )
        .route("/", axum::routing::any(handler::invoke::invoke))
        .fallback(handler::invoke::invoke)
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .layer(axum_mw::map_response_with_state(
            state.clone(),
            middleware::host_rejection::host_rejection_middleware,
        ))
        .layer(axum_mw::from_fn(
            middleware::request_logging::request_logging_middleware,
        ))
        .layer(axum_mw::from_fn(
            middleware::request_context::request_context_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
