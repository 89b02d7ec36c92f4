use crate::{Upstream, UpstreamMethod, common};
use async_trait::async_trait;
use chat_relay_core::config::UpstreamConfig;
use chat_relay_core::error::{RelayError, UpstreamError};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::time::Instant;

/// Client for an OpenAI-compatible REST API under a fixed base URL.
pub struct OpenAICompatClient {
    client: reqwest::Client,
    upstream: UpstreamConfig,
}

impl OpenAICompatClient {
    /// Build a client using the timeouts and proxy from `upstream`.
    pub fn new(upstream: &UpstreamConfig) -> Result<Self, RelayError> {
        let client = chat_relay_core::proxy::build_http_client(upstream)
            .map_err(|e| RelayError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, upstream))
    }

    pub fn with_client(client: reqwest::Client, upstream: &UpstreamConfig) -> Self {
        Self {
            client,
            upstream: upstream.clone(),
        }
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.upstream.base_url, endpoint)
    }
}

#[async_trait]
impl Upstream for OpenAICompatClient {
    async fn call(
        &self,
        endpoint: &str,
        method: UpstreamMethod,
        payload: Option<&Value>,
    ) -> Result<Value, RelayError> {
        let secret = self.upstream.resolve_secret()?;
        let url = self.endpoint_url(endpoint);

        let mut req = match method {
            UpstreamMethod::Get => self.client.get(&url),
            UpstreamMethod::Post => self.client.post(&url),
        }
        .header(AUTHORIZATION, format!("Bearer {secret}"))
        .header(CONTENT_TYPE, "application/json");

        if let Some(payload) = payload {
            req = req.json(payload);
        }

        let start = Instant::now();
        let result = match req.send().await {
            Ok(resp) => common::handle_response(resp).await,
            Err(e) => Err(UpstreamError::from(e)),
        };

        match &result {
            Ok(_) => tracing::debug!(
                endpoint = %endpoint,
                method = method.as_str(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Upstream call succeeded"
            ),
            Err(e) => tracing::warn!(
                endpoint = %endpoint,
                method = method.as_str(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                error = %e,
                "Upstream call failed"
            ),
        }

        Ok(result?)
    }
}
