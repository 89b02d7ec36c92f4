#![allow(dead_code)]

use async_trait::async_trait;
use chat_relay_core::config::Config;
use chat_relay_core::error::{RelayError, UpstreamError};
use chat_relay_core::event::InboundEvent;
use chat_relay_provider::{Upstream, UpstreamMethod};
use chat_relay_server::AppState;
use serde_json::Value;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub endpoint: String,
    pub method: UpstreamMethod,
    pub payload: Option<Value>,
}

/// Deterministic upstream: always answers with the same canned result and
/// records every call it receives.
pub struct StubUpstream {
    reply: Result<Value, UpstreamError>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubUpstream {
    pub fn ok(reply: Value) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(err: UpstreamError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(err),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Upstream for StubUpstream {
    async fn call(
        &self,
        endpoint: &str,
        method: UpstreamMethod,
        payload: Option<&Value>,
    ) -> Result<Value, RelayError> {
        self.calls.lock().unwrap().push(RecordedCall {
            endpoint: endpoint.to_string(),
            method,
            payload: payload.cloned(),
        });
        self.reply.clone().map_err(RelayError::from)
    }
}

/// Upstream whose every call panics.
pub struct PanickingUpstream;

#[async_trait]
impl Upstream for PanickingUpstream {
    async fn call(
        &self,
        _endpoint: &str,
        _method: UpstreamMethod,
        _payload: Option<&Value>,
    ) -> Result<Value, RelayError> {
        panic!("upstream stub exploded");
    }
}

pub fn state_with(upstream: Arc<dyn Upstream>) -> AppState {
    AppState::new(Config::default(), upstream)
}

pub fn post(action: &str, body: &str) -> InboundEvent {
    InboundEvent::new("POST")
        .with_query("action", action)
        .with_body(body)
}

pub fn get(action: &str) -> InboundEvent {
    InboundEvent::new("GET").with_query("action", action)
}

pub fn completion_reply() -> Value {
    serde_json::json!({
        "choices": [{ "message": { "content": "hi" }, "finish_reason": "stop" }],
        "usage": { "prompt_tokens": 3, "completion_tokens": 1, "total_tokens": 4 },
        "model": "openai/gpt-4o-mini"
    })
}
