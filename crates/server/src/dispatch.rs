use crate::AppState;
use crate::handler;
use axum::http::StatusCode;
use chat_relay_core::envelope::Envelope;
use chat_relay_core::error::RelayError;
use chat_relay_core::event::InboundEvent;
use futures::FutureExt;
use serde_json::{Map, Value};
use std::panic::AssertUnwindSafe;
use std::str::FromStr;

/// Parsed request body handed to every action.
pub type Body = Map<String, Value>;

/// The closed set of actions selectable through `?action=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Generate,
    Models,
    Test,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Models => "models",
            Self::Test => "test",
        }
    }
}

impl FromStr for Action {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generate" => Ok(Self::Generate),
            "models" => Ok(Self::Models),
            "test" => Ok(Self::Test),
            other => Err(RelayError::Validation(format!("Unknown action: {other}"))),
        }
    }
}

/// Single entry point: one event in, exactly one envelope out.
///
/// Preflight is answered before anything else is looked at. Otherwise the
/// `action` parameter is required, the body is parsed for body-bearing
/// methods, and the action runs with every failure (panics included) turned
/// into an error envelope.
pub async fn dispatch(state: &AppState, event: InboundEvent) -> Envelope {
    let cors = &state.cors;

    if event.is_preflight() {
        return Envelope::preflight(cors);
    }

    let Some(action) = event.query("action").filter(|a| !a.is_empty()) else {
        return Envelope::error(StatusCode::BAD_REQUEST, "action parameter is required", cors);
    };

    let body = match parse_body(&event) {
        Ok(body) => body,
        Err(e) => return Envelope::from_error(&e, cors),
    };

    let action = match action.parse::<Action>() {
        Ok(action) => action,
        Err(e) => {
            tracing::debug!(action = %action, "Rejected unknown action");
            return Envelope::from_error(&e, cors);
        }
    };

    tracing::debug!(action = action.as_str(), method = %event.http_method, "Dispatching");

    match AssertUnwindSafe(run_action(state, action, &body))
        .catch_unwind()
        .await
    {
        Ok(Ok(envelope)) => envelope,
        Ok(Err(e)) => {
            if e.status_code().is_server_error() {
                tracing::warn!(action = action.as_str(), kind = e.kind(), error = %e, "Action failed");
            } else {
                tracing::info!(action = action.as_str(), kind = e.kind(), error = %e, "Action rejected");
            }
            Envelope::from_error(&e, cors)
        }
        Err(_) => {
            tracing::error!(action = action.as_str(), "Action panicked");
            Envelope::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                cors,
            )
        }
    }
}

async fn run_action(state: &AppState, action: Action, body: &Body) -> Result<Envelope, RelayError> {
    match action {
        Action::Generate => handler::generate::generate(state, body).await,
        Action::Models => handler::models::models(state, body).await,
        Action::Test => handler::test_connection::test_connection(state, body).await,
    }
}

/// Body-bearing methods get their JSON object parsed; an absent or empty
/// body, or any other method, yields an empty object. Bytes that were not
/// UTF-8 are invalid JSON.
fn parse_body(event: &InboundEvent) -> Result<Body, RelayError> {
    if !event.carries_body() {
        return Ok(Body::new());
    }
    if event.has_undecodable_body() {
        return Err(RelayError::Validation("Invalid JSON".into()));
    }

    let raw = match event.body.as_deref() {
        None | Some("") => return Ok(Body::new()),
        Some(raw) => raw,
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(RelayError::Validation(
            "Request body must be a JSON object".into(),
        )),
        Err(_) => Err(RelayError::Validation("Invalid JSON".into())),
    }
}
