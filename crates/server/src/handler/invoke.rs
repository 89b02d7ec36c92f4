//! axum host for the dispatcher: every request outside `/health` becomes one
//! trigger event.

use crate::AppState;
use crate::dispatch::dispatch;
use axum::extract::{RawQuery, State};
use axum::http::Method;
use bytes::Bytes;
use chat_relay_core::envelope::Envelope;
use chat_relay_core::event::InboundEvent;
use std::collections::HashMap;

pub async fn invoke(
    State(state): State<AppState>,
    method: Method,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Envelope {
    dispatch(&state, event_from_parts(&method, query.as_deref(), &body)).await
}

/// Build a trigger event from raw HTTP request parts.
pub fn event_from_parts(method: &Method, query: Option<&str>, body: &[u8]) -> InboundEvent {
    let mut event = InboundEvent::new(method.as_str()).with_raw_body(body);
    event.query_string_parameters = query.map(|q| {
        url::form_urlencoded::parse(q.as_bytes())
            .map(|(k, v)| (k.into_owned(), Some(v.into_owned())))
            .collect::<HashMap<String, Option<String>>>()
    });
    event
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_parts() {
        let event = event_from_parts(
            &Method::POST,
            Some("action=generate&note=a%20b"),
            br#"{"messages":[]}"#,
        );
        assert_eq!(event.http_method, "POST");
        assert_eq!(event.query("action"), Some("generate"));
        assert_eq!(event.query("note"), Some("a b"));
        assert_eq!(event.body.as_deref(), Some(r#"{"messages":[]}"#));
    }

    #[test]
    fn test_event_from_parts_without_query_or_body() {
        let event = event_from_parts(&Method::GET, None, b"");
        assert!(event.query_string_parameters.is_none());
        assert!(event.body.is_none());
    }

    #[test]
    fn test_event_from_parts_keeps_non_utf8_out_of_body() {
        let event = event_from_parts(&Method::POST, Some("action=generate"), b"{\"x\":\"\xff\"}");
        assert!(event.body.is_none());
        assert!(event.has_undecodable_body());
    }
}
