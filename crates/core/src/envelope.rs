//! The outward response shape: status code, header map, JSON text body.

use crate::config::Config;
use crate::error::RelayError;
use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const ALLOW_METHODS: &str = "POST, GET, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type";

const FALLBACK_BODY: &str = r#"{"error":"Internal server error"}"#;

/// Cross-origin policy applied to every envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    pub allow_origin: String,
}

impl CorsPolicy {
    pub fn new(allow_origin: impl Into<String>) -> Self {
        Self {
            allow_origin: allow_origin.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.resolve_cors_origin())
    }

    /// Add the CORS headers to a response built outside the envelope path.
    pub fn apply(&self, headers: &mut HeaderMap) {
        insert_headers(headers, &self.headers());
    }

    fn headers(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (
                "Access-Control-Allow-Origin".to_string(),
                self.allow_origin.clone(),
            ),
            (
                "Access-Control-Allow-Methods".to_string(),
                ALLOW_METHODS.to_string(),
            ),
            (
                "Access-Control-Allow-Headers".to_string(),
                ALLOW_HEADERS.to_string(),
            ),
        ])
    }
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self::new("*")
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// The only value ever handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl Envelope {
    /// A JSON envelope. Serialization failure degrades to a generic 500.
    pub fn json<T: Serialize>(status: StatusCode, payload: &T, cors: &CorsPolicy) -> Self {
        let (status, body) = match serde_json::to_string(payload) {
            Ok(body) => (status, body),
            Err(e) => {
                tracing::error!("failed to serialize response body: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, FALLBACK_BODY.to_string())
            }
        };
        let mut headers = cors.headers();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            status_code: status.as_u16(),
            headers,
            body,
        }
    }

    /// `{"error": message}` with the given status.
    pub fn error(status: StatusCode, message: &str, cors: &CorsPolicy) -> Self {
        Self::json(status, &ErrorBody { error: message }, cors)
    }

    pub fn from_error(err: &RelayError, cors: &CorsPolicy) -> Self {
        Self::error(err.status_code(), &err.to_string(), cors)
    }

    /// 204 reply to a CORS preflight: CORS headers only, empty body.
    pub fn preflight(cors: &CorsPolicy) -> Self {
        Self {
            status_code: StatusCode::NO_CONTENT.as_u16(),
            headers: cors.headers(),
            body: String::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn body_json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = status;
        insert_headers(response.headers_mut(), &self.headers);
        response
    }
}

fn insert_headers(target: &mut HeaderMap, headers: &BTreeMap<String, String>) {
    for (name, value) in headers {
        match (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            (Ok(name), Ok(value)) => {
                target.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "dropping invalid response header"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UpstreamError;

    #[test]
    fn test_preflight_has_cors_and_empty_body() {
        let env = Envelope::preflight(&CorsPolicy::default());
        assert_eq!(env.status_code, 204);
        assert_eq!(env.body, "");
        assert_eq!(env.headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(env.headers["Access-Control-Allow-Methods"], "POST, GET, OPTIONS");
        assert_eq!(env.headers["Access-Control-Allow-Headers"], "Content-Type");
        assert!(!env.headers.contains_key("Content-Type"));
    }

    #[test]
    fn test_error_body_is_exact() {
        let cors = CorsPolicy::new("https://app.example.com");
        let env = Envelope::error(StatusCode::BAD_REQUEST, "Invalid JSON", &cors);
        assert_eq!(env.status_code, 400);
        assert_eq!(env.body, r#"{"error":"Invalid JSON"}"#);
        assert_eq!(env.headers["Content-Type"], "application/json");
        assert_eq!(
            env.headers["Access-Control-Allow-Origin"],
            "https://app.example.com"
        );
    }

    #[test]
    fn test_from_error_uses_status_mapping() {
        let env = Envelope::from_error(
            &RelayError::from(UpstreamError::Timeout),
            &CorsPolicy::default(),
        );
        assert_eq!(env.status_code, 503);
        assert_eq!(env.body, r#"{"error":"API timeout"}"#);
    }

    #[test]
    fn test_serializes_with_camel_case_status() {
        let env = Envelope::preflight(&CorsPolicy::default());
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["statusCode"], 204);
        assert_eq!(v["body"], "");
    }

    #[test]
    fn test_non_ascii_text_is_not_escaped() {
        let env = Envelope::error(StatusCode::BAD_REQUEST, "ключ не найден", &CorsPolicy::default());
        assert_eq!(env.body, r#"{"error":"ключ не найден"}"#);
    }

    #[test]
    fn test_apply_adds_cors_headers() {
        let mut headers = HeaderMap::new();
        CorsPolicy::new("https://app.example.com").apply(&mut headers);
        assert_eq!(headers["access-control-allow-origin"], "https://app.example.com");
        assert_eq!(headers["access-control-allow-headers"], "Content-Type");
        assert!(!headers.contains_key("content-type"));
    }

    #[test]
    fn test_into_response_copies_headers() {
        let env = Envelope::error(StatusCode::BAD_REQUEST, "nope", &CorsPolicy::default());
        let resp = env.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        assert_eq!(resp.headers()["content-type"], "application/json");
    }
}
