use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

fn default_method() -> String {
    "POST".to_string()
}

/// A null `httpMethod` is treated like a missing one.
fn method_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_method))
}

/// The trigger event handed to the dispatcher by its host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundEvent {
    #[serde(default = "default_method", deserialize_with = "method_or_default")]
    pub http_method: String,
    /// Values may be null; a null value reads as absent.
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, Option<String>>>,
    #[serde(default)]
    pub body: Option<String>,
    /// Set when the host received body bytes that are not UTF-8.
    #[serde(skip)]
    body_undecodable: bool,
}

impl InboundEvent {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            http_method: method.into(),
            query_string_parameters: None,
            body: None,
            body_undecodable: false,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_string_parameters
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), Some(value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self.body_undecodable = false;
        self
    }

    /// Body taken from raw request bytes. Empty bytes mean no body; bytes that
    /// are not UTF-8 are kept out of `body` and reported by
    /// [`has_undecodable_body`](Self::has_undecodable_body).
    pub fn with_raw_body(mut self, bytes: &[u8]) -> Self {
        match std::str::from_utf8(bytes) {
            Ok("") => {
                self.body = None;
                self.body_undecodable = false;
            }
            Ok(text) => return self.with_body(text),
            Err(_) => {
                self.body = None;
                self.body_undecodable = true;
            }
        }
        self
    }

    pub fn has_undecodable_body(&self) -> bool {
        self.body_undecodable
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|q| q.get(key))
            .and_then(Option::as_deref)
    }

    pub fn is_preflight(&self) -> bool {
        self.http_method.eq_ignore_ascii_case("OPTIONS")
    }

    /// Methods whose body the dispatcher parses.
    pub fn carries_body(&self) -> bool {
        ["POST", "PUT", "PATCH"]
            .iter()
            .any(|m| self.http_method.eq_ignore_ascii_case(m))
    }
}
