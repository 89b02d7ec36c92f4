pub mod generate;
pub mod health;
pub mod invoke;
pub mod models;
pub mod test_connection;

use crate::dispatch::Body;
use chat_relay_core::error::{RelayError, UpstreamError};
use chat_relay_core::types::openai::{ChatCompletionResponse, Choice};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// JSON values a caller would consider "not provided".
pub(crate) fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

pub(crate) fn optional_string(body: &Body, field: &str) -> Result<Option<String>, RelayError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(RelayError::Validation(format!("{field} must be a string"))),
    }
}

pub(crate) fn optional_number(body: &Body, field: &str) -> Result<Option<f64>, RelayError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(_) => Err(RelayError::Validation(format!("{field} must be a number"))),
    }
}

/// A positive integer field; zero counts as absent.
pub(crate) fn optional_count(body: &Body, field: &str) -> Result<Option<u64>, RelayError> {
    match body.get(field) {
        None => Ok(None),
        Some(v) if is_blank(v) => Ok(None),
        Some(v) => v.as_u64().map(Some).ok_or_else(|| {
            RelayError::Validation(format!("{field} must be a positive integer"))
        }),
    }
}

/// Decode an upstream reply into a typed shape; a mismatch is an upstream defect.
pub(crate) fn decode_reply<T: DeserializeOwned>(reply: Value, what: &str) -> Result<T, RelayError> {
    serde_json::from_value(reply)
        .map_err(|e| UpstreamError::Unknown(format!("unexpected {what} response: {e}")).into())
}

/// The first completion choice. A reply without `choices` is normalized to an
/// empty choice; an explicitly empty list is an error.
pub(crate) fn first_choice(completion: &ChatCompletionResponse) -> Result<Choice, RelayError> {
    match completion.choices.as_deref() {
        None => Ok(Choice::default()),
        Some([]) => Err(RelayError::Internal(
            "upstream response contained no choices".into(),
        )),
        Some([first, ..]) => Ok(first.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Body {
        match value {
            Value::Object(map) => map,
            _ => panic!("test body must be an object"),
        }
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(&json!(null)));
        assert!(is_blank(&json!([])));
        assert!(is_blank(&json!("")));
        assert!(is_blank(&json!(0)));
        assert!(is_blank(&json!(false)));
        assert!(!is_blank(&json!([{"role": "user", "content": "hi"}])));
        assert!(!is_blank(&json!(10)));
    }

    #[test]
    fn test_optional_fields() {
        let b = body(json!({"model": "openai/gpt-4o", "temperature": 1, "max_tokens": 0, "n": null}));
        assert_eq!(optional_string(&b, "model").unwrap().as_deref(), Some("openai/gpt-4o"));
        assert_eq!(optional_string(&b, "missing").unwrap(), None);
        assert_eq!(optional_number(&b, "temperature").unwrap(), Some(1.0));
        assert_eq!(optional_number(&b, "n").unwrap(), None);
        assert_eq!(optional_count(&b, "max_tokens").unwrap(), None);

        let b = body(json!({"model": 4, "temperature": "hot", "max_tokens": -5}));
        assert_eq!(
            optional_string(&b, "model").unwrap_err().to_string(),
            "model must be a string"
        );
        assert!(optional_number(&b, "temperature").is_err());
        assert!(optional_count(&b, "max_tokens").is_err());
    }

    #[test]
    fn test_first_choice() {
        let missing: ChatCompletionResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(first_choice(&missing).unwrap().finish_reason(), "stop");

        let empty: ChatCompletionResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(first_choice(&empty), Err(RelayError::Internal(_))));

        let two: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [
                {"message": {"content": "first"}, "finish_reason": "length"},
                {"message": {"content": "second"}}
            ]
        }))
        .unwrap();
        let choice = first_choice(&two).unwrap();
        assert_eq!(choice.content(), "first");
        assert_eq!(choice.finish_reason(), "length");
    }
}
