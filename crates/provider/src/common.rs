use chat_relay_core::error::UpstreamError;
use reqwest::StatusCode;
use serde_json::Value;

/// Check the status of a reply and decode its JSON body.
pub async fn handle_response(resp: reqwest::Response) -> Result<Value, UpstreamError> {
    let status = resp.status();
    let body = resp.bytes().await?;

    if !status.is_success() {
        return Err(UpstreamError::Rejected(rejection_message(status, &body)));
    }

    Ok(serde_json::from_slice(&body)?)
}

/// `error.message` from an upstream error body, else the status line text
/// (e.g. `404 Not Found`).
pub fn rejection_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| status.to_string())
}
