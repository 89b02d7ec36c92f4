use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use axum::response::{IntoResponse, Response};
use chat_relay_core::envelope::Envelope;

/// Responses produced before the dispatcher runs (body limit, unknown method
/// on a route, extractor rejections) are reshaped into error envelopes so the
/// outward contract holds: CORS headers, a JSON `{"error"}` body, and only
/// 400 or 500. Other responses without CORS headers get them added.
pub async fn host_rejection_middleware(State(state): State<AppState>, response: Response) -> Response {
    if response.headers().contains_key(ACCESS_CONTROL_ALLOW_ORIGIN) {
        return response;
    }

    let status = response.status();
    let rejection = if status == StatusCode::PAYLOAD_TOO_LARGE {
        Some((StatusCode::BAD_REQUEST, "Request body too large"))
    } else if status.is_client_error() {
        Some((
            StatusCode::BAD_REQUEST,
            status.canonical_reason().unwrap_or("Bad request"),
        ))
    } else if status.is_server_error() {
        Some((StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"))
    } else {
        None
    };

    match rejection {
        Some((outward, message)) => {
            tracing::debug!(status = status.as_u16(), "Rejected before dispatch");
            Envelope::error(outward, message, &state.cors).into_response()
        }
        None => {
            let mut response = response;
            state.cors.apply(response.headers_mut());
            response
        }
    }
}
