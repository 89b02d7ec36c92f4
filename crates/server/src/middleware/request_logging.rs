use super::request_context::RequestContext;
use axum::{extract::Request, middleware::Next, response::Response};
use tracing::Instrument;

/// The `action` query parameter, or `-` when absent.
fn action_of(request: &Request) -> String {
    request
        .uri()
        .query()
        .and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(k, _)| k == "action")
                .map(|(_, v)| v.into_owned())
        })
        .unwrap_or_else(|| "-".to_string())
}

/// Runs the request inside a span carrying its id and action, so every log
/// line the dispatcher emits is attributable, then logs the outcome.
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let Some(ctx) = request.extensions().get::<RequestContext>().cloned() else {
        return next.run(request).await;
    };

    let span = tracing::info_span!(
        "request",
        request_id = %ctx.request_id,
        method = %request.method(),
        action = %action_of(&request),
    );

    async move {
        tracing::debug!(client_ip = ctx.client_ip.as_deref().unwrap_or("-"), "Request received");

        let response = next.run(request).await;
        let status = response.status();
        let elapsed_ms = ctx.elapsed_ms() as u64;

        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), elapsed_ms, "Request failed");
        } else {
            tracing::info!(status = status.as_u16(), elapsed_ms, "Request completed");
        }
        response
    }
    .instrument(span)
    .await
}
