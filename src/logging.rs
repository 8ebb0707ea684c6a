//! Middleware for logging requests and responses.

use axum::{extract::Request, middleware::Next, response::Response};

/// Response and request bodies longer than this many bytes are truncated in
/// the info-level log line; the full body goes to the debug level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level. If a body
/// is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is truncated and the
/// full body logged at the `debug` level instead.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body_text) = extract_parts_and_body_text_from_request(request).await;
    log_message(&format!("Received request: {} {}", parts.method, parts.uri), &body_text);

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body_text) = extract_parts_and_body_text_from_response(response).await;
    log_message(&format!("Sending response: {}", parts.status), &body_text);

    Response::from_parts(parts, body_text.into())
}

async fn extract_parts_and_body_text_from_request(
    request: Request,
) -> (axum::http::request::Parts, String) {
    let (parts, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    (parts, String::from_utf8_lossy(&body_bytes).to_string())
}

async fn extract_parts_and_body_text_from_response(
    response: Response,
) -> (axum::http::response::Parts, String) {
    let (parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    (parts, String::from_utf8_lossy(&body_bytes).to_string())
}

fn log_message(headline: &str, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        // Back off to a character boundary so the slice cannot panic on
        // multi-byte text.
        let mut end = LOG_BODY_LENGTH_LIMIT;
        while !body.is_char_boundary(end) {
            end -= 1;
        }

        tracing::info!("{headline}\nbody: {}...", &body[..end]);
        tracing::debug!("Full body: {body:?}");
    } else {
        tracing::info!("{headline}\nbody: {body:?}");
    }
}
