use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// One `tracing` event per screening request, with method, path, status and
/// latency. Bodies hold questionnaire answers and stay out of the log; server
/// errors are raised to `warn`.
pub async fn request_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let latency_us = started.elapsed().as_micros() as u64;
    if status.is_server_error() {
        tracing::warn!(%method, %path, status = status.as_u16(), latency_us, "request failed");
    } else {
        tracing::info!(%method, %path, status = status.as_u16(), latency_us, "request served");
    }

    response
}
