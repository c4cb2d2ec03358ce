use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::rate_limit::client_identity;

/// Request logging middleware
pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let client = client_identity(req.headers());
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let duration_ms = start.elapsed().as_millis();

    if status.is_server_error() {
        tracing::warn!(%method, %uri, %client, %status, duration_ms = %duration_ms, "Request failed");
    } else {
        tracing::info!(%method, %uri, %client, %status, duration_ms = %duration_ms, "Request processed");
    }

    response
}
