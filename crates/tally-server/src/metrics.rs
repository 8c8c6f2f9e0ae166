//! Prometheus metrics.
//!
//! The recorder is installed once at startup; its render handle travels in
//! the router state and feeds the `/metrics` endpoint. Nothing else is
//! process-global.

use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::error::ServerError;
use crate::handler::AppState;

/// Install the Prometheus recorder and return its render handle.
pub fn install_recorder() -> Result<PrometheusHandle, ServerError> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::Metrics(e.to_string()))
}

/// Per-request accounting: one `http_requests_total` increment and one
/// latency observation per completed request, labeled by method, matched
/// route, and status.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let start = Instant::now();
    let response = next.run(request).await;
    let status = response.status().as_u16().to_string();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);
    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(start.elapsed().as_secs_f64());

    response
}

/// Prometheus text exposition.
pub async fn metrics_handler(State(state): State<AppState>) -> String {
    state.metrics.render()
}
