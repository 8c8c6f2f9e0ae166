use std::time::Duration;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};
use crate::metrics;

/// Build the axum router with all Tally endpoints.
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/calculate/addition", post(handler::addition_handler))
        .route("/calculate/subtraction", post(handler::subtraction_handler))
        .route(
            "/calculate/multiplication",
            post(handler::multiplication_handler),
        )
        .route("/calculate/division", post(handler::division_handler))
        .route("/calculate/recent", get(handler::recent_handler))
        .route("/health", get(handler::health_handler))
        .route("/metrics", get(metrics::metrics_handler))
        .layer(middleware::from_fn(metrics::track_requests))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}
