//! HTTP server for the Tally calculation service.
//!
//! Exposes four arithmetic operations, a bounded "recent calculations"
//! query, a health check, and Prometheus metrics over HTTP, recording every
//! completed calculation in a pluggable record ledger.

pub mod config;
pub mod error;
pub mod handler;
pub mod metrics;
pub mod router;
pub mod server;

pub use config::{LogConfig, ServerConfig};
pub use error::{ApiError, ServerError, ServerResult};
pub use handler::{AppState, Operation, DEFAULT_RECENT_COUNT, MAX_RECENT_COUNT};
pub use server::TallyServer;

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use tally_ledger::{Ledger, MemoryLedger};

    use crate::handler::AppState;
    use crate::router::build_router;

    fn test_app() -> (Router, Arc<MemoryLedger>) {
        let ledger = Arc::new(MemoryLedger::new());
        let state = AppState {
            ledger: ledger.clone() as Arc<dyn Ledger>,
            metrics: PrometheusBuilder::new().build_recorder().handle(),
            started_at: Instant::now(),
        };
        (build_router(state, Duration::from_secs(5)), ledger)
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (app, _) = test_app();
        let (status, body) = get_json(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "tally");
    }

    #[tokio::test]
    async fn addition_records_the_expression() {
        let (app, ledger) = test_app();
        let (status, body) = post_json(
            app,
            "/calculate/addition",
            json!({"operand1": 3, "operand2": 4}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], 7.0);
        assert_eq!(body["operation"], "addition");
        assert_eq!(body["expression"], "3 + 4 = 7");
        assert_eq!(ledger.recent(1), vec!["3 + 4 = 7"]);
    }

    #[tokio::test]
    async fn all_four_operations_round_trip() {
        let (app, ledger) = test_app();

        let cases = [
            ("/calculate/addition", 3.0, 4.0, 7.0, "3 + 4 = 7"),
            ("/calculate/subtraction", 10.0, 2.0, 8.0, "10 - 2 = 8"),
            ("/calculate/multiplication", 6.0, 7.0, 42.0, "6 * 7 = 42"),
            ("/calculate/division", 10.0, 4.0, 2.5, "10 / 4 = 2.5"),
        ];
        for (uri, a, b, expected, expression) in cases {
            let (status, body) =
                post_json(app.clone(), uri, json!({"operand1": a, "operand2": b})).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["result"], expected);
            assert_eq!(body["expression"], expression);
        }

        assert_eq!(
            ledger.recent(10),
            vec!["3 + 4 = 7", "10 - 2 = 8", "6 * 7 = 42", "10 / 4 = 2.5"]
        );
    }

    #[tokio::test]
    async fn division_by_zero_is_rejected_before_the_ledger() {
        let (app, ledger) = test_app();
        let (status, body) = post_json(
            app,
            "/calculate/division",
            json!({"operand1": 1, "operand2": 0}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("division by zero"));
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn malformed_body_is_rejected() {
        let (app, ledger) = test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/calculate/addition")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn recent_defaults_to_five() {
        let (app, ledger) = test_app();
        for i in 0..7 {
            ledger.append(&format!("{i} + 0 = {i}"));
        }

        let (status, body) = get_json(app, "/calculate/recent").await;
        assert_eq!(status, StatusCode::OK);

        let calculations = body["calculations"].as_array().unwrap();
        assert_eq!(calculations.len(), 5);
        // Oldest-first within the trailing window.
        assert_eq!(calculations[0], "2 + 0 = 2");
        assert_eq!(calculations[4], "6 + 0 = 6");
    }

    #[tokio::test]
    async fn recent_honors_a_valid_count() {
        let (app, ledger) = test_app();
        ledger.append("3 + 4 = 7");
        ledger.append("10 - 2 = 8");

        let (status, body) = get_json(app, "/calculate/recent?n=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["calculations"], json!(["10 - 2 = 8"]));
    }

    #[tokio::test]
    async fn recent_falls_back_on_bad_counts() {
        let (app, ledger) = test_app();
        for i in 0..7 {
            ledger.append(&format!("{i} + 0 = {i}"));
        }

        for uri in [
            "/calculate/recent?n=0",
            "/calculate/recent?n=999",
            "/calculate/recent?n=abc",
        ] {
            let (status, body) = get_json(app.clone(), uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["calculations"].as_array().unwrap().len(), 5);
        }
    }

    #[tokio::test]
    async fn metrics_endpoint() {
        let (app, _) = test_app();
        let response = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
