use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Service-level failures: construction, startup, and shutdown.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("ledger error: {0}")]
    Ledger(#[from] tally_ledger::LedgerError),

    #[error("metrics recorder error: {0}")]
    Metrics(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// Client-visible request failure, rendered as a JSON `{"error": ...}` body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_renders_json_error() {
        let response = ApiError::bad_request("division by zero is not allowed").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn ledger_errors_convert() {
        let error: ServerError = tally_ledger::LedgerError::UnknownBackend("redis".into()).into();
        assert!(matches!(error, ServerError::Ledger(_)));
    }
}
