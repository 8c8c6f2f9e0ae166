use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use metrics::counter;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};

use tally_ledger::Ledger;

use crate::error::ApiError;

/// Window size used when the caller does not provide a usable count.
pub const DEFAULT_RECENT_COUNT: usize = 5;

/// Largest recent-window size a caller may request.
pub const MAX_RECENT_COUNT: usize = 20;

/// Shared state behind every handler.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn Ledger>,
    pub metrics: PrometheusHandle,
    pub started_at: Instant,
}

/// The four arithmetic operations the service exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Self::Addition => "addition",
            Self::Subtraction => "subtraction",
            Self::Multiplication => "multiplication",
            Self::Division => "division",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Addition => "+",
            Self::Subtraction => "-",
            Self::Multiplication => "*",
            Self::Division => "/",
        }
    }

    /// Apply the operation. `None` rejects the operands (division by zero).
    fn apply(self, a: f64, b: f64) -> Option<f64> {
        match self {
            Self::Addition => Some(a + b),
            Self::Subtraction => Some(a - b),
            Self::Multiplication => Some(a * b),
            Self::Division => (b != 0.0).then(|| a / b),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CalcRequest {
    pub operand1: f64,
    pub operand2: f64,
}

#[derive(Debug, Serialize)]
pub struct CalcResponse {
    pub result: f64,
    pub operation: &'static str,
    pub expression: String,
}

#[derive(Debug, Serialize)]
pub struct RecentResponse {
    pub calculations: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecentParams {
    pub n: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
}

pub async fn addition_handler(
    state: State<AppState>,
    request: Result<Json<CalcRequest>, JsonRejection>,
) -> Result<Json<CalcResponse>, ApiError> {
    calculate(state, Operation::Addition, request)
}

pub async fn subtraction_handler(
    state: State<AppState>,
    request: Result<Json<CalcRequest>, JsonRejection>,
) -> Result<Json<CalcResponse>, ApiError> {
    calculate(state, Operation::Subtraction, request)
}

pub async fn multiplication_handler(
    state: State<AppState>,
    request: Result<Json<CalcRequest>, JsonRejection>,
) -> Result<Json<CalcResponse>, ApiError> {
    calculate(state, Operation::Multiplication, request)
}

pub async fn division_handler(
    state: State<AppState>,
    request: Result<Json<CalcRequest>, JsonRejection>,
) -> Result<Json<CalcResponse>, ApiError> {
    calculate(state, Operation::Division, request)
}

/// Shared body of the four arithmetic handlers: validate, compute, record
/// the formatted expression in the ledger, respond.
fn calculate(
    State(state): State<AppState>,
    operation: Operation,
    request: Result<Json<CalcRequest>, JsonRejection>,
) -> Result<Json<CalcResponse>, ApiError> {
    let Json(request) = request.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    let result = operation
        .apply(request.operand1, request.operand2)
        .ok_or_else(|| ApiError::bad_request("division by zero is not allowed"))?;

    let expression = format_expression(
        request.operand1,
        request.operand2,
        operation.symbol(),
        result,
    );
    state.ledger.append(&expression);
    counter!("calculations_total", "operation" => operation.name()).increment(1);

    Ok(Json(CalcResponse {
        result,
        operation: operation.name(),
        expression,
    }))
}

/// Bounded recent-calculations query.
///
/// `?n=` outside `[1, MAX_RECENT_COUNT]`, or unparseable, silently falls
/// back to the default; the ledger itself accepts any count.
pub async fn recent_handler(
    State(state): State<AppState>,
    Query(params): Query<RecentParams>,
) -> Json<RecentResponse> {
    let n = recent_count(params.n.as_deref());
    Json(RecentResponse {
        calculations: state.ledger.recent(n),
    })
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "tally",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

fn recent_count(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.parse::<usize>().ok())
        .filter(|n| (1..=MAX_RECENT_COUNT).contains(n))
        .unwrap_or(DEFAULT_RECENT_COUNT)
}

/// Format `"<a> <op> <b> = <result>"`.
///
/// `f64`'s `Display` produces the shortest decimal rendering that
/// round-trips, without exponent notation, so `1.0` prints as `1` and
/// `0.5` as `0.5`.
fn format_expression(a: f64, b: f64, symbol: &str, result: f64) -> String {
    format!("{a} {symbol} {b} = {result}")
}
