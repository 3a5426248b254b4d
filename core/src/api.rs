//! HTTP surface of the scoring service.
//!
//! Routes:
//!   POST /score        : model probability for one transaction
//!   POST /fraud-check  : rules + model + decision
//!   GET  /healthz      : liveness

use crate::{
    decision::{FraudCheckOutcome, FraudChecker},
    error::FraudError,
    rules::Transaction,
    scorer::{ScoreRequest, ScoreResponse, Scorer},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Read-only state shared by every handler.
pub struct AppState {
    pub scorer:  Scorer,
    pub checker: FraudChecker,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Well-formed JSON with missing or mistyped fields.
    #[error("{0}")]
    Validation(String),
    /// Unparseable body or wrong content type.
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, msg) = match self {
            ApiError::Validation(s) => (StatusCode::UNPROCESSABLE_ENTITY, s),
            ApiError::BadRequest(s) => (StatusCode::BAD_REQUEST, s),
            ApiError::Internal(s)   => (StatusCode::INTERNAL_SERVER_ERROR, s),
        };
        (code, Json(ErrBody { error: msg })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => ApiError::Validation(e.body_text()),
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

impl From<FraudError> for ApiError {
    fn from(err: FraudError) -> Self {
        log::error!("scoring failed: {err}");
        ApiError::Internal(err.to_string())
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/score", post(score))
        .route("/fraud-check", post(fraud_check))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn score(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ScoreRequest>, JsonRejection>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let Json(req) = payload?;
    let response = state.scorer.score(&req)?;
    Ok(Json(response))
}

async fn fraud_check(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Transaction>, JsonRejection>,
) -> Result<(StatusCode, Json<FraudCheckOutcome>), ApiError> {
    let Json(tx) = payload?;
    let outcome = state.checker.check(&tx, &state.scorer);
    // A degraded decision is still an answer; flag it with 202.
    let status = if outcome.error.is_some() {
        StatusCode::ACCEPTED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome)))
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
