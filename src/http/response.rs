//! Response construction.
//!
//! Maps a routing [`Outcome`] onto the wire:
//! - success → 200 `{"provider": id, "latency": ms}`
//! - rate limited → 429 `{"error": "Rate limit exceeded"}`
//! - upstream failure → 502 `{"error": "Upstream error"}`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::gateway::Outcome;

pub const RATE_LIMITED_MESSAGE: &str = "Rate limit exceeded";
pub const UPSTREAM_ERROR_MESSAGE: &str = "Upstream error";

/// Body of a successful completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub provider: String,
    /// Upstream call duration in milliseconds.
    pub latency: u64,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Status code for an outcome.
pub fn outcome_status(outcome: &Outcome) -> StatusCode {
    match outcome {
        Outcome::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        Outcome::Success { .. } => StatusCode::OK,
        Outcome::Failure { .. } => StatusCode::BAD_GATEWAY,
    }
}

/// Full response for an outcome.
pub fn outcome_response(outcome: &Outcome) -> Response {
    let status = outcome_status(outcome);
    match outcome {
        Outcome::RateLimited => {
            (status, Json(ErrorResponse::new(RATE_LIMITED_MESSAGE))).into_response()
        }
        Outcome::Success { target, duration } => (
            status,
            Json(CompletionResponse {
                provider: target.id.clone(),
                latency: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            }),
        )
            .into_response(),
        Outcome::Failure { .. } => {
            (status, Json(ErrorResponse::new(UPSTREAM_ERROR_MESSAGE))).into_response()
        }
    }
}
