use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::http::response::ErrorResponse;
use crate::http::AppState;
use crate::load_balancer::Target;
use crate::security::LimiterSnapshot;

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemStatus {
    pub version: String,
    pub status: String,
    pub limiter: LimiterStatus,
    pub total_weight: u64,
    pub targets: usize,
    pub available_targets: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LimiterStatus {
    pub rate: f64,
    pub capacity: f64,
    pub tokens: f64,
}

impl From<LimiterSnapshot> for LimiterStatus {
    fn from(snapshot: LimiterSnapshot) -> Self {
        Self {
            rate: snapshot.rate,
            capacity: snapshot.capacity,
            tokens: snapshot.tokens,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TargetStatus {
    pub id: String,
    pub weight: u32,
    pub available: bool,
    pub error_count: u32,
    /// Seconds until the transient cooldown ends (0 when not cooling down).
    pub cooldown_remaining_secs: f64,
    /// Seconds until the hard disable ends (0 when not disabled).
    pub disabled_remaining_secs: f64,
    pub latency_ms: u64,
    pub error_rate: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeightUpdate {
    pub weight: u32,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn target_status(state: &AppState, target: &Target) -> TargetStatus {
    let health = state.gateway.health();
    let now = health.now();
    let record = health.snapshot(&target.id).unwrap_or_default();

    TargetStatus {
        id: target.id.clone(),
        weight: target.weight,
        available: record.is_available(now),
        error_count: record.error_count,
        cooldown_remaining_secs: record.cooldown_until.saturating_sub(now).as_secs_f64(),
        disabled_remaining_secs: record.disabled_until.saturating_sub(now).as_secs_f64(),
        latency_ms: u64::try_from(target.profile.latency.as_millis()).unwrap_or(u64::MAX),
        error_rate: target.profile.error_rate,
    }
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let gateway = &state.gateway;
    let targets = gateway.pool().targets();
    let available_targets = targets
        .iter()
        .filter(|t| gateway.health().is_available(&t.id))
        .count();

    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "operational".to_string(),
        limiter: gateway.limiter().snapshot().into(),
        total_weight: gateway.pool().total_weight(),
        targets: targets.len(),
        available_targets,
    })
}

pub async fn get_targets(State(state): State<AppState>) -> Json<Vec<TargetStatus>> {
    let statuses = state
        .gateway
        .pool()
        .targets()
        .iter()
        .map(|target| target_status(&state, target))
        .collect();
    Json(statuses)
}

pub async fn put_target_weight(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<WeightUpdate>,
) -> Result<Json<TargetStatus>, ApiError> {
    let pool = state.gateway.pool();
    pool.set_weight(&id, update.weight).map_err(|e| {
        let status = match e {
            GatewayError::UnknownTarget(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        };
        (status, Json(ErrorResponse::new(e.to_string())))
    })?;

    let target = pool
        .targets()
        .into_iter()
        .find(|t| t.id == id)
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(GatewayError::UnknownTarget(id.clone()).to_string())),
            )
        })?;

    Ok(Json(target_status(&state, &target)))
}
