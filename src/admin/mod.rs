//! Admin API: gateway status and runtime weight changes.
//!
//! All routes require `Authorization: Bearer <admin.api_key>`.

pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/targets", get(get_targets))
        .route("/admin/targets/{id}/weight", put(put_target_weight))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}
