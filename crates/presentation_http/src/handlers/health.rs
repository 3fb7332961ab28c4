//! Health check handler

use application::HealthReport;
use axum::{Json, extract::State};

use crate::state::AppState;

/// Report liveness and remaining API credential capacity
pub async fn health_check(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.health_service.check())
}
