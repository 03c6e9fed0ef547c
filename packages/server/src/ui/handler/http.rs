//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::{infrastructure::dto::http::HealthDto, ui::state::AppState};

/// Health check endpoint
///
/// コーディネーターが止まっている場合は 503 を返す。
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthDto>, StatusCode> {
    match state.coordinator.participant_count().await {
        Ok(count) => Ok(Json(HealthDto::ok(
            count,
            state.started_at.elapsed().as_secs_f64(),
        ))),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
