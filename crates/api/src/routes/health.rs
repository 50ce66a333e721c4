//! Readiness of the dataset connection

use axum::{extract::State, http::StatusCode, Json};
use log::warn;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = OK, description = "Dataset is reachable", body = HealthResponse),
        (status = SERVICE_UNAVAILABLE, description = "Dataset could not be queried", body = HealthResponse)
    ))]
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let (status_code, status) = match state.climate_db.health_check().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(err) => {
            warn!("health check failed: {}", err);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}
