use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{ApiError, AppState};

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Station identifiers in ascending order", content_type = "application/json", body = Vec<String>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read climate data")
    ))]
pub async fn stations(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, ApiError> {
    let stations = state.climate_db.stations().await?;
    Ok(Json(stations))
}
