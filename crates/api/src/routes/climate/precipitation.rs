use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{ApiError, AppState, Precipitation};

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation readings from the trailing year of data", content_type = "application/json", body = Vec<Precipitation>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read climate data")
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Precipitation>>, ApiError> {
    let readings = state.climate_db.precipitation().await?;
    Ok(Json(readings))
}
