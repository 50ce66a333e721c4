use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{ApiError, AppState, TemperatureObservation};

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Trailing year of temperature observations from the most active station", content_type = "application/json", body = Vec<TemperatureObservation>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read climate data")
    ))]
pub async fn tobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TemperatureObservation>>, ApiError> {
    let observations = state.climate_db.most_active_station_temperatures().await?;
    Ok(Json(observations))
}
