use axum::{
    extract::{Path, State},
    Json,
};
use log::debug;
use std::sync::Arc;

use crate::{ApiError, AppState, ErrorResponse, TemperatureRequest, TemperatureSummary};

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
         ("start" = String, Path, description = "First date to include, yyyy-mm-dd"),
    ),
    responses(
        (status = OK, description = "Daily min/avg/max temperature from the start date onwards", content_type = "application/json", body = Vec<TemperatureSummary>),
        (status = NOT_FOUND, description = "Start date is not within the dataset", content_type = "application/json", body = ErrorResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read climate data")
    ))]
pub async fn temperature_from(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<Vec<TemperatureSummary>>, ApiError> {
    let req = TemperatureRequest { start, end: None };
    summarize(&state, req).await
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
         ("start" = String, Path, description = "First date to include, yyyy-mm-dd"),
         ("end" = String, Path, description = "Last date to include, yyyy-mm-dd"),
    ),
    responses(
        (status = OK, description = "Daily min/avg/max temperature between the two dates", content_type = "application/json", body = Vec<TemperatureSummary>),
        (status = NOT_FOUND, description = "Start and/or end date is not within the dataset", content_type = "application/json", body = ErrorResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read climate data")
    ))]
pub async fn temperature_between(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<TemperatureSummary>>, ApiError> {
    let req = TemperatureRequest {
        start,
        end: Some(end),
    };
    summarize(&state, req).await
}

async fn summarize(
    state: &AppState,
    req: TemperatureRequest,
) -> Result<Json<Vec<TemperatureSummary>>, ApiError> {
    let summaries = state.climate_db.temperature_summary(&req).await?;
    debug!(
        "temperature summary {:?}..{:?}: {} dates",
        req.start,
        req.end,
        summaries.len()
    );
    Ok(Json(summaries))
}
