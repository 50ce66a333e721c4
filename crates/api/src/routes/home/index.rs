use std::sync::Arc;

use axum::{extract::State, response::Html};

use crate::{templates::home_page, ApiError, AppState};

pub async fn index_handler(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let range = state.climate_db.date_range().await?;
    Ok(Html(home_page(range).into_string()))
}
