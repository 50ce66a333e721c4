use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::{self, InvalidDate};

/// Body returned for rejected requests
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    InvalidDate(#[from] InvalidDate),
    #[error("no observations are available")]
    NoObservations,
    #[error("failed to read climate data: {0}")]
    Data(db::Error),
}

impl From<db::Error> for ApiError {
    fn from(err: db::Error) -> Self {
        match err {
            db::Error::InvalidDate(invalid) => ApiError::InvalidDate(invalid),
            db::Error::NoObservations => ApiError::NoObservations,
            other => ApiError::Data(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::InvalidDate(_) | ApiError::NoObservations => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: self.to_string(),
                }),
            )
                .into_response(),
            // details stay in the log, the caller gets the generic failure
            ApiError::Data(err) => {
                error!("error reading climate data: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    StatusCode::INTERNAL_SERVER_ERROR
                        .canonical_reason()
                        .unwrap_or_default(),
                )
                    .into_response()
            }
        }
    }
}
