use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::features::pharmacies::store::StoreError;
use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{field} already exists")]
    UniqueConflict { field: String },

    #[error("Proximity conflict: {0}")]
    ProximityConflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { field } => AppError::UniqueConflict { field },
            StoreError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::<()>::error("Database error occurred".to_string()),
                )
            }
            AppError::NotFound(ref msg) => {
                (StatusCode::NOT_FOUND, ApiResponse::<()>::fail(msg.clone()))
            }
            AppError::InvalidId(ref msg) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::<()>::fail(msg.clone()),
            ),
            AppError::Validation(ref msg) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::<()>::fail(msg.clone()),
            ),
            AppError::BadRequest(ref msg) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::<()>::fail(msg.clone()),
            ),
            AppError::UniqueConflict { ref field } => (
                StatusCode::CONFLICT,
                ApiResponse::<()>::fail(format!(
                    "{field} already exists. Please use a different {field}"
                )),
            ),
            AppError::ProximityConflict(ref msg) => {
                (StatusCode::CONFLICT, ApiResponse::<()>::fail(msg.clone()))
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::<()>::error("Internal server error".to_string()),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
