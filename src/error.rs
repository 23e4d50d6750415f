use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::models::{Category, MeasurementSystem};

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    #[error("No {system} unit defined for category {category}")]
    NoTargetUnit {
        system: MeasurementSystem,
        category: Category,
    },

    #[error("Invalid rating: {0} (must be between 1 and 5)")]
    InvalidRating(u8),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::NoTargetUnit { .. } => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            AppError::UnknownUnit(_) | AppError::InvalidRating(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
