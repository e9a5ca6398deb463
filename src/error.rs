//! Error types for Custodia server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Stable numeric error codes exposed to API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    DbFailure = 1,
    NoSuchRecord = 2,
    BadValue = 3,
    StateConflict = 4,
    InsufficientStock = 5,
    QuantityMismatch = 6,
    DependencyFailure = 7,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation attempted from a loan status that does not permit it,
    /// duplicate inspection, and the like. Never coerced into success.
    #[error("State conflict: {0}")]
    StateConflict(String),

    /// Approval could not reserve the requested quantity for an asset.
    #[error("Insufficient stock for asset {asset_id}: requested {requested}, available {available}")]
    InsufficientStock {
        asset_id: i32,
        requested: i32,
        available: i32,
    },

    /// Return split totals do not add up to what was issued.
    #[error("Quantity mismatch for asset {asset_id}: returned {returned}, requested {requested}")]
    QuantityMismatch {
        asset_id: i32,
        returned: i32,
        requested: i32,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A collaborator the request depends on is unreachable, currently the
    /// database behind the readiness probe.
    #[error("Dependency failure: {0}")]
    Dependency(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchRecord, msg.clone())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::StateConflict(msg) => {
                (StatusCode::CONFLICT, ErrorCode::StateConflict, msg.clone())
            }
            AppError::InsufficientStock { .. } => (
                StatusCode::CONFLICT,
                ErrorCode::InsufficientStock,
                self.to_string(),
            ),
            AppError::QuantityMismatch { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::QuantityMismatch,
                self.to_string(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Dependency(msg) => {
                tracing::error!("Dependency failure: {}", msg);
                (StatusCode::BAD_GATEWAY, ErrorCode::DependencyFailure, msg.clone())
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
