//! Error handling
//!
//! This module defines the application error type and its conversion
//! into HTTP responses with stable machine-readable codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Application errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// A referenced entity does not exist.
    #[error("{message}")]
    NotFound { code: &'static str, message: String },

    /// The operation is not legal in the entity's current status, or a
    /// uniqueness/availability rule rejected it.
    #[error("{message}")]
    Conflict { code: &'static str, message: String },

    /// The request is well-formed but violates a domain rule (expired
    /// license, odometer ordering, capacity).
    #[error("{message}")]
    Unprocessable { code: &'static str, message: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        AppError::NotFound { code, message: message.into() }
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        AppError::Conflict { code, message: message.into() }
    }

    pub fn unprocessable(code: &'static str, message: impl Into<String>) -> Self {
        AppError::Unprocessable { code, message: message.into() }
    }

    /// Stable machine code surfaced to clients alongside the HTTP status.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DB_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound { code, .. }
            | AppError::Conflict { code, .. }
            | AppError::Unprocessable { code, .. } => code,
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

/// Error body returned by the API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    message: String,
    code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code().to_string();

        let (error, message, details) = match &self {
            AppError::Database(e) => {
                error!("Database error: {}", e);
                (
                    "Database Error".to_string(),
                    "An error occurred while accessing the database".to_string(),
                    None,
                )
            }
            AppError::Validation(e) => {
                warn!("Validation error: {}", e);
                (
                    "Validation Error".to_string(),
                    "The provided data is invalid".to_string(),
                    Some(json!(e)),
                )
            }
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    "Internal Server Error".to_string(),
                    "An unexpected error occurred".to_string(),
                    None,
                )
            }
            other => {
                warn!("Request failed [{}]: {}", code, other);
                (status_label(status).to_string(), other.to_string(), None)
            }
        };

        let body = ErrorResponse {
            success: false,
            error,
            message,
            code,
            details,
        };

        (status, Json(body)).into_response()
    }
}

fn status_label(status: StatusCode) -> &'static str {
    match status {
        StatusCode::NOT_FOUND => "Not Found",
        StatusCode::CONFLICT => "Conflict",
        StatusCode::UNPROCESSABLE_ENTITY => "Unprocessable Entity",
        StatusCode::UNAUTHORIZED => "Unauthorized",
        StatusCode::FORBIDDEN => "Forbidden",
        _ => "Error",
    }
}

/// Typed result for fallible operations
pub type AppResult<T> = Result<T, AppError>;
