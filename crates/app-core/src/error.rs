//! Centralized error handling: one error type for the whole request path,
//! mapped to a stable machine-readable `kind`, an HTTP status and a message
//! that never exposes storage internals.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use super::config::ConfigError;
use super::identity::VerifyError;
use super::storage::StorageError;

const INTERNAL_MSG: &str = "An internal server error occurred";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Validation failed: {0}")]
    ValidationStr(String),

    #[error("Invalid request format: {0}")]
    RequestFormat(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Internal Libraries
    #[error("Config operation failed")]
    Config(#[from] ConfigError),

    #[error("Identity verification failed")]
    Identity(#[from] VerifyError),

    #[error("Storage operation failed")]
    Storage(#[from] StorageError),

    // Third Party Libraries
    #[error("Sea ORM operation failed")]
    Database(#[from] sea_orm::DbErr),

    #[error("Multipart operation failed")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("An internal server error occurred")]
    Internal,
}

impl AppError {
    /// Stable identifier clients can branch on.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) | AppError::ValidationStr(_) => "validation_error",
            AppError::RequestFormat(_) | AppError::Multipart(_) => "bad_request",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Identity(VerifyError::KeyLoad(_)) => "internal_error",
            AppError::Identity(_) => "unauthorized",
            AppError::NotFound(_) => "not_found",
            AppError::Config(_) | AppError::Storage(_) | AppError::Database(_) | AppError::Internal => "internal_error",
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    kind: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let (status, message, details) = match self {
            AppError::Validation(err) => {
                let details = json!(err.field_errors());
                (StatusCode::BAD_REQUEST, "Validation failed".to_string(), Some(details))
            },
            AppError::ValidationStr(msg) | AppError::RequestFormat(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::Identity(VerifyError::KeyLoad(msg)) => {
                tracing::error!("Identity verifier key error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MSG.to_string(), None)
            },
            AppError::Identity(err) => {
                tracing::debug!("Identity verification rejected: {:?}", err);
                (StatusCode::UNAUTHORIZED, err.to_string(), None)
            },
            AppError::Multipart(err) => {
                tracing::warn!("Multipart request error: {:?}", err);
                (StatusCode::BAD_REQUEST, "Invalid multipart form data".to_string(), None)
            },

            // Internal Libraries
            AppError::Config(err) => {
                tracing::error!("Config getter error: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MSG.to_string(), None)
            },
            AppError::Storage(err) => {
                tracing::error!("Storage error: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MSG.to_string(), None)
            },

            // Third Party Libraries
            AppError::Database(err) => {
                tracing::error!("Database error: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MSG.to_string(), None)
            },
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MSG.to_string(), None),
        };

        (status, Json(ErrorResponse { kind, message, details })).into_response()
    }
}
