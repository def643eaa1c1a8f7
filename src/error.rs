use std::borrow::Cow;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        existing_id: Option<Uuid>,
    },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
}

impl Error {
    pub fn conflict(message: impl Into<String>, existing_id: Uuid) -> Self {
        Error::Conflict {
            message: message.into(),
            existing_id: Some(existing_id),
        }
    }

    pub fn not_found(entity: &str, id: Uuid) -> Self {
        Error::NotFound(format!("{} {} not found", entity, id))
    }
}

/// Builds a single-field validation failure, for checks `validator` derives cannot express.
pub fn field_error(field: &'static str, code: &'static str, message: impl Into<Cow<'static, str>>) -> Error {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    Error::Validation(errors)
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // well-formed JSON that does not fit the payload type
            JsonRejection::JsonDataError(err) => {
                field_error("body", "invalid_payload", err.body_text())
            }
            other => Error::BadRequest(other.body_text()),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            Error::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "bad_request", "message": msg }),
            ),
            Error::Multipart(err) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "bad_request", "message": err.to_string() }),
            ),
            Error::Json(err) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "bad_request", "message": err.to_string() }),
            ),
            Error::Unauthenticated(msg) => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "unauthenticated", "message": msg }),
            ),
            Error::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                json!({ "error": "forbidden", "message": msg }),
            ),
            Error::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                json!({ "error": "not_found", "message": msg }),
            ),
            Error::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "validation_failed",
                    "message": "One or more fields are invalid",
                    "details": errors,
                }),
            ),
            Error::Conflict {
                message,
                existing_id,
            } => (
                StatusCode::CONFLICT,
                json!({ "error": "conflict", "message": message, "existing_id": existing_id }),
            ),
            Error::InvalidOperation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": "invalid_operation", "message": msg }),
            ),
            other => {
                tracing::error!(error = %other, "Request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "An unexpected error occurred",
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::Database(other),
        }
    }
}
