//! Application error type and its translation into the JSON error envelope.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

const INTERNAL_MESSAGE: &str = "Internal Server Error";

#[derive(Error, Debug)]
pub enum AppError {
    /// Arbitrary message with an explicit status.
    #[error("{message}")]
    Custom { status: StatusCode, message: String },

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    /// Media host or mail relay failed.
    #[error("{0}")]
    Upstream(String),

    #[error("Duplicate {0} entry")]
    Duplicate(String),

    #[error("invalid {0}")]
    InvalidId(String),

    #[error("JSON Web Token is invalid. Please try again.")]
    TokenInvalid,

    #[error("JSON Web Token has expired. Please try again.")]
    TokenExpired,

    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            INTERNAL_MESSAGE.to_string()
        } else {
            message
        };
        AppError::Custom { status, message }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Custom { status, .. } => *status,
            AppError::BadRequest(_)
            | AppError::Duplicate(_)
            | AppError::InvalidId(_)
            | AppError::TokenInvalid
            | AppError::TokenExpired => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message sent to the client. Database and internal causes stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(_) | AppError::Internal(_) => INTERNAL_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = ?self, %status, "request failed");
        } else {
            warn!(error = %self, %status, "request rejected");
        }

        let body = Json(json!({
            "success": false,
            "message": self.public_message(),
        }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error() {
            if db_err.code().as_deref() == Some("23505") {
                let field = db_err
                    .constraint()
                    .map(field_from_constraint)
                    .unwrap_or_else(|| "field".to_string());
                return AppError::Duplicate(field);
            }
        }
        AppError::Database(e)
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            JwtErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::TokenInvalid,
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(_: PathRejection) -> Self {
        AppError::InvalidId("id".into())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

// Multipart failures keep axum's status: 400 for a malformed body, 413 past
// the body limit.
impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::new(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::new(e.status(), e.body_text())
    }
}

/// `users_email_key` -> `email`, following Postgres' default naming of
/// `<table>_<column>_key` unique constraints.
fn field_from_constraint(constraint: &str) -> String {
    let trimmed = constraint.strip_suffix("_key").unwrap_or(constraint);
    match trimmed.split_once('_') {
        Some((_table, column)) if !column.is_empty() => column.to_string(),
        _ => trimmed.to_string(),
    }
}
