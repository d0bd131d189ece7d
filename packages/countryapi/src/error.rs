use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `INVALID_CREDENTIALS`, `PERMISSION_DENIED`, `NOT_FOUND`,
    /// `CONFLICT`, `EMAIL_TAKEN`, `INTERNAL_ERROR`.
    pub code: &'static str,
    /// Human-readable error description.
    pub message: String,
}

/// Coarse failure taxonomy shared by every core operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Invalid,
    Conflict,
    Unauthorized,
    Forbidden,
    NotFound,
    Internal,
}

/// Application-level error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("authentication required")]
    TokenMissing,
    #[error("invalid or expired token")]
    TokenInvalid,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("not the owner of this resource")]
    PermissionDenied,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("email is already registered")]
    EmailTaken,
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Invalid,
            AppError::TokenMissing | AppError::TokenInvalid | AppError::InvalidCredentials => {
                ErrorKind::Unauthorized
            }
            AppError::PermissionDenied => ErrorKind::Forbidden,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Conflict(_) | AppError::EmailTaken => ErrorKind::Conflict,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Map a unique-constraint violation to `conflict`, anything else to `Internal`.
    ///
    /// Used on inserts and updates where a concurrent writer can slip past the
    /// pre-check.
    pub fn unique_or_internal(err: DbErr, conflict: impl FnOnce() -> AppError) -> AppError {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                tracing::debug!(%detail, "Unique constraint caught on write");
                conflict()
            }
            _ => AppError::from(err),
        }
    }

    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        let status = match self.kind() {
            ErrorKind::Invalid => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match self {
            AppError::Validation(msg) => ErrorBody {
                code: "VALIDATION_ERROR",
                message: msg,
            },
            AppError::TokenMissing => ErrorBody {
                code: "TOKEN_MISSING",
                message: "Authentication required".into(),
            },
            AppError::TokenInvalid => ErrorBody {
                code: "TOKEN_INVALID",
                message: "Invalid or expired token".into(),
            },
            AppError::InvalidCredentials => ErrorBody {
                code: "INVALID_CREDENTIALS",
                message: "Invalid email or password".into(),
            },
            AppError::PermissionDenied => ErrorBody {
                code: "PERMISSION_DENIED",
                message: "Only the owner may modify this resource".into(),
            },
            AppError::NotFound(msg) => ErrorBody {
                code: "NOT_FOUND",
                message: msg,
            },
            AppError::Conflict(msg) => ErrorBody {
                code: "CONFLICT",
                message: msg,
            },
            AppError::EmailTaken => ErrorBody {
                code: "EMAIL_TAKEN",
                message: "Email is already registered".into(),
            },
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorBody {
                    code: "INTERNAL_ERROR",
                    message: "An unexpected error occurred".into(),
                }
            }
        };

        (status, body)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}
