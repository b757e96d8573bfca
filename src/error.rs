use crate::models::ApiResponse;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use rust_decimal::Decimal;
use sea_orm::DbErr;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Commit error: {0}")]
    CommitError(DbErr),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Menu item not found: {0}")]
    ItemNotFound(String),

    #[error("Menu item unavailable: {0}")]
    ItemUnavailable(String),

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Decimal, available: Decimal },

    #[error("Student does not belong to this guardian")]
    OwnershipViolation,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// HTTP status, machine-readable code and client-facing message.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::ValidationError(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::ItemNotFound(id) => (
                StatusCode::BAD_REQUEST,
                "ITEM_NOT_FOUND",
                format!("Menu item {id} not found"),
            ),
            AppError::ItemUnavailable(name) => (
                StatusCode::BAD_REQUEST,
                "ITEM_UNAVAILABLE",
                format!("Menu item '{name}' is currently unavailable"),
            ),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, "AUTH_ERROR", msg.clone()),
            AppError::InsufficientFunds { .. } => (
                StatusCode::PAYMENT_REQUIRED,
                "INSUFFICIENT_FUNDS",
                "Insufficient credits".to_string(),
            ),
            AppError::OwnershipViolation => (
                StatusCode::FORBIDDEN,
                "OWNERSHIP_VIOLATION",
                "Student is invalid or does not belong to this guardian".to_string(),
            ),
            AppError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Permission denied".to_string(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "Database error".to_string(),
            ),
            AppError::CommitError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "COMMIT_ERROR",
                "Failed to commit transaction".to_string(),
            ),
            AppError::JwtError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error".to_string(),
            ),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.parts().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = self.parts();

        if status_code.is_server_error() {
            log::error!("{self}");
        } else if matches!(
            self,
            AppError::AuthError(_)
                | AppError::OwnershipViolation
                | AppError::PermissionDenied
                | AppError::InsufficientFunds { .. }
        ) {
            log::warn!("{self}");
        }

        HttpResponse::build(status_code).json(ApiResponse::<()>::error(error_code, message))
    }
}
