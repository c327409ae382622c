use axum::http::StatusCode;

use crate::utils::api_response::ApiResponse;

/// Failure of a marketplace operation.
///
/// Every variant is recoverable: the HTTP layer renders it as an
/// [`ApiResponse`] and the process carries on.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("an open request already exists for this service")]
    DuplicateRequest,
    #[error("{0}")]
    InvalidState(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
    #[error("password hashing failed: {0}")]
    Password(#[from] bcrypt::BcryptError),
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl ServiceError {
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::DuplicateRequest
            | ServiceError::InvalidState(_)
            | ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Unauthorized(_) => StatusCode::FORBIDDEN,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Database(_)
            | ServiceError::Io(_)
            | ServiceError::Password(_)
            | ServiceError::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiResponse<()> {
    fn from(err: ServiceError) -> Self {
        let status = err.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {err}");
            return ApiResponse::error(status, "Internal server error", None);
        }
        ApiResponse::error(status, err.to_string(), None)
    }
}

/// True when `err` is a UNIQUE constraint violation reported by SQLite.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}
