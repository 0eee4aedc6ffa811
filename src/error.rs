use crate::auth::Denied;
use crate::database::DatabaseError;
use crate::services::admission::{AdmissionError, Rejection};
use crate::validation::{IssueCode, ValidationFailure};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use sqlx::Error as SqlxError;
use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Startup database errors (pool, migrations)
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Payload failed schema validation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationFailure),

    /// Malformed request outside of schema validation (e.g. unparsable JSON)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Authorization gate said no
    #[error("Access denied: {0}")]
    Denied(#[from] Denied),

    /// Registration admission rejected the request
    #[error("Registration rejected: {0}")]
    Rejected(#[from] Rejection),

    /// Not found errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The backing store reported a constraint the payload broke
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Backing store unreachable or answered unexpectedly
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Generic error with message
    #[error("{0}")]
    Message(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Check if error is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::NotFound(_) | AppError::Rejected(Rejection::EventNotFound)
        )
    }

    /// Get HTTP status code for the error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) | AppError::Constraint(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Denied(Denied::Unauthenticated) => StatusCode::UNAUTHORIZED,
            AppError::Denied(_) => StatusCode::FORBIDDEN,
            AppError::Rejected(Rejection::EventNotFound) => StatusCode::NOT_FOUND,
            AppError::Rejected(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_)
            | AppError::Config(_)
            | AppError::Unavailable(_)
            | AppError::Message(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            AppError::Validation(failure) => json!({ "error": failure.issues }),
            AppError::Denied(denied) => json!({ "error": denied.reason() }),
            AppError::Rejected(rejection) => json!({ "error": rejection.reason() }),
            AppError::BadRequest(msg) | AppError::Constraint(msg) | AppError::NotFound(msg) => {
                json!({ "error": msg })
            }
            _ => {
                tracing::error!(status = %status, error = %self, "Internal server error");
                json!({ "error": "Internal server error" })
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Repository-specific error types
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Database query error
    #[error("Query error: {0}")]
    Query(SqlxError),

    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Duplicate record
    #[error("Duplicate record: {0}")]
    Duplicate(String),

    /// Constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A capacity edit would drop below the event's active registrations
    #[error("Capacity below {0} active registrations")]
    CapacityBelowActive(i64),

    /// Transport-level fault; the store could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, RepositoryError::Duplicate(_))
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => AppError::NotFound(msg),
            RepositoryError::Duplicate(msg)
            | RepositoryError::ConstraintViolation(msg)
            | RepositoryError::InvalidInput(msg) => AppError::Constraint(msg),
            RepositoryError::CapacityBelowActive(active) => ValidationFailure::single(
                "capacity",
                IssueCode::TooSmall,
                format!("Capacity cannot be below the {} active registrations", active),
            )
            .into(),
            RepositoryError::Query(e) => AppError::Unavailable(e.to_string()),
            RepositoryError::Unavailable(msg) => AppError::Unavailable(msg),
        }
    }
}

impl From<AdmissionError> for AppError {
    fn from(err: AdmissionError) -> Self {
        match err {
            AdmissionError::Rejected(rejection) => AppError::Rejected(rejection),
            AdmissionError::Unavailable(msg) => AppError::Unavailable(msg),
        }
    }
}

impl From<SqlxError> for RepositoryError {
    fn from(err: SqlxError) -> Self {
        match &err {
            SqlxError::RowNotFound => RepositoryError::NotFound("Record not found".to_string()),
            SqlxError::Database(db_err) => {
                // Check for common PostgreSQL error codes
                let code = db_err.code().map(|c| c.to_string());
                match code.as_deref() {
                    // Unique violation
                    Some("23505") => RepositoryError::Duplicate(db_err.message().to_string()),
                    // Foreign key / check constraint violation
                    Some("23503") | Some("23514") => {
                        RepositoryError::ConstraintViolation(db_err.message().to_string())
                    }
                    // Invalid text representation, e.g. a malformed enum value
                    Some("22P02") => RepositoryError::InvalidInput(db_err.message().to_string()),
                    _ => RepositoryError::Query(err),
                }
            }
            SqlxError::Io(_)
            | SqlxError::Tls(_)
            | SqlxError::PoolTimedOut
            | SqlxError::PoolClosed
            | SqlxError::WorkerCrashed => RepositoryError::Unavailable(err.to_string()),
            _ => RepositoryError::Query(err),
        }
    }
}
