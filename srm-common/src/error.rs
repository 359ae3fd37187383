//! Common error types for the school records manager

use std::time::Duration;
use thiserror::Error;

/// Common result type for SRM operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across SRM services
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed or incomplete request
    #[error("{0}")]
    Validation(String),

    /// Referenced class, teacher or student does not exist
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness or restrict violation
    #[error("{0}")]
    Conflict(String),

    /// Storage call exceeded the caller-supplied deadline
    #[error("Operation timed out after {} ms", .0.as_millis())]
    Timeout(Duration),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Caller-facing classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Storage,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Conflict(_) => ErrorKind::Conflict,
            Error::Database(_)
            | Error::Io(_)
            | Error::Config(_)
            | Error::Timeout(_)
            | Error::Internal(_) => ErrorKind::Storage,
        }
    }
}

/// True when the store rejected a write because of a UNIQUE constraint
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// True when the store rejected a write because of a FOREIGN KEY constraint
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(Error::Validation("x".into()).kind(), ErrorKind::Validation);
        assert_eq!(Error::NotFound("x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(Error::Conflict("x".into()).kind(), ErrorKind::Conflict);
        assert_eq!(
            Error::Timeout(Duration::from_millis(10)).kind(),
            ErrorKind::Storage
        );
        assert_eq!(
            Error::Database(sqlx::Error::RowNotFound).kind(),
            ErrorKind::Storage
        );
    }

    #[test]
    fn test_client_messages_are_unprefixed() {
        let err = Error::NotFound("Class not found".to_string());
        assert_eq!(err.to_string(), "Class not found");
    }

    #[test]
    fn test_timeout_message() {
        let err = Error::Timeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "Operation timed out after 1500 ms");
    }

    #[test]
    fn test_non_database_errors_are_not_constraint_violations() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
        assert!(!is_foreign_key_violation(&sqlx::Error::PoolTimedOut));
    }
}
