//! Common error types for shotlog

use thiserror::Error;

/// Common result type for shotlog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the repository and service layers.
///
/// Repositories never throw across their public boundary; every operation
/// returns `Result<T>` carrying one of these kinds.
#[derive(Error, Debug)]
pub enum Error {
    /// Input failed a business rule (field constraint, uniqueness, range).
    /// Recoverable by the caller correcting input; never retried.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced entity id does not exist. Never retried.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Underlying storage operation failed (wraps sqlx::Error).
    /// Lock contention is retried with backoff; every other storage
    /// failure is surfaced immediately.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or resolution error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reserved for future permission flows (camera/photo access).
    /// Not produced by the data core.
    #[error("Permission denied: {0}")]
    Permission(String),

    /// Reserved for future network flows. Not produced by the data core.
    #[error("Network error: {0}")]
    Network(String),
}

impl Error {
    /// Whether a retry could plausibly succeed.
    ///
    /// Only lock contention qualifies: pool exhaustion and SQLite
    /// busy/locked errors. Decode failures, constraint violations and
    /// every non-storage kind are permanent and surface immediately.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Database(sqlx::Error::PoolTimedOut) => true,
            Error::Database(sqlx::Error::Database(db)) => {
                let msg = db.message();
                msg.contains("database is locked") || msg.contains("database table is locked")
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_exhaustion_is_transient() {
        let err = Error::Database(sqlx::Error::PoolTimedOut);
        assert!(err.is_transient());
    }

    #[test]
    fn decode_failures_are_permanent() {
        let err = Error::Database(sqlx::Error::Decode("corrupt payload".into()));
        assert!(!err.is_transient());
    }

    #[test]
    fn row_not_found_is_permanent() {
        assert!(!Error::Database(sqlx::Error::RowNotFound).is_transient());
    }

    #[test]
    fn validation_and_not_found_are_not_transient() {
        assert!(!Error::Validation("bad".into()).is_transient());
        assert!(!Error::NotFound("gone".into()).is_transient());
    }
}
