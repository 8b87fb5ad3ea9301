//! Common error types for the movie catalogue tooling

use std::time::Duration;
use thiserror::Error;

/// Common result type for catalogue operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the workspace
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

    /// Requested resource not found (snapshot, table)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A point lookup by primary key matched more than one row.
    ///
    /// Ids are primary keys, so this is a broken fixture, never a valid outcome.
    #[error("Ambiguous row: {count} rows in {table} matched id {id}")]
    AmbiguousRow {
        table: &'static str,
        id: i64,
        count: usize,
    },

    /// Operation exceeded its wall-clock budget
    #[error("Timed out: {what} exceeded {budget:?}")]
    Timeout { what: String, budget: Duration },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True when the engine rejected a statement because of a declared foreign key.
    ///
    /// SQLite reports this as extended code 787, which sqlx maps to
    /// `ErrorKind::ForeignKeyViolation`. The message check covers builds where
    /// only the primary result code is surfaced.
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            Error::Database(sqlx::Error::Database(db_err)) => {
                db_err.is_foreign_key_violation()
                    || db_err.message().contains("FOREIGN KEY constraint failed")
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_fk_violations() {
        assert!(!Error::Config("x".to_string()).is_foreign_key_violation());
        assert!(!Error::NotFound("07".to_string()).is_foreign_key_violation());
        assert!(!Error::Database(sqlx::Error::RowNotFound).is_foreign_key_violation());
    }

    #[test]
    fn test_ambiguous_row_message() {
        let err = Error::AmbiguousRow {
            table: "genres",
            id: 5,
            count: 2,
        };
        assert_eq!(err.to_string(), "Ambiguous row: 2 rows in genres matched id 5");
    }
}
