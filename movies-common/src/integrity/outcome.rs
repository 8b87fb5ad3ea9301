//! Delete outcome classification
//!
//! A protected delete can be stopped two ways: the guard clause matches no
//! row, or the engine raises a foreign-key violation. Both are recorded
//! separately so a guard that never matches cannot pass for real enforcement.

use crate::Result;
use serde::Serialize;

/// What happened to a delete attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// The statement removed this many rows
    Deleted(u64),
    /// The statement ran but matched nothing
    GuardBlocked,
    /// The engine rejected the statement with a foreign-key violation
    ConstraintBlocked,
}

impl DeleteOutcome {
    /// True when no row was removed
    pub fn is_protected(&self) -> bool {
        !matches!(self, DeleteOutcome::Deleted(_))
    }

    pub fn rows_deleted(&self) -> u64 {
        match self {
            DeleteOutcome::Deleted(rows) => *rows,
            _ => 0,
        }
    }
}

/// Classify the result of a delete.
///
/// Foreign-key violations become [`DeleteOutcome::ConstraintBlocked`]; every
/// other error is returned unchanged.
pub fn classify_delete(result: Result<u64>) -> Result<DeleteOutcome> {
    match result {
        Ok(0) => Ok(DeleteOutcome::GuardBlocked),
        Ok(rows) => Ok(DeleteOutcome::Deleted(rows)),
        Err(err) if err.is_foreign_key_violation() => {
            tracing::debug!("Delete rejected by foreign key constraint: {}", err);
            Ok(DeleteOutcome::ConstraintBlocked)
        }
        Err(err) => Err(err),
    }
}
