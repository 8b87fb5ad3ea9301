//! Integrity checks against the seeded catalogue
//!
//! A check attempts one delete, then consults the row-presence oracle twice
//! and compares with its expectation.

use crate::db::database::Database;
use crate::db::queries::{
    select_actor_by_id, select_director_by_id, select_genre_by_id, select_keyword_by_id,
    select_movie_by_id, select_production_company_by_id, RowQuery,
};
use crate::db::seed::UNREFERENCED_ID;
use crate::db::table_names::{ParentTable, ACTORS, ID, KEYWORDS, MOVIE_ACTORS};
use crate::integrity::guard::{cleanup_everywhere, GuardedDelete, UnguardedDelete};
use crate::integrity::outcome::DeleteOutcome;
use crate::{Error, Result};
use serde::Serialize;
use tracing::{info, warn};

/// Expected state of the target row after the delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    Retained,
    Removed,
}

/// How a check attempts its delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteStrategy {
    /// Guarded delete of the target row
    Guarded(GuardedDelete),
    /// Direct delete of the target row, with no guard clause
    Unguarded(UnguardedDelete),
    /// Unconditional delete of the target id from every parent table
    Cleanup,
}

/// One named delete-then-verify scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityCheck {
    pub name: &'static str,
    pub target: RowQuery,
    pub strategy: DeleteStrategy,
    pub expectation: Expectation,
}

impl IntegrityCheck {
    /// Guarded delete that must leave a referenced row in place
    pub fn protected(name: &'static str, target: RowQuery) -> Self {
        Self {
            name,
            target,
            strategy: DeleteStrategy::Guarded(GuardedDelete::for_parent(target.table, target.id)),
            expectation: Expectation::Retained,
        }
    }

    /// Cleanup that must remove an unreferenced id everywhere
    pub fn cleanup(name: &'static str, target: RowQuery) -> Self {
        Self {
            name,
            target,
            strategy: DeleteStrategy::Cleanup,
            expectation: Expectation::Removed,
        }
    }
}

/// Result of running one check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub name: &'static str,
    pub table: ParentTable,
    pub id: i64,
    pub expectation: Expectation,
    pub references_before: i64,
    pub outcome: DeleteOutcome,
    pub present_after: bool,
    pub passed: bool,
}

/// The catalogue's integrity scenarios
pub fn standard_checks() -> Vec<IntegrityCheck> {
    vec![
        IntegrityCheck::protected(
            "should not be able to delete genre if any movie is linked",
            select_genre_by_id(5),
        ),
        IntegrityCheck::protected(
            "should not be able to delete director if any movie is linked",
            select_director_by_id(7),
        ),
        IntegrityCheck::protected(
            "should not be able to delete actor if any movie is linked",
            select_actor_by_id(10),
        ),
        IntegrityCheck::protected(
            "should not be able to delete keyword if any movie is linked",
            select_keyword_by_id(12),
        ),
        IntegrityCheck::protected(
            "should not be able to delete production company if any movie is linked",
            select_production_company_by_id(12),
        ),
        IntegrityCheck::protected(
            "should not be able to delete movie if there is any linked data present",
            select_movie_by_id(100),
        ),
        IntegrityCheck::cleanup("should be able to delete movie", select_movie_by_id(UNREFERENCED_ID)),
    ]
}

/// Actor delete whose guard names the keyword table and column.
///
/// Kept verbatim from the legacy suite for regression tests: SQLite cannot
/// resolve `keywords.id` inside a delete on `actors`, so the statement fails
/// to prepare and deletes nothing for a reason unrelated to foreign keys.
pub fn malformed_actor_guard(actor_id: i64) -> String {
    format!(
        "DELETE FROM {ACTORS} WHERE {ACTORS}.{ID} = {actor_id} \
         AND {KEYWORDS}.{ID} NOT IN (SELECT {MOVIE_ACTORS}.keyword_id FROM {MOVIE_ACTORS})"
    )
}

/// Run one check: count references, delete, then look the row up twice.
///
/// Errors other than a foreign-key violation are returned, never absorbed.
pub async fn run_check(db: &Database, check: &IntegrityCheck) -> Result<CheckOutcome> {
    let target = check.target;
    let references_before = db.count_references(target.table, target.id).await?;

    let outcome = match &check.strategy {
        DeleteStrategy::Guarded(delete) => delete.execute(db).await?,
        DeleteStrategy::Unguarded(delete) => delete.execute(db).await?,
        DeleteStrategy::Cleanup => {
            if references_before > 0 {
                return Err(Error::InvalidInput(format!(
                    "Cleanup target {} {} still has {} reference(s)",
                    target.table, target.id, references_before
                )));
            }
            // A cleanup that finds nothing to delete proves nothing
            if !db.row_exists(&target).await? {
                return Err(Error::NotFound(format!(
                    "Cleanup target {} {} is absent before the delete",
                    target.table, target.id
                )));
            }
            DeleteOutcome::Deleted(cleanup_everywhere(db, target.id).await?)
        }
    };

    let present_after = db.row_exists(&target).await?;
    let present_again = db.row_exists(&target).await?;
    if present_after != present_again {
        return Err(Error::Internal(format!(
            "Row presence for {} {} changed between lookups",
            target.table, target.id
        )));
    }

    let passed = match check.expectation {
        Expectation::Retained => present_after && outcome.is_protected(),
        Expectation::Removed => !present_after && outcome.rows_deleted() > 0,
    };

    if passed {
        info!(check = check.name, ?outcome, "Check passed");
    } else {
        warn!(
            check = check.name,
            ?outcome,
            present_after,
            references_before,
            "Check failed"
        );
    }

    Ok(CheckOutcome {
        name: check.name,
        table: target.table,
        id: target.id,
        expectation: check.expectation,
        references_before,
        outcome,
        present_after,
        passed,
    })
}
