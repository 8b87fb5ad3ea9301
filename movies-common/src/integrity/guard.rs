//! Guarded and unguarded parent deletes

use crate::db::database::Database;
use crate::db::table_names::{JunctionTable, ParentTable, ID};
use crate::integrity::outcome::{classify_delete, DeleteOutcome};
use crate::{Error, Result};
use tracing::{debug, info};

/// `DELETE` of one parent row, conditioned on no junction referencing it.
///
/// Each guard adds `AND <parent>.id NOT IN (SELECT <junction>.<column> FROM <junction>)`,
/// so the row is deleted only if every listed junction is free of the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardedDelete {
    parent: ParentTable,
    id: i64,
    guards: Vec<JunctionTable>,
}

impl GuardedDelete {
    /// Delete with no guard clauses yet
    pub fn new(parent: ParentTable, id: i64) -> Self {
        Self {
            parent,
            id,
            guards: Vec::new(),
        }
    }

    /// Delete guarded by every junction that references `parent`
    pub fn for_parent(parent: ParentTable, id: i64) -> Self {
        Self {
            parent,
            id,
            guards: parent.referencing_junctions(),
        }
    }

    /// Add a junction absence check.
    ///
    /// The junction must hold a column referencing the parent table.
    pub fn guarded_by(mut self, junction: JunctionTable) -> Result<Self> {
        if junction.column_for(self.parent).is_none() {
            return Err(Error::InvalidInput(format!(
                "{} does not reference {}",
                junction, self.parent
            )));
        }
        if !self.guards.contains(&junction) {
            self.guards.push(junction);
        }
        Ok(self)
    }

    pub fn parent(&self) -> ParentTable {
        self.parent
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn guards(&self) -> &[JunctionTable] {
        &self.guards
    }

    /// Statement text with the id as the single bound parameter
    pub fn sql(&self) -> String {
        let parent = self.parent.name();
        let mut sql = format!("DELETE FROM {parent} WHERE {parent}.{ID} = ?");

        for junction in &self.guards {
            // guarded_by and for_parent only admit junctions with a column
            if let Some(column) = junction.column_for(self.parent) {
                let table = junction.name();
                sql.push_str(&format!(
                    " AND {parent}.{ID} NOT IN (SELECT {table}.{column} FROM {table})"
                ));
            }
        }

        sql
    }

    /// Run the delete and classify what stopped it, if anything.
    ///
    /// A delete with no junction clause is [`Error::InvalidInput`]; use
    /// [`UnguardedDelete`] for a direct delete.
    pub async fn execute(&self, db: &Database) -> Result<DeleteOutcome> {
        if self.guards.is_empty() {
            return Err(Error::InvalidInput(format!(
                "Guarded delete of {} {} has no junction guard",
                self.parent, self.id
            )));
        }
        let sql = self.sql();
        let outcome = classify_delete(db.delete_bound(&sql, self.id).await)?;
        debug!(
            table = %self.parent,
            id = self.id,
            guards = self.guards.len(),
            ?outcome,
            "Guarded delete"
        );
        Ok(outcome)
    }
}

/// Direct delete of one parent row, for ids with no references
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnguardedDelete {
    pub parent: ParentTable,
    pub id: i64,
}

impl UnguardedDelete {
    pub fn new(parent: ParentTable, id: i64) -> Self {
        Self { parent, id }
    }

    pub fn sql(&self) -> String {
        format!("DELETE FROM {table} WHERE {table}.{ID} = ?", table = self.parent.name())
    }

    pub async fn execute(&self, db: &Database) -> Result<DeleteOutcome> {
        classify_delete(db.delete_bound(&self.sql(), self.id).await)
    }
}

/// Delete `id` from every parent table, movies first, in one transaction.
///
/// Intended for ids with no junction references; a constraint violation
/// rolls the whole cleanup back and is returned as an error.
pub async fn cleanup_everywhere(db: &Database, id: i64) -> Result<u64> {
    let mut tx = db.pool().begin().await?;
    let mut removed = 0;

    for parent in ParentTable::ALL {
        let sql = UnguardedDelete::new(parent, id).sql();
        let result = sqlx::query(&sql).bind(id).execute(&mut *tx).await?;
        removed += result.rows_affected();
    }

    tx.commit().await?;
    info!(id, removed, "Removed id from every parent table");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unguarded_sql() {
        assert_eq!(
            UnguardedDelete::new(ParentTable::Genres, 5).sql(),
            "DELETE FROM genres WHERE genres.id = ?"
        );
    }

    #[test]
    fn test_entity_guard_sql() {
        let delete = GuardedDelete::for_parent(ParentTable::Genres, 5);
        assert_eq!(
            delete.sql(),
            "DELETE FROM genres WHERE genres.id = ? \
             AND genres.id NOT IN (SELECT movie_genres.genre_id FROM movie_genres)"
        );
    }

    #[test]
    fn test_movie_guard_conjoins_every_junction() {
        let sql = GuardedDelete::for_parent(ParentTable::Movies, 100).sql();

        for junction in JunctionTable::ALL {
            let clause = format!(
                "movies.id NOT IN (SELECT {table}.movie_id FROM {table})",
                table = junction.name()
            );
            assert!(sql.contains(&clause), "missing clause: {}", clause);
        }
        assert_eq!(sql.matches(" AND ").count(), 5);
        assert!(!sql.contains("100"), "id must be bound, not interpolated");
    }

    #[test]
    fn test_guarded_by_rejects_unrelated_junction() {
        let err = GuardedDelete::new(ParentTable::Actors, 10)
            .guarded_by(JunctionTable::MovieKeywords)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_guarded_by_ignores_duplicates() {
        let delete = GuardedDelete::new(ParentTable::Movies, 1)
            .guarded_by(JunctionTable::MovieGenres)
            .unwrap()
            .guarded_by(JunctionTable::MovieGenres)
            .unwrap();
        assert_eq!(delete.guards(), &[JunctionTable::MovieGenres]);
    }
}
