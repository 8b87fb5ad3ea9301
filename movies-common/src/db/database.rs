//! Database handle over one snapshot
//!
//! Wraps a single-connection pool so that connection-scoped pragmas such as
//! `PRAGMA foreign_keys` stay in force for the handle's lifetime.

use crate::db::queries::RowQuery;
use crate::db::snapshot::SnapshotStore;
use crate::db::table_names::ParentTable;
use crate::{Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Open snapshot
#[derive(Debug)]
pub struct Database {
    name: String,
    path: PathBuf,
    pool: SqlitePool,
}

impl Database {
    /// Create a new, empty snapshot, replacing any existing file of that name
    pub async fn create(store: &SnapshotStore, name: &str) -> Result<Self> {
        store.ensure_root()?;
        store.remove(name).await?;
        let path = store.path_for(name)?;
        let pool = connect(&path, true).await?;

        info!("Initialized new snapshot '{}': {}", name, path.display());
        Ok(Self {
            name: name.to_string(),
            path,
            pool,
        })
    }

    /// Open an existing snapshot in place
    pub async fn open(store: &SnapshotStore, name: &str) -> Result<Self> {
        let path = store.path_for(name)?;
        if !path.exists() {
            return Err(Error::NotFound(format!(
                "Snapshot '{}' ({})",
                name,
                path.display()
            )));
        }
        let pool = connect(&path, false).await?;

        info!("Opened existing snapshot '{}': {}", name, path.display());
        Ok(Self {
            name: name.to_string(),
            path,
            pool,
        })
    }

    /// Materialize snapshot `new` as a copy of `previous` and open it.
    ///
    /// `previous` is left untouched, so a suite can always start again from it.
    pub async fn from_existing(store: &SnapshotStore, previous: &str, new: &str) -> Result<Self> {
        store.copy(previous, new).await?;
        Self::open(store, new).await
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run arbitrary SQL; several `;`-separated statements are allowed
    pub async fn execute(&self, sql: &str) -> Result<()> {
        debug!(snapshot = %self.name, sql, "Executing statement");
        sqlx::raw_sql(sql).execute(&self.pool).await?;
        Ok(())
    }

    /// Run raw delete statement(s) and return the total rows affected.
    ///
    /// A delete blocked by a declared constraint fails with the engine error.
    pub async fn delete(&self, sql: &str) -> Result<u64> {
        debug!(snapshot = %self.name, sql, "Executing delete");
        let result = sqlx::raw_sql(sql).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Run a delete whose single placeholder is bound to `id`
    pub async fn delete_bound(&self, sql: &str, id: i64) -> Result<u64> {
        debug!(snapshot = %self.name, sql, id, "Executing parameterized delete");
        let result = sqlx::query(sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Look up one row by primary key.
    ///
    /// More than one match is [`Error::AmbiguousRow`].
    pub async fn select_single_row(&self, query: &RowQuery) -> Result<Option<SqliteRow>> {
        let sql = query.sql();
        let mut rows = sqlx::query(&sql)
            .bind(query.id)
            .fetch_all(&self.pool)
            .await?;

        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            count => Err(Error::AmbiguousRow {
                table: query.table.name(),
                id: query.id,
                count,
            }),
        }
    }

    pub async fn row_exists(&self, query: &RowQuery) -> Result<bool> {
        Ok(self.select_single_row(query).await?.is_some())
    }

    /// Number of rows in a parent table
    pub async fn count_rows(&self, table: ParentTable) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table.name()))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Number of junction rows, across all junctions, referencing `parent` row `id`
    pub async fn count_references(&self, parent: ParentTable, id: i64) -> Result<i64> {
        let mut total = 0;
        for junction in parent.referencing_junctions() {
            // referencing_junctions only yields junctions with a column for parent
            let Some(column) = junction.column_for(parent) else {
                continue;
            };
            let sql = format!(
                "SELECT COUNT(*) FROM {table} WHERE {table}.{column} = ?",
                table = junction.name()
            );
            let count: i64 = sqlx::query_scalar(&sql)
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
            total += count;
        }
        Ok(total)
    }

    /// Switch foreign-key enforcement on or off for this handle's connection
    pub async fn set_foreign_keys(&self, enabled: bool) -> Result<()> {
        let pragma = if enabled {
            "PRAGMA foreign_keys = ON"
        } else {
            "PRAGMA foreign_keys = OFF"
        };
        self.execute(pragma).await?;

        if self.foreign_keys_enabled().await? != enabled {
            return Err(Error::Internal(format!(
                "PRAGMA foreign_keys did not take effect on snapshot '{}'",
                self.name
            )));
        }
        info!(snapshot = %self.name, enabled, "Foreign key enforcement set");
        Ok(())
    }

    pub async fn foreign_keys_enabled(&self) -> Result<bool> {
        let flag: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&self.pool)
            .await?;
        Ok(flag != 0)
    }

    /// Close the connection, flushing it to the snapshot file
    pub async fn close(self) {
        self.pool.close().await;
        debug!("Closed snapshot '{}'", self.name);
    }
}

/// Open a single-connection pool.
///
/// Enforcement starts off, matching SQLite's own default, so callers switch
/// it on explicitly with [`Database::set_foreign_keys`]. Rollback journaling
/// keeps a closed snapshot in one file, which is what [`SnapshotStore::copy`]
/// duplicates.
async fn connect(path: &Path, create: bool) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(create)
        .journal_mode(SqliteJournalMode::Delete)
        .foreign_keys(false);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::queries::select_genre_by_id;
    use crate::db::schema::initialize_schema;
    use sqlx::Row;
    use tempfile::TempDir;

    async fn empty_db(dir: &TempDir) -> Database {
        let store = SnapshotStore::new(dir.path());
        let db = Database::create(&store, "scratch").await.unwrap();
        initialize_schema(db.pool()).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_open_missing_snapshot_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());

        let err = Database::open(&store, "07").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_foreign_keys_toggle_persists_on_handle() {
        let dir = TempDir::new().unwrap();
        let db = empty_db(&dir).await;

        assert!(!db.foreign_keys_enabled().await.unwrap());

        db.set_foreign_keys(true).await.unwrap();
        assert!(db.foreign_keys_enabled().await.unwrap());
        // Later statements run on the same connection
        assert!(db.foreign_keys_enabled().await.unwrap());

        db.set_foreign_keys(false).await.unwrap();
        assert!(!db.foreign_keys_enabled().await.unwrap());
    }

    #[tokio::test]
    async fn test_select_single_row_zero_or_one() {
        let dir = TempDir::new().unwrap();
        let db = empty_db(&dir).await;
        db.execute("INSERT INTO genres (id, genre) VALUES (5, 'Drama')")
            .await
            .unwrap();

        let row = db.select_single_row(&select_genre_by_id(5)).await.unwrap();
        let row = row.expect("genre 5 should exist");
        assert_eq!(row.get::<i64, _>("id"), 5);
        assert_eq!(row.get::<String, _>("genre"), "Drama");

        assert!(db
            .select_single_row(&select_genre_by_id(6))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_select_single_row_multiple_matches_is_infrastructure_error() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());
        let db = Database::create(&store, "broken").await.unwrap();

        // No primary key, so duplicate ids are possible
        db.execute("CREATE TABLE genres (id INTEGER, genre TEXT)")
            .await
            .unwrap();
        db.execute("INSERT INTO genres VALUES (5, 'Drama'); INSERT INTO genres VALUES (5, 'Crime')")
            .await
            .unwrap();

        let err = db
            .select_single_row(&select_genre_by_id(5))
            .await
            .err()
            .expect("expected an error for ambiguous row");
        assert!(matches!(
            err,
            Error::AmbiguousRow {
                table: "genres",
                id: 5,
                count: 2
            }
        ));
    }

    #[tokio::test]
    async fn test_delete_sums_rows_across_statements() {
        let dir = TempDir::new().unwrap();
        let db = empty_db(&dir).await;
        db.execute(
            "INSERT INTO genres (id, genre) VALUES (1, 'A'); \
             INSERT INTO keywords (id, keyword) VALUES (1, 'k')",
        )
        .await
        .unwrap();

        let affected = db
            .delete("DELETE FROM genres WHERE id = 1; DELETE FROM keywords WHERE id = 1;")
            .await
            .unwrap();
        assert_eq!(affected, 2);
        assert_eq!(db.count_rows(ParentTable::Genres).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_from_existing_leaves_previous_untouched() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());

        let seed = Database::create(&store, "07").await.unwrap();
        initialize_schema(seed.pool()).await.unwrap();
        seed.execute("INSERT INTO genres (id, genre) VALUES (5, 'Drama')")
            .await
            .unwrap();
        seed.close().await;

        let working = Database::from_existing(&store, "07", "08").await.unwrap();
        working.delete("DELETE FROM genres WHERE id = 5").await.unwrap();
        assert!(!working.row_exists(&select_genre_by_id(5)).await.unwrap());
        working.close().await;

        let original = Database::open(&store, "07").await.unwrap();
        assert!(original.row_exists(&select_genre_by_id(5)).await.unwrap());
    }
}
