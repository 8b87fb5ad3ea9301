//! Catalogue schema
//!
//! Six entity tables and five junction tables. Junction foreign keys carry no
//! `ON DELETE` action, so while `PRAGMA foreign_keys` is on SQLite rejects any
//! parent delete that would orphan a junction row.

use crate::db::table_names::{JunctionTable, ParentTable, ID, MOVIES, MOVIE_ID};
use crate::Result;
use sqlx::SqlitePool;
use tracing::info;

/// Create every table and index (idempotent)
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    create_movies_table(pool).await?;
    create_genres_table(pool).await?;
    create_directors_table(pool).await?;
    create_actors_table(pool).await?;
    create_keywords_table(pool).await?;
    create_production_companies_table(pool).await?;

    for junction in JunctionTable::ALL {
        create_junction_table(pool, junction).await?;
    }

    info!("Catalogue schema initialized");
    Ok(())
}

async fn create_movies_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS movies (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            original_title TEXT,
            release_date TEXT,
            budget INTEGER,
            revenue INTEGER,
            runtime INTEGER,
            popularity REAL,
            vote_average REAL,
            vote_count INTEGER,
            CHECK (budget IS NULL OR budget >= 0),
            CHECK (runtime IS NULL OR runtime >= 0),
            CHECK (vote_average IS NULL OR (vote_average >= 0.0 AND vote_average <= 10.0))
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_genres_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS genres (
            id INTEGER PRIMARY KEY,
            genre TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_directors_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS directors (
            id INTEGER PRIMARY KEY,
            full_name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_actors_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS actors (
            id INTEGER PRIMARY KEY,
            full_name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_keywords_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS keywords (
            id INTEGER PRIMARY KEY,
            keyword TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_production_companies_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS production_companies (
            id INTEGER PRIMARY KEY,
            company_name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Render the DDL for one junction table
///
/// The five junctions differ only in names, so the statement is built from
/// the table-name constants.
pub fn junction_table_ddl(junction: JunctionTable) -> String {
    let table = junction.name();
    let entity_table = junction.entity().name();
    let entity_column = junction.entity_column();

    format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table} (
            {MOVIE_ID} INTEGER NOT NULL,
            {entity_column} INTEGER NOT NULL,
            PRIMARY KEY ({MOVIE_ID}, {entity_column}),
            FOREIGN KEY ({MOVIE_ID}) REFERENCES {MOVIES}({ID}),
            FOREIGN KEY ({entity_column}) REFERENCES {entity_table}({ID})
        )
        "#
    )
}

async fn create_junction_table(pool: &SqlitePool, junction: JunctionTable) -> Result<()> {
    let ddl = junction_table_ddl(junction);
    sqlx::query(&ddl).execute(pool).await?;

    // Parent deletes look up referencing rows by the entity column
    let index = format!(
        "CREATE INDEX IF NOT EXISTS idx_{table}_{column} ON {table}({column})",
        table = junction.name(),
        column = junction.entity_column(),
    );
    sqlx::query(&index).execute(pool).await?;

    Ok(())
}

/// Names of all catalogue tables present in the database, alphabetically
pub async fn list_tables(pool: &SqlitePool) -> Result<Vec<String>> {
    let tables = sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(tables)
}

/// Every table the schema is expected to contain
pub fn expected_tables() -> Vec<&'static str> {
    let mut tables: Vec<&'static str> = ParentTable::ALL.iter().map(|p| p.name()).collect();
    tables.extend(JunctionTable::ALL.iter().map(|j| j.name()));
    tables.sort_unstable();
    tables
}
