//! Deterministic seed fixture
//!
//! Every seeded parent row is referenced by at least one junction row, and
//! each parent table additionally holds an unreferenced row with id
//! [`UNREFERENCED_ID`]. Ids are stable across runs, so checks can name them.

use crate::db::table_names::{JunctionTable, MOVIE_ID};
use crate::Result;
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

pub const MOVIE_COUNT: i64 = 120;
pub const GENRE_COUNT: i64 = 20;
pub const DIRECTOR_COUNT: i64 = 30;
pub const ACTOR_COUNT: i64 = 60;
pub const KEYWORD_COUNT: i64 = 40;
pub const COMPANY_COUNT: i64 = 30;

/// Id present in every parent table and referenced by no junction row
pub const UNREFERENCED_ID: i64 = 2000;

const GENRE_NAMES: [&str; 20] = [
    "Action", "Adventure", "Animation", "Comedy", "Crime", "Documentary", "Drama", "Family",
    "Fantasy", "Foreign", "History", "Horror", "Music", "Mystery", "Romance",
    "Science Fiction", "TV Movie", "Thriller", "War", "Western",
];

/// Row counts written by [`seed_fixture`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub movies: i64,
    pub genres: i64,
    pub directors: i64,
    pub actors: i64,
    pub keywords: i64,
    pub production_companies: i64,
    pub junction_rows: i64,
}

/// Links of movie `movie_id` into `junction`, by entity id
pub fn links_for(junction: JunctionTable, movie_id: i64) -> Vec<i64> {
    let cycle = |n: i64| (movie_id - 1).rem_euclid(n) + 1;
    match junction {
        JunctionTable::MovieGenres => vec![cycle(GENRE_COUNT)],
        JunctionTable::MovieDirectors => vec![cycle(DIRECTOR_COUNT)],
        // Two billed actors half the cast apart, so they never coincide
        JunctionTable::MovieActors => vec![
            cycle(ACTOR_COUNT),
            (movie_id + ACTOR_COUNT / 2 - 1).rem_euclid(ACTOR_COUNT) + 1,
        ],
        JunctionTable::MovieKeywords => vec![cycle(KEYWORD_COUNT)],
        JunctionTable::MovieProductionCompanies => vec![cycle(COMPANY_COUNT)],
    }
}

/// Populate an empty schema inside one transaction
pub async fn seed_fixture(pool: &SqlitePool) -> Result<SeedSummary> {
    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();

    summary.movies = insert_movies(&mut tx).await?;
    summary.genres = insert_named(&mut tx, "genres", "genre", GENRE_COUNT, |id| {
        GENRE_NAMES[(id - 1) as usize].to_string()
    })
    .await?;
    summary.directors = insert_named(&mut tx, "directors", "full_name", DIRECTOR_COUNT, |id| {
        format!("Director {}", id)
    })
    .await?;
    summary.actors = insert_named(&mut tx, "actors", "full_name", ACTOR_COUNT, |id| {
        format!("Actor {}", id)
    })
    .await?;
    summary.keywords = insert_named(&mut tx, "keywords", "keyword", KEYWORD_COUNT, |id| {
        format!("keyword-{}", id)
    })
    .await?;
    summary.production_companies = insert_named(
        &mut tx,
        "production_companies",
        "company_name",
        COMPANY_COUNT,
        |id| format!("Studio {}", id),
    )
    .await?;

    for junction in JunctionTable::ALL {
        summary.junction_rows += insert_links(&mut tx, junction).await?;
    }

    tx.commit().await?;

    info!(
        movies = summary.movies,
        junction_rows = summary.junction_rows,
        "Seed fixture loaded"
    );
    Ok(summary)
}

async fn insert_movies(conn: &mut SqliteConnection) -> Result<i64> {
    let ids = (1..=MOVIE_COUNT).chain(std::iter::once(UNREFERENCED_ID));
    let mut inserted = 0;

    for id in ids {
        sqlx::query(
            r#"
            INSERT INTO movies (
                id, title, original_title, release_date, budget, revenue,
                runtime, popularity, vote_average, vote_count
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(format!("Movie {}", id))
        .bind(format!("Original Movie {}", id))
        .bind(format!("{}-01-01", 1950 + id % 70))
        .bind(id * 1_000_000)
        .bind(id * 2_500_000)
        .bind(80 + id % 100)
        .bind(id as f64 / 10.0)
        .bind((id % 100) as f64 / 10.0)
        .bind(id * 7)
        .execute(&mut *conn)
        .await?;
        inserted += 1;
    }

    Ok(inserted)
}

async fn insert_named<F>(
    conn: &mut SqliteConnection,
    table: &str,
    column: &str,
    count: i64,
    name_for: F,
) -> Result<i64>
where
    F: Fn(i64) -> String,
{
    let sql = format!("INSERT INTO {} (id, {}) VALUES (?, ?)", table, column);
    let mut inserted = 0;

    for id in 1..=count {
        sqlx::query(&sql)
            .bind(id)
            .bind(name_for(id))
            .execute(&mut *conn)
            .await?;
        inserted += 1;
    }

    sqlx::query(&sql)
        .bind(UNREFERENCED_ID)
        .bind(format!("Unreferenced {} {}", table, UNREFERENCED_ID))
        .execute(&mut *conn)
        .await?;

    Ok(inserted + 1)
}

async fn insert_links(conn: &mut SqliteConnection, junction: JunctionTable) -> Result<i64> {
    let sql = format!(
        "INSERT INTO {} ({}, {}) VALUES (?, ?)",
        junction.name(),
        MOVIE_ID,
        junction.entity_column()
    );
    let mut inserted = 0;

    for movie_id in 1..=MOVIE_COUNT {
        for entity_id in links_for(junction, movie_id) {
            sqlx::query(&sql)
                .bind(movie_id)
                .bind(entity_id)
                .execute(&mut *conn)
                .await?;
            inserted += 1;
        }
    }

    Ok(inserted)
}
