//! Table and column names
//!
//! Single source of truth for identifiers used in SQL. Checks and query
//! builders refer to these, never to ad-hoc string literals.

use serde::Serialize;
use std::fmt;

pub const MOVIES: &str = "movies";
pub const GENRES: &str = "genres";
pub const DIRECTORS: &str = "directors";
pub const ACTORS: &str = "actors";
pub const KEYWORDS: &str = "keywords";
pub const PRODUCTION_COMPANIES: &str = "production_companies";

pub const MOVIE_GENRES: &str = "movie_genres";
pub const MOVIE_DIRECTORS: &str = "movie_directors";
pub const MOVIE_ACTORS: &str = "movie_actors";
pub const MOVIE_KEYWORDS: &str = "movie_keywords";
pub const MOVIE_PRODUCTION_COMPANIES: &str = "movie_production_companies";

/// Primary key column shared by every parent table
pub const ID: &str = "id";

/// Junction column referencing `movies.id`
pub const MOVIE_ID: &str = "movie_id";

/// Tables whose rows are referenced by junction tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentTable {
    Movies,
    Genres,
    Directors,
    Actors,
    Keywords,
    ProductionCompanies,
}

impl ParentTable {
    pub const ALL: [ParentTable; 6] = [
        ParentTable::Movies,
        ParentTable::Genres,
        ParentTable::Directors,
        ParentTable::Actors,
        ParentTable::Keywords,
        ParentTable::ProductionCompanies,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ParentTable::Movies => MOVIES,
            ParentTable::Genres => GENRES,
            ParentTable::Directors => DIRECTORS,
            ParentTable::Actors => ACTORS,
            ParentTable::Keywords => KEYWORDS,
            ParentTable::ProductionCompanies => PRODUCTION_COMPANIES,
        }
    }

    /// Junction tables holding a foreign key to this table
    pub fn referencing_junctions(self) -> Vec<JunctionTable> {
        JunctionTable::ALL
            .into_iter()
            .filter(|j| j.column_for(self).is_some())
            .collect()
    }
}

impl fmt::Display for ParentTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Many-to-many tables linking a movie to one other entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JunctionTable {
    MovieGenres,
    MovieDirectors,
    MovieActors,
    MovieKeywords,
    MovieProductionCompanies,
}

impl JunctionTable {
    pub const ALL: [JunctionTable; 5] = [
        JunctionTable::MovieGenres,
        JunctionTable::MovieDirectors,
        JunctionTable::MovieActors,
        JunctionTable::MovieKeywords,
        JunctionTable::MovieProductionCompanies,
    ];

    pub fn name(self) -> &'static str {
        match self {
            JunctionTable::MovieGenres => MOVIE_GENRES,
            JunctionTable::MovieDirectors => MOVIE_DIRECTORS,
            JunctionTable::MovieActors => MOVIE_ACTORS,
            JunctionTable::MovieKeywords => MOVIE_KEYWORDS,
            JunctionTable::MovieProductionCompanies => MOVIE_PRODUCTION_COMPANIES,
        }
    }

    /// The non-movie parent this junction links to
    pub fn entity(self) -> ParentTable {
        match self {
            JunctionTable::MovieGenres => ParentTable::Genres,
            JunctionTable::MovieDirectors => ParentTable::Directors,
            JunctionTable::MovieActors => ParentTable::Actors,
            JunctionTable::MovieKeywords => ParentTable::Keywords,
            JunctionTable::MovieProductionCompanies => ParentTable::ProductionCompanies,
        }
    }

    /// Foreign-key column referencing the entity table
    pub fn entity_column(self) -> &'static str {
        match self {
            JunctionTable::MovieGenres => "genre_id",
            JunctionTable::MovieDirectors => "director_id",
            JunctionTable::MovieActors => "actor_id",
            JunctionTable::MovieKeywords => "keyword_id",
            JunctionTable::MovieProductionCompanies => "company_id",
        }
    }

    /// Column in this junction that references `parent`, if any
    pub fn column_for(self, parent: ParentTable) -> Option<&'static str> {
        if parent == ParentTable::Movies {
            Some(MOVIE_ID)
        } else if parent == self.entity() {
            Some(self.entity_column())
        } else {
            None
        }
    }
}

impl fmt::Display for JunctionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
