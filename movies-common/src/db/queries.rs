//! Point-lookup query builders
//!
//! Each builder returns a [`RowQuery`]: a `SELECT * ... WHERE id = ?` over one
//! parent table with the id kept as a bound parameter.

use crate::db::table_names::{ParentTable, ID};

/// Lookup of a single parent row by primary key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowQuery {
    pub table: ParentTable,
    pub id: i64,
}

impl RowQuery {
    pub fn new(table: ParentTable, id: i64) -> Self {
        Self { table, id }
    }

    /// Parameterized statement; bind [`RowQuery::id`] to the single placeholder
    pub fn sql(&self) -> String {
        format!("SELECT * FROM {table} WHERE {table}.{ID} = ?", table = self.table.name())
    }
}

pub fn select_movie_by_id(id: i64) -> RowQuery {
    RowQuery::new(ParentTable::Movies, id)
}

pub fn select_genre_by_id(id: i64) -> RowQuery {
    RowQuery::new(ParentTable::Genres, id)
}

pub fn select_director_by_id(id: i64) -> RowQuery {
    RowQuery::new(ParentTable::Directors, id)
}

pub fn select_actor_by_id(id: i64) -> RowQuery {
    RowQuery::new(ParentTable::Actors, id)
}

pub fn select_keyword_by_id(id: i64) -> RowQuery {
    RowQuery::new(ParentTable::Keywords, id)
}

pub fn select_production_company_by_id(id: i64) -> RowQuery {
    RowQuery::new(ParentTable::ProductionCompanies, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_keeps_id_as_parameter() {
        let query = select_production_company_by_id(12);
        assert_eq!(
            query.sql(),
            "SELECT * FROM production_companies WHERE production_companies.id = ?"
        );
        assert!(!query.sql().contains("12"));
    }

    #[test]
    fn test_builders_target_their_table() {
        assert_eq!(select_movie_by_id(1).table, ParentTable::Movies);
        assert_eq!(select_genre_by_id(1).table, ParentTable::Genres);
        assert_eq!(select_director_by_id(1).table, ParentTable::Directors);
        assert_eq!(select_actor_by_id(1).table, ParentTable::Actors);
        assert_eq!(select_keyword_by_id(1).table, ParentTable::Keywords);
    }
}
