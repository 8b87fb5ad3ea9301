//! Database handle, snapshots, schema and queries

pub mod database;
pub mod queries;
pub mod schema;
pub mod seed;
pub mod snapshot;
pub mod table_names;

pub use database::*;
pub use queries::*;
pub use schema::*;
pub use seed::*;
pub use snapshot::*;
pub use table_names::*;
