//! # Movies Common Library
//!
//! Shared code for the movie catalogue integrity tooling:
//! - Snapshot store and database handle
//! - Schema and seed fixture
//! - Table names and row lookup queries
//! - Guarded deletes and outcome classification
//! - Configuration loading
//! - Time budget helpers

pub mod config;
pub mod db;
pub mod error;
pub mod fixture;
pub mod integrity;
pub mod time;

pub use error::{Error, Result};
