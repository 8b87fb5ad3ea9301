//! Referential-integrity checks
//!
//! Guarded deletes, outcome classification and the named scenarios run
//! against a working copy of the seeded catalogue.

pub mod checks;
pub mod guard;
pub mod outcome;

pub use checks::*;
pub use guard::*;
pub use outcome::*;
