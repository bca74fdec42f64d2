//! Database module: row/view models and SQL repositories.
//!
//! - `model`: slim view models returned by listing queries.
//! - `repo`: SQL-only functions mapping rows into domain entities.
//!
//! External modules import from `pagesmith::db`; the repository API and
//! view models are re-exported here.

pub mod model;
pub mod repo;

pub use model::{PageNav, RevisionSummary};
pub use repo::*;
