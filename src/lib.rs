//! pagesmith: the content model and versioning layer of a block-based
//! website builder.
//!
//! Pages are composed of structured content stored in a single
//! polymorphic JSON column (`content` module), every save snapshots the
//! prior state into a bounded revision log (`pages` + `db`), and a
//! content fingerprint tells which revision matches the live row without
//! consulting timestamps (`fingerprint`).

pub mod config;
pub mod content;
pub mod db;
pub mod fingerprint;
pub mod model;
pub mod pages;

pub use content::{classify, consolidate_tab_groups, normalize_blocks, normalize_sections};
pub use model::{Page, PageLayout, Revision, DEFAULT_REVISION_RETENTION};
pub use pages::SaveError;
