//! View models returned by listing queries.
//!
//! Keep these structs focused on the data a listing needs. Full entities
//! live in `crate::model`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Page slice used by the navigation listing; content is not loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageNav {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub show_in_nav: bool,
    pub nav_order: i64,
    pub nav_label: Option<String>,
}

/// Revision slice for the history panel. `is_current` is computed at
/// listing time by fingerprint comparison, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevisionSummary {
    pub id: String,
    pub page_id: String,
    pub label: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_current: bool,
}
