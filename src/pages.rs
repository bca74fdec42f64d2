//! Page repository façade: save-with-snapshot, slug enforcement, revision
//! listing/restore. Orchestrates `crate::db`; contains no SQL itself.
//!
//! Concurrency is last-write-wins: two editors saving the same page race,
//! and the later save both wins the live row and snapshots the earlier
//! editor's state as a revision. There is no merge and no optimistic lock.

use crate::content::normalize;
use crate::db;
use crate::db::model::RevisionSummary;
use crate::fingerprint::fingerprint;
use crate::model::Page;
use chrono::Utc;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Debug, Error)]
pub enum SaveError {
    /// Rejected before any snapshot or upsert side effect.
    #[error("slug '{0}' is already used by another page")]
    SlugTaken(String),
    #[error("slug must be non-empty")]
    EmptySlug,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Create and persist a page seeded with one placeholder text section.
/// The slug defaults to a slugified title.
#[instrument(skip_all)]
pub async fn create_page(
    pool: &db::Pool,
    title: &str,
    slug: Option<&str>,
    retention: i64,
) -> Result<Page, SaveError> {
    let slug = match slug {
        Some(s) => s.to_string(),
        None => crate::content::slug::slugify(title),
    };
    let mut page = Page::new(title, &slug);
    save_page(pool, &mut page, retention).await?;
    Ok(page)
}

/// Persist a page: slug check, snapshot of the pre-save row, upsert, then
/// inline retention pruning. Sets `updated_at`, and stamps the shape
/// discriminator if the page still lacks one so legacy rows pick up an
/// explicit tag on their next save.
#[instrument(skip_all)]
pub async fn save_page(
    pool: &db::Pool,
    page: &mut Page,
    retention: i64,
) -> Result<(), SaveError> {
    let slug = page.slug.trim().to_string();
    if slug.is_empty() {
        return Err(SaveError::EmptySlug);
    }
    if db::slug_taken(pool, &slug, &page.id).await? {
        return Err(SaveError::SlugTaken(slug));
    }

    page.slug = slug;
    if page.content_shape.is_none() {
        page.content_shape = Some(normalize::classify(&page.content));
    }
    page.updated_at = Utc::now();

    let snapshotted = db::save_page_with_snapshot(pool, page).await?;

    if snapshotted {
        // Trim failure must not fail the save that already committed.
        match db::prune_revisions(pool, &page.id, retention).await {
            Ok(deleted) if deleted > 0 => {
                info!(page_id = %page.id, deleted, "pruned old revisions")
            }
            Ok(_) => {}
            Err(err) => warn!(?err, page_id = %page.id, "revision prune failed"),
        }
    }
    Ok(())
}

/// Revision history for a page, newest first. The first revision whose
/// snapshot fingerprint matches the live row is flagged current; at most
/// one entry is ever flagged. Persistence failures degrade to an empty
/// list so the history panel never breaks the editor.
#[instrument(skip_all)]
pub async fn list_revisions(pool: &db::Pool, page_id: &str) -> Vec<RevisionSummary> {
    match list_revisions_inner(pool, page_id).await {
        Ok(summaries) => summaries,
        Err(err) => {
            warn!(?err, page_id, "listing revisions failed");
            Vec::new()
        }
    }
}

async fn list_revisions_inner(
    pool: &db::Pool,
    page_id: &str,
) -> anyhow::Result<Vec<RevisionSummary>> {
    let revisions = db::list_revisions(pool, page_id).await?;
    let live_print = db::get_page(pool, page_id)
        .await?
        .map(|page| fingerprint(&page.snapshot()));

    let mut flagged = false;
    Ok(revisions
        .into_iter()
        .map(|rev| {
            let is_current = !flagged
                && live_print.as_deref() == Some(fingerprint(&rev.snapshot).as_str());
            flagged |= is_current;
            RevisionSummary {
                id: rev.id,
                page_id: rev.page_id,
                label: rev.label,
                created_at: rev.created_at,
                is_current,
            }
        })
        .collect())
}

/// The page as it looked in a given revision. `None` covers both a
/// missing revision and a store failure; the UI shows "not found" either
/// way.
#[instrument(skip_all)]
pub async fn get_revision_page(pool: &db::Pool, revision_id: &str) -> Option<Page> {
    match db::get_revision(pool, revision_id).await {
        Ok(Some(rev)) => Some(Page::from_snapshot(&rev.page_id, &rev.snapshot)),
        Ok(None) => None,
        Err(err) => {
            warn!(?err, revision_id, "fetching revision failed");
            None
        }
    }
}

/// Overwrite the live page with a revision's snapshot via a normal save,
/// which itself snapshots the current state first, so restoring is always
/// undoable. `Ok(None)` means the revision id does not exist; transport
/// errors surface as `Err`.
#[instrument(skip_all)]
pub async fn restore_revision(
    pool: &db::Pool,
    revision_id: &str,
    retention: i64,
) -> Result<Option<Page>, SaveError> {
    let Some(rev) = db::get_revision(pool, revision_id).await? else {
        return Ok(None);
    };
    let mut page = Page::from_snapshot(&rev.page_id, &rev.snapshot);
    save_page(pool, &mut page, retention).await?;
    info!(revision_id, page_id = %page.id, "restored revision");
    Ok(Some(page))
}
