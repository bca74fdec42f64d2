use super::model::PageNav;
use crate::content::normalize::ContentShape;
use crate::model::{Page, PageLayout, Revision, DEFAULT_SIDEBAR_WIDTH};
use anyhow::Result;
use serde_json::{json, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::instrument;
use uuid::Uuid;

pub type Pool = SqlitePool;

pub async fn init_pool(database_url: &str) -> Result<Pool> {
    let normalized = prepare_sqlite_url(database_url);
    let pool = SqlitePool::connect(&normalized).await?;
    // Enable WAL and stricter durability. Foreign keys back up the
    // explicit revision cleanup in delete_page.
    sqlx::query("PRAGMA journal_mode=WAL;")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA synchronous=FULL;")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA foreign_keys=ON;")
        .execute(&pool)
        .await?;
    Ok(pool)
}

/// If using a file-backed SQLite URL, expand a leading `~/` and ensure the
/// parent directory exists. Leaves in-memory URLs untouched.
fn prepare_sqlite_url(url: &str) -> String {
    if !url.starts_with("sqlite:") {
        return url.to_string();
    }
    if url.starts_with("sqlite::memory") {
        return url.to_string();
    }

    let rest = &url["sqlite:".len()..];
    let path_with_query = rest.strip_prefix("//").unwrap_or(rest);

    let (path_part, query_part) = match path_with_query.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (path_with_query, None),
    };

    if path_part.is_empty() {
        return url.to_string();
    }

    let expanded_path = if let Some(rest) = path_part.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            format!("{}/{}", home.trim_end_matches('/'), rest)
        } else {
            path_part.to_string()
        }
    } else {
        path_part.to_string()
    };

    if let Some(parent) = std::path::Path::new(&expanded_path).parent() {
        if !parent.as_os_str().is_empty() {
            let _ = std::fs::create_dir_all(parent);
        }
    }

    let mut rebuilt = String::from("sqlite://");
    rebuilt.push_str(&expanded_path);
    if let Some(q) = query_part {
        rebuilt.push('?');
        rebuilt.push_str(q);
    }
    rebuilt
}

pub async fn run_migrations(pool: &Pool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// A stored JSON column that fails to parse is treated as empty content,
/// never an error.
fn json_column(row: &SqliteRow, name: &str) -> Value {
    row.try_get::<String, _>(name)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_else(|| json!([]))
}

fn page_from_row(row: &SqliteRow) -> Page {
    Page {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        layout: row
            .try_get::<String, _>("layout")
            .ok()
            .as_deref()
            .and_then(PageLayout::parse)
            .unwrap_or(PageLayout::Full),
        sidebar_width: row
            .try_get::<i64, _>("sidebar_width")
            .unwrap_or(DEFAULT_SIDEBAR_WIDTH),
        content: json_column(row, "content"),
        content_shape: row
            .try_get::<Option<String>, _>("content_shape")
            .ok()
            .flatten()
            .as_deref()
            .and_then(ContentShape::parse),
        sidebar_blocks: json_column(row, "sidebar_blocks"),
        show_in_nav: row.try_get::<bool, _>("show_in_nav").unwrap_or(true),
        nav_order: row.try_get::<i64, _>("nav_order").unwrap_or(0),
        nav_label: row.try_get::<Option<String>, _>("nav_label").ok().flatten(),
        is_archived: row.try_get::<bool, _>("is_archived").unwrap_or(false),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const PAGE_COLUMNS: &str = "id, title, slug, layout, sidebar_width, content, content_shape, \
     sidebar_blocks, show_in_nav, nav_order, nav_label, is_archived, created_at, updated_at";

#[instrument(skip_all)]
pub async fn get_page(pool: &Pool, id: &str) -> Result<Option<Page>> {
    let row = sqlx::query(&format!("SELECT {PAGE_COLUMNS} FROM pages WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(page_from_row))
}

#[instrument(skip_all)]
pub async fn get_page_by_slug(pool: &Pool, slug: &str) -> Result<Option<Page>> {
    let row = sqlx::query(&format!("SELECT {PAGE_COLUMNS} FROM pages WHERE slug = ?"))
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(page_from_row))
}

/// True when a different page already owns this slug.
#[instrument(skip_all)]
pub async fn slug_taken(pool: &Pool, slug: &str, exclude_page_id: &str) -> Result<bool> {
    let existing: Option<String> =
        sqlx::query_scalar("SELECT id FROM pages WHERE slug = ? AND id != ?")
            .bind(slug)
            .bind(exclude_page_id)
            .fetch_optional(pool)
            .await?;
    Ok(existing.is_some())
}

async fn upsert_page_tx(tx: &mut Transaction<'_, Sqlite>, page: &Page) -> Result<()> {
    sqlx::query(
        "INSERT INTO pages (id, title, slug, layout, sidebar_width, content, content_shape, \
                 sidebar_blocks, show_in_nav, nav_order, nav_label, is_archived, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
         ON CONFLICT(id) DO UPDATE SET \
                 title = excluded.title, slug = excluded.slug, layout = excluded.layout, \
                 sidebar_width = excluded.sidebar_width, content = excluded.content, \
                 content_shape = excluded.content_shape, sidebar_blocks = excluded.sidebar_blocks, \
                 show_in_nav = excluded.show_in_nav, nav_order = excluded.nav_order, \
                 nav_label = excluded.nav_label, is_archived = excluded.is_archived, \
                 updated_at = excluded.updated_at",
    )
    .bind(&page.id)
    .bind(&page.title)
    .bind(&page.slug)
    .bind(page.layout.as_str())
    .bind(page.sidebar_width)
    .bind(page.content.to_string())
    .bind(page.content_shape.map(|s| s.as_str()))
    .bind(page.sidebar_blocks.to_string())
    .bind(page.show_in_nav)
    .bind(page.nav_order)
    .bind(&page.nav_label)
    .bind(page.is_archived)
    .bind(page.created_at)
    .bind(page.updated_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Snapshot the pre-update row (when one exists) and upsert the new row
/// in one transaction. The revision's `created_at` is the pre-update
/// row's `updated_at`, so each revision reads as "how the page looked
/// right before this save". Returns whether a snapshot was taken; the
/// first save of a fresh page has nothing to snapshot.
#[instrument(skip_all)]
pub async fn save_page_with_snapshot(pool: &Pool, page: &Page) -> Result<bool> {
    let mut tx = pool.begin().await?;
    let prior = sqlx::query(&format!("SELECT {PAGE_COLUMNS} FROM pages WHERE id = ?"))
        .bind(&page.id)
        .fetch_optional(&mut *tx)
        .await?
        .as_ref()
        .map(page_from_row);

    let snapshotted = if let Some(prior) = prior {
        insert_revision_tx(&mut tx, &prior).await?;
        true
    } else {
        false
    };

    upsert_page_tx(&mut tx, page).await?;
    tx.commit().await?;
    Ok(snapshotted)
}

async fn insert_revision_tx(tx: &mut Transaction<'_, Sqlite>, prior: &Page) -> Result<String> {
    let id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO revisions (id, page_id, snapshot, label, created_at) VALUES (?, ?, ?, NULL, ?)",
    )
    .bind(&id)
    .bind(&prior.id)
    .bind(prior.snapshot().to_string())
    .bind(prior.updated_at)
    .execute(&mut **tx)
    .await?;
    Ok(id)
}

/// Drop everything but the newest `keep` revisions of a page. Runs inline
/// after each snapshotting save; a failure here never rolls back the save.
#[instrument(skip_all)]
pub async fn prune_revisions(pool: &Pool, page_id: &str, keep: i64) -> Result<u64> {
    let result = sqlx::query(
        "DELETE FROM revisions WHERE page_id = ? AND id NOT IN \
             (SELECT id FROM revisions WHERE page_id = ? \
              ORDER BY created_at DESC, rowid DESC LIMIT ?)",
    )
    .bind(page_id)
    .bind(page_id)
    .bind(keep.max(0))
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Deletes the page and its whole revision log in one transaction. The
/// schema also declares ON DELETE CASCADE, but the pragma enabling it is
/// per-connection, so the log is cleared explicitly.
#[instrument(skip_all)]
pub async fn delete_page(pool: &Pool, id: &str) -> Result<bool> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM revisions WHERE page_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM pages WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}

fn nav_from_row(row: &SqliteRow) -> PageNav {
    PageNav {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        show_in_nav: row.try_get::<bool, _>("show_in_nav").unwrap_or(true),
        nav_order: row.try_get::<i64, _>("nav_order").unwrap_or(0),
        nav_label: row.try_get::<Option<String>, _>("nav_label").ok().flatten(),
    }
}

#[instrument(skip_all)]
pub async fn list_nav_pages(pool: &Pool) -> Result<Vec<PageNav>> {
    let rows = sqlx::query(
        "SELECT id, title, slug, show_in_nav, nav_order, nav_label \
         FROM pages WHERE is_archived = 0 ORDER BY nav_order ASC, title ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(nav_from_row).collect())
}

#[instrument(skip_all)]
pub async fn list_archived_pages(pool: &Pool) -> Result<Vec<PageNav>> {
    let rows = sqlx::query(
        "SELECT id, title, slug, show_in_nav, nav_order, nav_label \
         FROM pages WHERE is_archived = 1 ORDER BY title ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(nav_from_row).collect())
}

fn revision_from_row(row: &SqliteRow) -> Revision {
    Revision {
        id: row.get("id"),
        page_id: row.get("page_id"),
        snapshot: row
            .try_get::<String, _>("snapshot")
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_else(|| json!({})),
        label: row.try_get::<Option<String>, _>("label").ok().flatten(),
        created_at: row.get("created_at"),
    }
}

/// Newest first.
#[instrument(skip_all)]
pub async fn list_revisions(pool: &Pool, page_id: &str) -> Result<Vec<Revision>> {
    let rows = sqlx::query(
        "SELECT id, page_id, snapshot, label, created_at FROM revisions \
         WHERE page_id = ? ORDER BY created_at DESC, rowid DESC",
    )
    .bind(page_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(revision_from_row).collect())
}

#[instrument(skip_all)]
pub async fn get_revision(pool: &Pool, id: &str) -> Result<Option<Revision>> {
    let row = sqlx::query("SELECT id, page_id, snapshot, label, created_at FROM revisions WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(revision_from_row))
}

/// Attach or clear a caller-supplied label on a revision ("before
/// redesign", ...). Labels are annotation only; they never affect
/// retention or current-flagging.
#[instrument(skip_all)]
pub async fn set_revision_label(pool: &Pool, id: &str, label: Option<&str>) -> Result<bool> {
    let result = sqlx::query("UPDATE revisions SET label = ? WHERE id = ?")
        .bind(label)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[instrument(skip_all)]
pub async fn count_revisions(pool: &Pool, page_id: &str) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM revisions WHERE page_id = ?")
        .bind(page_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}
