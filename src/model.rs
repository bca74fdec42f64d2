use crate::content::model::Section;
use crate::content::normalize::{self, ContentShape};
use crate::content::{Block, RenderUnit};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

pub const DEFAULT_SIDEBAR_WIDTH: i64 = 25;

/// Default number of revisions retained per page.
pub const DEFAULT_REVISION_RETENTION: i64 = 50;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PageLayout {
    Full,
    SidebarLeft,
    SidebarRight,
}

impl PageLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageLayout::Full => "full",
            PageLayout::SidebarLeft => "sidebar-left",
            PageLayout::SidebarRight => "sidebar-right",
        }
    }

    pub fn parse(s: &str) -> Option<PageLayout> {
        match s {
            "full" => Some(PageLayout::Full),
            "sidebar-left" => Some(PageLayout::SidebarLeft),
            "sidebar-right" => Some(PageLayout::SidebarRight),
            _ => None,
        }
    }
}

/// A page row as persisted. `content` holds the raw polymorphic JSON
/// column (Section-shaped or Block-shaped); the canonical views are
/// [`Page::sections`] and [`Page::blocks`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub layout: PageLayout,
    pub sidebar_width: i64,
    pub content: Value,
    /// Persisted shape discriminator. `None` on legacy rows, which fall
    /// back to structural classification on read.
    pub content_shape: Option<ContentShape>,
    pub sidebar_blocks: Value,
    pub show_in_nav: bool,
    pub nav_order: i64,
    pub nav_label: Option<String>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Page {
    /// New page seeded with one placeholder text section.
    pub fn new(title: &str, slug: &str) -> Page {
        let now = Utc::now();
        let mut page = Page {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            slug: slug.to_string(),
            layout: PageLayout::Full,
            sidebar_width: DEFAULT_SIDEBAR_WIDTH,
            content: json!([]),
            content_shape: Some(ContentShape::Sections),
            sidebar_blocks: json!([]),
            show_in_nav: true,
            nav_order: 0,
            nav_label: None,
            is_archived: false,
            created_at: now,
            updated_at: now,
        };
        page.set_sections(vec![Section::text(title, "")]);
        page
    }

    /// Shape of the content column: the persisted discriminator when
    /// present, structural classification otherwise.
    pub fn shape(&self) -> ContentShape {
        self.content_shape
            .unwrap_or_else(|| normalize::classify(&self.content))
    }

    /// Canonical semantic view of the content column.
    pub fn sections(&self) -> Vec<Section> {
        normalize::sections_from(&self.content, self.shape())
    }

    /// Canonical composer view of the content column.
    pub fn blocks(&self) -> Vec<Block> {
        normalize::blocks_from(&self.content, self.shape())
    }

    /// Renderable units for the public site: sections with adjacent
    /// tab-group members folded together.
    pub fn render_units(&self) -> Vec<RenderUnit> {
        crate::content::consolidate_tab_groups(&self.sections())
    }

    pub fn set_sections(&mut self, sections: Vec<Section>) {
        // Serializing our own derive output cannot fail.
        self.content = serde_json::to_value(sections).unwrap_or_else(|_| json!([]));
        self.content_shape = Some(ContentShape::Sections);
    }

    pub fn set_blocks(&mut self, blocks: Vec<Block>) {
        self.content = serde_json::to_value(blocks).unwrap_or_else(|_| json!([]));
        self.content_shape = Some(ContentShape::Blocks);
    }

    /// Full-copy snapshot of the persisted field set, stored verbatim in
    /// a revision row. Content lives under the `sections` key whatever
    /// its shape; `contentShape` rides along but is excluded from
    /// fingerprints.
    pub fn snapshot(&self) -> Value {
        let mut map = Map::new();
        map.insert("id".into(), json!(self.id));
        map.insert("title".into(), json!(self.title));
        map.insert("slug".into(), json!(self.slug));
        map.insert("layout".into(), json!(self.layout.as_str()));
        map.insert("sidebarWidth".into(), json!(self.sidebar_width));
        map.insert("sections".into(), self.content.clone());
        map.insert("sidebarBlocks".into(), self.sidebar_blocks.clone());
        map.insert("showInNav".into(), json!(self.show_in_nav));
        map.insert("navOrder".into(), json!(self.nav_order));
        if let Some(label) = &self.nav_label {
            map.insert("navLabel".into(), json!(label));
        }
        map.insert("isArchived".into(), json!(self.is_archived));
        if let Some(shape) = self.content_shape {
            map.insert("contentShape".into(), json!(shape.as_str()));
        }
        Value::Object(map)
    }

    /// Rebuild a page from a stored snapshot, defaulting any field the
    /// old snapshot predates. Timestamps are set to now; the upsert keeps
    /// the original `created_at` for existing rows.
    pub fn from_snapshot(fallback_id: &str, snapshot: &Value) -> Page {
        let now = Utc::now();
        let str_field = |key: &str| -> Option<String> {
            snapshot.get(key).and_then(Value::as_str).map(str::to_owned)
        };
        Page {
            id: str_field("id")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| fallback_id.to_string()),
            title: str_field("title").unwrap_or_default(),
            slug: str_field("slug").unwrap_or_default(),
            layout: str_field("layout")
                .as_deref()
                .and_then(PageLayout::parse)
                .unwrap_or(PageLayout::Full),
            sidebar_width: snapshot
                .get("sidebarWidth")
                .and_then(Value::as_i64)
                .unwrap_or(DEFAULT_SIDEBAR_WIDTH),
            content: snapshot
                .get("sections")
                .filter(|v| v.is_array())
                .cloned()
                .unwrap_or_else(|| json!([])),
            content_shape: str_field("contentShape")
                .as_deref()
                .and_then(ContentShape::parse),
            sidebar_blocks: snapshot
                .get("sidebarBlocks")
                .filter(|v| v.is_array())
                .cloned()
                .unwrap_or_else(|| json!([])),
            show_in_nav: snapshot
                .get("showInNav")
                .and_then(Value::as_bool)
                .unwrap_or(true),
            nav_order: snapshot.get("navOrder").and_then(Value::as_i64).unwrap_or(0),
            nav_label: str_field("navLabel"),
            is_archived: snapshot
                .get("isArchived")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Full-content snapshot of a page taken immediately before an
/// overwriting save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Revision {
    pub id: String,
    pub page_id: String,
    pub snapshot: Value,
    pub label: Option<String>,
    pub created_at: DateTime<Utc>,
}
