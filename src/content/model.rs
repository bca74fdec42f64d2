//! Tagged content variants stored in a page's JSON content column.
//!
//! Two representations coexist in the same column: semantic `Section`s
//! (hero/text/gallery/...) and free-form `Block`s used by the visual
//! composer. The stored column carries no schema version for legacy rows,
//! so both shapes must deserialize leniently: a missing or wrong-typed
//! field falls back to a default, never an error.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Fresh opaque id for sections, blocks and their sub-entities.
pub fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionType {
    Hero,
    Text,
    ImageText,
    Gallery,
    Contact,
    Schedule,
    Performances,
    Table,
    Separator,
    Downloads,
    AudioPlaylist,
    VideoGallery,
}

impl SectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Hero => "hero",
            SectionType::Text => "text",
            SectionType::ImageText => "image-text",
            SectionType::Gallery => "gallery",
            SectionType::Contact => "contact",
            SectionType::Schedule => "schedule",
            SectionType::Performances => "performances",
            SectionType::Table => "table",
            SectionType::Separator => "separator",
            SectionType::Downloads => "downloads",
            SectionType::AudioPlaylist => "audio-playlist",
            SectionType::VideoGallery => "video-gallery",
        }
    }

    pub fn parse(s: &str) -> Option<SectionType> {
        match s {
            "hero" => Some(SectionType::Hero),
            "text" => Some(SectionType::Text),
            "image-text" => Some(SectionType::ImageText),
            "gallery" => Some(SectionType::Gallery),
            "contact" => Some(SectionType::Contact),
            "schedule" => Some(SectionType::Schedule),
            "performances" => Some(SectionType::Performances),
            "table" => Some(SectionType::Table),
            "separator" => Some(SectionType::Separator),
            "downloads" => Some(SectionType::Downloads),
            "audio-playlist" => Some(SectionType::AudioPlaylist),
            "video-gallery" => Some(SectionType::VideoGallery),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    RichText,
    Image,
    Separator,
    Spacer,
    Button,
}

impl BlockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::RichText => "richText",
            BlockType::Image => "image",
            BlockType::Separator => "separator",
            BlockType::Spacer => "spacer",
            BlockType::Button => "button",
        }
    }

    pub fn parse(s: &str) -> Option<BlockType> {
        match s {
            "richText" => Some(BlockType::RichText),
            "image" => Some(BlockType::Image),
            "separator" => Some(BlockType::Separator),
            "spacer" => Some(BlockType::Spacer),
            "button" => Some(BlockType::Button),
            _ => None,
        }
    }
}

/// Semantic content unit rendered by the public site.
///
/// `kind` stays a plain string so payloads written by a newer or older
/// schema survive a load/save round trip; consumers switch on
/// [`Section::section_type`] and render nothing for unknown values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub gallery_events: Vec<GalleryEvent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub performance_items: Vec<PerformanceItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub download_items: Vec<DownloadItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub download_groups: Vec<DownloadGroup>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub audio_items: Vec<AudioItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub video_items: Vec<VideoItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub table_headers: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub table_rows: Vec<Vec<String>>,
    /// `line`, `dotted` or `space`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator_style: Option<String>,
    /// `medium` or `large`; only meaningful for `space` separators.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator_spacing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_label: Option<String>,
}

impl Section {
    pub fn text(title: impl Into<String>, content: impl Into<String>) -> Section {
        Section {
            id: fresh_id(),
            kind: SectionType::Text.as_str().to_string(),
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn section_type(&self) -> Option<SectionType> {
        SectionType::parse(&self.kind)
    }

    /// Build a section from an untyped stored object, defaulting every
    /// missing or wrong-typed field. Never fails.
    pub fn from_raw(raw: &Value) -> Section {
        Section {
            id: raw_id(raw),
            kind: raw_string(raw, "type"),
            title: raw_string(raw, "title"),
            content: raw_string(raw, "content"),
            image_url: raw_str(raw, "imageUrl"),
            gallery_events: raw_items(raw, "galleryEvents"),
            performance_items: raw_items(raw, "performanceItems"),
            download_items: raw_items(raw, "downloadItems"),
            download_groups: raw_items(raw, "downloadGroups"),
            audio_items: raw_items(raw, "audioItems"),
            video_items: raw_items(raw, "videoItems"),
            table_headers: raw_items(raw, "tableHeaders"),
            table_rows: raw_items(raw, "tableRows"),
            separator_style: raw_str(raw, "separatorStyle"),
            separator_spacing: raw_str(raw, "separatorSpacing"),
            min_height: raw_str(raw, "minHeight"),
            max_width: raw_str(raw, "maxWidth"),
            tab_group: raw_str(raw, "tabGroup"),
            tab_label: raw_str(raw, "tabLabel"),
        }
    }
}

/// Free-form layout unit used by the visual composer. Carries no semantic
/// type; a `richText` block may stand in for a hero, header or paragraph
/// depending on `display_style`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Block {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// `solid`, `dotted` or `dashed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator_style: Option<String>,
    /// Spacer height in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_min_height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapper_style: Option<WrapperStyle>,
}

impl Block {
    pub fn block_type(&self) -> Option<BlockType> {
        BlockType::parse(&self.kind)
    }

    /// Lenient counterpart of [`Section::from_raw`] for the Block shape.
    pub fn from_raw(raw: &Value) -> Block {
        Block {
            id: raw_id(raw),
            kind: raw_string(raw, "type"),
            title: raw_string(raw, "title"),
            content: raw_string(raw, "content"),
            display_style: raw_str(raw, "displayStyle"),
            image_url: raw_str(raw, "imageUrl"),
            alt_text: raw_str(raw, "altText"),
            caption: raw_str(raw, "caption"),
            separator_style: raw_str(raw, "separatorStyle"),
            height: raw.get("height").and_then(Value::as_f64),
            label: raw_str(raw, "label"),
            href: raw_str(raw, "href"),
            hero_min_height: raw_str(raw, "heroMinHeight"),
            wrapper_style: raw
                .get("wrapperStyle")
                .and_then(|w| serde_json::from_value(w.clone()).ok()),
        }
    }
}

/// Optional visual frame around a block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WrapperStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_preset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<String>,
}

/// One event inside a gallery section. The slug is derived from the title
/// unless hand-edited; collisions within a gallery are a data-quality
/// issue, not enforced here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryEvent {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<GalleryMediaItem>,
}

impl GalleryEvent {
    /// New event with the slug derived from the title. Editors may
    /// hand-edit `slug` afterwards; it is never re-derived.
    pub fn new(title: &str) -> GalleryEvent {
        GalleryEvent {
            id: fresh_id(),
            title: title.to_string(),
            slug: super::slug::slugify(title),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryMediaItem {
    pub id: String,
    /// `image`, `audio` or `video`.
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub caption: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

/// Downloadable resource; carries either a single `url` or named `links`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DownloadItem {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<DownloadLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DownloadLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DownloadGroup {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<DownloadItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PerformanceItem {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub composer: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub year: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AudioItem {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub caption: String,
}

/// Anything the editor array helpers can address by id.
pub trait ContentItem {
    fn item_id(&self) -> &str;
}

impl ContentItem for Section {
    fn item_id(&self) -> &str {
        &self.id
    }
}

impl ContentItem for Block {
    fn item_id(&self) -> &str {
        &self.id
    }
}

fn raw_str(raw: &Value, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn raw_string(raw: &Value, key: &str) -> String {
    raw_str(raw, key).unwrap_or_default()
}

fn raw_id(raw: &Value) -> String {
    raw_str(raw, "id")
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(fresh_id)
}

/// Collection fields tolerate malformed entries item-by-item: a bad
/// element is dropped, the rest survive.
fn raw_items<T: DeserializeOwned>(raw: &Value, key: &str) -> Vec<T> {
    raw.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn section_from_raw_defaults_wrong_types() {
        let raw = json!({
            "id": "s1",
            "type": "text",
            "title": 42,
            "content": ["not", "a", "string"],
            "minHeight": {"nested": true},
        });
        let section = Section::from_raw(&raw);
        assert_eq!(section.id, "s1");
        assert_eq!(section.kind, "text");
        assert_eq!(section.title, "");
        assert_eq!(section.content, "");
        assert_eq!(section.min_height, None);
    }

    #[test]
    fn section_from_raw_generates_missing_id() {
        let a = Section::from_raw(&json!({"type": "text"}));
        let b = Section::from_raw(&json!({"type": "text", "id": "  "}));
        assert!(!a.id.is_empty());
        assert!(!b.id.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn unknown_section_type_is_preserved() {
        let raw = json!({"id": "s1", "type": "hologram", "title": "Future"});
        let section = Section::from_raw(&raw);
        assert_eq!(section.kind, "hologram");
        assert_eq!(section.section_type(), None);
        let round = serde_json::to_value(&section).unwrap();
        assert_eq!(round["type"], "hologram");
    }

    #[test]
    fn malformed_nested_items_are_dropped_individually() {
        let raw = json!({
            "id": "g1",
            "type": "gallery",
            "galleryEvents": [
                {"id": "e1", "title": "Opening", "slug": "opening"},
                "not-an-object",
                {"id": "e2", "title": "Closing", "slug": "closing"},
            ],
        });
        let section = Section::from_raw(&raw);
        assert_eq!(section.gallery_events.len(), 2);
        assert_eq!(section.gallery_events[1].title, "Closing");
    }

    #[test]
    fn gallery_event_derives_slug_from_title() {
        let event = GalleryEvent::new("Opening Night 2026");
        assert_eq!(event.slug, "opening-night-2026");
        assert!(!event.id.is_empty());

        // Hand-edited slugs stick.
        let mut event = GalleryEvent::new("Opening Night 2026");
        event.slug = "premiere".into();
        assert_eq!(event.slug, "premiere");
    }

    #[test]
    fn block_from_raw_reads_wrapper_style() {
        let raw = json!({
            "id": "b1",
            "type": "richText",
            "content": "<p>hi</p>",
            "wrapperStyle": {"widthMode": "narrow", "radius": 8.0},
        });
        let block = Block::from_raw(&raw);
        let style = block.wrapper_style.unwrap();
        assert_eq!(style.width_mode.as_deref(), Some("narrow"));
        assert_eq!(style.radius, Some(8.0));
    }

    #[test]
    fn section_serializes_without_empty_fields() {
        let section = Section::text("Hello", "");
        let value = serde_json::to_value(&section).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("title"));
        assert!(!obj.contains_key("content"));
        assert!(!obj.contains_key("galleryEvents"));
    }
}
