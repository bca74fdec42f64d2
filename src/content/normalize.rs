//! Shape detection and canonicalization for the stored content column.
//!
//! Legacy rows carry no discriminator, so classification is structural:
//! an array whose every element's `type` is a known block type is
//! Block-shaped, anything else falls back to the long-standing Section
//! default. Rows written by this crate also persist an explicit
//! [`ContentShape`] tag so the sniffing can be retired over time.

use super::model::{fresh_id, Block, BlockType, Section, SectionType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Discriminator for the polymorphic content column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentShape {
    Sections,
    Blocks,
    Unknown,
}

impl ContentShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentShape::Sections => "sections",
            ContentShape::Blocks => "blocks",
            ContentShape::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Option<ContentShape> {
        match s {
            "sections" => Some(ContentShape::Sections),
            "blocks" => Some(ContentShape::Blocks),
            "unknown" => Some(ContentShape::Unknown),
            _ => None,
        }
    }
}

/// Structural classification of a raw content column value.
///
/// Total: non-array payloads classify as `Unknown` (normalized to empty
/// content) rather than failing. Empty arrays count as Sections since
/// empty is valid for both shapes.
pub fn classify(raw: &Value) -> ContentShape {
    let Some(items) = raw.as_array() else {
        return ContentShape::Unknown;
    };
    if items.is_empty() {
        return ContentShape::Sections;
    }
    let all_blocks = items.iter().all(|item| {
        item.get("type")
            .and_then(Value::as_str)
            .map(|t| BlockType::parse(t).is_some())
            .unwrap_or(false)
    });
    if all_blocks {
        ContentShape::Blocks
    } else {
        ContentShape::Sections
    }
}

/// Canonical `Section[]` view of a raw content column, classifying first.
pub fn normalize_sections(raw: &Value) -> Vec<Section> {
    sections_from(raw, classify(raw))
}

/// Canonical `Block[]` view of a raw content column, classifying first.
pub fn normalize_blocks(raw: &Value) -> Vec<Block> {
    blocks_from(raw, classify(raw))
}

/// Canonical `Section[]` view given an already-known shape (e.g. the
/// persisted discriminator).
pub fn sections_from(raw: &Value, shape: ContentShape) -> Vec<Section> {
    match shape {
        ContentShape::Sections => parse_each(raw, Section::from_raw),
        ContentShape::Blocks => blocks_to_sections(&parse_each(raw, Block::from_raw)),
        ContentShape::Unknown => Vec::new(),
    }
}

/// Canonical `Block[]` view given an already-known shape.
pub fn blocks_from(raw: &Value, shape: ContentShape) -> Vec<Block> {
    match shape {
        ContentShape::Blocks => parse_each(raw, Block::from_raw),
        ContentShape::Sections => sections_to_blocks(&parse_each(raw, Section::from_raw)),
        ContentShape::Unknown => Vec::new(),
    }
}

fn parse_each<T>(raw: &Value, parse: impl Fn(&Value) -> T) -> Vec<T> {
    raw.as_array()
        .map(|items| items.iter().map(parse).collect())
        .unwrap_or_default()
}

/// Convert composer blocks into semantic sections so the section renderer
/// can display composer content without forked rendering logic.
pub fn blocks_to_sections(blocks: &[Block]) -> Vec<Section> {
    blocks.iter().map(block_to_section).collect()
}

fn block_to_section(block: &Block) -> Section {
    // Keep the source id when present so block-level identity (selection
    // state, anchors) survives conversion.
    let id = if block.id.trim().is_empty() {
        fresh_id()
    } else {
        block.id.clone()
    };
    match block.block_type() {
        Some(BlockType::RichText) if block.display_style.as_deref() == Some("hero") => Section {
            id,
            kind: SectionType::Hero.as_str().to_string(),
            title: block.title.clone(),
            content: block.content.clone(),
            image_url: block.image_url.clone(),
            min_height: block.hero_min_height.clone(),
            ..Default::default()
        },
        Some(BlockType::RichText) => Section {
            id,
            kind: SectionType::Text.as_str().to_string(),
            title: block.title.clone(),
            content: block.content.clone(),
            ..Default::default()
        },
        Some(BlockType::Image) => Section {
            id,
            kind: SectionType::ImageText.as_str().to_string(),
            title: block.alt_text.clone().unwrap_or_default(),
            content: block.caption.clone().unwrap_or_default(),
            image_url: block.image_url.clone(),
            ..Default::default()
        },
        Some(BlockType::Separator) => {
            let style = match block.separator_style.as_deref() {
                Some("dotted") | Some("dashed") => "dotted",
                _ => "line",
            };
            Section {
                id,
                kind: SectionType::Separator.as_str().to_string(),
                separator_style: Some(style.to_string()),
                ..Default::default()
            }
        }
        Some(BlockType::Spacer) => {
            let spacing = if block.height.unwrap_or(0.0) > 48.0 {
                "large"
            } else {
                "medium"
            };
            Section {
                id,
                kind: SectionType::Separator.as_str().to_string(),
                separator_style: Some("space".to_string()),
                separator_spacing: Some(spacing.to_string()),
                ..Default::default()
            }
        }
        Some(BlockType::Button) => {
            let label = block.label.clone().unwrap_or_default();
            let content = match block.href.as_deref() {
                Some(href) => format!("<a href=\"{}\">{}</a>", href, label),
                None => String::new(),
            };
            Section {
                id,
                kind: SectionType::Text.as_str().to_string(),
                title: label,
                content,
                ..Default::default()
            }
        }
        None => Section {
            id,
            kind: SectionType::Text.as_str().to_string(),
            content: block.content.clone(),
            ..Default::default()
        },
    }
}

/// Degraded fallback for consumers that need the Block shape from data
/// predating the Block schema. Hero and separator sections map back to
/// their block counterparts; everything else is lossy and collapses to a
/// plain `richText` block. Not a supported round trip beyond hero.
pub fn sections_to_blocks(sections: &[Section]) -> Vec<Block> {
    sections.iter().map(section_to_block).collect()
}

fn section_to_block(section: &Section) -> Block {
    let id = if section.id.trim().is_empty() {
        fresh_id()
    } else {
        section.id.clone()
    };
    match section.section_type() {
        Some(SectionType::Hero) => Block {
            id,
            kind: BlockType::RichText.as_str().to_string(),
            display_style: Some("hero".to_string()),
            title: section.title.clone(),
            content: section.content.clone(),
            image_url: section.image_url.clone(),
            hero_min_height: section.min_height.clone(),
            ..Default::default()
        },
        Some(SectionType::Separator) => {
            let style = if section.separator_style.as_deref() == Some("dotted") {
                "dotted"
            } else {
                "solid"
            };
            Block {
                id,
                kind: BlockType::Separator.as_str().to_string(),
                separator_style: Some(style.to_string()),
                ..Default::default()
            }
        }
        _ => {
            let content = if section.title.is_empty() {
                section.content.clone()
            } else {
                format!("{}\n\n{}", section.title, section.content)
            };
            Block {
                id,
                kind: BlockType::RichText.as_str().to_string(),
                content,
                ..Default::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_array_classifies_as_sections() {
        assert_eq!(classify(&json!([])), ContentShape::Sections);
    }

    #[test]
    fn non_array_classifies_as_unknown() {
        assert_eq!(classify(&json!({"type": "richText"})), ContentShape::Unknown);
        assert_eq!(classify(&json!(null)), ContentShape::Unknown);
        assert!(normalize_sections(&json!("garbage")).is_empty());
    }

    #[test]
    fn all_block_types_classify_as_blocks() {
        let raw = json!([
            {"id": "b1", "type": "richText"},
            {"id": "b2", "type": "image"},
            {"id": "b3", "type": "separator"},
            {"id": "b4", "type": "spacer"},
            {"id": "b5", "type": "button"},
        ]);
        assert_eq!(classify(&raw), ContentShape::Blocks);
    }

    #[test]
    fn single_section_type_flips_classification() {
        let raw = json!([
            {"id": "b1", "type": "richText"},
            {"id": "s1", "type": "hero"},
            {"id": "b2", "type": "image"},
        ]);
        assert_eq!(classify(&raw), ContentShape::Sections);
    }

    #[test]
    fn element_without_type_flips_classification() {
        let raw = json!([{"id": "b1", "type": "richText"}, {"id": "x"}]);
        assert_eq!(classify(&raw), ContentShape::Sections);
    }

    #[test]
    fn hero_rich_text_round_trips_through_section() {
        let raw = json!([{
            "id": "b1",
            "type": "richText",
            "displayStyle": "hero",
            "title": "Welcome",
            "content": "<p>Intro</p>",
            "imageUrl": "/img/hero.jpg",
            "heroMinHeight": "60vh",
        }]);
        let sections = normalize_sections(&raw);
        assert_eq!(sections.len(), 1);
        let hero = &sections[0];
        assert_eq!(hero.kind, "hero");
        assert_eq!(hero.id, "b1");
        assert_eq!(hero.title, "Welcome");
        assert_eq!(hero.content, "<p>Intro</p>");
        assert_eq!(hero.image_url.as_deref(), Some("/img/hero.jpg"));
        assert_eq!(hero.min_height.as_deref(), Some("60vh"));
    }

    #[test]
    fn image_block_becomes_image_text_section() {
        let blocks = vec![Block {
            id: "b1".into(),
            kind: "image".into(),
            image_url: Some("/img/a.jpg".into()),
            alt_text: Some("A painting".into()),
            caption: Some("Oil on canvas".into()),
            ..Default::default()
        }];
        let sections = blocks_to_sections(&blocks);
        assert_eq!(sections[0].kind, "image-text");
        assert_eq!(sections[0].title, "A painting");
        assert_eq!(sections[0].content, "Oil on canvas");
        assert_eq!(sections[0].image_url.as_deref(), Some("/img/a.jpg"));
    }

    #[test]
    fn separator_and_spacer_blocks_map_to_separator_sections() {
        let blocks = vec![
            Block {
                id: "b1".into(),
                kind: "separator".into(),
                separator_style: Some("dashed".into()),
                ..Default::default()
            },
            Block {
                id: "b2".into(),
                kind: "separator".into(),
                separator_style: Some("solid".into()),
                ..Default::default()
            },
            Block {
                id: "b3".into(),
                kind: "spacer".into(),
                height: Some(64.0),
                ..Default::default()
            },
            Block {
                id: "b4".into(),
                kind: "spacer".into(),
                height: Some(48.0),
                ..Default::default()
            },
        ];
        let sections = blocks_to_sections(&blocks);
        assert_eq!(sections[0].separator_style.as_deref(), Some("dotted"));
        assert_eq!(sections[1].separator_style.as_deref(), Some("line"));
        assert_eq!(sections[2].separator_style.as_deref(), Some("space"));
        assert_eq!(sections[2].separator_spacing.as_deref(), Some("large"));
        assert_eq!(sections[3].separator_spacing.as_deref(), Some("medium"));
    }

    #[test]
    fn button_block_becomes_anchor_text_section() {
        let blocks = vec![
            Block {
                id: "b1".into(),
                kind: "button".into(),
                label: Some("Tickets".into()),
                href: Some("https://example.com/tickets".into()),
                ..Default::default()
            },
            Block {
                id: "b2".into(),
                kind: "button".into(),
                label: Some("Soon".into()),
                ..Default::default()
            },
        ];
        let sections = blocks_to_sections(&blocks);
        assert_eq!(sections[0].title, "Tickets");
        assert_eq!(
            sections[0].content,
            "<a href=\"https://example.com/tickets\">Tickets</a>"
        );
        assert_eq!(sections[1].content, "");
    }

    #[test]
    fn unknown_block_type_becomes_text_section() {
        let blocks = vec![Block {
            id: "b1".into(),
            kind: "carousel".into(),
            content: "raw payload".into(),
            ..Default::default()
        }];
        let sections = blocks_to_sections(&blocks);
        assert_eq!(sections[0].kind, "text");
        assert_eq!(sections[0].title, "");
        assert_eq!(sections[0].content, "raw payload");
    }

    #[test]
    fn conversion_keeps_ids_and_generates_missing_ones() {
        let raw = json!([
            {"id": "keep-me", "type": "richText", "content": "a"},
            {"type": "richText", "content": "b"},
        ]);
        let sections = normalize_sections(&raw);
        assert_eq!(sections[0].id, "keep-me");
        assert!(!sections[1].id.is_empty());
    }

    #[test]
    fn sections_to_blocks_is_lossy_text_fallback() {
        let sections = vec![
            Section {
                id: "s1".into(),
                kind: "image-text".into(),
                title: "A painting".into(),
                content: "Oil on canvas".into(),
                image_url: Some("/img/a.jpg".into()),
                ..Default::default()
            },
            Section {
                id: "s2".into(),
                kind: "separator".into(),
                separator_style: Some("dotted".into()),
                ..Default::default()
            },
        ];
        let blocks = sections_to_blocks(&sections);
        assert_eq!(blocks[0].kind, "richText");
        assert_eq!(blocks[0].content, "A painting\n\nOil on canvas");
        // imageUrl is dropped for image-text: not a round trip.
        assert_eq!(blocks[0].image_url, None);
        assert_eq!(blocks[1].kind, "separator");
        assert_eq!(blocks[1].separator_style.as_deref(), Some("dotted"));
    }

    #[test]
    fn hero_survives_a_full_block_section_block_round_trip() {
        let raw = json!([{
            "id": "b1",
            "type": "richText",
            "displayStyle": "hero",
            "title": "Welcome",
            "content": "<p>Intro</p>",
            "imageUrl": "/img/hero.jpg",
            "heroMinHeight": "60vh",
        }]);
        let sections = normalize_sections(&raw);
        let blocks = sections_to_blocks(&sections);
        assert_eq!(blocks.len(), 1);
        let hero = &blocks[0];
        assert_eq!(hero.id, "b1");
        assert_eq!(hero.kind, "richText");
        assert_eq!(hero.display_style.as_deref(), Some("hero"));
        assert_eq!(hero.title, "Welcome");
        assert_eq!(hero.content, "<p>Intro</p>");
        assert_eq!(hero.image_url.as_deref(), Some("/img/hero.jpg"));
        assert_eq!(hero.hero_min_height.as_deref(), Some("60vh"));
    }

    #[test]
    fn declared_shape_overrides_sniffing() {
        // A single richText-typed element would sniff as Blocks, but a
        // persisted Sections tag wins.
        let raw = json!([{"id": "s1", "type": "richText", "content": "x"}]);
        let sections = sections_from(&raw, ContentShape::Sections);
        assert_eq!(sections[0].kind, "richText");
        assert_eq!(sections[0].section_type(), None);
    }
}
