//! Groups adjacent sections sharing a tab-group tag into one renderable
//! unit. Grouping is adjacency-only: the same tag reused after an
//! unrelated section starts a new group, which lets editors interleave
//! tabbed media with ordinary content.

use super::model::Section;

/// One renderable unit: a standalone section, or 2+ adjacent sections
/// displayed as tabs. The active tab defaults to index 0; switching tabs
/// is pure view state and never reorders the underlying sections.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderUnit {
    Single(Section),
    Tabs {
        group: String,
        sections: Vec<Section>,
    },
}

fn tab_group_of(section: &Section) -> Option<&str> {
    section
        .tab_group
        .as_deref()
        .map(str::trim)
        .filter(|g| !g.is_empty())
}

/// Left-to-right scan over the canonical section order.
pub fn consolidate_tab_groups(sections: &[Section]) -> Vec<RenderUnit> {
    let mut units = Vec::new();
    let mut i = 0;
    while i < sections.len() {
        match tab_group_of(&sections[i]) {
            Some(group) => {
                let mut members = vec![sections[i].clone()];
                let mut j = i + 1;
                while j < sections.len() && tab_group_of(&sections[j]) == Some(group) {
                    members.push(sections[j].clone());
                    j += 1;
                }
                if members.len() > 1 {
                    units.push(RenderUnit::Tabs {
                        group: group.to_string(),
                        sections: members,
                    });
                } else if let Some(only) = members.pop() {
                    units.push(RenderUnit::Single(only));
                }
                i = j;
            }
            None => {
                units.push(RenderUnit::Single(sections[i].clone()));
                i += 1;
            }
        }
    }
    units
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(id: &str, group: Option<&str>) -> Section {
        Section {
            id: id.into(),
            kind: "text".into(),
            tab_group: group.map(str::to_owned),
            ..Default::default()
        }
    }

    fn unit_ids(unit: &RenderUnit) -> Vec<&str> {
        match unit {
            RenderUnit::Single(s) => vec![s.id.as_str()],
            RenderUnit::Tabs { sections, .. } => {
                sections.iter().map(|s| s.id.as_str()).collect()
            }
        }
    }

    #[test]
    fn nonadjacent_reuse_forms_separate_groups() {
        let sections = vec![
            tagged("s1", Some("A")),
            tagged("s2", Some("A")),
            tagged("s3", Some("B")),
            tagged("s4", Some("A")),
        ];
        let units = consolidate_tab_groups(&sections);
        assert_eq!(units.len(), 3);
        assert_eq!(unit_ids(&units[0]), vec!["s1", "s2"]);
        assert!(matches!(&units[0], RenderUnit::Tabs { group, .. } if group == "A"));
        assert_eq!(unit_ids(&units[1]), vec!["s3"]);
        assert_eq!(unit_ids(&units[2]), vec!["s4"]);
        // A single tagged section renders standalone, not as a one-tab group.
        assert!(matches!(&units[1], RenderUnit::Single(_)));
        assert!(matches!(&units[2], RenderUnit::Single(_)));
    }

    #[test]
    fn tags_are_trimmed_before_comparison() {
        let sections = vec![tagged("s1", Some(" media ")), tagged("s2", Some("media"))];
        let units = consolidate_tab_groups(&sections);
        assert_eq!(units.len(), 1);
        assert!(matches!(&units[0], RenderUnit::Tabs { group, .. } if group == "media"));
    }

    #[test]
    fn blank_tags_never_group() {
        let sections = vec![tagged("s1", Some("  ")), tagged("s2", Some("")), tagged("s3", None)];
        let units = consolidate_tab_groups(&sections);
        assert_eq!(units.len(), 3);
        assert!(units.iter().all(|u| matches!(u, RenderUnit::Single(_))));
    }

    #[test]
    fn order_is_preserved_across_units() {
        let sections = vec![
            tagged("s1", None),
            tagged("s2", Some("A")),
            tagged("s3", Some("A")),
            tagged("s4", None),
        ];
        let units = consolidate_tab_groups(&sections);
        let flat: Vec<&str> = units.iter().flat_map(|u| unit_ids(u)).collect();
        assert_eq!(flat, vec!["s1", "s2", "s3", "s4"]);
    }

    #[test]
    fn empty_input_yields_no_units() {
        assert!(consolidate_tab_groups(&[]).is_empty());
    }
}
