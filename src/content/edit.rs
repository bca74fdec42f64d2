//! In-memory editor operations over canonical content arrays.
//!
//! These mutate the array the editor holds; nothing here touches
//! persistence. A save is always a separate explicit call.

use super::model::ContentItem;

/// Insert at `index` (clamped to the array length); append when `None`.
pub fn insert_item<T: ContentItem>(items: &mut Vec<T>, item: T, index: Option<usize>) {
    let at = index.unwrap_or(items.len()).min(items.len());
    items.insert(at, item);
}

/// Apply `edit` to the item with the given id. Returns false when absent.
pub fn update_item<T: ContentItem>(
    items: &mut [T],
    id: &str,
    edit: impl FnOnce(&mut T),
) -> bool {
    match items.iter_mut().find(|item| item.item_id() == id) {
        Some(item) => {
            edit(item);
            true
        }
        None => false,
    }
}

/// Remove the item with the given id. Returns false when absent.
pub fn remove_item<T: ContentItem>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.item_id() != id);
    items.len() != before
}

/// Move the item with the given id to `index` (clamped). Returns false
/// when absent.
pub fn move_item<T: ContentItem>(items: &mut Vec<T>, id: &str, index: usize) -> bool {
    let Some(from) = items.iter().position(|item| item.item_id() == id) else {
        return false;
    };
    let item = items.remove(from);
    let to = index.min(items.len());
    items.insert(to, item);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::model::Section;

    fn section(id: &str) -> Section {
        Section {
            id: id.into(),
            kind: "text".into(),
            ..Default::default()
        }
    }

    fn ids(items: &[Section]) -> Vec<&str> {
        items.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn insert_appends_and_clamps() {
        let mut items = vec![section("a"), section("b")];
        insert_item(&mut items, section("c"), None);
        insert_item(&mut items, section("d"), Some(1));
        insert_item(&mut items, section("e"), Some(99));
        assert_eq!(ids(&items), vec!["a", "d", "b", "c", "e"]);
    }

    #[test]
    fn update_edits_in_place() {
        let mut items = vec![section("a")];
        assert!(update_item(&mut items, "a", |s| s.title = "Edited".into()));
        assert_eq!(items[0].title, "Edited");
        assert!(!update_item(&mut items, "missing", |s| s.title = "X".into()));
    }

    #[test]
    fn remove_and_move() {
        let mut items = vec![section("a"), section("b"), section("c")];
        assert!(move_item(&mut items, "c", 0));
        assert_eq!(ids(&items), vec!["c", "a", "b"]);
        assert!(move_item(&mut items, "c", 99));
        assert_eq!(ids(&items), vec!["a", "b", "c"]);
        assert!(remove_item(&mut items, "b"));
        assert!(!remove_item(&mut items, "b"));
        assert_eq!(ids(&items), vec!["a", "c"]);
    }
}
