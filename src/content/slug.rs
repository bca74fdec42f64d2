//! URL-safe slug derivation for pages and gallery events.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Lowercase, hyphen-separated, ASCII-only. Empty input (or input with no
/// usable characters) yields an empty slug; callers decide the fallback.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    NON_SLUG
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Summer Concerts 2026"), "summer-concerts-2026");
        assert_eq!(slugify("  Press & Media  "), "press-media");
        assert_eq!(slugify("Déjà vu"), "d-j-vu");
    }

    #[test]
    fn slugify_collapses_and_trims_separators() {
        assert_eq!(slugify("--a---b--"), "a-b");
        assert_eq!(slugify("!!!"), "");
    }
}
