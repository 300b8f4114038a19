//! Slug derivation and collision resolution.
//!
//! Derivation is pure. Collision resolution works on the set of slugs already
//! taken in the collection, which the repository layer loads in one query
//! (every slug equal to the base or starting with `<base>-`).

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Characters that survive normalization: ASCII word characters, whitespace
/// and hyphens. Everything else is stripped.
static DISALLOWED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s_-]").expect("valid regex"));

/// Runs of whitespace, underscores and hyphens collapse into one hyphen.
static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_-]+").expect("valid regex"));

/// Prefix for slugs generated when a title has no usable characters.
pub const FALLBACK_SLUG_PREFIX: &str = "item";

/// Normalize a title into a URL-safe slug.
///
/// Lowercases, strips non-word characters, collapses whitespace to hyphens
/// and trims leading/trailing hyphens. May return an empty string; use
/// [`base_slug`] when an empty result is not acceptable.
pub fn normalize(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = DISALLOWED_RE.replace_all(&lowered, "");
    let hyphenated = SEPARATOR_RE.replace_all(&stripped, "-");
    hyphenated.trim_matches('-').to_string()
}

/// Normalize a title, substituting a short random token if nothing is left.
pub fn base_slug(title: &str) -> String {
    let slug = normalize(title);
    if slug.is_empty() {
        fallback_slug()
    } else {
        slug
    }
}

/// `item-<8 hex chars>`.
pub fn fallback_slug() -> String {
    let token = uuid::Uuid::new_v4().simple().to_string();
    format!("{FALLBACK_SLUG_PREFIX}-{}", &token[..8])
}

/// Pick the first free slug among `base`, `base-1`, `base-2`, ...
///
/// `taken` must hold the slugs already used in the collection (the entity
/// being updated excluded). At most `taken.len() + 1` candidates are checked:
/// `base` itself is one of the taken slugs whenever a suffix is needed, so one
/// of the first `taken.len()` suffixes is always free.
pub fn resolve_collision(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    for n in 1..=taken.len() {
        let candidate = format!("{base}-{n}");
        if !taken.contains(&candidate) {
            return candidate;
        }
    }
    format!("{base}-{}", taken.len() + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taken(slugs: &[&str]) -> HashSet<String> {
        slugs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn normalizes_simple_title() {
        assert_eq!(normalize("Thermal Transfer Labels"), "thermal-transfer-labels");
    }

    #[test]
    fn strips_punctuation_and_collapses_separators() {
        assert_eq!(normalize("  Labels & Tags -- 2024!  "), "labels-tags-2024");
        assert_eq!(normalize("snake_case_title"), "snake-case-title");
        assert_eq!(normalize("---Edge---"), "edge");
    }

    #[test]
    fn non_ascii_letters_are_stripped() {
        assert_eq!(normalize("Café Menü"), "caf-men");
    }

    #[test]
    fn empty_normalization_falls_back_to_token() {
        let slug = base_slug("!!! ???");
        assert!(slug.starts_with("item-"));
        assert_eq!(slug.len(), "item-".len() + 8);
    }

    #[test]
    fn free_base_is_returned_unchanged() {
        assert_eq!(
            resolve_collision("thermal-transfer-labels", &taken(&[])),
            "thermal-transfer-labels"
        );
    }

    #[test]
    fn first_collision_gets_suffix_one() {
        assert_eq!(
            resolve_collision("thermal-transfer-labels", &taken(&["thermal-transfer-labels"])),
            "thermal-transfer-labels-1"
        );
    }

    #[test]
    fn skips_taken_suffixes() {
        let set = taken(&["labels", "labels-1", "labels-2", "labels-4"]);
        assert_eq!(resolve_collision("labels", &set), "labels-3");
    }

    #[test]
    fn unrelated_slugs_do_not_block_base() {
        let set = taken(&["labels-1", "labels-2"]);
        assert_eq!(resolve_collision("labels", &set), "labels");
    }

    #[test]
    fn dense_suffixes_resolve_past_the_end() {
        let set = taken(&["a", "a-1", "a-2", "a-3"]);
        assert_eq!(resolve_collision("a", &set), "a-4");
    }
}
