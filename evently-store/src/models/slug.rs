//! Slug derivation for event titles
//!
//! Pure function of the title. It never looks at existing records, so two
//! titles that normalize the same way produce the same slug and the
//! collision is reported by the store's unique constraint.

use once_cell::sync::Lazy;
use regex::Regex;

/// Anything that is not an ASCII word character, whitespace, or hyphen.
/// Applied after lowercasing, so `[a-z0-9_]` covers the word characters.
static NON_SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9_\s-]").expect("invalid slug filter regex"));

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("invalid whitespace regex"));

static HYPHENS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("invalid hyphen regex"));

/// Derive a URL slug from a title.
///
/// # Example
/// ```
/// use evently_store::models::slugify;
///
/// assert_eq!(slugify("  RustConf 2025: Portland! "), "rustconf-2025-portland");
/// assert_eq!(slugify("A -- B"), "a-b");
/// ```
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = NON_SLUG_RE.replace_all(lowered.trim(), "");
    let hyphenated = WHITESPACE_RE.replace_all(&stripped, "-");
    let collapsed = HYPHENS_RE.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_title() {
        assert_eq!(slugify("Next.js Conf 2025"), "nextjs-conf-2025");
    }

    #[test]
    fn strips_special_characters() {
        assert_eq!(slugify("React & Friends: Live!"), "react-friends-live");
    }

    #[test]
    fn collapses_whitespace_and_hyphens() {
        assert_eq!(slugify("a   b\t\nc"), "a-b-c");
        assert_eq!(slugify("a - - b"), "a-b");
        assert_eq!(slugify("a---b"), "a-b");
    }

    #[test]
    fn strips_edge_hyphens() {
        assert_eq!(slugify("--hello world--"), "hello-world");
        assert_eq!(slugify(" - hello - "), "hello");
    }

    #[test]
    fn keeps_underscores() {
        assert_eq!(slugify("snake_case talk"), "snake_case-talk");
    }

    #[test]
    fn drops_non_ascii_letters() {
        assert_eq!(slugify("Café Übersicht"), "caf-bersicht");
    }

    #[test]
    fn only_symbols_yield_empty() {
        assert_eq!(slugify("!!! ???"), "");
    }
}
