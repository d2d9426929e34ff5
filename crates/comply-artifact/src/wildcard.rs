//! `*` wildcard comparison of identifier fields

use regex::Regex;

/// Match `input` against `needle`, where `*` in the needle matches any run of characters
///
/// A blank needle matches anything. Everything other than `*` is literal.
pub(crate) fn wildcard_matches(needle: &str, input: &str) -> bool {
    let needle = needle.trim();
    if needle.is_empty() {
        return true;
    }
    if !needle.contains('*') {
        return needle == input;
    }

    let pattern = needle
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*?");
    match Regex::new(&format!("^{pattern}$")) {
        Ok(re) => re.is_match(input),
        Err(e) => {
            tracing::warn!("invalid wildcard pattern '{}': {}", needle, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_needle_matches_anything() {
        assert!(wildcard_matches("", "anything"));
        assert!(wildcard_matches("  ", ""));
    }

    #[test]
    fn literal_needle_requires_equality() {
        assert!(wildcard_matches("a.jar", "a.jar"));
        assert!(!wildcard_matches("a.jar", "abjar"));
        assert!(!wildcard_matches("a.jar", "a.jar.sig"));
    }

    #[test]
    fn star_matches_any_run() {
        assert!(wildcard_matches("commons-*.jar", "commons-lang3-3.5.jar"));
        assert!(wildcard_matches("*", ""));
        assert!(!wildcard_matches("commons-*.jar", "commons-lang3.zip"));
    }

    #[test]
    fn dots_are_literal_around_stars() {
        assert!(!wildcard_matches("*.jar", "xjar"));
    }
}
