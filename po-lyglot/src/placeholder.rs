//! Structural placeholder check on oracle output

use std::sync::LazyLock;

use regex::Regex;

/// `{name}`, `%s`, `%d` and `%(name)s`
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{[^}]*\}|%[sd]|%\([^)]*\)s").expect("placeholder regex is valid")
});

/// Placeholders of `text`, in order of appearance
pub fn find_placeholders(text: &str) -> Vec<&str> {
    PLACEHOLDER_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Placeholders present in `source` but missing from `translation`.
///
/// Occurrences are counted, so `%s %s` translated as `%s` reports one
/// missing `%s`.
pub fn missing_placeholders<'a>(source: &'a str, translation: &str) -> Vec<&'a str> {
    let mut available = find_placeholders(translation);
    let mut missing = Vec::new();
    for placeholder in find_placeholders(source) {
        match available.iter().position(|p| *p == placeholder) {
            Some(idx) => {
                available.swap_remove(idx);
            }
            None => missing.push(placeholder),
        }
    }
    missing
}
