//! Oracle response parsing

/// Translation and optional explanation extracted from an oracle response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub translation: String,
    pub explanation: Option<String>,
}

impl TranslationResult {
    pub fn new(translation: impl Into<String>, explanation: Option<String>) -> Self {
        Self {
            translation: translation.into(),
            explanation,
        }
    }
}

/// Split a raw response into translation and explanation.
///
/// The first non-empty line, trimmed and stripped of one pair of surrounding
/// double quotes, is the translation. The remaining non-empty lines form the
/// explanation. Malformed responses never fail: a single unquoted line is
/// taken as the translation as is.
pub fn parse_response(raw: &str) -> TranslationResult {
    let mut lines = raw.lines().filter(|line| !line.trim().is_empty());

    let translation = lines.next().map(unquote).unwrap_or_default();
    let rest: Vec<&str> = lines.collect();
    let explanation = if rest.is_empty() {
        None
    } else {
        Some(rest.join("\n"))
    };

    TranslationResult {
        translation,
        explanation,
    }
}

fn unquote(line: &str) -> String {
    let line = line.trim();
    let line = line.strip_prefix('"').unwrap_or(line);
    let line = line.strip_suffix('"').unwrap_or(line);
    line.trim().to_string()
}
