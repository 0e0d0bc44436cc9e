//! Language names and codes
//!
//! Languages are carried around by their English display name ("French"),
//! which is what goes into the prompts. Catalog metadata and plural rules need
//! the ISO 639-1 code instead.

use icu_locale::Locale;

use crate::error::ConfigError;

const LANGUAGE_CODES: &[(&str, &str)] = &[
    ("Arabic", "ar"),
    ("Bengali", "bn"),
    ("Bulgarian", "bg"),
    ("Catalan", "ca"),
    ("Chinese", "zh"),
    ("Croatian", "hr"),
    ("Czech", "cs"),
    ("Danish", "da"),
    ("Dutch", "nl"),
    ("English", "en"),
    ("Estonian", "et"),
    ("Finnish", "fi"),
    ("French", "fr"),
    ("German", "de"),
    ("Greek", "el"),
    ("Hebrew", "he"),
    ("Hindi", "hi"),
    ("Hungarian", "hu"),
    ("Indonesian", "id"),
    ("Italian", "it"),
    ("Japanese", "ja"),
    ("Korean", "ko"),
    ("Latvian", "lv"),
    ("Lithuanian", "lt"),
    ("Malay", "ms"),
    ("Malayalam", "ml"),
    ("Norwegian", "no"),
    ("Persian", "fa"),
    ("Polish", "pl"),
    ("Portuguese", "pt"),
    ("Romanian", "ro"),
    ("Russian", "ru"),
    ("Serbian", "sr"),
    ("Slovak", "sk"),
    ("Slovenian", "sl"),
    ("Spanish", "es"),
    ("Swahili", "sw"),
    ("Swedish", "sv"),
    ("Tamil", "ta"),
    ("Thai", "th"),
    ("Turkish", "tr"),
    ("Ukrainian", "uk"),
    ("Urdu", "ur"),
    ("Vietnamese", "vi"),
];

/// Return the two-letter code for a language name.
///
/// The lookup ignores ASCII case, so "french" and "French" both give "fr". A
/// known code is returned as is.
pub fn language_code(name: &str) -> Result<&'static str, ConfigError> {
    let name = name.trim();
    LANGUAGE_CODES
        .iter()
        .find(|(n, code)| n.eq_ignore_ascii_case(name) || code.eq_ignore_ascii_case(name))
        .map(|(_, code)| *code)
        .ok_or_else(|| ConfigError::UnknownLanguage(name.to_string()))
}

/// Resolve a language name into an ICU locale
pub fn language_locale(name: &str) -> Result<Locale, ConfigError> {
    let code = language_code(name)?;
    code.parse::<Locale>().map_err(|e| {
        ConfigError::Invalid(format!(
            "language code '{}' for {} is not a valid locale: {}",
            code, name, e
        ))
    })
}

/// Reverse lookup of [`language_code`]
pub fn language_name(code: &str) -> Option<&'static str> {
    let code = code.trim();
    LANGUAGE_CODES
        .iter()
        .find(|(_, c)| c.eq_ignore_ascii_case(code))
        .map(|(name, _)| *name)
}

/// The display name for a language given by name in any case, or by code.
///
/// `"italian"`, `"Italian"` and `"it"` all give `"Italian"`, the spelling the
/// calibration examples are keyed by.
pub fn canonical_language_name(language: &str) -> Result<&'static str, ConfigError> {
    let language = language.trim();
    LANGUAGE_CODES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(language))
        .map(|(name, _)| *name)
        .or_else(|| language_name(language))
        .ok_or_else(|| ConfigError::UnknownLanguage(language.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_languages() {
        assert_eq!(language_code("English").unwrap(), "en");
        assert_eq!(language_code("French").unwrap(), "fr");
        assert_eq!(language_code("Portuguese").unwrap(), "pt");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(language_code("italian").unwrap(), "it");
        assert_eq!(language_code(" GERMAN ").unwrap(), "de");
        assert_eq!(language_code("IT").unwrap(), "it");
    }

    #[test]
    fn test_unknown_language() {
        assert_eq!(
            language_code("Klingon"),
            Err(ConfigError::UnknownLanguage("Klingon".to_string()))
        );
    }

    #[test]
    fn test_every_code_is_a_valid_locale() {
        for (name, _) in LANGUAGE_CODES {
            assert!(language_locale(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_reverse_lookup() {
        assert_eq!(language_name("es"), Some("Spanish"));
        assert_eq!(language_name("xx"), None);
    }

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_language_name("italian").unwrap(), "Italian");
        assert_eq!(canonical_language_name(" PT ").unwrap(), "Portuguese");
        assert_eq!(canonical_language_name("German").unwrap(), "German");
        assert_eq!(
            canonical_language_name("xx"),
            Err(ConfigError::UnknownLanguage("xx".to_string()))
        );
    }
}
