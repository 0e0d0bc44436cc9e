use icu_locale::Locale;
use icu_plurals::{PluralCategory, PluralRuleType, PluralRules};

use crate::error::ConfigError;
use crate::language::{language_code, language_locale};

/// Slot count used when a language's rules cannot be loaded
pub const DEFAULT_PLURAL_SLOTS: usize = 2;

/// Get the CLDR cardinal categories used by a locale.
///
/// Each category is probed with a handful of representative numbers, so the
/// result lists only the categories the language actually selects:
/// - English: one, other
/// - Russian: one, few, many
/// - Japanese: other
///
/// # Errors
/// Returns an error if plural rules cannot be loaded for the locale
pub fn plural_categories(locale: &Locale) -> Result<Vec<PluralCategory>, ConfigError> {
    let pr = PluralRules::try_new(locale.clone().into(), PluralRuleType::Cardinal.into())
        .map_err(|e| {
            ConfigError::Invalid(format!(
                "failed to load plural rules for locale '{}': {}",
                locale, e
            ))
        })?;

    let test_values_by_category = [
        (PluralCategory::Zero, vec![0usize]),
        (PluralCategory::One, vec![1, 21, 31, 41]),
        (PluralCategory::Two, vec![2, 22, 32]),
        (PluralCategory::Few, vec![3, 4, 23, 24]),
        (PluralCategory::Many, vec![5, 11, 101]),
        (PluralCategory::Other, vec![6, 7, 8, 9, 10, 25, 100, 1000]),
    ];

    let mut categories = Vec::new();
    for (expected, test_values) in test_values_by_category.iter() {
        if test_values.iter().any(|&v| pr.category_for(v) == *expected) {
            categories.push(*expected);
        }
    }

    Ok(categories)
}

/// Number of `msgstr[N]` slots to create for a plural entry in `language`.
///
/// gettext always distinguishes at least singular and plural, so languages
/// with a single category still get two slots.
pub fn plural_slot_count(language: &str) -> usize {
    let count = language_locale(language)
        .and_then(|locale| plural_categories(&locale))
        .map(|categories| categories.len())
        .unwrap_or(DEFAULT_PLURAL_SLOTS);
    count.max(DEFAULT_PLURAL_SLOTS)
}

const SINGLE_FORM: &str = "nplurals=2; plural=0;";
const ONE_OTHER: &str = "nplurals=2; plural=(n != 1);";
const ZERO_ONE_OTHER: &str = "nplurals=2; plural=(n > 1);";
const EAST_SLAVIC: &str = "nplurals=3; plural=(n%10==1 && n%100!=11 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2);";

/// gettext `Plural-Forms` expressions, keyed by language code. Languages
/// without plurals still get two slots, both selected as slot 0.
const PLURAL_FORMS: &[(&str, &str)] = &[
    ("ar", "nplurals=6; plural=(n==0 ? 0 : n==1 ? 1 : n==2 ? 2 : n%100>=3 && n%100<=10 ? 3 : n%100>=11 ? 4 : 5);"),
    ("bg", ONE_OTHER),
    ("bn", ZERO_ONE_OTHER),
    ("ca", ONE_OTHER),
    ("cs", "nplurals=3; plural=(n==1 ? 0 : n>=2 && n<=4 ? 1 : 2);"),
    ("da", ONE_OTHER),
    ("de", ONE_OTHER),
    ("el", ONE_OTHER),
    ("en", ONE_OTHER),
    ("es", ONE_OTHER),
    ("et", ONE_OTHER),
    ("fa", ZERO_ONE_OTHER),
    ("fi", ONE_OTHER),
    ("fr", ZERO_ONE_OTHER),
    ("he", "nplurals=3; plural=(n==1 ? 0 : n==2 ? 1 : 2);"),
    ("hi", ZERO_ONE_OTHER),
    ("hr", EAST_SLAVIC),
    ("hu", ONE_OTHER),
    ("id", SINGLE_FORM),
    ("it", ONE_OTHER),
    ("ja", SINGLE_FORM),
    ("ko", SINGLE_FORM),
    ("lt", "nplurals=3; plural=(n%10==1 && n%100!=11 ? 0 : n%10>=2 && (n%100<10 || n%100>=20) ? 1 : 2);"),
    ("lv", "nplurals=3; plural=(n%10==1 && n%100!=11 ? 0 : n != 0 ? 1 : 2);"),
    ("ml", ONE_OTHER),
    ("ms", SINGLE_FORM),
    ("nl", ONE_OTHER),
    ("no", ONE_OTHER),
    ("pl", "nplurals=3; plural=(n==1 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2);"),
    ("pt", ZERO_ONE_OTHER),
    ("ro", "nplurals=3; plural=(n==1 ? 0 : (n==0 || (n%100>0 && n%100<20)) ? 1 : 2);"),
    ("ru", EAST_SLAVIC),
    ("sk", "nplurals=3; plural=(n==1 ? 0 : n>=2 && n<=4 ? 1 : 2);"),
    ("sl", "nplurals=4; plural=(n%100==1 ? 0 : n%100==2 ? 1 : n%100==3 || n%100==4 ? 2 : 3);"),
    ("sr", EAST_SLAVIC),
    ("sv", ONE_OTHER),
    ("sw", ONE_OTHER),
    ("ta", ONE_OTHER),
    ("th", SINGLE_FORM),
    ("tr", ONE_OTHER),
    ("uk", EAST_SLAVIC),
    ("ur", ONE_OTHER),
    ("vi", SINGLE_FORM),
    ("zh", SINGLE_FORM),
];

/// `Plural-Forms` header value for `language`, whose `nplurals` is
/// [`plural_slot_count`]
pub fn plural_forms(language: &str) -> Option<&'static str> {
    let code = language_code(language).ok()?;
    PLURAL_FORMS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, forms)| *forms)
}

/// The `nplurals` value of a `Plural-Forms` header
pub fn nplurals(plural_forms: &str) -> Option<usize> {
    plural_forms
        .split(';')
        .filter_map(|part| part.trim().strip_prefix("nplurals"))
        .filter_map(|rest| rest.trim_start().strip_prefix('='))
        .find_map(|value| value.trim().parse().ok())
}
