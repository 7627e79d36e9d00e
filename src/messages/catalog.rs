use std::borrow::Cow;
use std::collections::HashMap;

/// Culture every lookup falls back to.
pub const FALLBACK_CULTURE: &str = "en";

/// Message for an instance that is absent altogether.
pub const NULL_INSTANCE_MESSAGE: &str = "Cannot validate an absent instance.";

/// Message for an instance a pre-validation hook rejected without adding its own failure.
pub const PRE_VALIDATE_MESSAGE: &str = "The instance was rejected before validation.";

const BUILT_IN_EN: &[(&str, &str)] = &[
    ("not_null", "'{PropertyName}' must not be null."),
    ("null", "'{PropertyName}' must be null."),
    ("not_empty", "'{PropertyName}' must not be empty."),
    ("empty", "'{PropertyName}' must be empty."),
    ("equal", "'{PropertyName}' must be equal to '{ComparisonValue}'."),
    ("not_equal", "'{PropertyName}' must not be equal to '{ComparisonValue}'."),
    (
        "length",
        "'{PropertyName}' must be between {MinLength} and {MaxLength} characters. You entered {TotalLength} characters.",
    ),
    (
        "min_length",
        "The length of '{PropertyName}' must be at least {MinLength} characters. You entered {TotalLength} characters.",
    ),
    (
        "max_length",
        "The length of '{PropertyName}' must be {MaxLength} characters or fewer. You entered {TotalLength} characters.",
    ),
    ("greater_than", "'{PropertyName}' must be greater than '{ComparisonValue}'."),
    (
        "greater_than_or_equal",
        "'{PropertyName}' must be greater than or equal to '{ComparisonValue}'.",
    ),
    ("less_than", "'{PropertyName}' must be less than '{ComparisonValue}'."),
    ("less_than_or_equal", "'{PropertyName}' must be less than or equal to '{ComparisonValue}'."),
    (
        "inclusive_between",
        "'{PropertyName}' must be between {From} and {To}. You entered {PropertyValue}.",
    ),
    ("matches", "'{PropertyName}' is not in the correct format."),
    ("must", "The specified condition was not met for '{PropertyName}'."),
    ("null_instance", NULL_INSTANCE_MESSAGE),
    ("pre_validate", PRE_VALIDATE_MESSAGE),
];

/// Source of default message templates, keyed by culture and check key.
///
/// The catalog is consulted once per check when a validator is built. Keys are the
/// snake-case check names (`not_null`, `length`, ...) that also serve as default error codes.
pub trait MessageCatalog: Send + Sync {
    /// Returns the template for `key` in `culture`, or `None` when the catalog has none.
    fn template(&self, culture: Option<&str>, key: &str) -> Option<Cow<'_, str>>;
}

/// Default catalog: the built-in English templates plus per-culture translations.
///
/// Lookups try the exact culture (`en-GB`), then its language (`en`), then the built-in
/// English table. Culture names compare case-insensitively.
///
/// # Examples
///
/// ```
/// use rule_rail::messages::{LanguageManager, MessageCatalog};
///
/// let catalog = LanguageManager::new()
///     .with_translation("en", "not_null", "'{PropertyName}' is required.");
///
/// assert_eq!(
///     catalog.template(Some("en-GB"), "not_null").as_deref(),
///     Some("'{PropertyName}' is required.")
/// );
/// assert_eq!(
///     catalog.template(Some("fr"), "not_empty").as_deref(),
///     Some("'{PropertyName}' must not be empty.")
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct LanguageManager {
    translations: HashMap<String, HashMap<String, String>>,
}

impl LanguageManager {
    /// Creates a catalog with only the built-in English templates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the template for `key` in `culture`.
    pub fn add_translation(
        &mut self,
        culture: impl AsRef<str>,
        key: impl Into<String>,
        template: impl Into<String>,
    ) {
        self.translations
            .entry(culture.as_ref().to_ascii_lowercase())
            .or_default()
            .insert(key.into(), template.into());
    }

    /// Builder form of [`add_translation`](Self::add_translation).
    #[must_use]
    pub fn with_translation(
        mut self,
        culture: impl AsRef<str>,
        key: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        self.add_translation(culture, key, template);
        self
    }

    /// Looks up `key`, falling back through the culture chain to the built-in table.
    pub fn get_string(&self, culture: Option<&str>, key: &str) -> Option<&str> {
        let culture = culture.map(str::to_ascii_lowercase);
        let language = culture
            .as_deref()
            .and_then(|c| c.split_once('-').map(|(language, _)| language.to_string()));

        let found = [culture.as_deref(), language.as_deref(), Some(FALLBACK_CULTURE)]
            .into_iter()
            .flatten()
            .find_map(|c| self.translations.get(c).and_then(|table| table.get(key)))
            .map(String::as_str)
            .or_else(|| built_in(key));
        found
    }
}

impl MessageCatalog for LanguageManager {
    fn template(&self, culture: Option<&str>, key: &str) -> Option<Cow<'_, str>> {
        self.get_string(culture, key).map(Cow::Borrowed)
    }
}

fn built_in(key: &str) -> Option<&'static str> {
    BUILT_IN_EN.iter().find(|(k, _)| *k == key).map(|(_, template)| *template)
}
