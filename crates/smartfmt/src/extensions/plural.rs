//! CLDR plural category resolution and the plural formatter.
//!
//! Different languages have different plural rules - English has "one" and
//! "other", while Russian has "one", "few", "many", and "other", and Arabic
//! uses all six categories.
//!
//! Plural rules are cached per thread per language to avoid re-creating
//! `PluralRules` instances on every call. The cache is initialized lazily
//! on first access within each thread.

use std::cell::RefCell;

use icu_locale_core::Locale;
use icu_plurals::{PluralCategory, PluralRuleType, PluralRules};
use tracing::debug;

use crate::interpreter::{ConfigError, FormatError, FormatterExtension, FormattingInfo};
use crate::types::Value;

/// Languages with plural rules, by primary language subtag.
const SUPPORTED_LANGUAGES: &[&str] = &[
    "ar", "bg", "bn", "ca", "cs", "da", "de", "el", "en", "es", "et", "fa", "fi", "fr", "he", "hi",
    "hr", "hu", "id", "it", "ja", "ko", "lt", "lv", "nb", "nl", "pl", "pt", "ro", "ru", "sk", "sl",
    "sr", "sv", "th", "tr", "uk", "vi", "zh",
];

thread_local! {
    /// Per-thread cache of `PluralRules` keyed by language subtag.
    static PLURAL_RULES_CACHE: RefCell<Vec<(&'static str, PluralRules)>> = const { RefCell::new(Vec::new()) };
}

/// Resolve a language code such as `en-US` or `ru` to a supported subtag.
fn normalize_lang(lang: &str) -> Result<&'static str, ConfigError> {
    let locale: Locale = lang.parse().map_err(|_| ConfigError::InvalidLanguage {
        language: lang.to_string(),
    })?;
    let subtag = locale.id.language.as_str();
    SUPPORTED_LANGUAGES
        .iter()
        .find(|&&code| code == subtag)
        .copied()
        .ok_or_else(|| ConfigError::UnsupportedLanguage {
            component: "plural formatter",
            language: lang.to_string(),
            available: SUPPORTED_LANGUAGES.iter().map(|code| (*code).to_string()).collect(),
        })
}

/// Build `PluralRules` for a normalized language subtag.
fn build_rules(lang: &'static str) -> Result<PluralRules, ConfigError> {
    let invalid = || ConfigError::InvalidLanguage {
        language: lang.to_string(),
    };
    let locale: Locale = lang.parse().map_err(|_| invalid())?;
    PluralRules::try_new(locale.into(), PluralRuleType::Cardinal.into()).map_err(|_| invalid())
}

fn with_rules<T>(lang: &'static str, f: impl FnOnce(&PluralRules) -> T) -> Result<T, ConfigError> {
    PLURAL_RULES_CACHE.with_borrow_mut(|cache| {
        if let Some((_, rules)) = cache.iter().find(|(code, _)| *code == lang) {
            return Ok(f(rules));
        }
        let rules = build_rules(lang)?;
        let result = f(&rules);
        cache.push((lang, rules));
        Ok(result)
    })
}

/// Get the CLDR plural category for an integer in a given language.
///
/// Unknown languages use English rules.
///
/// # Examples
///
/// ```
/// use icu_plurals::PluralCategory;
/// use smartfmt::extensions::plural_category;
///
/// // English: 1 = "one", everything else = "other"
/// assert_eq!(plural_category("en", 1), PluralCategory::One);
/// assert_eq!(plural_category("en", 2), PluralCategory::Other);
///
/// // Russian: complex rules for "one", "few", "many", and "other"
/// assert_eq!(plural_category("ru", 2), PluralCategory::Few);
/// assert_eq!(plural_category("ru", 5), PluralCategory::Many);
/// ```
pub fn plural_category(lang: &str, n: i64) -> PluralCategory {
    let lang = normalize_lang(lang).unwrap_or("en");
    with_rules(lang, |rules| rules.category_for(n)).unwrap_or(PluralCategory::Other)
}

/// Categories used by `lang`, in CLDR order: zero, one, two, few, many, other.
fn categories(lang: &'static str) -> Result<Vec<PluralCategory>, ConfigError> {
    with_rules(lang, |rules| {
        let mut categories: Vec<PluralCategory> = rules.categories().collect();
        categories.sort_by_key(|category| category_rank(*category));
        categories
    })
}

fn category_rank(category: PluralCategory) -> u8 {
    match category {
        PluralCategory::Zero => 0,
        PluralCategory::One => 1,
        PluralCategory::Two => 2,
        PluralCategory::Few => 3,
        PluralCategory::Many => 4,
        PluralCategory::Other => 5,
    }
}

/// Picks a plural form: `{count:plural:item|items}`.
///
/// The forms map in order to the categories the language uses; one extra
/// leading form is written for zero. The language comes from the options
/// (`plural(ru)`), then the language of the format call, then the
/// formatter's default.
#[derive(Debug, Clone)]
pub struct PluralFormatter {
    default_language: &'static str,
}

impl PluralFormatter {
    /// Plural formatter defaulting to `language`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `language` is malformed or has no plural rules.
    pub fn new(language: &str) -> Result<Self, ConfigError> {
        let default_language = normalize_lang(language)?;
        build_rules(default_language)?;
        Ok(Self { default_language })
    }

    pub fn default_language(&self) -> &str {
        self.default_language
    }

    fn language_for(&self, info: &FormattingInfo<'_>) -> Result<&'static str, FormatError> {
        if let Some(options) = info.formatter_options().map(str::trim).filter(|o| !o.is_empty()) {
            return normalize_lang(options).map_err(|error| info.format_error("plural", error.to_string()));
        }
        if let Some(language) = info.language() {
            match normalize_lang(language) {
                Ok(language) => return Ok(language),
                Err(error) => debug!(%error, "falling back to the default plural language"),
            }
        }
        Ok(self.default_language)
    }
}

impl Default for PluralFormatter {
    fn default() -> Self {
        Self {
            default_language: "en",
        }
    }
}

impl FormatterExtension for PluralFormatter {
    fn names(&self) -> &[&'static str] {
        &["plural", "p", ""]
    }

    fn try_evaluate_format(&self, info: &mut FormattingInfo<'_>, output: &mut String) -> Result<bool, FormatError> {
        let explicit = info.formatter_name().is_some_and(|name| !name.is_empty());
        let Some(format) = info.format() else {
            return Ok(false);
        };
        let (category_number, is_zero) = match info.current_value() {
            Value::Number(n) => (Some(*n), *n == 0),
            Value::Float(f) => (plural_integer(*f), *f == 0.0),
            Value::List(items) => {
                let len = i64::try_from(items.len()).unwrap_or(i64::MAX);
                (Some(len), len == 0)
            }
            _ => return Ok(false),
        };

        let forms = format.split('|');
        if forms.len() == 1 {
            return Ok(false);
        }
        if !explicit && starts_with_condition(forms[0].raw_text()) {
            return Ok(false);
        }

        let language = self.language_for(info)?;
        let categories = categories(language).map_err(|error| info.format_error("plural", error.to_string()))?;
        let category = match category_number {
            Some(n) => with_rules(language, |rules| rules.category_for(n))
                .map_err(|error| info.format_error("plural", error.to_string()))?,
            None => PluralCategory::Other,
        };
        let position = categories
            .iter()
            .position(|c| *c == category)
            .unwrap_or(categories.len().saturating_sub(1));

        let form = if forms.len() == categories.len() {
            &forms[position]
        } else if forms.len() == categories.len() + 1 {
            if is_zero { &forms[0] } else { &forms[position + 1] }
        } else if explicit {
            return Err(info.format_error(
                "plural",
                format!(
                    "expected {} or {} plural forms for language '{language}', found {}",
                    categories.len(),
                    categories.len() + 1,
                    forms.len()
                ),
            ));
        } else {
            return Ok(false);
        };

        info.write_format(output, form, info.current_value())?;
        Ok(true)
    }
}

/// Whole floats use integer rules; fractions are always "other".
fn plural_integer(f: f64) -> Option<i64> {
    if f.fract() == 0.0 && f.abs() < 9.0e15 {
        Some(f as i64)
    } else {
        None
    }
}

/// Whether a form starts like a conditional branch, e.g. `>=21?`.
fn starts_with_condition(text: &str) -> bool {
    text.starts_with(['<', '>', '=', '!']) && text.contains('?')
}
