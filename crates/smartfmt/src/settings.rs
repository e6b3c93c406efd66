//! Parser and formatter configuration.
//!
//! Settings are plain data: they can be built with [`SmartSettings::builder`]
//! or deserialized from JSON, and are fixed for the lifetime of a
//! [`SmartFormatter`](crate::SmartFormatter).

use bon::Builder;
use icu_casemap::CaseMapper;
use serde::{Deserialize, Serialize};

/// What happens when a template fails to parse or a placeholder fails to format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorAction {
    /// Drop the failing piece and keep going.
    Ignore,
    /// Write the error message where the failing piece would have been.
    OutputErrorInResult,
    /// Return the error to the caller.
    #[default]
    ThrowError,
    /// Write the original placeholder text back into the output.
    MaintainTokens,
}

/// How names (formatter names, dictionary keys, variables) are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseSensitivity {
    #[default]
    CaseSensitive,
    CaseInsensitive,
}

impl CaseSensitivity {
    /// Compare two names under this sensitivity.
    ///
    /// Case-insensitive comparison uses full Unicode case folding.
    pub fn matches(self, left: &str, right: &str) -> bool {
        match self {
            CaseSensitivity::CaseSensitive => left == right,
            CaseSensitivity::CaseInsensitive => {
                if left.is_ascii() && right.is_ascii() {
                    return left.eq_ignore_ascii_case(right);
                }
                let mapper = CaseMapper::new();
                mapper.fold_string(left) == mapper.fold_string(right)
            }
        }
    }
}

/// Settings that control how template text is scanned.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(on(String, into))]
#[serde(default)]
pub struct ParserSettings {
    /// Character that opens a placeholder.
    #[builder(default = '{')]
    pub opening_brace: char,

    /// Character that closes a placeholder.
    #[builder(default = '}')]
    pub closing_brace: char,

    /// Escape braces with [`escape_char`](Self::escape_char) instead of
    /// doubling them.
    #[builder(default)]
    pub alternative_escaping: bool,

    /// Escape character for `\{`, `\}` and character literals such as `\n`.
    #[builder(default = '\\')]
    pub escape_char: char,

    /// Decode character literals (`\n`, `\t`, `\u00e9`, ...) in literal text.
    #[builder(default = true)]
    pub convert_character_literals: bool,

    /// Allow ASCII letters in selectors. Digits are always allowed.
    #[builder(default = true)]
    pub alphanumeric_selectors: bool,

    /// Extra characters allowed inside selector names.
    #[builder(default = "_-".to_string())]
    pub selector_chars: String,

    /// Characters that separate selectors in a chain.
    #[builder(default = ".,[]".to_string())]
    pub operator_chars: String,

    /// What to do when a template has parse issues.
    #[builder(default)]
    pub parse_error_action: ErrorAction,
}

impl Default for ParserSettings {
    fn default() -> Self {
        ParserSettings::builder().build()
    }
}

impl ParserSettings {
    /// Whether `c` may appear inside a selector name.
    pub fn is_selector_char(&self, c: char) -> bool {
        c.is_ascii_digit()
            || (self.alphanumeric_selectors && c.is_ascii_alphabetic())
            || self.selector_chars.contains(c)
    }

    /// Whether `c` separates selectors.
    pub fn is_operator_char(&self, c: char) -> bool {
        self.operator_chars.contains(c)
    }
}

/// Settings for a [`SmartFormatter`](crate::SmartFormatter).
///
/// # Example
///
/// ```
/// use smartfmt::{ErrorAction, SmartSettings};
///
/// let settings = SmartSettings::builder()
///     .format_error_action(ErrorAction::MaintainTokens)
///     .build();
/// assert_eq!(settings.parser.opening_brace, '{');
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(on(String, into))]
#[serde(default)]
pub struct SmartSettings {
    /// Scanner configuration.
    #[builder(default)]
    pub parser: ParserSettings,

    /// What to do when a placeholder cannot be formatted.
    #[builder(default)]
    pub format_error_action: ErrorAction,

    /// How formatter names, dictionary keys and variables are compared.
    #[builder(default)]
    pub case_sensitivity: CaseSensitivity,

    /// Text written for [`Value::Null`](crate::Value::Null) by the default formatter.
    #[builder(default)]
    pub null_display: String,

    /// Maximum number of parsed templates kept by the template cache.
    /// `None` keeps every template.
    pub cache_capacity: Option<usize>,
}

impl Default for SmartSettings {
    fn default() -> Self {
        SmartSettings::builder().build()
    }
}
