//! Human-readable durations: `{elapsed:time}` writes `1 hour 30 minutes`.

use std::time::Duration;

use icu_locale_core::Locale;
use icu_plurals::PluralCategory;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::plural::plural_category;
use crate::interpreter::{ConfigError, FormatError, FormatterExtension, FormattingInfo};
use crate::types::Value;

/// A unit a duration can be broken into, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
}

impl TimeUnit {
    /// Largest first.
    const DESCENDING: [TimeUnit; 6] = [
        TimeUnit::Week,
        TimeUnit::Day,
        TimeUnit::Hour,
        TimeUnit::Minute,
        TimeUnit::Second,
        TimeUnit::Millisecond,
    ];

    fn millis(self) -> u128 {
        match self {
            TimeUnit::Millisecond => 1,
            TimeUnit::Second => 1_000,
            TimeUnit::Minute => 60_000,
            TimeUnit::Hour => 3_600_000,
            TimeUnit::Day => 86_400_000,
            TimeUnit::Week => 604_800_000,
        }
    }

    fn from_token(token: &str) -> Option<TimeUnit> {
        Some(match token {
            "w" => TimeUnit::Week,
            "d" => TimeUnit::Day,
            "h" => TimeUnit::Hour,
            "m" => TimeUnit::Minute,
            "s" => TimeUnit::Second,
            "ms" => TimeUnit::Millisecond,
            _ => return None,
        })
    }

    /// Position in the text tables, which are ordered largest first.
    fn table_index(self) -> usize {
        match self {
            TimeUnit::Week => 0,
            TimeUnit::Day => 1,
            TimeUnit::Hour => 2,
            TimeUnit::Minute => 3,
            TimeUnit::Second => 4,
            TimeUnit::Millisecond => 5,
        }
    }
}

/// Which units are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Truncation {
    /// Every non-zero unit (`auto`).
    #[default]
    Auto,
    /// Only the largest non-zero unit (`short`).
    Shortest,
    /// From the largest non-zero unit down to the smallest, zeros included (`fill`).
    Fill,
    /// Every unit in range, zeros included (`full`).
    Full,
}

/// Options for [`TimeFormatter`], parsed from words such as `abbr h m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSpanOptions {
    /// `abbr` / `noabbr`.
    pub abbreviate: bool,
    /// `less` / `noless`: write "less than 1 second" for tiny durations.
    pub less_than: bool,
    pub truncation: Truncation,
    /// Smallest unit written.
    pub range_min: TimeUnit,
    /// Largest unit written.
    pub range_max: TimeUnit,
}

impl Default for TimeSpanOptions {
    fn default() -> Self {
        Self {
            abbreviate: false,
            less_than: true,
            truncation: Truncation::Auto,
            range_min: TimeUnit::Second,
            range_max: TimeUnit::Week,
        }
    }
}

impl TimeSpanOptions {
    /// Applies whitespace-separated option words on top of `self`.
    ///
    /// Unit words (`w d h m s ms`) set the range to span the smallest and
    /// largest unit named.
    pub fn parse(mut self, text: &str) -> Result<Self, String> {
        let mut units: Vec<TimeUnit> = Vec::new();
        for token in text.split_whitespace() {
            match token.to_ascii_lowercase().as_str() {
                "abbr" => self.abbreviate = true,
                "noabbr" => self.abbreviate = false,
                "less" => self.less_than = true,
                "noless" => self.less_than = false,
                "auto" => self.truncation = Truncation::Auto,
                "short" => self.truncation = Truncation::Shortest,
                "fill" => self.truncation = Truncation::Fill,
                "full" => self.truncation = Truncation::Full,
                other => match TimeUnit::from_token(other) {
                    Some(unit) => units.push(unit),
                    None => return Err(format!("unknown time option '{token}'")),
                },
            }
        }
        if let (Some(min), Some(max)) = (units.iter().min(), units.iter().max()) {
            self.range_min = *min;
            self.range_max = *max;
        }
        Ok(self)
    }
}

/// Unit names for one language: (singular, plural, abbreviation), largest unit first.
#[derive(Debug)]
struct TimeTexts {
    language: &'static str,
    units: [(&'static str, &'static str, &'static str); 6],
    /// Contains `{}` where the smallest unit goes.
    less_than: &'static str,
}

const TIME_TEXTS: &[TimeTexts] = &[
    TimeTexts {
        language: "en",
        units: [
            ("week", "weeks", "w"),
            ("day", "days", "d"),
            ("hour", "hours", "h"),
            ("minute", "minutes", "m"),
            ("second", "seconds", "s"),
            ("millisecond", "milliseconds", "ms"),
        ],
        less_than: "less than {}",
    },
    TimeTexts {
        language: "de",
        units: [
            ("Woche", "Wochen", "W"),
            ("Tag", "Tage", "T"),
            ("Stunde", "Stunden", "Std"),
            ("Minute", "Minuten", "Min"),
            ("Sekunde", "Sekunden", "Sek"),
            ("Millisekunde", "Millisekunden", "ms"),
        ],
        less_than: "weniger als {}",
    },
    TimeTexts {
        language: "fr",
        units: [
            ("semaine", "semaines", "sem"),
            ("jour", "jours", "j"),
            ("heure", "heures", "h"),
            ("minute", "minutes", "min"),
            ("seconde", "secondes", "s"),
            ("milliseconde", "millisecondes", "ms"),
        ],
        less_than: "moins de {}",
    },
    TimeTexts {
        language: "es",
        units: [
            ("semana", "semanas", "sem"),
            ("día", "días", "d"),
            ("hora", "horas", "h"),
            ("minuto", "minutos", "min"),
            ("segundo", "segundos", "s"),
            ("milisegundo", "milisegundos", "ms"),
        ],
        less_than: "menos de {}",
    },
];

fn texts_for(language: &str) -> Result<&'static TimeTexts, ConfigError> {
    let locale: Locale = language.parse().map_err(|_| ConfigError::InvalidLanguage {
        language: language.to_string(),
    })?;
    let subtag = locale.id.language.as_str();
    TIME_TEXTS
        .iter()
        .find(|texts| texts.language == subtag)
        .ok_or_else(|| ConfigError::UnsupportedLanguage {
            component: "time formatter",
            language: language.to_string(),
            available: TIME_TEXTS.iter().map(|texts| texts.language.to_string()).collect(),
        })
}

/// Writes durations in words, e.g. `2 days 3 hours` or `2d 3h` with `abbr`.
///
/// Options come from the formatter options and the format text:
/// `{elapsed:time(abbr)}`, `{elapsed:time:noless h m}`, `{elapsed:full}`.
#[derive(Debug, Clone)]
pub struct TimeFormatter {
    texts: &'static TimeTexts,
    default_options: TimeSpanOptions,
}

impl TimeFormatter {
    /// Time formatter writing `language` unless a format call names another.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for malformed languages and languages without unit names.
    pub fn new(language: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            texts: texts_for(language)?,
            default_options: TimeSpanOptions::default(),
        })
    }

    /// Replaces the options used when a placeholder names none.
    pub fn with_options(mut self, options: TimeSpanOptions) -> Self {
        self.default_options = options;
        self
    }

    pub fn default_language(&self) -> &'static str {
        self.texts.language
    }

    /// Languages with unit names.
    pub fn supported_languages() -> Vec<&'static str> {
        TIME_TEXTS.iter().map(|texts| texts.language).collect()
    }

    /// Writes `duration` in words in the formatter's default language.
    pub fn humanize(&self, duration: Duration, options: &TimeSpanOptions) -> String {
        humanize(duration, options, self.texts)
    }

    fn texts_for_call(&self, info: &FormattingInfo<'_>) -> &'static TimeTexts {
        match info.language().map(texts_for) {
            Some(Ok(texts)) => texts,
            Some(Err(error)) => {
                debug!(%error, "falling back to the default time language");
                self.texts
            }
            None => self.texts,
        }
    }
}

impl Default for TimeFormatter {
    fn default() -> Self {
        Self {
            texts: &TIME_TEXTS[0],
            default_options: TimeSpanOptions::default(),
        }
    }
}

impl FormatterExtension for TimeFormatter {
    fn names(&self) -> &[&'static str] {
        &["time", "timespan", ""]
    }

    fn try_evaluate_format(&self, info: &mut FormattingInfo<'_>, output: &mut String) -> Result<bool, FormatError> {
        let explicit = info.formatter_name().is_some_and(|name| !name.is_empty());
        let Value::Duration(duration) = info.current_value() else {
            if explicit {
                return Err(info.format_error(
                    "time",
                    format!("expected a duration, found {}", info.current_value().type_name()),
                ));
            }
            return Ok(false);
        };
        let duration = *duration;

        let format = info.format();
        if format.is_some_and(|format| format.has_nested()) {
            if explicit {
                return Err(info.format_error("time", "the time format cannot contain placeholders"));
            }
            return Ok(false);
        }

        let mut option_text = info.formatter_options().unwrap_or("").to_string();
        if let Some(format) = format {
            option_text.push(' ');
            option_text.push_str(&format.literal_text());
        }
        let options = match self.default_options.parse(&option_text) {
            Ok(options) => options,
            Err(message) if explicit => return Err(info.format_error("time", message)),
            Err(_) => return Ok(false),
        };

        let text = humanize(duration, &options, self.texts_for_call(info));
        info.write(output, &text);
        Ok(true)
    }
}

fn humanize(duration: Duration, options: &TimeSpanOptions, texts: &TimeTexts) -> String {
    let (range_min, range_max) = if options.range_min <= options.range_max {
        (options.range_min, options.range_max)
    } else {
        (options.range_max, options.range_min)
    };
    let total = duration.as_millis();

    if total < range_min.millis() {
        if options.less_than && total > 0 {
            return texts.less_than.replacen("{}", &unit_text(1, range_min, options, texts), 1);
        }
        return unit_text(0, range_min, options, texts);
    }

    let mut remaining = total;
    let mut parts: Vec<String> = Vec::new();
    for unit in TimeUnit::DESCENDING {
        if unit > range_max || unit < range_min {
            continue;
        }
        let count = remaining.div_euclid(unit.millis());
        remaining = remaining.rem_euclid(unit.millis());
        let write = match options.truncation {
            Truncation::Full => true,
            Truncation::Fill => count > 0 || !parts.is_empty(),
            Truncation::Auto | Truncation::Shortest => count > 0,
        };
        if write {
            parts.push(unit_text(count, unit, options, texts));
            if options.truncation == Truncation::Shortest {
                break;
            }
        }
    }

    if parts.is_empty() {
        parts.push(unit_text(0, range_min, options, texts));
    }
    parts.join(" ")
}

fn unit_text(count: u128, unit: TimeUnit, options: &TimeSpanOptions, texts: &TimeTexts) -> String {
    let (one, other, short) = texts.units[unit.table_index()];
    if options.abbreviate {
        return format!("{count}{short}");
    }
    let n = i64::try_from(count).unwrap_or(i64::MAX);
    let name = if plural_category(texts.language, n) == PluralCategory::One {
        one
    } else {
        other
    };
    format!("{count} {name}")
}
