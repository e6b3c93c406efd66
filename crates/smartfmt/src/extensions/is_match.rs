use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use regex::Regex;

use crate::interpreter::{FormatError, FormatterExtension, FormattingInfo};

const COMPILED_PATTERNS: NonZeroUsize = NonZeroUsize::MIN.saturating_add(63);

/// Branches on a regular expression: `{code:ismatch(^\d+$):digits|other}`.
///
/// The value's text is matched against the pattern in the options; the
/// first part is written on a match and the second otherwise.
pub struct IsMatchFormatter {
    patterns: Mutex<LruCache<String, Regex>>,
}

impl Default for IsMatchFormatter {
    fn default() -> Self {
        Self {
            patterns: Mutex::new(LruCache::new(COMPILED_PATTERNS)),
        }
    }
}

impl IsMatchFormatter {
    fn regex(&self, pattern: &str) -> Result<Regex, regex::Error> {
        let mut patterns = self.patterns.lock();
        if let Some(regex) = patterns.get(pattern) {
            return Ok(regex.clone());
        }
        let regex = Regex::new(pattern)?;
        patterns.put(pattern.to_string(), regex.clone());
        Ok(regex)
    }
}

impl FormatterExtension for IsMatchFormatter {
    fn names(&self) -> &[&'static str] {
        &["ismatch"]
    }

    fn try_evaluate_format(&self, info: &mut FormattingInfo<'_>, output: &mut String) -> Result<bool, FormatError> {
        let Some(pattern) = info.formatter_options().filter(|pattern| !pattern.is_empty()) else {
            return Err(info.format_error("ismatch", "missing regular expression"));
        };
        let parts = info.format().map(|format| format.split('|')).unwrap_or_default();
        if parts.len() != 2 {
            return Err(info.format_error(
                "ismatch",
                format!("expected 2 choices (match|no match), found {}", parts.len()),
            ));
        }
        let regex = self
            .regex(pattern)
            .map_err(|error| info.format_error("ismatch", format!("invalid pattern: {error}")))?;

        let text = info.current_value().to_string();
        let part = if regex.is_match(&text) { &parts[0] } else { &parts[1] };
        info.write_format(output, part, info.current_value())?;
        Ok(true)
    }
}
