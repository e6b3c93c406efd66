use serde::{Deserialize, Serialize};

use crate::interpreter::{FormatError, FormatterExtension, FormattingInfo};

/// What [`SubStringFormatter`] does when the requested range leaves the string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubStringOutOfRange {
    /// Write nothing.
    #[default]
    ReturnEmptyString,
    /// Write from the (clamped) start to the end of the string.
    ReturnStartIndexToEndOfString,
    /// Fail the placeholder.
    ThrowError,
}

/// Writes part of the value's text: `{name:substr(0,3)}`.
///
/// Options are `start[,length]`, counted in characters. A negative start
/// counts from the end; a negative length stops that many characters
/// before the end.
#[derive(Debug, Clone)]
pub struct SubStringFormatter {
    pub out_of_range: SubStringOutOfRange,
    /// Written for `Null` values.
    pub null_display: String,
}

impl Default for SubStringFormatter {
    fn default() -> Self {
        Self {
            out_of_range: SubStringOutOfRange::default(),
            null_display: "(null)".to_string(),
        }
    }
}

impl SubStringFormatter {
    pub fn new(out_of_range: SubStringOutOfRange) -> Self {
        Self {
            out_of_range,
            ..Self::default()
        }
    }
}

impl FormatterExtension for SubStringFormatter {
    fn names(&self) -> &[&'static str] {
        &["substr"]
    }

    fn try_evaluate_format(&self, info: &mut FormattingInfo<'_>, output: &mut String) -> Result<bool, FormatError> {
        let options = info.formatter_options().unwrap_or("");
        let mut parts = options.split(',').map(str::trim);
        let start = parts
            .next()
            .filter(|start| !start.is_empty())
            .ok_or_else(|| info.format_error("substr", "missing start index"))?;
        let start: i64 = start
            .parse()
            .map_err(|_| info.format_error("substr", format!("invalid start index '{start}'")))?;
        let length: Option<i64> = parts
            .next()
            .map(|length| {
                length
                    .parse()
                    .map_err(|_| info.format_error("substr", format!("invalid length '{length}'")))
            })
            .transpose()?;

        if info.current_value().is_null() {
            info.write(output, &self.null_display);
            return Ok(true);
        }

        let text = info.current_value().to_string();
        let chars: Vec<char> = text.chars().collect();
        let len = i64::try_from(chars.len()).unwrap_or(i64::MAX);

        let start = if start < 0 { len.checked_add(start) } else { Some(start) };
        let end = match length {
            None => Some(len),
            Some(length) if length < 0 => len.checked_add(length),
            Some(length) => start.and_then(|start| start.checked_add(length)),
        };
        // Arithmetic overflow counts as out of range.
        let range = match (start, end) {
            (Some(start), Some(end)) if 0 <= start && start <= end && end <= len => (start, end),
            _ => match self.out_of_range {
                SubStringOutOfRange::ReturnEmptyString => {
                    info.write(output, "");
                    return Ok(true);
                }
                SubStringOutOfRange::ReturnStartIndexToEndOfString => (start.unwrap_or(0).clamp(0, len), len),
                SubStringOutOfRange::ThrowError => {
                    return Err(info.format_error(
                        "substr",
                        format!("range {options} is outside of '{text}' ({len} characters)"),
                    ));
                }
            },
        };

        let start = usize::try_from(range.0).unwrap_or(0);
        let end = usize::try_from(range.1).unwrap_or(chars.len());
        let substring: String = chars[start..end.min(chars.len()).max(start)].iter().collect();
        info.write(output, &substring);
        Ok(true)
    }
}
