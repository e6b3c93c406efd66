use crate::interpreter::{FormatError, FormatterExtension, FormattingInfo};
use crate::types::Value;

/// Writes a value as text, the fallback for every placeholder.
///
/// A format with nested placeholders is evaluated with the value as its
/// current value. Otherwise the format is a numeric format spec:
///
/// | spec  | output for `1234.5`      |
/// |-------|--------------------------|
/// | `F1`  | `1234.5` (fixed point)   |
/// | `N2`  | `1,234.50` (grouped)     |
/// | `P0`  | `123450%` (percent)      |
///
/// `D<n>` zero-pads integers and `X`/`x` writes them in hex. Specs are
/// ignored for non-numeric values.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormatter;

impl FormatterExtension for DefaultFormatter {
    fn names(&self) -> &[&'static str] {
        &["default", "d", ""]
    }

    fn try_evaluate_format(&self, info: &mut FormattingInfo<'_>, output: &mut String) -> Result<bool, FormatError> {
        let format = info.format();
        if let Some(format) = format.filter(|format| format.has_nested()) {
            info.write_format(output, format, info.current_value())?;
            return Ok(true);
        }

        let spec = format.map(|format| format.literal_text()).unwrap_or_default();
        let text = match info.current_value() {
            Value::Null => info.settings().null_display.clone(),
            value if value.is_numeric() && !spec.is_empty() => {
                apply_spec(value, &spec).map_err(|message| info.format_error("default", message))?
            }
            value => value.to_string(),
        };
        info.write(output, &text);
        Ok(true)
    }
}

/// Largest precision or width a spec may request.
const MAX_PRECISION: usize = u16::MAX as usize;

/// Formats a number with a spec such as `N2`.
fn apply_spec(value: &Value, spec: &str) -> Result<String, String> {
    let mut chars = spec.chars();
    let kind = chars.next().unwrap_or('G');
    let digits = chars.as_str();
    let precision = if digits.is_empty() {
        None
    } else {
        let precision = digits
            .parse::<usize>()
            .map_err(|_| format!("unsupported format specifier '{spec}'"))?;
        if precision > MAX_PRECISION {
            return Err(format!("precision in '{spec}' exceeds {MAX_PRECISION}"));
        }
        Some(precision)
    };

    let float = value.as_float().unwrap_or_default();
    match kind {
        'F' | 'f' => Ok(format!("{:.*}", precision.unwrap_or(2), float)),
        'N' | 'n' => Ok(group_thousands(&format!("{:.*}", precision.unwrap_or(2), float))),
        'P' | 'p' => Ok(format!("{:.*}%", precision.unwrap_or(2), float * 100.0)),
        'D' | 'd' => {
            let n = integer(value, spec)?;
            let width = precision.unwrap_or(0);
            if n < 0 {
                Ok(format!("-{:0width$}", n.unsigned_abs()))
            } else {
                Ok(format!("{n:0width$}"))
            }
        }
        'X' => Ok(format!("{:0width$X}", integer(value, spec)?, width = precision.unwrap_or(0))),
        'x' => Ok(format!("{:0width$x}", integer(value, spec)?, width = precision.unwrap_or(0))),
        _ => Err(format!("unsupported format specifier '{spec}'")),
    }
}

fn integer(value: &Value, spec: &str) -> Result<i64, String> {
    value
        .as_number()
        .ok_or_else(|| format!("format specifier '{spec}' requires an integer"))
}

/// Inserts `,` between groups of three integer digits.
fn group_thousands(fixed: &str) -> String {
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(fixed.len() * 2);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let mut result = format!("{sign}{grouped}");
    if let Some(fraction) = fraction {
        result.push('.');
        result.push_str(fraction);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands("1234567.50"), "1,234,567.50");
        assert_eq!(group_thousands("-1234"), "-1,234");
        assert_eq!(group_thousands("999"), "999");
    }

    #[test]
    fn numeric_specs() {
        assert_eq!(apply_spec(&Value::Float(1234.5), "N2").unwrap(), "1,234.50");
        assert_eq!(apply_spec(&Value::Number(7), "D3").unwrap(), "007");
        assert_eq!(apply_spec(&Value::Number(255), "X").unwrap(), "FF");
        assert_eq!(apply_spec(&Value::Float(0.125), "P1").unwrap(), "12.5%");
        assert!(apply_spec(&Value::Float(1.5), "D2").is_err());
        assert!(apply_spec(&Value::Number(1), "Q").is_err());
    }

    #[test]
    fn oversized_precision_is_rejected() {
        assert!(apply_spec(&Value::Float(1.5), "F70000").is_err());
        assert!(apply_spec(&Value::Number(1), "D99999999999").is_err());
        assert_eq!(apply_spec(&Value::Float(1.5), "F3").unwrap(), "1.500");
    }
}
