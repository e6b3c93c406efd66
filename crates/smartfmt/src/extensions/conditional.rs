//! Branch selection by value: `{age:>=55?Senior|>=21?Adult|Minor}`.

use winnow::combinator::{alt, repeat};
use winnow::prelude::*;
use winnow::token::take_while;

use crate::interpreter::{FormatError, FormatterExtension, FormattingInfo};
use crate::parser::Format;
use crate::types::Value;

/// Picks one of the `|`-separated parts of the format based on the value.
///
/// Numbers either follow conditions (`>=21&<30?`, with `&` for and, `/` for
/// or, and the operators `< <= > >= = == ! !=`) or select a part by index:
/// negative numbers pick the last part, others the part at their floor,
/// clamped to the last. Other values:
///
/// | value               | parts                      |
/// |---------------------|----------------------------|
/// | bool                | `true\|false`              |
/// | string, list, null  | `non-empty\|empty`         |
/// | duration            | `zero\|non-zero` or `negative\|zero\|positive` |
/// | map, group          | always the first part      |
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionalFormatter;

impl FormatterExtension for ConditionalFormatter {
    fn names(&self) -> &[&'static str] {
        &["conditional", "cond", ""]
    }

    fn try_evaluate_format(&self, info: &mut FormattingInfo<'_>, output: &mut String) -> Result<bool, FormatError> {
        let Some(format) = info.format() else {
            return Ok(false);
        };
        let parts = format.split('|');
        // A single part is only a branch when it is a condition on a number.
        if parts.len() == 1
            && !(info.current_value().is_numeric() && parse_condition(parts[0].raw_text()).is_some())
        {
            return Ok(false);
        }
        let last = parts.len() - 1;

        let index = match info.current_value() {
            Value::Number(n) => {
                let n = *n as f64;
                if let Some(chosen) = evaluate_conditions(&parts, n) {
                    if let Some(part) = chosen {
                        info.write_format(output, &part, info.current_value())?;
                    }
                    return Ok(true);
                }
                number_index(n, last)
            }
            Value::Float(f) => {
                if let Some(chosen) = evaluate_conditions(&parts, *f) {
                    if let Some(part) = chosen {
                        info.write_format(output, &part, info.current_value())?;
                    }
                    return Ok(true);
                }
                number_index(*f, last)
            }
            Value::Bool(b) => usize::from(!*b),
            Value::String(s) => usize::from(s.is_empty()),
            Value::List(items) => usize::from(items.is_empty()),
            Value::Null => 1,
            Value::Duration(d) => {
                let zero = d.is_zero();
                if parts.len() >= 3 {
                    if zero { 1 } else { 2 }
                } else {
                    usize::from(!zero)
                }
            }
            Value::Map(_) | Value::Group(_) => 0,
        };

        info.write_format(output, &parts[index.min(last)], info.current_value())?;
        Ok(true)
    }
}

fn number_index(n: f64, last: usize) -> usize {
    if n < 0.0 {
        last
    } else {
        let floor = n.floor();
        if floor >= last as f64 { last } else { floor as usize }
    }
}

/// Evaluates conditional parts in order.
///
/// Returns `None` when the first part has no condition (index mode),
/// `Some(None)` when no branch matched, and `Some(Some(part))` with the
/// chosen text otherwise. A part without a condition is an unconditional
/// else branch.
fn evaluate_conditions(parts: &[Format], value: f64) -> Option<Option<Format>> {
    parse_condition(parts.first()?.raw_text())?;
    for part in parts {
        match parse_condition(part.raw_text()) {
            Some((chain, consumed)) => {
                if chain.matches(value) {
                    return Some(Some(part.substring(consumed)));
                }
            }
            None => return Some(Some(part.clone())),
        }
    }
    Some(None)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Comparison {
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Equal,
    NotEqual,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Combinator {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
struct ConditionChain {
    first: (Comparison, f64),
    rest: Vec<(Combinator, (Comparison, f64))>,
}

impl ConditionChain {
    /// Combines comparisons left to right, without precedence.
    fn matches(&self, value: f64) -> bool {
        let mut result = compare(self.first, value);
        for &(combinator, comparison) in &self.rest {
            let next = compare(comparison, value);
            result = match combinator {
                Combinator::And => result && next,
                Combinator::Or => result || next,
            };
        }
        result
    }
}

fn compare((comparison, operand): (Comparison, f64), value: f64) -> bool {
    match comparison {
        Comparison::Less => value < operand,
        Comparison::LessOrEqual => value <= operand,
        Comparison::Greater => value > operand,
        Comparison::GreaterOrEqual => value >= operand,
        Comparison::Equal => value == operand,
        Comparison::NotEqual => value != operand,
    }
}

/// Parses a leading condition such as `>=21&<30?`, returning it and the
/// number of bytes it spans.
fn parse_condition(text: &str) -> Option<(ConditionChain, usize)> {
    let mut input = text;
    let chain = condition_chain.parse_next(&mut input).ok()?;
    Some((chain, text.len() - input.len()))
}

fn condition_chain(input: &mut &str) -> ModalResult<ConditionChain> {
    let first = comparison.parse_next(input)?;
    let rest: Vec<(Combinator, (Comparison, f64))> = repeat(0.., (combinator, comparison)).parse_next(input)?;
    '?'.parse_next(input)?;
    Ok(ConditionChain { first, rest })
}

fn comparison(input: &mut &str) -> ModalResult<(Comparison, f64)> {
    (operator, number).parse_next(input)
}

fn operator(input: &mut &str) -> ModalResult<Comparison> {
    alt((
        "<=".value(Comparison::LessOrEqual),
        ">=".value(Comparison::GreaterOrEqual),
        "==".value(Comparison::Equal),
        "!=".value(Comparison::NotEqual),
        "<".value(Comparison::Less),
        ">".value(Comparison::Greater),
        "=".value(Comparison::Equal),
        "!".value(Comparison::NotEqual),
    ))
    .parse_next(input)
}

fn number(input: &mut &str) -> ModalResult<f64> {
    take_while(1.., |c: char| c.is_ascii_digit() || c == '.' || c == '-')
        .try_map(str::parse::<f64>)
        .parse_next(input)
}

fn combinator(input: &mut &str) -> ModalResult<Combinator> {
    alt(('&'.value(Combinator::And), '/'.value(Combinator::Or))).parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chained_condition() {
        let (chain, consumed) = parse_condition(">=21&<30?Adult").unwrap();
        assert_eq!(consumed, ">=21&<30?".len());
        assert!(chain.matches(25.0));
        assert!(!chain.matches(30.0));
    }

    #[test]
    fn or_combinator() {
        let (chain, _) = parse_condition("<0/>100?out").unwrap();
        assert!(chain.matches(-1.0));
        assert!(chain.matches(101.0));
        assert!(!chain.matches(50.0));
    }

    #[test]
    fn plain_text_is_not_a_condition() {
        assert!(parse_condition("Adult").is_none());
        assert!(parse_condition(">=21 Adult").is_none());
    }

    #[test]
    fn index_mode_clamps() {
        assert_eq!(number_index(1.7, 2), 1);
        assert_eq!(number_index(9.0, 2), 2);
        assert_eq!(number_index(-3.0, 2), 2);
    }
}
