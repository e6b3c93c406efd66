use crate::interpreter::{FormatError, FormatterExtension, FormattingInfo};
use crate::types::Value;

/// Picks a branch by matching the value against options:
/// `{state:choose(on|off):Lights on|Lights off}`.
///
/// With one more branch than options, the last branch is the default for
/// unmatched values. `Null` matches the option `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChooseFormatter;

impl FormatterExtension for ChooseFormatter {
    fn names(&self) -> &[&'static str] {
        &["choose", "c"]
    }

    fn try_evaluate_format(&self, info: &mut FormattingInfo<'_>, output: &mut String) -> Result<bool, FormatError> {
        let Some(options) = info.formatter_options().filter(|options| !options.is_empty()) else {
            return Ok(false);
        };
        let options: Vec<&str> = options.split('|').collect();
        let choices = info.format().map(|format| format.split('|')).unwrap_or_default();

        if choices.len() < options.len() || choices.len() > options.len() + 1 {
            return Err(info.format_error(
                "choose",
                format!(
                    "expected {} or {} choices for {} options, found {}",
                    options.len(),
                    options.len() + 1,
                    options.len(),
                    choices.len()
                ),
            ));
        }

        let value_text = match info.current_value() {
            Value::Null => "null".to_string(),
            value => value.to_string(),
        };
        let case_sensitivity = info.settings().case_sensitivity;
        let chosen = match options
            .iter()
            .position(|option| case_sensitivity.matches(option, &value_text))
        {
            Some(index) => &choices[index],
            None if choices.len() > options.len() => &choices[choices.len() - 1],
            None => {
                return Err(info.format_error(
                    "choose",
                    format!("no option matches '{value_text}' and there is no default choice"),
                ));
            }
        };

        info.write_format(output, chosen, info.current_value())?;
        Ok(true)
    }
}
