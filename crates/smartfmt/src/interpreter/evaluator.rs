//! Walks a parsed [`Format`] and writes its output.
//!
//! Each placeholder is evaluated in two steps:
//! - Its selectors are resolved against the registered sources, starting at
//!   the current value and falling back to enclosing scopes for the first one
//! - The registered formatters matching its formatter name are tried in order
//!   until one handles the resolved value
//!
//! Failures are routed through the configured format-error action.

use tracing::{trace, warn};

use crate::interpreter::context::{FormatDetails, FormattingInfo, SelectorInfo};
use crate::interpreter::error::{FormatError, compute_suggestions};
use crate::parser::{Format, FormatItem, Placeholder, Selector};
use crate::settings::ErrorAction;
use crate::types::Value;

/// Evaluate `format` against `value`, appending to `output`.
///
/// # Errors
///
/// Returns an error only when a placeholder fails and the format-error
/// action is [`ErrorAction::ThrowError`].
pub(crate) fn eval_format<'a>(
    details: &'a FormatDetails<'a>,
    parent: Option<&'a FormattingInfo<'a>>,
    format: &'a Format,
    value: &Value,
    collection_index: Option<usize>,
    output: &mut String,
) -> Result<(), FormatError> {
    for item in format.items() {
        match item {
            FormatItem::Literal(literal) => output.push_str(&literal.text()),
            FormatItem::Placeholder(placeholder) => {
                let mut info =
                    FormattingInfo::new(details, parent, placeholder, value.clone(), collection_index);
                let mark = output.len();
                if let Err(error) = eval_placeholder(&mut info, output) {
                    output.truncate(mark);
                    handle_format_error(details, placeholder, error, output)?;
                }
            }
        }
    }
    Ok(())
}

fn eval_placeholder(info: &mut FormattingInfo<'_>, output: &mut String) -> Result<(), FormatError> {
    evaluate_selectors(info)?;
    evaluate_formatters(info, output)
}

/// The outcome of one accepted selector.
struct Resolution {
    value: Option<Value>,
    alignment: Option<i32>,
}

fn evaluate_selectors(info: &mut FormattingInfo<'_>) -> Result<(), FormatError> {
    let details = info.details();
    let placeholder = info.placeholder();

    for selector in placeholder.selectors() {
        let mut resolution = try_sources(details, selector, &info.current_value, info.collection_index());

        // Only the first selector may reach into enclosing scopes.
        if resolution.is_none() && selector.index() == 0 {
            let mut scope = info.parent();
            while let Some(parent) = scope {
                resolution = try_sources(details, selector, parent.current_value(), info.collection_index());
                if resolution.is_some() {
                    break;
                }
                scope = parent.parent();
            }
            // The outermost scope is the first argument.
            if resolution.is_none() && info.parent().is_some() {
                if let Some(root) = details.original_args().first() {
                    resolution = try_sources(details, selector, root, info.collection_index());
                }
            }
        }

        let Some(resolution) = resolution else {
            return Err(FormatError::UnresolvedSelector {
                placeholder: placeholder.raw_text().to_string(),
                selector: selector.text().to_string(),
                index: selector.index(),
            });
        };
        if let Some(value) = resolution.value {
            info.current_value = value;
        }
        if let Some(alignment) = resolution.alignment {
            info.alignment = alignment;
        }
    }
    Ok(())
}

fn try_sources(
    details: &FormatDetails<'_>,
    selector: &Selector,
    current_value: &Value,
    collection_index: Option<usize>,
) -> Option<Resolution> {
    let mut selector_info = SelectorInfo::new(selector, current_value, details, collection_index);
    for source in details.formatter.sources() {
        if source.try_evaluate_selector(&mut selector_info) {
            return Some(Resolution {
                value: selector_info.result.take(),
                alignment: selector_info.alignment.take(),
            });
        }
    }
    None
}

fn evaluate_formatters(info: &mut FormattingInfo<'_>, output: &mut String) -> Result<(), FormatError> {
    let formatter = info.details().formatter;
    let case_sensitivity = formatter.settings().case_sensitivity;
    let requested = info.formatter_name().unwrap_or("");

    for extension in formatter.formatters() {
        if !extension
            .names()
            .iter()
            .any(|name| case_sensitivity.matches(name, requested))
        {
            continue;
        }
        if extension.try_evaluate_format(info, output)? {
            trace!(
                placeholder = info.placeholder().raw_text(),
                formatter = extension.names().first().copied().unwrap_or(""),
                "placeholder formatted"
            );
            return Ok(());
        }
    }

    let suggestions = if requested.is_empty() {
        Vec::new()
    } else {
        compute_suggestions(requested, &formatter.formatter_names())
    };
    Err(FormatError::NoSuitableFormatter {
        placeholder: info.placeholder().raw_text().to_string(),
        formatter: (!requested.is_empty()).then(|| requested.to_string()),
        suggestions,
    })
}

/// Applies the format-error action to a failed placeholder.
fn handle_format_error(
    details: &FormatDetails<'_>,
    placeholder: &Placeholder,
    error: FormatError,
    output: &mut String,
) -> Result<(), FormatError> {
    let action = details.settings().format_error_action;
    match action {
        ErrorAction::ThrowError => return Err(error),
        ErrorAction::OutputErrorInResult => output.push_str(&error.to_string()),
        ErrorAction::MaintainTokens => output.push_str(placeholder.raw_text()),
        ErrorAction::Ignore => {}
    }
    warn!(
        placeholder = placeholder.raw_text(),
        ?action,
        %error,
        "placeholder failed to format"
    );
    Ok(())
}
