//! List indexing and list formatting.

use crate::interpreter::{FormatError, FormatterExtension, FormattingInfo, SelectorInfo, SourceExtension};
use crate::types::Value;

/// Resolves list items (`{items[0]}`, `{items.1}`) and the current item
/// index (`{index}`) inside a list format.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListSource;

impl SourceExtension for ListSource {
    fn try_evaluate_selector(&self, info: &mut SelectorInfo<'_>) -> bool {
        let text = info.selector_text();
        let is_index = text.eq_ignore_ascii_case("index");

        if is_index && info.selector_index() == 0 {
            if let Some(index) = info.collection_index() {
                info.set_result(Value::from(index));
                return true;
            }
        }

        let Value::List(items) = info.current_value() else {
            return false;
        };

        // A bare leading number is a positional argument, not a list index.
        let absolute = info.selector_index() == 0 && info.selector_operator().is_empty();
        if !absolute {
            if let Some(item) = text.parse::<usize>().ok().and_then(|i| items.get(i)) {
                info.set_result(item.clone());
                return true;
            }
        }

        if is_index {
            if let Some(item) = info.collection_index().and_then(|i| items.get(i)) {
                info.set_result(item.clone());
                return true;
            }
        }
        false
    }
}

/// Writes every item of a list: `{items:list:{}|, | and }`.
///
/// The format has up to four `|`-separated parts: the item format, the
/// spacer between items, the spacer before the last item (defaults to the
/// spacer) and the spacer used when there are exactly two items (defaults
/// to the last spacer). An item format without placeholders is applied to
/// each item as a format spec, so `{prices:N2|, }` works.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListFormatter;

impl FormatterExtension for ListFormatter {
    fn names(&self) -> &[&'static str] {
        &["list", "l", ""]
    }

    fn try_evaluate_format(&self, info: &mut FormattingInfo<'_>, output: &mut String) -> Result<bool, FormatError> {
        let Value::List(items) = info.current_value() else {
            return Ok(false);
        };
        let Some(format) = info.format() else {
            return Ok(false);
        };
        let parts = format.split('|');
        if parts.len() < 2 {
            return Ok(false);
        }

        let spacer = &parts[1];
        let last_spacer = parts.get(2).unwrap_or(spacer);
        let two_spacer = parts.get(3).unwrap_or(last_spacer);

        let item_format = &parts[0];
        let spec_template;
        let item_format = if item_format.has_nested() {
            item_format
        } else {
            // Wrap the spec in a selector-less placeholder: "{:N2}".
            let settings = &info.settings().parser;
            let template = format!(
                "{}:{}{}",
                settings.opening_brace,
                item_format.raw_text(),
                settings.closing_brace
            );
            spec_template = info.details().formatter().parse(&template);
            spec_template.format()
        };

        let count = items.len();
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                let separator = if count == 2 {
                    two_spacer
                } else if index == count - 1 {
                    last_spacer
                } else {
                    spacer
                };
                info.write_format(output, separator, info.current_value())?;
            }
            info.write_item(output, item_format, item, index)?;
        }
        Ok(true)
    }
}
