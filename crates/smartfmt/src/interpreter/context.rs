//! State carried through the evaluation of one template.

use std::iter;

use crate::interpreter::SmartFormatter;
use crate::interpreter::error::FormatError;
use crate::interpreter::evaluator::eval_format;
use crate::parser::{Format, Placeholder, Selector};
use crate::settings::{CaseSensitivity, SmartSettings};
use crate::types::Value;

/// Per-call data shared by every placeholder of one format call.
pub struct FormatDetails<'a> {
    pub(crate) formatter: &'a SmartFormatter,
    pub(crate) original_args: &'a [Value],
    pub(crate) language: Option<&'a str>,
}

impl<'a> FormatDetails<'a> {
    pub fn formatter(&self) -> &'a SmartFormatter {
        self.formatter
    }

    /// The arguments passed to the format call.
    pub fn original_args(&self) -> &'a [Value] {
        self.original_args
    }

    /// The language passed to [`SmartFormatter::format_with_language`], if any.
    pub fn language(&self) -> Option<&'a str> {
        self.language
    }

    pub fn settings(&self) -> &'a SmartSettings {
        self.formatter.settings()
    }
}

/// The state of one placeholder while its formatter runs.
///
/// Formatters read the resolved value from here and write through
/// [`write`](Self::write) and [`write_format`](Self::write_format) so that
/// alignment and nested scopes work.
pub struct FormattingInfo<'a> {
    parent: Option<&'a FormattingInfo<'a>>,
    details: &'a FormatDetails<'a>,
    placeholder: &'a Placeholder,
    pub(crate) current_value: Value,
    pub(crate) alignment: i32,
    collection_index: Option<usize>,
}

impl<'a> FormattingInfo<'a> {
    pub(crate) fn new(
        details: &'a FormatDetails<'a>,
        parent: Option<&'a FormattingInfo<'a>>,
        placeholder: &'a Placeholder,
        current_value: Value,
        collection_index: Option<usize>,
    ) -> Self {
        Self {
            parent,
            details,
            placeholder,
            current_value,
            alignment: 0,
            collection_index,
        }
    }

    /// The value the selectors resolved to.
    pub fn current_value(&self) -> &Value {
        &self.current_value
    }

    pub fn placeholder(&self) -> &'a Placeholder {
        self.placeholder
    }

    /// The placeholder's format section, if it has one.
    pub fn format(&self) -> Option<&'a Format> {
        self.placeholder.format()
    }

    pub fn formatter_name(&self) -> Option<&'a str> {
        self.placeholder.formatter_name()
    }

    pub fn formatter_options(&self) -> Option<&'a str> {
        self.placeholder.formatter_options()
    }

    /// Padding width: positive right-aligns, negative left-aligns.
    pub fn alignment(&self) -> i32 {
        self.alignment
    }

    /// Index of the list item being formatted, inside a list formatter.
    pub fn collection_index(&self) -> Option<usize> {
        self.collection_index
    }

    pub fn parent(&self) -> Option<&'a FormattingInfo<'a>> {
        self.parent
    }

    pub fn details(&self) -> &'a FormatDetails<'a> {
        self.details
    }

    pub fn settings(&self) -> &'a SmartSettings {
        self.details.settings()
    }

    pub fn language(&self) -> Option<&'a str> {
        self.details.language
    }

    /// Writes `text`, padded to the placeholder's alignment.
    pub fn write(&self, output: &mut String, text: &str) {
        let width = usize::try_from(self.alignment.unsigned_abs()).unwrap_or(0);
        let padding = width.saturating_sub(text.chars().count());
        if self.alignment > 0 {
            output.extend(iter::repeat_n(' ', padding));
            output.push_str(text);
        } else {
            output.push_str(text);
            output.extend(iter::repeat_n(' ', padding));
        }
    }

    /// Evaluates `format` with `value` as its current value.
    ///
    /// Placeholders in `format` that cannot be resolved against `value` fall
    /// back to the enclosing scopes.
    pub fn write_format(&self, output: &mut String, format: &Format, value: &Value) -> Result<(), FormatError> {
        eval_format(self.details, Some(self), format, value, self.collection_index, output)
    }

    /// Like [`write_format`](Self::write_format), for the `index`-th item of a list.
    pub fn write_item(
        &self,
        output: &mut String,
        format: &Format,
        value: &Value,
        index: usize,
    ) -> Result<(), FormatError> {
        eval_format(self.details, Some(self), format, value, Some(index), output)
    }

    /// A formatter error located at this placeholder.
    pub fn format_error(&self, formatter: &'static str, message: impl Into<String>) -> FormatError {
        FormatError::Formatter {
            formatter,
            placeholder: self.placeholder.raw_text().to_string(),
            message: message.into(),
        }
    }
}

/// One selector being offered to the registered sources.
pub struct SelectorInfo<'a> {
    selector: &'a Selector,
    current_value: &'a Value,
    details: &'a FormatDetails<'a>,
    collection_index: Option<usize>,
    pub(crate) result: Option<Value>,
    pub(crate) alignment: Option<i32>,
}

impl<'a> SelectorInfo<'a> {
    pub(crate) fn new(
        selector: &'a Selector,
        current_value: &'a Value,
        details: &'a FormatDetails<'a>,
        collection_index: Option<usize>,
    ) -> Self {
        Self {
            selector,
            current_value,
            details,
            collection_index,
            result: None,
            alignment: None,
        }
    }

    pub fn selector(&self) -> &'a Selector {
        self.selector
    }

    /// The selector name, e.g. `score` in `{player.score}`.
    pub fn selector_text(&self) -> &'a str {
        self.selector.text()
    }

    /// The operator before the selector, e.g. `.` in `{player.score}`.
    pub fn selector_operator(&self) -> &'a str {
        self.selector.operator()
    }

    pub fn selector_index(&self) -> usize {
        self.selector.index()
    }

    /// The value the selector is applied to.
    pub fn current_value(&self) -> &'a Value {
        self.current_value
    }

    pub fn original_args(&self) -> &'a [Value] {
        self.details.original_args
    }

    pub fn case_sensitivity(&self) -> CaseSensitivity {
        self.details.settings().case_sensitivity
    }

    pub fn collection_index(&self) -> Option<usize> {
        self.collection_index
    }

    /// Accepts the selector, replacing the current value with `value`.
    pub fn set_result(&mut self, value: Value) {
        self.result = Some(value);
    }

    /// Accepts the selector as an alignment, keeping the current value.
    pub fn set_alignment(&mut self, alignment: i32) {
        self.alignment = Some(alignment);
    }
}
