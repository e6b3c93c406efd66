//! Extension points for value sources and formatters.

use crate::interpreter::context::{FormattingInfo, SelectorInfo};
use crate::interpreter::error::FormatError;

/// Resolves selectors to values.
///
/// Sources are tried in registration order; the first one that accepts a
/// selector wins.
pub trait SourceExtension: Send + Sync {
    /// Try to resolve `info`'s selector against its current value.
    ///
    /// Returns `true` after calling [`SelectorInfo::set_result`] or
    /// [`SelectorInfo::set_alignment`] when the selector was accepted.
    fn try_evaluate_selector(&self, info: &mut SelectorInfo<'_>) -> bool;
}

/// Writes a resolved value.
///
/// Formatters are tried in registration order, restricted to those whose
/// [`names`](Self::names) include the placeholder's formatter name (or `""`
/// when the placeholder names none).
pub trait FormatterExtension: Send + Sync {
    /// Names this formatter answers to. Include `""` to take part in
    /// implicit dispatch.
    fn names(&self) -> &[&'static str];

    /// Format the current value of `info` into `output`.
    ///
    /// Returns `Ok(false)` without writing anything when the value or format
    /// is not one this formatter handles.
    fn try_evaluate_format(&self, info: &mut FormattingInfo<'_>, output: &mut String) -> Result<bool, FormatError>;
}
