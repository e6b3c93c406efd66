//! Formatting engine.
//!
//! This module evaluates parsed templates. It resolves selectors through an
//! ordered list of sources, dispatches each placeholder to the first
//! formatter that handles it, and applies the configured error actions.

mod cache;
mod context;
mod error;
mod evaluator;
mod extension;
mod smart_formatter;

pub use cache::{ParsedTemplate, TemplateCache};
pub use context::{FormatDetails, FormattingInfo, SelectorInfo};
pub use error::{ConfigError, FormatError, compute_suggestions};
pub use extension::{FormatterExtension, SourceExtension};
pub use smart_formatter::SmartFormatter;
