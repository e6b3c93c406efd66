pub mod extensions;
pub mod interpreter;
pub mod parser;
pub mod pseudo;
pub mod settings;
pub mod types;

pub use extensions::{GlobalVariablesSource, TemplateFormatter};
pub use interpreter::{
    ConfigError, FormatError, FormatterExtension, FormattingInfo, ParsedTemplate, SelectorInfo,
    SmartFormatter, SourceExtension, TemplateCache, compute_suggestions,
};
pub use parser::{Format, Parser, ParsingError, ParsingErrors, ParsingIssue};
pub use pseudo::{PseudoLocale, PseudoLocalizationMethod, pseudo_string};
pub use settings::{CaseSensitivity, ErrorAction, ParserSettings, SmartSettings};
pub use types::{Value, VariablesGroup};

/// Creates a `Vec<Value>` of format arguments.
///
/// Each element is converted via `Into<Value>`, so integers, floats,
/// strings, durations, lists and variable groups can be mixed freely.
///
/// # Example
///
/// ```
/// use smartfmt::{Value, args};
///
/// let a = args![3, "Ada", 1.5];
/// assert_eq!(a.len(), 3);
/// assert_eq!(a[0].as_number(), Some(3));
/// assert_eq!(a[1].as_string(), Some("Ada"));
/// assert_eq!(args![], Vec::<Value>::new());
/// ```
#[macro_export]
macro_rules! args {
    [] => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    [ $($value:expr),+ $(,)? ] => {
        ::std::vec![
            $( ::std::convert::Into::<$crate::Value>::into($value) ),+
        ]
    };
}
