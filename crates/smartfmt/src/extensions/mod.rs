//! Built-in sources and formatters.
//!
//! Sources resolve selectors to values; formatters turn resolved values into
//! text. [`SmartFormatter::default`](crate::SmartFormatter::default)
//! registers all of them in priority order.

mod choose;
mod conditional;
mod default_formatter;
mod default_source;
mod dictionary;
mod globals;
mod is_match;
mod list;
mod plural;
mod substring;
mod template;
mod time;

pub use choose::ChooseFormatter;
pub use conditional::ConditionalFormatter;
pub use default_formatter::DefaultFormatter;
pub use default_source::DefaultSource;
pub use dictionary::DictionarySource;
pub use globals::GlobalVariablesSource;
pub use is_match::IsMatchFormatter;
pub use list::{ListFormatter, ListSource};
pub use plural::{PluralFormatter, plural_category};
pub use substring::{SubStringFormatter, SubStringOutOfRange};
pub use template::TemplateFormatter;
pub use time::{TimeFormatter, TimeSpanOptions, TimeUnit, Truncation};
