//! The configured formatting engine.

use std::fmt::{Debug, Formatter as FmtFormatter, Result as FmtResult};
use std::sync::Arc;

use bon::bon;
use tracing::warn;

use crate::extensions::{
    ChooseFormatter, ConditionalFormatter, DefaultFormatter, DefaultSource, DictionarySource,
    GlobalVariablesSource, IsMatchFormatter, ListFormatter, ListSource, PluralFormatter,
    SubStringFormatter, TemplateFormatter, TimeFormatter,
};
use crate::interpreter::cache::{ParsedTemplate, TemplateCache};
use crate::interpreter::context::FormatDetails;
use crate::interpreter::error::FormatError;
use crate::interpreter::evaluator::eval_format;
use crate::interpreter::extension::{FormatterExtension, SourceExtension};
use crate::parser::{Format, Parser};
use crate::settings::{ErrorAction, SmartSettings};
use crate::types::Value;

/// Formats templates against argument lists.
///
/// A formatter owns its settings, its ordered sources and formatters, and a
/// cache of parsed templates. It is `Send + Sync` and meant to be shared.
///
/// # Example
///
/// ```
/// use smartfmt::{SmartFormatter, VariablesGroup, args};
///
/// let formatter = SmartFormatter::default();
/// formatter
///     .globals()
///     .add("global", VariablesGroup::new().with("myInt", 123));
///
/// let text = formatter.format("My Int Value is {global.myInt}", &[]).unwrap();
/// assert_eq!(text, "My Int Value is 123");
///
/// let text = formatter.format("{0} {1:item|items}", &args![2, 2]).unwrap();
/// assert_eq!(text, "2 items");
/// ```
pub struct SmartFormatter {
    settings: SmartSettings,
    parser: Parser,
    sources: Vec<Box<dyn SourceExtension>>,
    formatters: Vec<Box<dyn FormatterExtension>>,
    cache: TemplateCache,
    globals: GlobalVariablesSource,
    templates: TemplateFormatter,
}

#[bon]
impl SmartFormatter {
    /// Builds a formatter with the default sources and formatters.
    ///
    /// `globals` and `templates` are shared handles: keep a clone to add
    /// variable groups or named templates later.
    #[builder]
    pub fn new(
        #[builder(default)] settings: SmartSettings,
        #[builder(default)] globals: GlobalVariablesSource,
        #[builder(default)] templates: TemplateFormatter,
        #[builder(default)] plural: PluralFormatter,
        #[builder(default)] time: TimeFormatter,
        cache: Option<TemplateCache>,
    ) -> Self {
        let mut formatter = Self::with_parts(settings, globals.clone(), templates.clone(), cache);
        formatter.sources = vec![
            Box::new(ListSource),
            Box::new(globals),
            Box::new(DictionarySource),
            Box::new(DefaultSource),
        ];
        formatter.formatters = vec![
            Box::new(ListFormatter),
            Box::new(plural),
            Box::new(ConditionalFormatter),
            Box::new(time),
            Box::new(ChooseFormatter),
            Box::new(SubStringFormatter::default()),
            Box::new(IsMatchFormatter::default()),
            Box::new(DefaultFormatter),
            Box::new(templates),
        ];
        formatter
    }

    /// A formatter with no sources or formatters registered.
    pub fn empty(settings: SmartSettings) -> Self {
        Self::with_parts(
            settings,
            GlobalVariablesSource::default(),
            TemplateFormatter::default(),
            None,
        )
    }

    fn with_parts(
        settings: SmartSettings,
        globals: GlobalVariablesSource,
        templates: TemplateFormatter,
        cache: Option<TemplateCache>,
    ) -> Self {
        let cache = cache.unwrap_or_else(|| TemplateCache::new(settings.cache_capacity));
        Self {
            parser: Parser::with_case_sensitivity(settings.parser.clone(), settings.case_sensitivity),
            settings,
            sources: Vec::new(),
            formatters: Vec::new(),
            cache,
            globals,
            templates,
        }
    }

    pub fn settings(&self) -> &SmartSettings {
        &self.settings
    }

    /// Global variable groups visible to every template.
    pub fn globals(&self) -> &GlobalVariablesSource {
        &self.globals
    }

    /// Named templates used by the `template` formatter.
    pub fn templates(&self) -> &TemplateFormatter {
        &self.templates
    }

    pub fn cache(&self) -> &TemplateCache {
        &self.cache
    }

    pub fn sources(&self) -> &[Box<dyn SourceExtension>] {
        &self.sources
    }

    pub fn formatters(&self) -> &[Box<dyn FormatterExtension>] {
        &self.formatters
    }

    /// Appends a source with the lowest priority.
    pub fn add_source(&mut self, source: impl SourceExtension + 'static) -> &mut Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Inserts a source at `index` in the priority order.
    pub fn insert_source(&mut self, index: usize, source: impl SourceExtension + 'static) -> &mut Self {
        let index = index.min(self.sources.len());
        self.sources.insert(index, Box::new(source));
        self
    }

    /// Appends a formatter with the lowest priority.
    ///
    /// Clears the template cache, since the set of recognized formatter
    /// names changes how templates parse.
    pub fn add_formatter(&mut self, formatter: impl FormatterExtension + 'static) -> &mut Self {
        self.formatters.push(Box::new(formatter));
        self.cache.clear();
        self
    }

    /// Inserts a formatter at `index` in the priority order. Clears the template cache.
    pub fn insert_formatter(&mut self, index: usize, formatter: impl FormatterExtension + 'static) -> &mut Self {
        let index = index.min(self.formatters.len());
        self.formatters.insert(index, Box::new(formatter));
        self.cache.clear();
        self
    }

    /// Every non-empty name of every registered formatter.
    pub fn formatter_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for formatter in &self.formatters {
            for name in formatter.names() {
                if !name.is_empty() && !names.iter().any(|n| n == name) {
                    names.push((*name).to_string());
                }
            }
        }
        names
    }

    /// Parses `text` through the template cache.
    pub fn parse(&self, text: &str) -> Arc<ParsedTemplate> {
        self.cache.get_or_parse(text, |text| {
            let names = self.formatter_names();
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            let (format, errors) = self.parser.parse(text, &names);
            ParsedTemplate::new(format, errors)
        })
    }

    /// Formats `text` with `args`.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Parse`] when the template has issues and the
    /// parse-error action is `ThrowError`, and any placeholder failure when
    /// the format-error action is `ThrowError`.
    pub fn format(&self, text: &str, args: &[Value]) -> Result<String, FormatError> {
        self.format_inner(None, text, args)
    }

    /// Formats `text` with an explicit language for plural rules and time units.
    pub fn format_with_language(&self, language: &str, text: &str, args: &[Value]) -> Result<String, FormatError> {
        self.format_inner(Some(language), text, args)
    }

    /// Formats an already parsed template.
    pub fn format_parsed(&self, format: &Format, args: &[Value]) -> Result<String, FormatError> {
        self.eval(None, format, args)
    }

    fn format_inner(&self, language: Option<&str>, text: &str, args: &[Value]) -> Result<String, FormatError> {
        let parsed = self.parse(text);
        if parsed.errors().has_issues() {
            let action = self.settings.parser.parse_error_action;
            match action {
                ErrorAction::ThrowError => return Err(FormatError::Parse(parsed.errors().clone())),
                ErrorAction::OutputErrorInResult => return Ok(parsed.errors().to_string()),
                ErrorAction::Ignore | ErrorAction::MaintainTokens => {
                    warn!(template = text, ?action, "formatting a template with parse issues");
                }
            }
        }
        self.eval(language, parsed.format(), args)
    }

    fn eval(&self, language: Option<&str>, format: &Format, args: &[Value]) -> Result<String, FormatError> {
        let details = FormatDetails {
            formatter: self,
            original_args: args,
            language,
        };
        let current = args.first().cloned().unwrap_or_default();
        let mut output = String::with_capacity(format.raw_text().len());
        eval_format(&details, None, format, &current, None, &mut output)?;
        Ok(output)
    }
}

impl Default for SmartFormatter {
    fn default() -> Self {
        SmartFormatter::builder().build()
    }
}

impl Debug for SmartFormatter {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        f.debug_struct("SmartFormatter")
            .field("settings", &self.settings)
            .field("sources", &self.sources.len())
            .field("formatters", &self.formatter_names())
            .field("cached_templates", &self.cache.len())
            .finish()
    }
}
