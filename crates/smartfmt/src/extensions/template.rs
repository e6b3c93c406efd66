use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::interpreter::{FormatError, FormatterExtension, FormattingInfo};
use crate::settings::ErrorAction;

/// Named sub-templates: `{user:template(greeting)}` or `{user:t:greeting}`.
///
/// Templates are registered at runtime and evaluated with the placeholder's
/// value as their current value. Clones share the same registry.
///
/// # Example
///
/// ```
/// use smartfmt::{SmartFormatter, args};
///
/// let formatter = SmartFormatter::default();
/// formatter.templates().register("greeting", "Hello {0}!");
/// let text = formatter.format("{0:t(greeting)}", &args!["Ada"]).unwrap();
/// assert_eq!(text, "Hello Ada!");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TemplateFormatter {
    templates: Arc<RwLock<IndexMap<String, String>>>,
}

impl TemplateFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `template` under `name`, replacing any previous one.
    pub fn register(&self, name: impl Into<String>, template: impl Into<String>) -> Option<String> {
        self.templates.write().insert(name.into(), template.into())
    }

    pub fn remove(&self, name: &str) -> Option<String> {
        self.templates.write().shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.templates.read().get(name).cloned()
    }

    pub fn clear(&self) {
        self.templates.write().clear();
    }

    pub fn names(&self) -> Vec<String> {
        self.templates.read().keys().cloned().collect()
    }
}

impl FormatterExtension for TemplateFormatter {
    fn names(&self) -> &[&'static str] {
        &["template", "t"]
    }

    fn try_evaluate_format(&self, info: &mut FormattingInfo<'_>, output: &mut String) -> Result<bool, FormatError> {
        let name = match info.formatter_options().map(str::trim).filter(|o| !o.is_empty()) {
            Some(name) => name.to_string(),
            None => info
                .format()
                .map(|format| format.raw_text().trim().to_string())
                .unwrap_or_default(),
        };

        let case_sensitivity = info.settings().case_sensitivity;
        let template = {
            let templates = self.templates.read();
            templates.get(&name).cloned().or_else(|| {
                templates
                    .iter()
                    .find(|(key, _)| case_sensitivity.matches(key, &name))
                    .map(|(_, template)| template.clone())
            })
        };
        let Some(template) = template else {
            return Err(info.format_error("template", format!("no template named '{name}'")));
        };

        let parsed = info.details().formatter().parse(&template);
        if parsed.errors().has_issues() && info.settings().parser.parse_error_action == ErrorAction::ThrowError {
            return Err(FormatError::Parse(parsed.errors().clone()));
        }
        info.write_format(output, parsed.format(), info.current_value())?;
        Ok(true)
    }
}
