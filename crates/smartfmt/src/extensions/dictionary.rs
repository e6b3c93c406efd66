use crate::interpreter::{SelectorInfo, SourceExtension};
use crate::types::Value;

/// Resolves selectors as keys of a [`Value::Map`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DictionarySource;

impl SourceExtension for DictionarySource {
    fn try_evaluate_selector(&self, info: &mut SelectorInfo<'_>) -> bool {
        if !matches!(info.current_value(), Value::Map(_)) {
            return false;
        }
        match info
            .current_value()
            .member(info.selector_text(), info.case_sensitivity())
        {
            Some(value) => {
                info.set_result(value);
                true
            }
            None => false,
        }
    }
}
