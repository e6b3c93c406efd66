use crate::interpreter::{SelectorInfo, SourceExtension};

/// Resolves positional arguments (`{0}`, `{1}`) and alignment (`{0,10}`).
///
/// Digits only index the argument list when they are the first selector of
/// a chain; `,` followed by an integer sets the placeholder's alignment.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSource;

impl SourceExtension for DefaultSource {
    fn try_evaluate_selector(&self, info: &mut SelectorInfo<'_>) -> bool {
        let text = info.selector_text();

        if info.selector_operator() == "," {
            return match text.parse::<i32>() {
                Ok(alignment) => {
                    info.set_alignment(alignment);
                    true
                }
                Err(_) => false,
            };
        }

        if info.selector_index() != 0 || !info.selector_operator().is_empty() {
            return false;
        }
        let Ok(index) = text.parse::<usize>() else {
            return false;
        };
        match info.original_args().get(index) {
            Some(value) => {
                info.set_result(value.clone());
                true
            }
            None => false,
        }
    }
}
