use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::interpreter::{SelectorInfo, SourceExtension};
use crate::types::{Value, VariablesGroup};

/// Named variable groups visible to every template, e.g. `{global.player.score}`.
///
/// The first selector of a chain may name a registered group; later
/// selectors walk into the group's variables. Clones share the same
/// registry, so groups can be added after the formatter is built.
#[derive(Debug, Clone, Default)]
pub struct GlobalVariablesSource {
    groups: Arc<RwLock<IndexMap<String, VariablesGroup>>>,
}

impl GlobalVariablesSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `group` under `name`, returning the group it replaced.
    pub fn add(&self, name: impl Into<String>, group: VariablesGroup) -> Option<VariablesGroup> {
        self.groups.write().insert(name.into(), group)
    }

    pub fn get(&self, name: &str) -> Option<VariablesGroup> {
        self.groups.read().get(name).cloned()
    }

    pub fn remove(&self, name: &str) -> Option<VariablesGroup> {
        self.groups.write().shift_remove(name)
    }

    pub fn clear(&self) {
        self.groups.write().clear();
    }

    /// Registered group names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.groups.read().keys().cloned().collect()
    }
}

impl SourceExtension for GlobalVariablesSource {
    fn try_evaluate_selector(&self, info: &mut SelectorInfo<'_>) -> bool {
        let name = info.selector_text();
        let case_sensitivity = info.case_sensitivity();

        if let Value::Group(group) = info.current_value() {
            if let Some(value) = group.get(name, case_sensitivity) {
                info.set_result(value);
                return true;
            }
        }

        if info.selector_index() != 0 {
            return false;
        }
        let groups = self.groups.read();
        let found = groups.get(name).cloned().or_else(|| {
            groups
                .iter()
                .find(|(key, _)| case_sensitivity.matches(key, name))
                .map(|(_, group)| group.clone())
        });
        drop(groups);
        match found {
            Some(group) => {
                info.set_result(Value::Group(group));
                true
            }
            None => false,
        }
    }
}
