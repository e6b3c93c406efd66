use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use super::Value;
use crate::settings::CaseSensitivity;

/// A named set of variables shared between the host and the formatter.
///
/// Clones share the same storage, so a group registered with
/// [`GlobalVariablesSource`](crate::extensions::GlobalVariablesSource) can be
/// updated between format calls.
///
/// # Example
///
/// ```
/// use smartfmt::{CaseSensitivity, Value, VariablesGroup};
///
/// let group = VariablesGroup::new().with("score", 10);
/// let shared = group.clone();
/// shared.set("score", 11);
/// assert_eq!(group.get("score", CaseSensitivity::CaseSensitive), Some(Value::Number(11)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct VariablesGroup {
    variables: Arc<RwLock<IndexMap<String, Value>>>,
}

impl VariablesGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable and returns the group, for chained construction.
    pub fn with(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a variable, returning the previous value.
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.variables.write().insert(name.into(), value.into())
    }

    /// Reads a variable. An exact match wins over a case-insensitive one.
    pub fn get(&self, name: &str, case_sensitivity: CaseSensitivity) -> Option<Value> {
        let variables = self.variables.read();
        if let Some(value) = variables.get(name) {
            return Some(value.clone());
        }
        variables
            .iter()
            .find(|(key, _)| case_sensitivity.matches(key, name))
            .map(|(_, value)| value.clone())
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        self.variables.write().shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.variables.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.read().is_empty()
    }

    /// Variable names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.variables.read().keys().cloned().collect()
    }
}

/// Two groups are equal when they share storage.
impl PartialEq for VariablesGroup {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.variables, &other.variables)
    }
}
