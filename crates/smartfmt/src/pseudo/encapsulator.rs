use serde::{Deserialize, Serialize};

use crate::pseudo::message::{Message, ReadOnlyFragment};
use crate::pseudo::PseudoLocalizationMethod;

/// Wraps the whole message in read-only markers, exposing strings that get
/// concatenated or truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Encapsulator {
    pub start: String,
    pub end: String,
}

impl Default for Encapsulator {
    fn default() -> Self {
        Self {
            start: "[".to_string(),
            end: "]".to_string(),
        }
    }
}

impl Encapsulator {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

impl PseudoLocalizationMethod for Encapsulator {
    fn transform(&mut self, message: &mut Message) {
        message.prepend(ReadOnlyFragment::new(self.start.clone()));
        message.append(ReadOnlyFragment::new(self.end.clone()));
    }
}
