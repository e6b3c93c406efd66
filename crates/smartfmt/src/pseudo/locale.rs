use std::fmt::{Debug, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::pseudo::encapsulator::Encapsulator;
use crate::pseudo::expander::Expander;
use crate::pseudo::message::Message;
use crate::pseudo::mirror::Mirror;
use crate::pseudo::preserve_tags::PreserveTags;
use crate::pseudo::substitutor::CharacterSubstitutor;
use crate::pseudo::{PseudoLocalizationMethod, pseudo_string};

/// One step of a [`PseudoLocale`].
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PseudoMethod {
    PreserveTags(PreserveTags),
    Expander(Expander),
    CharacterSubstitutor(CharacterSubstitutor),
    Mirror,
    Encapsulator(Encapsulator),
    /// A host-provided method. Not serializable.
    #[serde(skip)]
    Custom(Box<dyn PseudoLocalizationMethod + Send>),
}

impl Debug for PseudoMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            PseudoMethod::PreserveTags(method) => f.debug_tuple("PreserveTags").field(method).finish(),
            PseudoMethod::Expander(method) => f.debug_tuple("Expander").field(method).finish(),
            PseudoMethod::CharacterSubstitutor(method) => {
                f.debug_tuple("CharacterSubstitutor").field(method).finish()
            }
            PseudoMethod::Mirror => f.write_str("Mirror"),
            PseudoMethod::Encapsulator(method) => f.debug_tuple("Encapsulator").field(method).finish(),
            PseudoMethod::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl PseudoLocalizationMethod for PseudoMethod {
    fn transform(&mut self, message: &mut Message) {
        match self {
            PseudoMethod::PreserveTags(method) => method.transform(message),
            PseudoMethod::Expander(method) => method.transform(message),
            PseudoMethod::CharacterSubstitutor(method) => method.transform(message),
            PseudoMethod::Mirror => Mirror.transform(message),
            PseudoMethod::Encapsulator(method) => method.transform(message),
            PseudoMethod::Custom(method) => method.transform(message),
        }
    }

    fn reset(&mut self) {
        match self {
            PseudoMethod::PreserveTags(method) => method.reset(),
            PseudoMethod::Expander(method) => method.reset(),
            PseudoMethod::CharacterSubstitutor(method) => method.reset(),
            PseudoMethod::Mirror => {}
            PseudoMethod::Encapsulator(method) => method.reset(),
            PseudoMethod::Custom(method) => method.reset(),
        }
    }
}

impl From<PreserveTags> for PseudoMethod {
    fn from(method: PreserveTags) -> Self {
        PseudoMethod::PreserveTags(method)
    }
}

impl From<Expander> for PseudoMethod {
    fn from(method: Expander) -> Self {
        PseudoMethod::Expander(method)
    }
}

impl From<CharacterSubstitutor> for PseudoMethod {
    fn from(method: CharacterSubstitutor) -> Self {
        PseudoMethod::CharacterSubstitutor(method)
    }
}

impl From<Mirror> for PseudoMethod {
    fn from(_: Mirror) -> Self {
        PseudoMethod::Mirror
    }
}

impl From<Encapsulator> for PseudoMethod {
    fn from(method: Encapsulator) -> Self {
        PseudoMethod::Encapsulator(method)
    }
}

/// An ordered list of pseudo-localization methods.
///
/// The default list preserves tags, pads, accents and then brackets each
/// string. Tag preservation has to come before any method that rewrites
/// characters.
///
/// # Example
///
/// ```
/// use smartfmt::pseudo::{Encapsulator, Mirror, PseudoLocale};
///
/// let mut locale = PseudoLocale::empty()
///     .with(Mirror)
///     .with(Encapsulator::default());
/// assert_eq!(locale.pseudo_string("abc"), "[cba]");
/// ```
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PseudoLocale {
    pub methods: Vec<PseudoMethod>,
}

impl Default for PseudoLocale {
    fn default() -> Self {
        Self {
            methods: vec![
                PreserveTags::default().into(),
                Expander::default().into(),
                CharacterSubstitutor::accenter().into(),
                Encapsulator::default().into(),
            ],
        }
    }
}

impl PseudoLocale {
    pub fn new(methods: Vec<PseudoMethod>) -> Self {
        Self { methods }
    }

    /// A locale with no methods; output equals input.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn with(mut self, method: impl Into<PseudoMethod>) -> Self {
        self.methods.push(method.into());
        self
    }

    /// Appends a method that is not one of the built-in kinds.
    pub fn with_custom(mut self, method: impl PseudoLocalizationMethod + Send + 'static) -> Self {
        self.methods.push(PseudoMethod::Custom(Box::new(method)));
        self
    }

    /// Runs every method over `input` in order.
    pub fn pseudo_string(&mut self, input: &str) -> String {
        pseudo_string(&mut self.methods, input)
    }

    /// Clears state carried between calls, such as substitution cursors.
    pub fn reset(&mut self) {
        for method in &mut self.methods {
            method.reset();
        }
    }
}
