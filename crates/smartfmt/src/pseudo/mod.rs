//! Pseudo-localization: rewriting source strings so that layout and
//! localization bugs show up before real translations exist.
//!
//! A string becomes a [`Message`] of writable and read-only fragments, and
//! each [`PseudoLocalizationMethod`] of a [`PseudoLocale`] transforms it in
//! turn.

mod encapsulator;
mod expander;
mod locale;
mod message;
mod mirror;
mod preserve_tags;
mod substitutor;

pub use encapsulator::Encapsulator;
pub use expander::{ExpansionRule, Expander, InsertLocation};
pub use locale::{PseudoLocale, PseudoMethod};
pub use message::{Message, MessageFragment, ReadOnlyFragment, WritableFragment};
pub use mirror::Mirror;
pub use preserve_tags::PreserveTags;
pub use substitutor::{CharacterSubstitutor, ListSelectionMode, SubstitutionMethod};

/// A transformation applied to a [`Message`].
pub trait PseudoLocalizationMethod {
    /// Rewrites `message`. Read-only fragments must be left as they are.
    fn transform(&mut self, message: &mut Message);

    /// Clears any state carried from one message to the next.
    fn reset(&mut self) {}
}

impl<T: PseudoLocalizationMethod + ?Sized> PseudoLocalizationMethod for Box<T> {
    fn transform(&mut self, message: &mut Message) {
        (**self).transform(message);
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

/// Applies `methods` to `input` in order and returns the flattened result.
pub fn pseudo_string<M: PseudoLocalizationMethod>(methods: &mut [M], input: &str) -> String {
    let mut message = Message::new(input);
    for method in methods.iter_mut() {
        method.transform(&mut message);
    }
    message.to_string()
}
