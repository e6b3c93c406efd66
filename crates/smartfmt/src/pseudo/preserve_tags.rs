use serde::{Deserialize, Serialize};

use crate::pseudo::message::{Message, MessageFragment, WritableFragment};
use crate::pseudo::PseudoLocalizationMethod;

/// Marks markup tags as read-only so later methods leave them untouched.
///
/// Within each writable fragment, the first unmatched opening marker up to
/// and including the next closing marker becomes a read-only fragment. An
/// opening marker with no closing marker after it stays writable.
///
/// # Example
///
/// ```
/// use smartfmt::pseudo::{Message, PreserveTags, PseudoLocalizationMethod};
///
/// let mut message = Message::new("Hello <b>World</b>");
/// PreserveTags::default().transform(&mut message);
/// let read_only: Vec<&str> = message
///     .fragments()
///     .iter()
///     .filter(|f| !f.is_writable())
///     .map(|f| f.text())
///     .collect();
/// assert_eq!(read_only, ["<b>", "</b>"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreserveTags {
    pub opening: char,
    pub closing: char,
}

impl Default for PreserveTags {
    fn default() -> Self {
        Self {
            opening: '<',
            closing: '>',
        }
    }
}

impl PreserveTags {
    pub fn new(opening: char, closing: char) -> Self {
        Self { opening, closing }
    }

    fn split(&self, fragment: WritableFragment) -> Vec<MessageFragment> {
        let text = fragment.text();
        let mut pieces = Vec::new();
        let mut writable_start = 0;
        let mut tag_start = None;

        for (offset, c) in text.char_indices() {
            if c == self.opening && tag_start.is_none() {
                tag_start = Some(offset);
            } else if c == self.closing {
                let Some(start) = tag_start.take() else {
                    continue;
                };
                let end = offset + c.len_utf8();
                if start > writable_start {
                    pieces.push(fragment.slice(writable_start, start).into());
                }
                pieces.push(fragment.read_only_slice(start, end).into());
                writable_start = end;
            }
        }

        if pieces.is_empty() {
            return vec![fragment.into()];
        }
        if writable_start < text.len() {
            pieces.push(fragment.slice(writable_start, text.len()).into());
        }
        pieces
    }
}

impl PseudoLocalizationMethod for PreserveTags {
    fn transform(&mut self, message: &mut Message) {
        message.flat_map_writable(|fragment| self.split(fragment));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pieces(input: &str, method: &mut PreserveTags) -> Vec<(bool, String)> {
        let mut message = Message::new(input);
        method.transform(&mut message);
        message
            .fragments()
            .iter()
            .map(|f| (f.is_writable(), f.text().to_string()))
            .collect()
    }

    #[test]
    fn splits_around_tags() {
        assert_eq!(
            pieces("Hello <color=red>World</color>", &mut PreserveTags::default()),
            vec![
                (true, "Hello ".to_string()),
                (false, "<color=red>".to_string()),
                (true, "World".to_string()),
                (false, "</color>".to_string()),
            ]
        );
    }

    #[test]
    fn unmatched_opening_stays_writable() {
        assert_eq!(
            pieces("a < b", &mut PreserveTags::default()),
            vec![(true, "a < b".to_string())]
        );
    }

    #[test]
    fn stray_closing_marker_is_plain_text() {
        assert_eq!(
            pieces("a > b <i>", &mut PreserveTags::default()),
            vec![(true, "a > b ".to_string()), (false, "<i>".to_string())]
        );
    }

    #[test]
    fn custom_markers() {
        assert_eq!(
            pieces("x{y}z", &mut PreserveTags::new('{', '}')),
            vec![
                (true, "x".to_string()),
                (false, "{y}".to_string()),
                (true, "z".to_string()),
            ]
        );
    }
}
