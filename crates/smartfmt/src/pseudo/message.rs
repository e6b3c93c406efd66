//! A string being pseudo-localized, split into writable and read-only fragments.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::mem;
use std::sync::Arc;

/// Fragment text: a range of the original input, or a replacement string.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FragmentText {
    Slice {
        source: Arc<str>,
        start: usize,
        end: usize,
    },
    Owned(String),
}

impl FragmentText {
    fn as_str(&self) -> &str {
        match self {
            FragmentText::Slice { source, start, end } => &source[*start..*end],
            FragmentText::Owned(text) => text,
        }
    }

    /// A byte range of this text. Slices stay slices of the original input.
    fn slice(&self, from: usize, to: usize) -> FragmentText {
        match self {
            FragmentText::Slice { source, start, .. } => FragmentText::Slice {
                source: source.clone(),
                start: start + from,
                end: start + to,
            },
            FragmentText::Owned(text) => FragmentText::Owned(text[from..to].to_string()),
        }
    }
}

/// A fragment that transforms may rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WritableFragment {
    text: FragmentText,
}

impl WritableFragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: FragmentText::Owned(text.into()),
        }
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Replaces the whole text of this fragment.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = FragmentText::Owned(text.into());
    }

    /// A writable fragment covering the byte range `from..to` of this one.
    pub fn slice(&self, from: usize, to: usize) -> WritableFragment {
        WritableFragment {
            text: self.text.slice(from, to),
        }
    }

    /// A read-only fragment covering the byte range `from..to` of this one.
    pub fn read_only_slice(&self, from: usize, to: usize) -> ReadOnlyFragment {
        ReadOnlyFragment {
            text: self.text.slice(from, to),
        }
    }
}

/// A fragment no transform may change, such as a markup tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOnlyFragment {
    text: FragmentText,
}

impl ReadOnlyFragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: FragmentText::Owned(text.into()),
        }
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageFragment {
    Writable(WritableFragment),
    ReadOnly(ReadOnlyFragment),
}

impl MessageFragment {
    pub fn text(&self) -> &str {
        match self {
            MessageFragment::Writable(fragment) => fragment.text(),
            MessageFragment::ReadOnly(fragment) => fragment.text(),
        }
    }

    pub fn is_writable(&self) -> bool {
        matches!(self, MessageFragment::Writable(_))
    }
}

impl From<WritableFragment> for MessageFragment {
    fn from(fragment: WritableFragment) -> Self {
        MessageFragment::Writable(fragment)
    }
}

impl From<ReadOnlyFragment> for MessageFragment {
    fn from(fragment: ReadOnlyFragment) -> Self {
        MessageFragment::ReadOnly(fragment)
    }
}

/// An input string as an ordered list of fragments.
///
/// A new message is one writable fragment spanning the whole input.
/// Transforms split, rewrite and surround writable fragments; read-only
/// fragments pass through unchanged.
///
/// # Example
///
/// ```
/// use smartfmt::pseudo::{Message, ReadOnlyFragment};
///
/// let mut message = Message::new("hello");
/// for fragment in message.writable_fragments_mut() {
///     let upper = fragment.text().to_uppercase();
///     fragment.set_text(upper);
/// }
/// message.append(ReadOnlyFragment::new("!"));
/// assert_eq!(message.to_string(), "HELLO!");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    original: Arc<str>,
    fragments: Vec<MessageFragment>,
}

impl Message {
    pub fn new(input: &str) -> Self {
        let original: Arc<str> = Arc::from(input);
        let mut fragments = Vec::new();
        if !input.is_empty() {
            fragments.push(MessageFragment::Writable(WritableFragment {
                text: FragmentText::Slice {
                    source: original.clone(),
                    start: 0,
                    end: input.len(),
                },
            }));
        }
        Self { original, fragments }
    }

    /// The input the message was created from.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn fragments(&self) -> &[MessageFragment] {
        &self.fragments
    }

    pub fn writable_fragments_mut(&mut self) -> impl Iterator<Item = &mut WritableFragment> {
        self.fragments.iter_mut().filter_map(|fragment| match fragment {
            MessageFragment::Writable(writable) => Some(writable),
            MessageFragment::ReadOnly(_) => None,
        })
    }

    /// Replaces each writable fragment with the fragments `f` returns for it.
    pub fn flat_map_writable(&mut self, mut f: impl FnMut(WritableFragment) -> Vec<MessageFragment>) {
        let fragments = mem::take(&mut self.fragments);
        for fragment in fragments {
            match fragment {
                MessageFragment::Writable(writable) => self.fragments.extend(f(writable)),
                read_only @ MessageFragment::ReadOnly(_) => self.fragments.push(read_only),
            }
        }
    }

    pub fn prepend(&mut self, fragment: impl Into<MessageFragment>) {
        self.fragments.insert(0, fragment.into());
    }

    pub fn append(&mut self, fragment: impl Into<MessageFragment>) {
        self.fragments.push(fragment.into());
    }

    /// Length of the current text in characters.
    pub fn len(&self) -> usize {
        self.fragments
            .iter()
            .map(|fragment| fragment.text().chars().count())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.iter().all(|fragment| fragment.text().is_empty())
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for fragment in &self.fragments {
            f.write_str(fragment.text())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_share_the_original() {
        let message = Message::new("abc<b>def");
        let MessageFragment::Writable(whole) = &message.fragments()[0] else {
            panic!("new messages start writable");
        };
        let tag = whole.read_only_slice(3, 6);
        assert_eq!(tag.text(), "<b>");
        assert!(matches!(tag.text, FragmentText::Slice { start: 3, end: 6, .. }));
    }

    #[test]
    fn flat_map_keeps_read_only_fragments() {
        let mut message = Message::new("x");
        message.append(ReadOnlyFragment::new("|"));
        message.flat_map_writable(|fragment| {
            vec![
                fragment.clone().into(),
                WritableFragment::new(fragment.text().to_string()).into(),
            ]
        });
        assert_eq!(message.to_string(), "xx|");
        assert_eq!(message.fragments().len(), 3);
    }

    #[test]
    fn empty_input_has_no_fragments() {
        let message = Message::new("");
        assert!(message.fragments().is_empty());
        assert!(message.is_empty());
    }
}
