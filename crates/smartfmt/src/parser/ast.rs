//! Public AST types for parsed templates.
//!
//! Every node shares the original template text through an `Arc<str>` and
//! records byte offsets into it, so slicing and re-splitting a parsed
//! template never copies the source.

use std::borrow::Cow;
use std::fmt::{Display, Formatter as FmtFormatter, Result as FmtResult};
use std::mem;
use std::ops::Range;
use std::sync::Arc;

use crate::parser::literal::unescape;

/// A parsed template body: literal text interleaved with placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct Format {
    pub(crate) source: Arc<str>,
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) items: Vec<FormatItem>,
    pub(crate) has_nested: bool,
}

/// An item within a [`Format`].
#[derive(Debug, Clone, PartialEq)]
pub enum FormatItem {
    /// Text written verbatim (after escape decoding).
    Literal(LiteralText),
    /// A `{...}` placeholder.
    Placeholder(Placeholder),
}

/// A slice of literal template text.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralText {
    pub(crate) source: Arc<str>,
    pub(crate) start: usize,
    pub(crate) end: usize,
    /// Escape character to decode with, when character literals are converted.
    pub(crate) escape: Option<char>,
}

/// A `{selectors:format}` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub(crate) source: Arc<str>,
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) selectors: Vec<Selector>,
    pub(crate) format: Option<Format>,
    pub(crate) formatter_name: Option<String>,
    pub(crate) formatter_options: Option<String>,
    pub(crate) nested_depth: usize,
}

/// One link of a placeholder's selector chain, e.g. `player` in `{global.player}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub(crate) source: Arc<str>,
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) operator_start: usize,
    pub(crate) index: usize,
}

impl Format {
    pub(crate) fn new(source: Arc<str>, start: usize) -> Self {
        Self {
            end: source.len(),
            source,
            start,
            items: Vec::new(),
            has_nested: false,
        }
    }

    fn from_items(source: Arc<str>, start: usize, end: usize, items: Vec<FormatItem>) -> Self {
        let has_nested = items
            .iter()
            .any(|item| matches!(item, FormatItem::Placeholder(_)));
        Self {
            source,
            start,
            end,
            items,
            has_nested,
        }
    }

    /// The items of this format, in source order.
    pub fn items(&self) -> &[FormatItem] {
        &self.items
    }

    /// Byte offset of the first character of this format.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset one past the last character of this format.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Byte range of this format within the template source.
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The complete template text this format was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The raw template text covered by this format.
    pub fn raw_text(&self) -> &str {
        &self.source[self.start..self.end]
    }

    /// Whether this format contains at least one placeholder.
    pub fn has_nested(&self) -> bool {
        self.has_nested
    }

    /// Whether this format has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The decoded text of all literal items, ignoring placeholders.
    pub fn literal_text(&self) -> String {
        self.items
            .iter()
            .filter_map(|item| match item {
                FormatItem::Literal(literal) => Some(literal.text()),
                FormatItem::Placeholder(_) => None,
            })
            .collect()
    }

    /// Deepest placeholder nesting level in this format (0 when there are none).
    pub fn max_nesting_depth(&self) -> usize {
        self.items
            .iter()
            .filter_map(|item| match item {
                FormatItem::Placeholder(p) => Some(
                    p.format
                        .as_ref()
                        .map_or(p.nested_depth, |f| f.max_nesting_depth().max(p.nested_depth)),
                ),
                FormatItem::Literal(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Split this format on `separator` wherever it occurs in top-level literal text.
    ///
    /// Separators inside nested placeholders are not split points, so
    /// `"a|{x:b|c}|d"` splits into `a`, `{x:b|c}` and `d`.
    pub fn split(&self, separator: char) -> Vec<Format> {
        let mut parts = Vec::new();
        let mut part_start = self.start;
        let mut part_items = Vec::new();

        for item in &self.items {
            let literal = match item {
                FormatItem::Literal(literal) => literal,
                FormatItem::Placeholder(_) => {
                    part_items.push(item.clone());
                    continue;
                }
            };

            let mut piece_start = literal.start;
            for (offset, c) in literal.raw_text().char_indices() {
                if c != separator {
                    continue;
                }
                let at = literal.start + offset;
                if at > piece_start {
                    part_items.push(FormatItem::Literal(literal.slice(piece_start, at)));
                }
                parts.push(Format::from_items(
                    self.source.clone(),
                    part_start,
                    at,
                    mem::take(&mut part_items),
                ));
                part_start = at + separator.len_utf8();
                piece_start = part_start;
            }
            if piece_start < literal.end {
                part_items.push(FormatItem::Literal(literal.slice(piece_start, literal.end)));
            }
        }

        parts.push(Format::from_items(
            self.source.clone(),
            part_start,
            self.end,
            part_items,
        ));
        parts
    }

    /// The part of this format starting `offset` bytes after its start.
    ///
    /// Literal items that straddle the cut are trimmed; items entirely before
    /// it are dropped.
    pub fn substring(&self, offset: usize) -> Format {
        let cut = (self.start + offset).min(self.end);
        let items = self
            .items
            .iter()
            .filter_map(|item| match item {
                FormatItem::Literal(literal) if literal.end <= cut => None,
                FormatItem::Literal(literal) if literal.start < cut => {
                    Some(FormatItem::Literal(literal.slice(cut, literal.end)))
                }
                FormatItem::Placeholder(p) if p.start < cut => None,
                other => Some(other.clone()),
            })
            .collect();
        Format::from_items(self.source.clone(), cut, self.end, items)
    }
}

impl Display for Format {
    /// Renders literal text decoded and placeholders as their raw source.
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        for item in &self.items {
            match item {
                FormatItem::Literal(literal) => f.write_str(&literal.text())?,
                FormatItem::Placeholder(p) => f.write_str(p.raw_text())?,
            }
        }
        Ok(())
    }
}

impl LiteralText {
    pub(crate) fn new(source: Arc<str>, start: usize, end: usize, escape: Option<char>) -> Self {
        Self {
            source,
            start,
            end,
            escape,
        }
    }

    fn slice(&self, start: usize, end: usize) -> Self {
        Self::new(self.source.clone(), start, end, self.escape)
    }

    /// The undecoded source text.
    pub fn raw_text(&self) -> &str {
        &self.source[self.start..self.end]
    }

    /// The text to write, with character literals decoded when enabled.
    pub fn text(&self) -> Cow<'_, str> {
        match self.escape {
            Some(escape) => unescape(self.raw_text(), escape),
            None => Cow::Borrowed(self.raw_text()),
        }
    }

    /// Byte range within the template source.
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl Placeholder {
    pub(crate) fn new(source: Arc<str>, start: usize, nested_depth: usize) -> Self {
        Self {
            end: source.len(),
            source,
            start,
            selectors: Vec::new(),
            format: None,
            formatter_name: None,
            formatter_options: None,
            nested_depth,
        }
    }

    /// The selector chain, in order.
    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    /// The format section after the first `:`, if any.
    pub fn format(&self) -> Option<&Format> {
        self.format.as_ref()
    }

    /// Name of the explicitly requested formatter, e.g. `choose` in `{x:choose(a|b):...}`.
    pub fn formatter_name(&self) -> Option<&str> {
        self.formatter_name.as_deref()
    }

    /// Text between the parentheses after the formatter name.
    pub fn formatter_options(&self) -> Option<&str> {
        self.formatter_options.as_deref()
    }

    /// 1 for a top-level placeholder, 2 for one nested inside it, and so on.
    pub fn nested_depth(&self) -> usize {
        self.nested_depth
    }

    /// The raw placeholder text including both braces.
    pub fn raw_text(&self) -> &str {
        &self.source[self.start..self.end]
    }

    /// Byte offset of the opening brace.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset one past the closing brace.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Byte range within the template source.
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl Selector {
    pub(crate) fn new(
        source: Arc<str>,
        start: usize,
        end: usize,
        operator_start: usize,
        index: usize,
    ) -> Self {
        Self {
            source,
            start,
            end,
            operator_start,
            index,
        }
    }

    /// The selector name.
    pub fn text(&self) -> &str {
        &self.source[self.start..self.end]
    }

    /// Operator characters preceding the name (empty for the first selector).
    pub fn operator(&self) -> &str {
        &self.source[self.operator_start..self.start]
    }

    /// Zero-based position within the selector chain.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Byte offset of the first character of the name.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte range of the name within the template source.
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }
}
