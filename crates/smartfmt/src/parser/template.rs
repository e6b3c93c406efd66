//! Single-pass template scanner.
//!
//! Turns template text into a [`Format`] tree. Handles:
//! - Literal text with character-literal escapes (`\n`, `\{`, `\u00e9`)
//! - Doubled-brace escapes (`{{`, `}}`)
//! - Selector chains with operators (`{player.name}`, `{list[0]}`, `{0,10}`)
//! - Nested formats after `:`
//! - Named formatter prefixes (`{x:choose(a|b):...}`, `{x:list:...}`)
//!
//! The scan never fails. Problems are recorded in [`ParsingErrors`] and the
//! tree is repaired so it is always well formed.

use std::mem;
use std::sync::Arc;

use tracing::debug;

use crate::parser::ast::{Format, FormatItem, LiteralText, Placeholder, Selector};
use crate::parser::error::{ParsingError, ParsingErrors};
use crate::parser::literal::is_unicode_escape;
use crate::settings::{CaseSensitivity, ErrorAction, ParserSettings};

/// Template parser.
///
/// # Example
///
/// ```
/// use smartfmt::parser::{FormatItem, Parser};
///
/// let parser = Parser::default();
/// let (format, errors) = parser.parse("Hello {name}!", &[]);
/// assert!(errors.is_empty());
/// assert_eq!(format.items().len(), 3);
/// assert!(matches!(format.items()[1], FormatItem::Placeholder(_)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parser {
    settings: ParserSettings,
    case_sensitivity: CaseSensitivity,
}

impl Parser {
    pub fn new(settings: ParserSettings) -> Self {
        Self {
            settings,
            case_sensitivity: CaseSensitivity::default(),
        }
    }

    /// Parser that matches formatter names under `case_sensitivity`.
    pub fn with_case_sensitivity(settings: ParserSettings, case_sensitivity: CaseSensitivity) -> Self {
        Self {
            settings,
            case_sensitivity,
        }
    }

    pub fn settings(&self) -> &ParserSettings {
        &self.settings
    }

    /// Parse `text`, recognizing named formatter prefixes from `formatter_names`.
    ///
    /// Always returns a complete tree together with every issue found.
    pub fn parse(&self, text: &str, formatter_names: &[&str]) -> (Format, ParsingErrors) {
        let (format, errors) = Scanner::new(self, text, formatter_names).run();
        if errors.has_issues() {
            debug!(template = text, issues = errors.len(), "template has parse issues");
        }
        (format, errors)
    }

    /// Parse `text` and apply the configured parse-error action.
    ///
    /// Only [`ErrorAction::ThrowError`] turns issues into an `Err`; every
    /// other action hands back the repaired tree.
    pub fn parse_format(&self, text: &str, formatter_names: &[&str]) -> Result<Format, ParsingErrors> {
        let (format, errors) = self.parse(text, formatter_names);
        if errors.has_issues() && self.settings.parse_error_action == ErrorAction::ThrowError {
            return Err(errors);
        }
        Ok(format)
    }
}

/// A placeholder whose format body is currently being scanned, and the
/// format that contains it.
struct Frame {
    parent: Format,
    placeholder: Placeholder,
}

/// Progress through a possible `name(options):` prefix.
struct NamedScan {
    name_start: usize,
    options_start: Option<usize>,
}

struct Scanner<'a> {
    settings: &'a ParserSettings,
    case_sensitivity: CaseSensitivity,
    names: &'a [&'a str],
    text: &'a str,
    source: Arc<str>,
    errors: ParsingErrors,
    stack: Vec<Frame>,
    format: Format,
    current_placeholder: Option<Placeholder>,
    named: Option<NamedScan>,
    last: usize,
    operator_start: usize,
    selector_index: usize,
}

impl<'a> Scanner<'a> {
    fn new(parser: &'a Parser, text: &'a str, names: &'a [&'a str]) -> Self {
        let source: Arc<str> = Arc::from(text);
        Self {
            settings: &parser.settings,
            case_sensitivity: parser.case_sensitivity,
            names,
            text,
            format: Format::new(source.clone(), 0),
            source,
            errors: ParsingErrors::new(text),
            stack: Vec::new(),
            current_placeholder: None,
            named: None,
            last: 0,
            operator_start: 0,
            selector_index: 0,
        }
    }

    fn run(mut self) -> (Format, ParsingErrors) {
        let chars: Vec<(usize, char)> = self.text.char_indices().collect();
        let opening = self.settings.opening_brace;
        let closing = self.settings.closing_brace;
        let escape = self.settings.escape_char;
        let doubled_braces = !self.settings.alternative_escaping;
        let char_escapes = self.settings.convert_character_literals || self.settings.alternative_escaping;

        let mut k = 0;
        while k < chars.len() {
            let (i, c) = chars[k];
            let next = chars.get(k + 1).map(|&(_, n)| n);
            let width = c.len_utf8();

            if self.current_placeholder.is_some() {
                self.scan_selector_char(i, c);
                k += 1;
                continue;
            }

            if self.named.is_some() && self.scan_named_char(i, c, next, &mut k) {
                continue;
            }

            if c == opening {
                if doubled_braces && next == Some(opening) {
                    self.flush_literal(i + width);
                    self.last = i + 2 * width;
                    k += 2;
                    continue;
                }
                self.flush_literal(i);
                self.open_placeholder(i, width);
            } else if c == closing {
                // `}}` is an escape only in the root format; nested it closes two levels.
                if doubled_braces && next == Some(closing) && self.stack.is_empty() {
                    self.flush_literal(i + width);
                    self.last = i + 2 * width;
                    k += 2;
                    continue;
                }
                self.flush_literal(i);
                self.close_format(i, width);
            } else if c == escape && char_escapes {
                match next {
                    Some(brace) if brace == opening || brace == closing => {
                        self.flush_literal(i);
                        self.last = i + width;
                        k += 2;
                        continue;
                    }
                    Some('u') if is_unicode_escape(&self.text[i + width + 1..]) => {
                        k += 6;
                        continue;
                    }
                    Some(_) => {
                        k += 2;
                        continue;
                    }
                    None => {}
                }
            }
            k += 1;
        }

        self.finish()
    }

    fn scan_selector_char(&mut self, i: usize, c: char) {
        let width = c.len_utf8();
        if c == self.settings.closing_brace {
            self.finish_selectors(i);
            if let Some(mut placeholder) = self.current_placeholder.take() {
                placeholder.end = i + width;
                self.format.items.push(FormatItem::Placeholder(placeholder));
            }
            self.last = i + width;
        } else if c == ':' {
            self.finish_selectors(i);
            if let Some(placeholder) = self.current_placeholder.take() {
                let child = Format::new(self.source.clone(), i + width);
                let parent = mem::replace(&mut self.format, child);
                self.stack.push(Frame { parent, placeholder });
            }
            self.last = i + width;
            self.named = Some(NamedScan {
                name_start: i + width,
                options_start: None,
            });
        } else if self.settings.is_operator_char(c) {
            if i > self.last {
                self.push_selector(i);
                self.operator_start = i;
            }
            self.last = i + width;
        } else if !self.settings.is_selector_char(c) {
            self.errors
                .add(ParsingError::InvalidCharactersInSelector, i, i + width);
        }
    }

    /// Handles one character of a possible named formatter prefix.
    ///
    /// Returns `true` when the character was consumed by the prefix.
    fn scan_named_char(&mut self, i: usize, c: char, next: Option<char>, k: &mut usize) -> bool {
        let Some(scan) = self.named.as_ref() else {
            return false;
        };
        let name_start = scan.name_start;
        let options_start = scan.options_start;
        let opening = self.settings.opening_brace;
        let closing = self.settings.closing_brace;

        if let Some(options_start) = options_start {
            if c == ')' && (next == Some(':') || next == Some(closing)) {
                let name_end = options_start - 1;
                let text = self.text;
                let options = &text[options_start..i];
                if next == Some(':') {
                    // consume the ':' that ends the prefix
                    *k += 2;
                    self.accept_named(name_start, name_end, Some(options), i + 2);
                } else {
                    *k += 1;
                    self.accept_named(name_start, name_end, Some(options), i + 1);
                }
                return true;
            }
            if c == opening || c == closing {
                self.named = None;
                return false;
            }
            *k += 1;
            return true;
        }

        if c == '(' {
            if i == name_start {
                self.named = None;
                return false;
            }
            if let Some(scan) = self.named.as_mut() {
                scan.options_start = Some(i + 1);
            }
            *k += 1;
            return true;
        }
        if c == ':' {
            if i == name_start {
                self.named = None;
                return false;
            }
            *k += 1;
            self.accept_named(name_start, i, None, i + 1);
            return true;
        }
        if c == closing {
            if i > name_start {
                self.accept_named(name_start, i, None, i);
            }
            self.named = None;
            return false;
        }
        if c == opening || c.is_whitespace() || c == self.settings.escape_char {
            self.named = None;
        }
        false
    }

    /// Validates a named formatter prefix. A known name moves the start of
    /// the current format past the prefix; an unknown one leaves the prefix
    /// as literal text.
    fn accept_named(&mut self, name_start: usize, name_end: usize, options: Option<&str>, body_start: usize) {
        self.named = None;
        let text = self.text;
        let name = &text[name_start..name_end];
        let known = self
            .names
            .iter()
            .any(|known| self.case_sensitivity.matches(known, name));
        if !known {
            self.last = self.format.start;
            return;
        }
        if let Some(frame) = self.stack.last_mut() {
            frame.placeholder.formatter_name = Some(name.to_string());
            frame.placeholder.formatter_options = options.map(str::to_string);
        }
        self.last = body_start;
        self.format.start = body_start;
    }

    fn open_placeholder(&mut self, i: usize, width: usize) {
        self.format.has_nested = true;
        self.current_placeholder = Some(Placeholder::new(self.source.clone(), i, self.stack.len() + 1));
        self.last = i + width;
        self.operator_start = i + width;
        self.selector_index = 0;
    }

    fn close_format(&mut self, i: usize, width: usize) {
        self.named = None;
        let Some(Frame {
            parent,
            mut placeholder,
        }) = self.stack.pop()
        else {
            self.errors
                .add(ParsingError::TooManyClosingBraces, i, i + width);
            self.last = i + width;
            return;
        };
        let mut child = mem::replace(&mut self.format, parent);
        child.end = i;
        placeholder.format = Some(child);
        placeholder.end = i + width;
        self.format.items.push(FormatItem::Placeholder(placeholder));
        self.last = i + width;
    }

    /// Closes the pending selector at `i`, or reports a dangling operator.
    fn finish_selectors(&mut self, i: usize) {
        if i > self.last {
            self.push_selector(i);
            return;
        }
        let pending = &self.text[self.operator_start..i];
        if !pending.is_empty() && !pending.chars().all(|c| c == ']') {
            self.errors
                .add(ParsingError::TrailingOperatorsInSelector, self.operator_start, i);
        }
    }

    fn push_selector(&mut self, end: usize) {
        let selector = Selector::new(
            self.source.clone(),
            self.last,
            end,
            self.operator_start,
            self.selector_index,
        );
        self.selector_index += 1;
        if let Some(placeholder) = self.current_placeholder.as_mut() {
            placeholder.selectors.push(selector);
        }
    }

    fn flush_literal(&mut self, end: usize) {
        if end <= self.last {
            return;
        }
        let escape = self
            .settings
            .convert_character_literals
            .then_some(self.settings.escape_char);
        self.format.items.push(FormatItem::Literal(LiteralText::new(
            self.source.clone(),
            self.last,
            end,
            escape,
        )));
    }

    fn finish(mut self) -> (Format, ParsingErrors) {
        let len = self.text.len();
        let mut unclosed = false;

        if let Some(mut placeholder) = self.current_placeholder.take() {
            if len > self.last {
                let selector = Selector::new(
                    self.source.clone(),
                    self.last,
                    len,
                    self.operator_start,
                    self.selector_index,
                );
                placeholder.selectors.push(selector);
            }
            placeholder.end = len;
            self.format.items.push(FormatItem::Placeholder(placeholder));
            unclosed = true;
        } else {
            self.flush_literal(len);
        }

        while let Some(Frame {
            parent,
            mut placeholder,
        }) = self.stack.pop()
        {
            let mut child = mem::replace(&mut self.format, parent);
            child.end = len;
            placeholder.format = Some(child);
            placeholder.end = len;
            self.format.items.push(FormatItem::Placeholder(placeholder));
            unclosed = true;
        }

        if unclosed {
            self.errors.add(ParsingError::MissingClosingBrace, len, len);
        }
        self.format.end = len;
        (self.format, self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholder(format: &Format, index: usize) -> &Placeholder {
        match &format.items()[index] {
            FormatItem::Placeholder(p) => p,
            FormatItem::Literal(l) => panic!("expected placeholder, got literal {:?}", l.raw_text()),
        }
    }

    #[test]
    fn selector_operators_are_recorded() {
        let (format, errors) = Parser::default().parse("{a.b[0]}", &[]);
        assert!(errors.is_empty());
        let p = placeholder(&format, 0);
        let ops: Vec<_> = p.selectors().iter().map(|s| (s.operator(), s.text())).collect();
        assert_eq!(ops, vec![("", "a"), (".", "b"), ("[", "0")]);
    }

    #[test]
    fn trailing_dot_is_reported() {
        let (_, errors) = Parser::default().parse("{a.}", &[]);
        assert_eq!(errors.issues()[0].kind, ParsingError::TrailingOperatorsInSelector);
        assert_eq!(errors.issues()[0].span(), 2..3);
    }

    #[test]
    fn unknown_named_prefix_stays_literal() {
        let (format, errors) = Parser::default().parse("{x:foo(1):bar}", &["choose"]);
        assert!(errors.is_empty());
        let p = placeholder(&format, 0);
        assert_eq!(p.formatter_name(), None);
        assert_eq!(p.format().map(Format::raw_text), Some("foo(1):bar"));
    }

    #[test]
    fn bare_name_before_closing_brace() {
        let (format, _) = Parser::default().parse("{x:list}", &["list"]);
        let p = placeholder(&format, 0);
        assert_eq!(p.formatter_name(), Some("list"));
        assert_eq!(p.format().map(Format::is_empty), Some(true));
    }
}
