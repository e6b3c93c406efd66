//! Parse issue types.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::ops::Range;

use serde::Serialize;
use thiserror::Error;

/// The kind of problem found while scanning a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsingError {
    /// A closing brace with no matching opening brace.
    TooManyClosingBraces,
    /// A selector chain that ends with an operator, e.g. `{a.}`.
    TrailingOperatorsInSelector,
    /// A character that is neither a selector character nor an operator.
    InvalidCharactersInSelector,
    /// The template ended while a placeholder was still open.
    MissingClosingBrace,
}

impl ParsingError {
    /// Human-readable description of this kind of issue.
    pub fn message(self) -> &'static str {
        match self {
            ParsingError::TooManyClosingBraces => "format string has too many closing braces",
            ParsingError::TrailingOperatorsInSelector => {
                "there are illegal trailing operators in the selector"
            }
            ParsingError::InvalidCharactersInSelector => "invalid character in the selector",
            ParsingError::MissingClosingBrace => "format string is missing a closing brace",
        }
    }
}

impl Display for ParsingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.message())
    }
}

/// One issue with its byte span in the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsingIssue {
    pub kind: ParsingError,
    pub start: usize,
    pub end: usize,
}

impl ParsingIssue {
    /// Byte range the issue applies to. Empty for issues at end of input.
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// All issues found by one parse.
///
/// The parser always produces a complete AST; this collects what had to be
/// repaired along the way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", describe(.template, .issues))]
pub struct ParsingErrors {
    template: String,
    issues: Vec<ParsingIssue>,
}

impl ParsingErrors {
    pub(crate) fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
            issues: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, kind: ParsingError, start: usize, end: usize) {
        self.issues.push(ParsingIssue { kind, start, end });
    }

    /// The issues, in the order they were found.
    pub fn issues(&self) -> &[ParsingIssue] {
        &self.issues
    }

    /// The template that was parsed.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Whether any issue was recorded.
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Number of recorded issues.
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Whether no issue was recorded.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

fn describe(template: &str, issues: &[ParsingIssue]) -> String {
    let plural = if issues.len() == 1 { "" } else { "s" };
    let details: Vec<String> = issues
        .iter()
        .map(|issue| format!("{} at {}..{}", issue.kind, issue.start, issue.end))
        .collect();
    format!(
        "the format string has {} issue{plural}: {} in \"{template}\"",
        issues.len(),
        details.join("; ")
    )
}
