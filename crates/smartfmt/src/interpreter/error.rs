//! Error types for the formatting engine.

use strsim::levenshtein;
use thiserror::Error;

use crate::parser::ParsingErrors;

/// An error that occurred while formatting a template.
#[derive(Debug, Clone, Error)]
pub enum FormatError {
    /// The template failed to parse and the parse-error action is `ThrowError`.
    #[error(transparent)]
    Parse(#[from] ParsingErrors),

    /// No source could resolve a selector.
    #[error("could not evaluate the selector '{selector}' (index {index}) in '{placeholder}'")]
    UnresolvedSelector {
        placeholder: String,
        selector: String,
        index: usize,
    },

    /// No formatter handled the placeholder.
    #[error(
        "no suitable formatter could be found for '{placeholder}'{}",
        describe_formatter(.formatter, .suggestions)
    )]
    NoSuitableFormatter {
        placeholder: String,
        formatter: Option<String>,
        suggestions: Vec<String>,
    },

    /// A formatter rejected its options or format.
    #[error("{formatter} formatter failed on '{placeholder}': {message}")]
    Formatter {
        formatter: &'static str,
        placeholder: String,
        message: String,
    },
}

/// An error in formatter or pseudo-locale configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The language code is not a valid BCP-47 identifier.
    #[error("invalid language identifier '{language}'")]
    InvalidLanguage { language: String },

    /// The language is valid but has no data for this component.
    #[error("the {component} does not support language '{language}', available: {}", available.join(", "))]
    UnsupportedLanguage {
        component: &'static str,
        language: String,
        available: Vec<String>,
    },
}

fn describe_formatter(formatter: &Option<String>, suggestions: &[String]) -> String {
    match formatter {
        None => String::new(),
        Some(name) if suggestions.is_empty() => format!(" with formatter name '{name}'"),
        Some(name) => format!(
            " with formatter name '{name}' (did you mean: {}?)",
            suggestions.join(", ")
        ),
    }
}

/// Compute "did you mean?" suggestions for a misspelled name.
///
/// Names of three characters or fewer allow one edit, longer names two.
/// Returns at most three suggestions, closest first.
pub fn compute_suggestions(target: &str, available: &[String]) -> Vec<String> {
    let max_distance = if target.chars().count() <= 3 { 1 } else { 2 };
    let mut candidates: Vec<(usize, &String)> = available
        .iter()
        .map(|name| (levenshtein(target, name), name))
        .filter(|&(distance, _)| distance > 0 && distance <= max_distance)
        .collect();
    candidates.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    candidates.dedup_by(|a, b| a.1 == b.1);
    candidates
        .into_iter()
        .take(3)
        .map(|(_, name)| name.clone())
        .collect()
}
