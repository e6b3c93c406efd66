//! Miette diagnostics for template parse issues.

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use smartfmt::{ParsingError, ParsingErrors};
use thiserror::Error;

/// All parse issues of one template, rendered with labels on the template text.
#[derive(Debug, Error, Diagnostic)]
#[error("template has {count} parse issue(s)")]
#[diagnostic(code(smartfmt::parse))]
pub struct TemplateDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label(collection)]
    labels: Vec<LabeledSpan>,

    count: usize,

    #[help]
    help: Option<String>,
}

impl TemplateDiagnostic {
    pub fn from_errors(name: &str, errors: &ParsingErrors) -> Self {
        let len = errors.template().len();
        let labels = errors
            .issues()
            .iter()
            .map(|issue| {
                let start = issue.start.min(len);
                let width = issue.end.min(len).saturating_sub(start);
                LabeledSpan::new_with_span(
                    Some(issue.kind.message().to_string()),
                    SourceSpan::from((start, width)),
                )
            })
            .collect();
        TemplateDiagnostic {
            src: NamedSource::new(name, errors.template().to_string()),
            labels,
            count: errors.len(),
            help: help_for(errors),
        }
    }
}

fn help_for(errors: &ParsingErrors) -> Option<String> {
    let first = errors.issues().first()?;
    let help = match first.kind {
        ParsingError::TooManyClosingBraces => "double a literal brace as `}}` to escape it",
        ParsingError::MissingClosingBrace => "close every `{` with a matching `}`",
        ParsingError::TrailingOperatorsInSelector => "remove the trailing `.` or `,` from the selector",
        ParsingError::InvalidCharactersInSelector => {
            "selectors may only contain letters, digits and the configured selector characters"
        }
    };
    Some(help.to_string())
}
