//! Implementation of the `smartfmt check` command.

use std::fs::read_to_string;
use std::path::PathBuf;

use miette::{Report, Result, miette};
use owo_colors::OwoColorize;
use serde::Serialize;
use smartfmt::{ParsingIssue, SmartFormatter, SmartSettings};

use crate::commands::load_json;
use crate::output::diagnostic::TemplateDiagnostic;
use crate::output::print_json;

/// Arguments for the check command.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Template text to check
    #[arg(short, long, conflicts_with = "files")]
    pub template: Option<String>,

    /// Files to check; each line is one template
    #[arg(required_unless_present = "template")]
    pub files: Vec<PathBuf>,

    /// JSON settings file
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct CheckedTemplate {
    source: String,
    template: String,
    issues: Vec<ParsingIssue>,
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> Result<i32> {
    let settings: SmartSettings = match &args.settings {
        Some(path) => load_json(path)?,
        None => SmartSettings::default(),
    };
    let formatter = SmartFormatter::builder().settings(settings).build();

    let mut inputs = Vec::new();
    if let Some(template) = &args.template {
        inputs.push(("<template>".to_string(), template.clone()));
    }
    for path in &args.files {
        let content = read_to_string(path)
            .map_err(|e| miette!("cannot read {}: {e}", path.display()))?;
        for (line, text) in content.lines().enumerate() {
            if !text.trim().is_empty() {
                inputs.push((format!("{}:{}", path.display(), line + 1), text.to_string()));
            }
        }
    }

    let mut checked = Vec::new();
    for (source, template) in inputs {
        let parsed = formatter.parse(&template);
        if !args.json && parsed.errors().has_issues() {
            let report = Report::new(TemplateDiagnostic::from_errors(&source, parsed.errors()));
            eprintln!("{report:?}");
        }
        checked.push(CheckedTemplate {
            source,
            issues: parsed.errors().issues().to_vec(),
            template,
        });
    }

    let failed = checked.iter().filter(|c| !c.issues.is_empty()).count();
    if args.json {
        print_json(&checked)?;
    } else if failed == 0 {
        println!("{} {} template(s) ok", "✓".green(), checked.len());
    } else {
        println!("{} {failed} of {} template(s) have issues", "✗".red(), checked.len());
    }

    Ok(if failed == 0 { exitcode::OK } else { exitcode::DATAERR })
}
