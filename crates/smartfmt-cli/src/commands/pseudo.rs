//! Implementation of the `smartfmt pseudo` command.

use std::io::{self, BufRead};
use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use smartfmt::PseudoLocale;
use tracing::debug;

use crate::commands::load_json;
use crate::output::print_json;
use crate::output::table::{PseudoRow, format_pseudo_table};

/// Arguments for the pseudo command.
#[derive(Debug, clap::Args)]
pub struct PseudoArgs {
    /// Text to pseudo-localize; lines are read from stdin when omitted
    pub text: Vec<String>,

    /// JSON pseudo-locale configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Show source and pseudo text side by side
    #[arg(long, conflicts_with = "json")]
    pub table: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct PseudoOutput {
    source: String,
    pseudo: String,
}

/// Run the pseudo command.
pub fn run_pseudo(args: PseudoArgs) -> Result<i32> {
    let mut locale: PseudoLocale = match &args.config {
        Some(path) => load_json(path)?,
        None => PseudoLocale::default(),
    };
    debug!(methods = locale.methods.len(), "loaded pseudo-locale");

    let inputs = if args.text.is_empty() {
        io::stdin()
            .lock()
            .lines()
            .collect::<Result<Vec<_>, _>>()
            .into_diagnostic()?
    } else {
        args.text
    };

    let rows: Vec<PseudoRow> = inputs
        .into_iter()
        .map(|source| PseudoRow {
            pseudo: locale.pseudo_string(&source),
            source,
        })
        .collect();

    if args.json {
        let output: Vec<PseudoOutput> = rows
            .into_iter()
            .map(|row| PseudoOutput {
                source: row.source,
                pseudo: row.pseudo,
            })
            .collect();
        print_json(&output)?;
    } else if args.table {
        println!("{}", format_pseudo_table(&rows));
    } else {
        for row in &rows {
            println!("{}", row.pseudo);
        }
    }
    Ok(exitcode::OK)
}
