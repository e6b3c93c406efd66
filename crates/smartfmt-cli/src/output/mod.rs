//! Terminal output helpers.

pub mod diagnostic;
pub mod table;

use miette::{IntoDiagnostic, Result};
use serde::Serialize;

/// Prints `value` as pretty JSON on stdout.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{json}");
    Ok(())
}
