//! CLI command implementations.

mod check;
mod format;
mod pseudo;

pub use check::{CheckArgs, run_check};
pub use format::{FormatArgs, run_format};
pub use pseudo::{PseudoArgs, run_pseudo};

use std::fs::read_to_string;
use std::path::Path;

use miette::{Result, miette};
use serde::de::DeserializeOwned;

/// Reads and deserializes a JSON file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = read_to_string(path)
        .map_err(|e| miette!("cannot read {}: {e}", path.display()))?;
    serde_json::from_str(&content).map_err(|e| miette!("invalid JSON in {}: {e}", path.display()))
}
