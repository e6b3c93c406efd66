//! Implementation of the `smartfmt format` command.

use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use smartfmt::extensions::{PluralFormatter, TimeFormatter};
use smartfmt::{SmartFormatter, SmartSettings, Value, VariablesGroup};
use tracing::{debug, warn};

use crate::commands::load_json;
use crate::output::print_json;

/// Arguments for the format command.
#[derive(Debug, clap::Args)]
pub struct FormatArgs {
    /// Template to format
    #[arg(short, long)]
    pub template: String,

    /// Positional argument (repeatable). Integers, decimals, true, false and
    /// null are typed; anything else is a string.
    #[arg(short = 'a', long = "arg")]
    pub args: Vec<String>,

    /// Global variable as group.name=value (repeatable)
    #[arg(long = "var", value_parser = parse_variable)]
    pub vars: Vec<Variable>,

    /// Language for plural rules and time units
    #[arg(long)]
    pub lang: Option<String>,

    /// JSON settings file
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// A `--var group.name=value` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub group: String,
    pub name: String,
    pub value: String,
}

#[derive(Serialize)]
struct FormatOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn parse_variable(s: &str) -> Result<Variable, String> {
    let invalid = || format!("invalid variable '{s}': expected group.name=value");
    let (path, value) = s.split_once('=').ok_or_else(invalid)?;
    let (group, name) = path.split_once('.').ok_or_else(invalid)?;
    if group.is_empty() || name.is_empty() {
        return Err(invalid());
    }
    Ok(Variable {
        group: group.to_string(),
        name: name.to_string(),
        value: value.to_string(),
    })
}

/// Converts a command-line argument to a typed value.
pub fn parse_value(text: &str) -> Value {
    if let Ok(n) = text.parse::<i64>() {
        return Value::from(n);
    }
    if text.chars().any(|c| c.is_ascii_digit())
        && let Ok(f) = text.parse::<f64>()
    {
        return Value::from(f);
    }
    match text {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => Value::from(text),
    }
}

fn build_formatter(args: &FormatArgs) -> Result<SmartFormatter> {
    let settings: SmartSettings = match &args.settings {
        Some(path) => load_json(path)?,
        None => SmartSettings::default(),
    };
    let builder = SmartFormatter::builder().settings(settings);
    let formatter = match &args.lang {
        Some(lang) => {
            let plural = PluralFormatter::new(lang).into_diagnostic()?;
            let time = TimeFormatter::new(lang).unwrap_or_else(|error| {
                warn!(%error, "using English time units");
                TimeFormatter::default()
            });
            builder.plural(plural).time(time).build()
        }
        None => builder.build(),
    };

    for var in &args.vars {
        let group = match formatter.globals().get(&var.group) {
            Some(group) => group,
            None => {
                let group = VariablesGroup::new();
                formatter.globals().add(var.group.clone(), group.clone());
                group
            }
        };
        debug!(group = %var.group, name = %var.name, "setting variable");
        group.set(var.name.clone(), parse_value(&var.value));
    }
    Ok(formatter)
}

/// Run the format command.
pub fn run_format(args: FormatArgs) -> Result<i32> {
    let formatter = build_formatter(&args)?;
    let values: Vec<Value> = args.args.iter().map(|arg| parse_value(arg)).collect();
    let result = match &args.lang {
        Some(lang) => formatter.format_with_language(lang, &args.template, &values),
        None => formatter.format(&args.template, &values),
    };

    match result {
        Ok(text) => {
            if args.json {
                print_json(&FormatOutput {
                    result: Some(text),
                    error: None,
                })?;
            } else {
                println!("{text}");
            }
            Ok(exitcode::OK)
        }
        Err(e) => {
            if args.json {
                print_json(&FormatOutput {
                    result: None,
                    error: Some(e.to_string()),
                })?;
            } else {
                eprintln!("format error: {e}");
            }
            Ok(exitcode::DATAERR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_values() {
        assert_eq!(parse_value("42"), Value::Number(42));
        assert_eq!(parse_value("1.5"), Value::Float(1.5));
        assert_eq!(parse_value("true"), Value::Bool(true));
        assert_eq!(parse_value("null"), Value::Null);
        assert_eq!(parse_value("inf"), Value::from("inf"));
        assert_eq!(parse_value("Ada"), Value::from("Ada"));
    }

    #[test]
    fn variables_need_group_and_name() {
        assert_eq!(
            parse_variable("global.myInt=123"),
            Ok(Variable {
                group: "global".to_string(),
                name: "myInt".to_string(),
                value: "123".to_string(),
            })
        );
        assert!(parse_variable("myInt=123").is_err());
        assert!(parse_variable(".x=1").is_err());
    }
}
