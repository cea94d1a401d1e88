//! Output formatting module
//!
//! Prints single records (target, space, credentials) as a key/value
//! table, JSON or YAML.

use comfy_table::{presets::NOTHING, Table};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::Result;

/// Render `record` in the requested format
pub fn render<T: Serialize>(record: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(&serde_json::to_value(record)?)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Yaml => Ok(serde_yml::to_string(record)?.trim_end().to_string()),
    }
}

/// Print `record` to stdout in the requested format
pub fn output_record<T: Serialize>(record: &T, format: OutputFormat) -> Result<()> {
    println!("{}", render(record, format)?);
    Ok(())
}

fn render_table(value: &serde_json::Value) -> String {
    let serde_json::Value::Object(fields) = value else {
        return cell(value);
    };

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(vec!["Field", "Value"]);
    for (key, value) in fields {
        table.add_row(vec![key.clone(), cell(value)]);
    }
    table.to_string()
}

/// Strings as-is, nested values as compact JSON
fn cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
