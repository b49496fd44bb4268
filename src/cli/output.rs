// Output formatting for CLI

use crate::cli::config::OutputFormat;
use crate::cli::CliResult;
use serde::Serialize;
use std::io::Write;

/// Format and output reports
pub struct OutputFormatter {
    format: OutputFormat,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }

    /// Output any serializable report
    pub fn output<T: Serialize>(&self, report: &T, writer: &mut impl Write) -> CliResult<()> {
        let value = serde_json::to_value(report)?;
        self.output_value(&value, writer)
    }

    pub fn output_value(&self, value: &serde_json::Value, writer: &mut impl Write) -> CliResult<()> {
        match self.format {
            OutputFormat::Pretty => {
                writeln!(writer, "{}", serde_json::to_string_pretty(value)?)?;
            }
            OutputFormat::Json => {
                writeln!(writer, "{}", serde_json::to_string(value)?)?;
            }
            OutputFormat::KeyValue => {
                for (key, value) in flatten(value) {
                    writeln!(writer, "{}: {}", key, value)?;
                }
            }
            OutputFormat::Table => {
                let rows = flatten(value);
                let max_key_len = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);

                writeln!(writer, "{}", "=".repeat(max_key_len + 30))?;
                for (key, value) in &rows {
                    writeln!(writer, "{:<width$} {}", format!("{}:", key), value, width = max_key_len + 2)?;
                }
                writeln!(writer, "{}", "=".repeat(max_key_len + 30))?;
            }
        }
        Ok(())
    }

    /// Print success message
    pub fn print_success(&self, message: &str) {
        if !self.quiet {
            println!("✓ {}", message);
        }
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }

    /// Print info message
    pub fn print_info(&self, message: &str) {
        if !self.quiet {
            println!("  {}", message);
        }
    }
}

/// Flatten nested objects into dotted keys
fn flatten(value: &serde_json::Value) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    flatten_into("", value, &mut rows);
    rows
}

fn flatten_into(prefix: &str, value: &serde_json::Value, rows: &mut Vec<(String, String)>) {
    match value {
        serde_json::Value::Object(obj) if !obj.is_empty() => {
            for (key, value) in obj {
                let key = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_into(&key, value, rows);
            }
        }
        other => rows.push((prefix.to_string(), format_value(other))),
    }
}

/// Format a JSON value for display
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "(null)".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Array(arr) => {
            if arr.is_empty() {
                "[]".to_string()
            } else {
                let items: Vec<String> = arr.iter().map(format_value).collect();
                format!("[{}]", items.join(", "))
            }
        }
        serde_json::Value::Object(_) => "{}".to_string(),
    }
}
