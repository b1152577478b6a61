use colored::Colorize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::OutputFormat;

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_value(value: &Value, format: OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{s}"),
            Err(_) => println!("{value}"),
        },
        OutputFormat::Table => print_import_request(value),
    }
}

/// Renders one import request as a two-column table.
pub fn print_import_request(value: &Value) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for key in [
        "id",
        "status",
        "requested_at",
        "finished_at",
        "pages_processed",
        "rows_imported",
        "rows_failed",
        "error_message",
    ] {
        builder.push_record([key, &field(value, key)]);
    }
    let table = builder.build().with(Style::rounded()).to_string();
    println!("{table}");

    if let Some(status) = value.get("status").and_then(|v| v.as_str()) {
        let colored = match status {
            "success" => status.green(),
            "partial" => status.yellow(),
            "error" => status.red(),
            other => other.normal(),
        };
        println!("Status: {colored}");
    }
}

fn field(value: &Value, key: &str) -> String {
    match value.get(key) {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_render_as_dash() {
        let v = json!({"id": "abc", "rows_imported": 3});
        assert_eq!(field(&v, "id"), "abc");
        assert_eq!(field(&v, "rows_imported"), "3");
        assert_eq!(field(&v, "error_message"), "-");
    }
}
