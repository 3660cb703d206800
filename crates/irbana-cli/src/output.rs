//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use serde_json::Value;
use tabled::{Table, Tabled};

use irbana_client::Page;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{}", json);
        }
    }
}

/// Print one page of a list endpoint. Tables get a pagination footer; JSON
/// gets the raw page including its pagination block.
pub fn print_page<T, R>(page: &Page<T>, format: OutputFormat)
where
    T: Serialize,
    R: Serialize + Tabled + for<'a> From<&'a T>,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = page.items.iter().map(R::from).collect();
            print_list(&rows, format);
            if let Some(p) = page.pagination.filter(|p| p.pages > 1) {
                println!("Page {} of {} ({} total)", p.page, p.pages, p.total);
            }
        }
        OutputFormat::Json => print_item(page, format),
    }
}

/// Print a single item in the selected format
pub fn print_item<T: Serialize>(item: &T, format: OutputFormat) {
    let value = serde_json::to_value(item).unwrap_or(Value::Null);
    match format {
        OutputFormat::Table => match value {
            Value::Object(map) => {
                for (key, value) in &map {
                    if !value.is_null() {
                        print_kv(key, &display_value(value));
                    }
                }
            }
            other => println!("{}", display_value(&other)),
        },
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string());
            println!("{}", json);
        }
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {}", msg);
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{}:", key), value);
}

/// Render a JSON value for a table cell.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render an optional cell.
pub fn cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Render an optional amount with two decimals.
pub fn money(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("Ana")), "Ana");
        assert_eq!(display_value(&json!(12)), "12");
        assert_eq!(display_value(&Value::Null), "");
    }

    #[test]
    fn test_cells() {
        assert_eq!(cell(Some(3)), "3");
        assert_eq!(cell(None::<String>), "");
        assert_eq!(money(Some(1500.5)), "1500.50");
        assert_eq!(money(None), "");
    }
}
