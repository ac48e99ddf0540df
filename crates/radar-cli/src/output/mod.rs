use radar_query::Table;
use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_value_table(&serde_json::to_value(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Render query rows, keeping the query's column order.
///
/// `json` is an array of records, `raw` one record per line.
pub fn render_query(result: &Table, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&result.to_records())?),
        OutputFormat::Raw => {
            let mut out = String::new();
            for record in result.to_records() {
                out.push_str(&serde_json::to_string(&record)?);
                out.push('\n');
            }
            Ok(out.trim_end().to_string())
        }
        OutputFormat::Table => {
            if result.is_empty() {
                return Ok(String::from("(no rows)"));
            }
            let headers = result.columns.iter().map(String::as_str).collect::<Vec<_>>();
            let rows = result
                .rows
                .iter()
                .map(|row| row.iter().map(ToString::to_string).collect())
                .collect::<Vec<Vec<String>>>();
            Ok(table::render_rows(
                &headers,
                &rows,
                table::TableOptions::from_env(),
            ))
        }
    }
}

/// `1234567` -> `1,234,567`.
#[must_use]
pub fn format_count(count: usize) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn render_value_table(value: &Value) -> anyhow::Result<String> {
    let options = table::TableOptions::from_env();
    match value {
        Value::Array(items) if items.is_empty() => Ok(String::from("(no rows)")),
        Value::Array(items) => {
            let headers = items
                .iter()
                .filter_map(Value::as_object)
                .flat_map(|map| map.keys().cloned())
                .fold(Vec::<String>::new(), |mut headers, key| {
                    if !headers.contains(&key) {
                        headers.push(key);
                    }
                    headers
                });
            if headers.is_empty() {
                let rows = items.iter().map(|item| vec![value_to_cell(item)]).collect::<Vec<_>>();
                return Ok(table::render_rows(&["value"], &rows, options));
            }
            let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
            let rows = items
                .iter()
                .map(|item| {
                    headers
                        .iter()
                        .map(|header| item.get(header).map_or_else(String::new, value_to_cell))
                        .collect()
                })
                .collect::<Vec<Vec<String>>>();
            Ok(table::render_rows(&header_refs, &rows, options))
        }
        Value::Object(map) => {
            let mut rows = Vec::new();
            flatten_object("", map, &mut rows);
            Ok(table::render_rows(&["key", "value"], &rows, options))
        }
        scalar => Ok(table::render_rows(
            &["value"],
            &[vec![value_to_cell(scalar)]],
            options,
        )),
    }
}

/// Nested objects become dotted keys, matching the config file layout.
fn flatten_object(prefix: &str, map: &serde_json::Map<String, Value>, rows: &mut Vec<Vec<String>>) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(inner) => flatten_object(&path, inner, rows),
            other => rows.push(vec![path, value_to_cell(other)]),
        }
    }
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => other.to_string(),
    }
}
