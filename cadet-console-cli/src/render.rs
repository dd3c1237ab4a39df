//! Plain-text rendering of controller views.

use std::fmt::Write as _;

use cadet_console_core::schema::{value_text, FieldKind};
use cadet_console_core::state::PageLink;
use cadet_console_core::{CoreError, Notification, Record, ResourceSchema};
use serde_json::Value;

/// Column-aligned table with the schema's headers.
pub fn table(schema: &ResourceSchema, rows: &[Vec<String>]) -> String {
    let headers: Vec<&str> = schema.columns.iter().map(|c| c.header.as_str()).collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = aligned(headers.iter().copied(), &widths);
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&aligned(rule.iter().map(String::as_str), &widths));
    if rows.is_empty() {
        let _ = write!(out, "\n(no {})", schema.plural.to_lowercase());
    }
    for row in rows {
        out.push('\n');
        out.push_str(&aligned(row.iter().map(String::as_str), &widths));
    }
    out
}

fn aligned<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// `1 … 4 [5] 6 … 10`
pub fn page_window(links: &[PageLink]) -> String {
    links
        .iter()
        .map(|link| match link {
            PageLink::Page {
                number,
                current: true,
            } => format!("[{number}]"),
            PageLink::Page { number, .. } => number.to_string(),
            PageLink::Gap => "…".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Every declared field of one record, group entries indented below.
pub fn detail(schema: &ResourceSchema, record: &Record) -> String {
    let mut out = String::new();
    for spec in &schema.fields {
        match &spec.kind {
            FieldKind::Group {
                entry_label,
                fields,
            } => {
                let _ = writeln!(out, "{}:", spec.label);
                let entries = record
                    .get(&spec.name)
                    .and_then(Value::as_array)
                    .map_or(&[][..], Vec::as_slice);
                if entries.is_empty() {
                    out.push_str("  (none)\n");
                }
                for (n, entry) in entries.iter().enumerate() {
                    let _ = writeln!(out, "  {entry_label} {}", n + 1);
                    for sub in fields {
                        let text = entry.get(&sub.name).map(value_text).unwrap_or_default();
                        let _ = writeln!(out, "    {}: {}", sub.label, or_na(text));
                    }
                }
            }
            _ => {
                let text = record.get(&spec.name).map(value_text).unwrap_or_default();
                let _ = writeln!(out, "{}: {}", spec.label, or_na(text));
            }
        }
    }
    out
}

fn or_na(text: String) -> String {
    if text.is_empty() {
        "N/A".to_string()
    } else {
        text
    }
}

pub fn pairs(items: &[(String, String)]) -> String {
    let width = items.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    items.iter().fold(String::new(), |mut out, (label, value)| {
        let _ = writeln!(out, "{label:<width$}  {value}");
        out
    })
}

pub fn print_notification(note: &Notification) {
    eprintln!("[{}] {}", note.kind.as_str(), note.message);
}

/// Field errors are listed one per line; anything else prints its message chain.
pub fn print_failure(err: &anyhow::Error) {
    match err.downcast_ref::<CoreError>() {
        Some(core @ CoreError::Validation(errors)) => {
            eprintln!("error: {}", core.user_message());
            for field in errors {
                eprintln!("  {}: {}", field.key, field.message);
            }
        }
        Some(core) => eprintln!("error: {}", core.user_message()),
        None => eprintln!("error: {err:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadet_console_core::school_schema;
    use cadet_console_core::state::PageState;
    use serde_json::json;

    #[test]
    fn window_marks_current_and_gaps() {
        let page = PageState {
            page: 5,
            page_size: 10,
            total: 100,
        };
        assert_eq!(page_window(&page.window()), "1 … 4 [5] 6 … 10");
    }

    #[test]
    fn table_aligns_columns_and_notes_empty() {
        let schema = school_schema().unwrap();
        let empty = table(&schema, &[]);
        assert!(empty.ends_with("(no schools)"));

        let cells = vec![vec!["x".to_string(); schema.columns.len()]];
        let out = table(&schema, &cells);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with(&schema.columns[0].header));
    }

    #[test]
    fn detail_lists_group_entries() {
        let schema = school_schema().unwrap();
        let record = Record::from_value(json!({
            "name": "Shree School",
            "training_sessions": [{"ncc_batch": "2024", "division": "junior"}]
        }))
        .unwrap();
        let out = detail(&schema, &record);
        assert!(out.contains("Shree School"));
        assert!(out.contains("2024"));
        assert!(out.contains("N/A"));
    }

    #[test]
    fn pairs_align_labels() {
        let out = pairs(&[
            ("Total Schools".to_string(), "3".to_string()),
            ("Active".to_string(), "2".to_string()),
        ]);
        assert_eq!(out, "Total Schools  3\nActive         2\n");
    }
}
