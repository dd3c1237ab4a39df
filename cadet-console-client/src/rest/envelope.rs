//! List response normalization
//!
//! Backends answer list requests either with a bare array or with an
//! envelope object. Both collapse into one [`ListPage`].

use serde_json::Value;

use crate::types::{ListPage, Record};

/// Keys that may hold the items of an envelope, in lookup order.
const ITEM_KEYS: [&str; 4] = ["items", "data", "results", "content"];

/// Keys that may hold the total count of an envelope, in lookup order.
const TOTAL_KEYS: [&str; 5] = ["total", "count", "total_count", "totalCount", "totalElements"];

/// Normalize a decoded list body.
///
/// - bare array of `N` objects: `total = N`
/// - envelope: items under one of [`ITEM_KEYS`], total under one of
///   [`TOTAL_KEYS`]; a missing or zero total falls back to the item count
///
/// Any other shape, or an item that is not an object, is an error message.
pub(crate) fn normalize_list(body: Value) -> Result<ListPage, String> {
    match body {
        Value::Array(entries) => {
            let items = into_records(entries)?;
            let total = items.len() as u64;
            Ok(ListPage::new(items, total))
        }
        Value::Object(mut map) => {
            let Some(entries) = ITEM_KEYS.iter().find_map(|key| match map.remove(*key) {
                Some(Value::Array(entries)) => Some(entries),
                _ => None,
            }) else {
                return Err(format!(
                    "list envelope has none of the item keys {ITEM_KEYS:?}"
                ));
            };
            let items = into_records(entries)?;
            let reported = TOTAL_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_u64))
                .unwrap_or(0);
            let total = if reported == 0 {
                items.len() as u64
            } else {
                reported
            };
            Ok(ListPage::new(items, total))
        }
        other => Err(format!("unexpected list body: {}", type_name(&other))),
    }
}

fn into_records(entries: Vec<Value>) -> Result<Vec<Record>, String> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let kind = type_name(&entry);
            Record::from_value(entry)
                .ok_or_else(|| format!("list item {index} is {kind}, expected an object"))
        })
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
