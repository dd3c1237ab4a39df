//! Form state and record binding
//!
//! [`FormState`] is the presentation-free stand-in for an edit form: one text
//! value per scalar field and an ordered list of [`GroupRow`]s per repeatable
//! group. [`FormBinder`] moves data between a form and a plain [`Record`].

use std::collections::BTreeMap;
use std::sync::Arc;

use cadet_console_client::Record;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::schema::{value_text, FieldKind, FieldSpec, ResourceSchema};
use crate::validation::FieldErrorSet;

/// Identity of one group entry within a form session. Never reissued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GroupId(u64);

impl GroupId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One entry of a repeatable group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRow {
    pub id: GroupId,
    values: BTreeMap<String, String>,
}

impl GroupRow {
    fn new(id: GroupId) -> Self {
        Self {
            id,
            values: BTreeMap::new(),
        }
    }

    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map_or("", String::as_str)
    }

    /// Nothing typed into any input of this entry.
    pub fn is_blank(&self) -> bool {
        self.values.values().all(|v| v.trim().is_empty())
    }
}

/// In-memory form.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    values: BTreeMap<String, String>,
    groups: BTreeMap<String, Vec<GroupRow>>,
    next_group_id: u64,
    errors: FieldErrorSet,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map_or("", String::as_str)
    }

    pub fn set_value(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    /// Entries of a group in display order.
    pub fn entries(&self, group: &str) -> &[GroupRow] {
        self.groups.get(group).map_or(&[], Vec::as_slice)
    }

    pub fn entry(&self, group: &str, id: GroupId) -> Option<&GroupRow> {
        self.entries(group).iter().find(|row| row.id == id)
    }

    /// Append a blank entry and return its fresh id.
    pub fn add_entry(&mut self, group: &str) -> GroupId {
        let id = self.allocate_id();
        self.groups
            .entry(group.to_string())
            .or_default()
            .push(GroupRow::new(id));
        id
    }

    /// Remove an entry from anywhere in the list. Returns whether it existed.
    pub fn remove_entry(&mut self, group: &str, id: GroupId) -> bool {
        let Some(rows) = self.groups.get_mut(group) else {
            return false;
        };
        let before = rows.len();
        rows.retain(|row| row.id != id);
        let removed = rows.len() != before;
        if removed {
            self.errors.remove_entry(group, id);
        }
        removed
    }

    /// Set one input of an entry. Returns false when the entry does not exist.
    pub fn set_entry_value(
        &mut self,
        group: &str,
        id: GroupId,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        let row = self
            .groups
            .get_mut(group)
            .and_then(|rows| rows.iter_mut().find(|row| row.id == id));
        match row {
            Some(row) => {
                row.values.insert(field.into(), value.into());
                true
            }
            None => false,
        }
    }

    pub fn errors(&self) -> &FieldErrorSet {
        &self.errors
    }

    pub fn set_errors(&mut self, errors: FieldErrorSet) {
        self.errors = errors;
    }

    pub fn clear_errors(&mut self) {
        self.errors = FieldErrorSet::default();
    }

    fn allocate_id(&mut self) -> GroupId {
        self.next_group_id += 1;
        GroupId(self.next_group_id)
    }

    /// Drop all values and entries but keep the id allocator running.
    fn clear(&mut self) {
        self.values.clear();
        self.groups.clear();
        self.clear_errors();
    }
}

/// Binds records of one schema to forms.
#[derive(Debug, Clone)]
pub struct FormBinder {
    schema: Arc<ResourceSchema>,
}

impl FormBinder {
    pub fn new(schema: Arc<ResourceSchema>) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &ResourceSchema {
        &self.schema
    }

    /// A fresh form with one blank entry per group.
    pub fn blank_form(&self) -> FormState {
        let mut form = FormState::new();
        self.reset(&mut form);
        form
    }

    /// Fill every declared field from `record`. Group entries get fresh ids;
    /// a record without entries still gets one blank row to fill in.
    pub fn populate(&self, form: &mut FormState, record: &Record) {
        form.clear();
        for spec in &self.schema.fields {
            match &spec.kind {
                FieldKind::Group { fields, .. } => {
                    let entries = record
                        .get(&spec.name)
                        .and_then(Value::as_array)
                        .map(Vec::as_slice)
                        .unwrap_or_default();
                    for entry in entries {
                        let id = form.add_entry(&spec.name);
                        for sub in fields {
                            let text = entry.get(&sub.name).map(value_text).unwrap_or_default();
                            form.set_entry_value(&spec.name, id, sub.name.clone(), text);
                        }
                    }
                    if form.entries(&spec.name).is_empty() {
                        form.add_entry(&spec.name);
                    }
                }
                _ => {
                    let text = record.get(&spec.name).map(value_text).unwrap_or_default();
                    form.set_value(spec.name.clone(), text);
                }
            }
        }
    }

    /// Read the form back into a full record. Blank group entries are skipped.
    pub fn gather(&self, form: &FormState) -> Record {
        self.schema
            .fields
            .iter()
            .map(|spec| {
                let value = match &spec.kind {
                    FieldKind::Group { fields, .. } => Value::Array(
                        form.entries(&spec.name)
                            .iter()
                            .filter(|row| !row.is_blank())
                            .map(|row| {
                                let entry: Map<String, Value> = fields
                                    .iter()
                                    .map(|sub| {
                                        let text = row.value(&sub.name);
                                        (sub.name.clone(), scalar_value(sub, text))
                                    })
                                    .collect();
                                Value::Object(entry)
                            })
                            .collect(),
                    ),
                    _ => scalar_value(spec, form.value(&spec.name)),
                };
                (spec.name.clone(), value)
            })
            .collect()
    }

    /// Empty every field and leave exactly one blank entry per group.
    pub fn reset(&self, form: &mut FormState) {
        form.clear();
        for spec in self.schema.fields.iter().filter(|f| f.is_group()) {
            form.add_entry(&spec.name);
        }
    }
}

fn scalar_value(spec: &FieldSpec, raw: &str) -> Value {
    if raw.trim().is_empty() {
        return if spec.required {
            Value::String(raw.to_string())
        } else {
            Value::Null
        };
    }
    match spec.kind {
        FieldKind::Integer => raw
            .trim()
            .parse::<i64>()
            .map_or_else(|_| Value::String(raw.to_string()), Value::from),
        _ => Value::String(raw.to_string()),
    }
}
