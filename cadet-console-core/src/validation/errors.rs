use std::fmt;

use serde::Serialize;

use crate::form::GroupId;

/// Where a validation message belongs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum FieldKey {
    /// A scalar field, or a whole group (e.g. "no entries at all").
    Field { name: String },
    /// One input of one group entry.
    Entry {
        group: String,
        entry: GroupId,
        field: String,
    },
}

impl FieldKey {
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field { name: name.into() }
    }

    pub fn entry(group: impl Into<String>, entry: GroupId, field: impl Into<String>) -> Self {
        Self::Entry {
            group: group.into(),
            entry,
            field: field.into(),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field { name } => f.write_str(name),
            Self::Entry {
                group,
                entry,
                field,
            } => write!(f, "{group}[{entry}].{field}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub key: FieldKey,
    pub message: String,
}

/// Validation messages in the order they were found, at most one per key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrorSet {
    errors: Vec<FieldError>,
}

impl FieldErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message. The first message for a key is kept.
    pub fn insert(&mut self, key: FieldKey, message: impl Into<String>) -> bool {
        if self.contains(&key) {
            return false;
        }
        self.errors.push(FieldError {
            key,
            message: message.into(),
        });
        true
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn contains(&self, key: &FieldKey) -> bool {
        self.errors.iter().any(|e| &e.key == key)
    }

    pub fn get(&self, key: &FieldKey) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| &e.key == key)
            .map(|e| e.message.as_str())
    }

    /// Message for a scalar field or a group as a whole.
    pub fn get_field(&self, name: &str) -> Option<&str> {
        self.get(&FieldKey::field(name))
    }

    pub fn get_entry(&self, group: &str, entry: GroupId, field: &str) -> Option<&str> {
        self.get(&FieldKey::entry(group, entry, field))
    }

    /// Append the messages of `other` whose keys are not present yet.
    pub fn merge(&mut self, other: FieldErrorSet) {
        for error in other.errors {
            self.insert(error.key, error.message);
        }
    }

    /// Forget every message scoped to one group entry.
    pub fn remove_entry(&mut self, group: &str, id: GroupId) {
        self.errors.retain(|e| {
            !matches!(&e.key, FieldKey::Entry { group: g, entry, .. } if g == group && *entry == id)
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }
}

impl fmt::Display for FieldErrorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.key, error.message)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a FieldErrorSet {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
