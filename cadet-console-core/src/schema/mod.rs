//! Resource schemas
//!
//! A schema is everything the generic controller needs to know about one
//! resource kind: its declared fields, how they validate, where it lives on
//! the backend and how a list row is summarized.

mod cadet;
mod school;

pub use cadet::{cadet_schema, GENDERS};
pub use school::{school_schema, CADETS_PER_SESSION, DIVISIONS};

use cadet_console_client::{Record, ResourceEndpoint};
use regex::Regex;
use serde_json::Value;

use crate::error::{CoreError, CoreResult};

/// A full-match regular expression with the message shown when it fails.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    message: String,
}

impl Pattern {
    /// Compile `expr`, anchored so that only a full match passes.
    pub fn new(expr: &str, message: impl Into<String>) -> CoreResult<Self> {
        let regex = Regex::new(&format!("^(?:{expr})$"))
            .map_err(|e| CoreError::SchemaError(format!("invalid pattern '{expr}': {e}")))?;
        Ok(Self {
            regex,
            message: message.into(),
        })
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Declared kind of a field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Text,
    Integer,
    /// ISO calendar date, `YYYY-MM-DD`.
    Date,
    Email,
    Url,
    /// Single choice among fixed values (a radio set).
    Choice(Vec<String>),
    /// Repeatable group of uniform sub-records.
    Group {
        /// Singular name of one entry, e.g. "training session".
        entry_label: String,
        fields: Vec<FieldSpec>,
    },
}

/// One declared field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    /// For groups: at least one complete entry is mandatory.
    pub required: bool,
    pub pattern: Option<Pattern>,
}

impl FieldSpec {
    fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            required: false,
            pattern: None,
        }
    }

    pub fn text(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn integer(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Integer)
    }

    pub fn date(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Date)
    }

    pub fn email(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Email)
    }

    pub fn url(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Url)
    }

    pub fn choice(name: &str, label: &str, options: &[&str]) -> Self {
        Self::new(
            name,
            label,
            FieldKind::Choice(options.iter().map(|o| (*o).to_string()).collect()),
        )
    }

    pub fn group(name: &str, label: &str, entry_label: &str, fields: Vec<FieldSpec>) -> Self {
        Self::new(
            name,
            label,
            FieldKind::Group {
                entry_label: entry_label.to_string(),
                fields,
            },
        )
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, FieldKind::Group { .. })
    }
}

/// How a list column derives its cell text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSource {
    Field(String),
    /// Number of entries in a group times a fixed factor.
    GroupCount { group: String, factor: u64 },
}

/// One column of the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: String,
    pub source: ColumnSource,
}

impl Column {
    pub fn field(header: &str, field: &str) -> Self {
        Self {
            header: header.to_string(),
            source: ColumnSource::Field(field.to_string()),
        }
    }

    pub fn group_count(header: &str, group: &str, factor: u64) -> Self {
        Self {
            header: header.to_string(),
            source: ColumnSource::GroupCount {
                group: group.to_string(),
                factor,
            },
        }
    }

    /// Cell text for one row. Missing and null values render as `N/A`.
    pub fn cell(&self, record: &Record) -> String {
        match &self.source {
            ColumnSource::Field(field) => match record.get(field) {
                None | Some(Value::Null) => "N/A".to_string(),
                Some(value) => value_text(value),
            },
            ColumnSource::GroupCount { group, factor } => {
                let entries = record
                    .get(group)
                    .and_then(Value::as_array)
                    .map_or(0, Vec::len);
                (entries as u64 * factor).to_string()
            }
        }
    }
}

/// A labeled counter of the stats endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatField {
    pub key: String,
    pub label: String,
}

impl StatField {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

/// Everything the generic controller knows about one resource kind.
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    /// Singular label, e.g. "School".
    pub label: String,
    /// Plural label, e.g. "Schools".
    pub plural: String,
    pub endpoint: ResourceEndpoint,
    pub fields: Vec<FieldSpec>,
    pub columns: Vec<Column>,
    pub stats: Vec<StatField>,
}

impl ResourceSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Text form of a scalar JSON value, as a form input would hold it.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pattern_requires_full_match() {
        let p = Pattern::new(r"\d{10}", "Contact must be a 10-digit number").unwrap();
        assert!(p.is_match("9800000000"));
        assert!(!p.is_match("98000000001"));
        assert!(!p.is_match("x9800000000"));
    }

    #[test]
    fn invalid_pattern_is_schema_error() {
        assert!(matches!(
            Pattern::new("(", "broken"),
            Err(CoreError::SchemaError(_))
        ));
    }

    #[test]
    fn group_count_column() {
        let col = Column::group_count("Cadets", "training_sessions", 30);
        let record = Record::from_value(json!({"training_sessions": [{}, {}]})).unwrap();
        assert_eq!(col.cell(&record), "60");
        assert_eq!(col.cell(&Record::new()), "0");
    }

    #[test]
    fn field_column_renders_missing_as_na() {
        let col = Column::field("Website", "website");
        let record = Record::from_value(json!({"website": null, "ward_number": 4})).unwrap();
        assert_eq!(col.cell(&record), "N/A");
        assert_eq!(Column::field("Ward", "ward_number").cell(&record), "4");
    }
}
