//! Form validation
//!
//! Validation is pure: it reads a [`FormState`] and returns a
//! [`FieldErrorSet`]. Reflecting the messages back onto a form is up to the
//! caller.

mod errors;
mod rules;

pub use errors::{FieldError, FieldErrorSet, FieldKey};
pub use rules::{FieldRules, GroupRules, Rule, Ruleset};

use cadet_console_client::Record;
use serde_json::Value;

use crate::form::FormState;
use crate::schema::value_text;

/// Check every field and group entry of `form`.
///
/// Blank group entries are ignored. Partially filled entries get messages
/// scoped to that entry. A group short of complete entries gets a message
/// keyed by the group name.
pub fn validate(form: &FormState, ruleset: &Ruleset) -> FieldErrorSet {
    let mut errors = FieldErrorSet::new();

    for (name, rules) in &ruleset.fields {
        if let Some(message) = rules.check(form.value(name)) {
            errors.insert(FieldKey::field(name.clone()), message);
        }
    }

    for (group, rules) in &ruleset.groups {
        let mut complete = 0;
        for row in form.entries(group).iter().filter(|row| !row.is_blank()) {
            let mut row_ok = true;
            for (field, field_rules) in &rules.fields {
                if let Some(message) = field_rules.check(row.value(field)) {
                    errors.insert(FieldKey::entry(group.clone(), row.id, field.clone()), message);
                    row_ok = false;
                }
            }
            if row_ok {
                complete += 1;
            }
        }
        if complete < rules.min_entries {
            errors.insert(FieldKey::field(group.clone()), rules.shortfall_message());
        }
    }

    errors
}

/// Validate a plain record. Group entry ids in the result count from 1 in
/// record order.
pub fn validate_record(record: &Record, ruleset: &Ruleset) -> FieldErrorSet {
    let mut form = FormState::new();
    for (name, _) in &ruleset.fields {
        form.set_value(name.clone(), record.get(name).map(value_text).unwrap_or_default());
    }
    for (group, rules) in &ruleset.groups {
        let entries = record
            .get(group)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for entry in entries {
            let id = form.add_entry(group);
            for (field, _) in &rules.fields {
                let text = entry.get(field).map(value_text).unwrap_or_default();
                form.set_entry_value(group, id, field.clone(), text);
            }
        }
    }
    validate(&form, ruleset)
}
