use chrono::NaiveDate;
use url::Url;

use crate::error::{CoreError, CoreResult};
use crate::schema::{FieldKind, FieldSpec, Pattern, ResourceSchema};

/// Permissive `local@domain.tld` shape, no RFC parsing.
const EMAIL_PATTERN: &str = r"[^\s@]+@[^\s@]+\.[^\s@]+";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single check on one text value.
#[derive(Debug, Clone)]
pub enum Rule {
    Required,
    Pattern(Pattern),
    Email(Pattern),
    /// Anything that parses as an absolute URL, whatever the scheme.
    Url,
    Integer,
    Date,
    OneOf(Vec<String>),
}

impl Rule {
    pub fn email() -> CoreResult<Self> {
        Ok(Self::Email(Pattern::new(EMAIL_PATTERN, "")?))
    }

    /// Message when `value` fails. Only `Required` looks at blank values.
    pub fn check(&self, label: &str, value: &str) -> Option<String> {
        let blank = value.trim().is_empty();
        if let Self::Required = self {
            return blank.then(|| format!("{label} is required"));
        }
        if blank {
            return None;
        }
        match self {
            Self::Required => None,
            Self::Pattern(p) => (!p.is_match(value)).then(|| p.message().to_string()),
            Self::Email(p) => {
                (!p.is_match(value)).then(|| format!("{label} must be a valid email address"))
            }
            Self::Url => Url::parse(value.trim())
                .is_err()
                .then(|| format!("{label} must be a valid URL")),
            Self::Integer => value
                .trim()
                .parse::<i64>()
                .is_err()
                .then(|| format!("{label} must be a whole number")),
            Self::Date => NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
                .is_err()
                .then(|| format!("{label} must be a date (YYYY-MM-DD)")),
            Self::OneOf(options) => (!options.iter().any(|o| o == value))
                .then(|| format!("{label} must be one of: {}", options.join(", "))),
        }
    }
}

/// Rules of one field, checked in order; the first failure is reported.
#[derive(Debug, Clone)]
pub struct FieldRules {
    pub label: String,
    pub rules: Vec<Rule>,
}

impl FieldRules {
    fn from_spec(spec: &FieldSpec) -> CoreResult<Self> {
        let mut rules = Vec::new();
        if spec.required {
            rules.push(Rule::Required);
        }
        match &spec.kind {
            FieldKind::Text | FieldKind::Group { .. } => {}
            FieldKind::Integer => rules.push(Rule::Integer),
            FieldKind::Date => rules.push(Rule::Date),
            FieldKind::Email => rules.push(Rule::email()?),
            FieldKind::Url => rules.push(Rule::Url),
            FieldKind::Choice(options) => rules.push(Rule::OneOf(options.clone())),
        }
        if let Some(pattern) = &spec.pattern {
            rules.push(Rule::Pattern(pattern.clone()));
        }
        Ok(Self {
            label: spec.label.clone(),
            rules,
        })
    }

    pub fn check(&self, value: &str) -> Option<String> {
        self.rules.iter().find_map(|rule| rule.check(&self.label, value))
    }
}

/// Rules of a repeatable group.
#[derive(Debug, Clone)]
pub struct GroupRules {
    pub entry_label: String,
    /// Complete entries needed for the group to pass.
    pub min_entries: usize,
    pub fields: Vec<(String, FieldRules)>,
}

impl GroupRules {
    pub fn shortfall_message(&self) -> String {
        if self.min_entries <= 1 {
            format!("At least one {} is required", self.entry_label)
        } else {
            format!("At least {} {}s are required", self.min_entries, self.entry_label)
        }
    }
}

/// Every check applied to a form of one resource.
#[derive(Debug, Clone, Default)]
pub struct Ruleset {
    pub(crate) fields: Vec<(String, FieldRules)>,
    pub(crate) groups: Vec<(String, GroupRules)>,
}

impl Ruleset {
    pub fn from_schema(schema: &ResourceSchema) -> CoreResult<Self> {
        let mut ruleset = Self::default();
        for spec in &schema.fields {
            match &spec.kind {
                FieldKind::Group {
                    entry_label,
                    fields,
                } => {
                    let fields = fields
                        .iter()
                        .map(|sub| Ok((sub.name.clone(), FieldRules::from_spec(sub)?)))
                        .collect::<CoreResult<Vec<_>>>()?;
                    ruleset.groups.push((
                        spec.name.clone(),
                        GroupRules {
                            entry_label: entry_label.clone(),
                            min_entries: usize::from(spec.required),
                            fields,
                        },
                    ));
                }
                _ => ruleset
                    .fields
                    .push((spec.name.clone(), FieldRules::from_spec(spec)?)),
            }
        }
        Ok(ruleset)
    }

    /// Extra rule on a scalar field.
    pub fn add_rule(&mut self, field: &str, rule: Rule) -> CoreResult<()> {
        self.fields
            .iter_mut()
            .find(|(name, _)| name == field)
            .map(|(_, rules)| rules.rules.push(rule))
            .ok_or_else(|| CoreError::SchemaError(format!("unknown field '{field}'")))
    }

    /// Extra rule on one input of every entry of a group.
    pub fn add_entry_rule(&mut self, group: &str, field: &str, rule: Rule) -> CoreResult<()> {
        self.groups
            .iter_mut()
            .find(|(name, _)| name == group)
            .and_then(|(_, g)| g.fields.iter_mut().find(|(name, _)| name == field))
            .map(|(_, rules)| rules.rules.push(rule))
            .ok_or_else(|| CoreError::SchemaError(format!("unknown field '{group}.{field}'")))
    }
}
