use std::collections::BTreeMap;

use rxdesk_api::FilePart;
use serde_json::{Number, Value};

use super::schema::FieldKind;
use crate::model::column::date_part;

/// Current value of one form field.
///
/// Numbers are held as text (what the user typed) and converted on
/// serialization.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Flag(bool),
    File(Option<FilePart>),
}

impl FieldValue {
    pub fn empty(kind: FieldKind) -> Self {
        match kind {
            FieldKind::MultiSelect => Self::List(Vec::new()),
            FieldKind::Flag => Self::Flag(false),
            FieldKind::File => Self::File(None),
            _ => Self::Text(String::new()),
        }
    }

    /// Parse CLI-style input for a field of `kind`.
    pub fn from_input(kind: FieldKind, raw: &str) -> Self {
        match kind {
            FieldKind::MultiSelect => Self::List(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect(),
            ),
            FieldKind::Flag => Self::Flag(matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "1" | "on"
            )),
            _ => Self::Text(raw.to_owned()),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Flag(_) => false,
            Self::File(file) => file.is_none(),
        }
    }

    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(s) => s,
            _ => "",
        }
    }

    /// Hydrate from a backend record value.
    pub(crate) fn from_backend(kind: FieldKind, value: &Value) -> Self {
        match kind {
            FieldKind::Flag => Self::Flag(match value {
                Value::Bool(b) => *b,
                Value::String(s) => matches!(s.as_str(), "true" | "1"),
                Value::Number(n) => n.as_i64() == Some(1),
                _ => false,
            }),
            FieldKind::MultiSelect => Self::List(match value {
                Value::Array(items) => items
                    .iter()
                    .map(scalar_text)
                    .filter(|s| !s.is_empty())
                    .collect(),
                Value::Null => Vec::new(),
                other => vec![scalar_text(other)],
            }),
            FieldKind::File => Self::File(None),
            FieldKind::Date => {
                let text = scalar_text(value);
                Self::Text(date_part(&text).map_or(text.clone(), String::from))
            }
            _ => Self::Text(scalar_text(value)),
        }
    }

    /// Backend JSON for this value. `None` for files, which travel as
    /// attachments instead.
    pub(crate) fn to_backend(&self, kind: FieldKind) -> Option<Value> {
        match self {
            Self::File(_) => None,
            Self::Flag(b) => Some(Value::Bool(*b)),
            Self::List(items) => Some(Value::Array(items.iter().map(|s| list_item(s)).collect())),
            Self::Text(text) => Some(if text.trim().is_empty() {
                Value::Null
            } else {
                match kind {
                    FieldKind::Number { .. } => number(text.trim()),
                    FieldKind::Integer { .. } => text
                        .trim()
                        .parse::<i64>()
                        .map_or_else(|_| Value::String(text.clone()), Value::from),
                    FieldKind::Choice(_) | FieldKind::Date => Value::String(text.trim().to_owned()),
                    _ => Value::String(text.clone()),
                }
            }),
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("id")
            .or_else(|| map.get("name"))
            .map(scalar_text)
            .unwrap_or_default(),
        other => other.to_string(),
    }
}

/// Integers stay integers so `10` round-trips as `10`, not `10.0`.
fn number(text: &str) -> Value {
    if let Ok(i) = text.parse::<i64>() {
        return Value::from(i);
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map_or_else(|| Value::String(text.to_owned()), Value::Number)
}

/// Selected ids are numeric on the backend; tags are strings.
fn list_item(text: &str) -> Value {
    text.parse::<i64>()
        .map_or_else(|_| Value::String(text.to_owned()), Value::from)
}

/// Values, per-field errors, and the submitting flag of one form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    values: BTreeMap<String, FieldValue>,
    errors: BTreeMap<String, String>,
    submitting: bool,
}

impl FormState {
    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Text of a field; empty for non-text or unset fields.
    pub fn text(&self, field: &str) -> &str {
        self.values.get(field).map_or("", FieldValue::as_text)
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub(crate) fn put(&mut self, field: impl Into<String>, value: FieldValue) {
        self.values.insert(field.into(), value);
    }

    pub(crate) fn set_error(&mut self, field: impl Into<String>, error: Option<String>) {
        let field = field.into();
        match error {
            Some(e) => {
                self.errors.insert(field, e);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }

    pub(crate) fn clear_errors(&mut self) {
        self.errors.clear();
    }

    pub(crate) fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }
}
