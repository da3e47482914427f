// ── Filter state ──
//
// A filter is a map of record path -> predicate. The list controller
// keeps two of these: the draft the user is editing and the committed
// one the visible rows are derived from.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rxdesk_api::Record;

use super::column::date_part;
use crate::error::CoreError;

/// What kind of input a filter field takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Case-insensitive substring.
    Text,
    /// Exact match against one of the listed values.
    Choice(&'static [&'static str]),
    /// Inclusive date range, `FROM..TO` with either end open.
    DateRange,
}

/// A filterable field declared by an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FilterKind,
}

impl FilterField {
    pub const fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: FilterKind::Text,
        }
    }

    pub const fn choice(
        key: &'static str,
        label: &'static str,
        choices: &'static [&'static str],
    ) -> Self {
        Self {
            key,
            label,
            kind: FilterKind::Choice(choices),
        }
    }

    pub const fn date_range(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: FilterKind::DateRange,
        }
    }
}

/// One predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Contains(String),
    Exact(String),
    DateRange {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

impl FilterValue {
    /// Parse user input for a field of the given kind.
    pub fn parse(field: &FilterField, raw: &str) -> Result<Self, CoreError> {
        let raw = raw.trim();
        match field.kind {
            FilterKind::Text => Ok(Self::Contains(raw.to_owned())),
            FilterKind::Choice(choices) => choices
                .iter()
                .find(|c| c.eq_ignore_ascii_case(raw))
                .map(|c| Self::Exact((*c).to_owned()))
                .ok_or_else(|| CoreError::InvalidInput {
                    field: field.key.to_owned(),
                    reason: format!("expected one of: {}", choices.join(", ")),
                }),
            FilterKind::DateRange => {
                let (from, to) = raw.split_once("..").unwrap_or((raw, raw));
                let parse = |s: &str| -> Result<Option<NaiveDate>, CoreError> {
                    let s = s.trim();
                    if s.is_empty() {
                        return Ok(None);
                    }
                    NaiveDate::parse_from_str(s, "%Y-%m-%d")
                        .map(Some)
                        .map_err(|_| CoreError::InvalidInput {
                            field: field.key.to_owned(),
                            reason: format!("'{s}' is not a YYYY-MM-DD date"),
                        })
                };
                Ok(Self::DateRange {
                    from: parse(from)?,
                    to: parse(to)?,
                })
            }
        }
    }

    /// An empty text or an open-ended range on both sides filters nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Contains(s) | Self::Exact(s) => s.is_empty(),
            Self::DateRange { from, to } => from.is_none() && to.is_none(),
        }
    }

    fn matches(&self, text: &str) -> bool {
        match self {
            Self::Contains(needle) => text.to_lowercase().contains(&needle.to_lowercase()),
            Self::Exact(expected) => text.eq_ignore_ascii_case(expected),
            Self::DateRange { from, to } => {
                let Some(date) = date_part(text)
                    .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
                else {
                    return false;
                };
                from.is_none_or(|f| date >= f) && to.is_none_or(|t| date <= t)
            }
        }
    }
}

/// Field path -> predicate. Empty means "show everything".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    values: BTreeMap<String, FilterValue>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or (with `None` or an empty value) clear one field.
    pub fn set(&mut self, field: impl Into<String>, value: Option<FilterValue>) {
        let field = field.into();
        match value {
            Some(v) if !v.is_empty() => {
                self.values.insert(field, v);
            }
            _ => {
                self.values.remove(&field);
            }
        }
    }

    pub fn with(mut self, field: impl Into<String>, value: FilterValue) -> Self {
        self.set(field, Some(value));
        self
    }

    pub fn get(&self, field: &str) -> Option<&FilterValue> {
        self.values.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FilterValue)> {
        self.values.iter()
    }

    /// True when every predicate holds for `record`.
    pub fn matches(&self, record: &Record) -> bool {
        self.values
            .iter()
            .all(|(field, value)| value.matches(&record.text(field)))
    }

    /// Query parameters for server-side filtering. Date ranges become
    /// `<field>_from` / `<field>_to`.
    pub fn to_params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        for (field, value) in &self.values {
            match value {
                FilterValue::Contains(s) | FilterValue::Exact(s) => {
                    params.insert(field.clone(), s.clone());
                }
                FilterValue::DateRange { from, to } => {
                    if let Some(from) = from {
                        params.insert(format!("{field}_from"), from.format("%Y-%m-%d").to_string());
                    }
                    if let Some(to) = to {
                        params.insert(format!("{field}_to"), to.format("%Y-%m-%d").to_string());
                    }
                }
            }
        }
        params
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    const STATUS: FilterField = FilterField::choice("status", "Status", &["Published", "Draft"]);
    const VALID_FROM: FilterField = FilterField::date_range("valid_from", "Valid from");

    fn rec(value: serde_json::Value) -> Record {
        Record::from_value(value, "id").unwrap()
    }

    #[test]
    fn choice_parse_normalizes_case() {
        assert_eq!(
            FilterValue::parse(&STATUS, "published").unwrap(),
            FilterValue::Exact("Published".into())
        );
        assert!(FilterValue::parse(&STATUS, "Live").is_err());
    }

    #[test]
    fn date_range_parse_accepts_open_ends() {
        let v = FilterValue::parse(&VALID_FROM, "2024-01-01..").unwrap();
        assert_eq!(
            v,
            FilterValue::DateRange {
                from: NaiveDate::from_ymd_opt(2024, 1, 1),
                to: None
            }
        );
        assert!(FilterValue::parse(&VALID_FROM, "01/02/2024").is_err());
    }

    #[test]
    fn matches_combines_all_predicates() {
        let filter = FilterState::new()
            .with("name", FilterValue::Contains("para".into()))
            .with("status", FilterValue::Exact("Published".into()));
        assert!(filter.matches(&rec(json!({"id": 1, "name": "Paracetamol 500", "status": "Published"}))));
        assert!(!filter.matches(&rec(json!({"id": 2, "name": "Paracetamol 650", "status": "Draft"}))));
        assert!(!filter.matches(&rec(json!({"id": 3, "name": "Ibuprofen", "status": "Published"}))));
    }

    #[test]
    fn date_range_is_inclusive() {
        let filter = FilterState::new().with(
            "valid_from",
            FilterValue::parse(&VALID_FROM, "2024-06-01..2024-06-30").unwrap(),
        );
        assert!(filter.matches(&rec(json!({"id": 1, "valid_from": "2024-06-30T23:00:00Z"}))));
        assert!(!filter.matches(&rec(json!({"id": 2, "valid_from": "2024-07-01"}))));
        assert!(!filter.matches(&rec(json!({"id": 3}))));
    }

    #[test]
    fn empty_value_clears_field() {
        let mut filter = FilterState::new().with("name", FilterValue::Contains("x".into()));
        filter.set("name", Some(FilterValue::Contains(String::new())));
        assert!(filter.is_empty());
    }

    #[test]
    fn params_split_date_ranges() {
        let filter = FilterState::new()
            .with("status", FilterValue::Exact("Draft".into()))
            .with(
                "order_date",
                FilterValue::DateRange {
                    from: NaiveDate::from_ymd_opt(2024, 5, 1),
                    to: None,
                },
            );
        let params = filter.to_params();
        assert_eq!(params.get("status").map(String::as_str), Some("Draft"));
        assert_eq!(params.get("order_date_from").map(String::as_str), Some("2024-05-01"));
        assert!(!params.contains_key("order_date_to"));
    }
}
