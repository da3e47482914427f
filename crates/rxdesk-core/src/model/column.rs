use rxdesk_api::Record;
use rxdesk_api::types::display_value;
use serde_json::Value;

/// How a column's cells are rendered in tables and exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    /// Fixed two decimals.
    Currency,
    /// `YYYY-MM-DD`; timestamps are cut to the date part.
    Date,
}

/// One display column of a list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Record path, dot-separated for nested objects (`category.name`).
    pub key: &'static str,
    pub header: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    pub const fn text(key: &'static str, header: &'static str) -> Self {
        Self {
            key,
            header,
            kind: ColumnKind::Text,
        }
    }

    pub const fn integer(key: &'static str, header: &'static str) -> Self {
        Self {
            key,
            header,
            kind: ColumnKind::Integer,
        }
    }

    pub const fn currency(key: &'static str, header: &'static str) -> Self {
        Self {
            key,
            header,
            kind: ColumnKind::Currency,
        }
    }

    pub const fn date(key: &'static str, header: &'static str) -> Self {
        Self {
            key,
            header,
            kind: ColumnKind::Date,
        }
    }

    /// Cell text for `record`.
    pub fn render(&self, record: &Record) -> String {
        let Some(value) = record.get(self.key) else {
            return String::new();
        };
        match self.kind {
            ColumnKind::Text | ColumnKind::Integer => display_value(value),
            ColumnKind::Currency => format_currency(value),
            ColumnKind::Date => {
                let text = display_value(value);
                date_part(&text).map_or(text.clone(), String::from)
            }
        }
    }
}

fn format_currency(value: &Value) -> String {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    amount.map_or_else(|| display_value(value), |a| format!("{a:.2}"))
}

/// Leading `YYYY-MM-DD` of a date or timestamp string.
pub(crate) fn date_part(text: &str) -> Option<&str> {
    let head = text.get(..10)?;
    chrono::NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .ok()
        .map(|_| head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxdesk_api::RecordId;
    use serde_json::json;

    fn record(value: Value) -> Record {
        Record::from_value(value, "id").unwrap_or_else(|| Record::new(RecordId::from(1), serde_json::Map::new()))
    }

    #[test]
    fn currency_always_has_two_decimals() {
        let r = record(json!({"id": 1, "mrp": 120, "price": "45.5", "bad": "n/a"}));
        assert_eq!(Column::currency("mrp", "MRP").render(&r), "120.00");
        assert_eq!(Column::currency("price", "Price").render(&r), "45.50");
        assert_eq!(Column::currency("bad", "Bad").render(&r), "n/a");
    }

    #[test]
    fn date_cuts_timestamps() {
        let r = record(json!({"id": 1, "at": "2024-03-01T10:15:00Z", "odd": "soon"}));
        assert_eq!(Column::date("at", "At").render(&r), "2024-03-01");
        assert_eq!(Column::date("odd", "Odd").render(&r), "soon");
    }

    #[test]
    fn nested_and_missing_keys() {
        let r = record(json!({"id": 1, "category": {"name": "Tablets"}}));
        assert_eq!(Column::text("category.name", "Category").render(&r), "Tablets");
        assert_eq!(Column::text("missing", "Missing").render(&r), "");
    }
}
