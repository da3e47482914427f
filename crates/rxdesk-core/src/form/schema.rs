// ── Declarative form schemas ──
//
// Each entity declares its editable fields once: form name, backend name,
// input kind, and when the field is required. Validation and payload
// serialization are driven entirely from these tables.

use chrono::NaiveDate;

use super::state::{FieldValue, FormState};

/// Input kind of a form field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text { max_len: usize },
    Email,
    Phone,
    Number { min: Option<f64>, max: Option<f64> },
    Integer { min: Option<i64> },
    Choice(&'static [&'static str]),
    /// Multiple values, sent as a JSON array (or repeated multipart keys).
    MultiSelect,
    /// `YYYY-MM-DD`.
    Date,
    Flag,
    /// Binary attachment; forces a multipart body when set.
    File,
}

/// When a field must be filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Optional,
    Always,
    /// Required while `field` holds one of `any_of`.
    When {
        field: &'static str,
        any_of: &'static [&'static str],
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Name used by the form (and by `--set` on the CLI).
    pub name: &'static str,
    /// Name used in backend payloads and records.
    pub backend: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub requirement: Requirement,
    /// Initial value on a create form.
    pub default: Option<&'static str>,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            backend: name,
            label,
            kind,
            requirement: Requirement::Optional,
            default: None,
        }
    }

    pub const fn maps_to(mut self, backend: &'static str) -> Self {
        self.backend = backend;
        self
    }

    pub const fn required(mut self) -> Self {
        self.requirement = Requirement::Always;
        self
    }

    pub const fn required_when(
        mut self,
        field: &'static str,
        any_of: &'static [&'static str],
    ) -> Self {
        self.requirement = Requirement::When { field, any_of };
        self
    }

    pub const fn default_value(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    /// Whether the field is required given the rest of the form.
    pub fn is_required(&self, form: &FormState) -> bool {
        match self.requirement {
            Requirement::Optional => false,
            Requirement::Always => true,
            Requirement::When { field, any_of } => {
                let current = form.text(field).trim();
                any_of.iter().any(|v| *v == current)
            }
        }
    }

    /// Validate `value` in the context of `form`. Returns the message to
    /// show under the field.
    pub fn check(&self, value: &FieldValue, form: &FormState) -> Result<(), String> {
        let label = self.label;
        if value.is_blank() {
            return if self.is_required(form) {
                Err(format!("{label} is required"))
            } else {
                Ok(())
            };
        }
        let FieldValue::Text(text) = value else {
            return Ok(());
        };
        let text = text.trim();
        match self.kind {
            FieldKind::Text { max_len } => {
                if text.chars().count() > max_len {
                    return Err(format!("{label} must be at most {max_len} characters"));
                }
            }
            FieldKind::Email => {
                let valid = text.split_once('@').is_some_and(|(local, domain)| {
                    !local.is_empty()
                        && !domain.contains('@')
                        && domain.split('.').filter(|p| !p.is_empty()).count() >= 2
                });
                if !valid {
                    return Err("Enter a valid email address".into());
                }
            }
            FieldKind::Phone => {
                let digits = text.strip_prefix('+').unwrap_or(text).replace([' ', '-'], "");
                if !(10..=13).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit())
                {
                    return Err("Enter a valid phone number".into());
                }
            }
            FieldKind::Number { min, max } => {
                let Ok(n) = text.parse::<f64>() else {
                    return Err(format!("{label} must be a number"));
                };
                if let Some(min) = min.filter(|m| n < *m) {
                    return Err(format!("{label} must be at least {min}"));
                }
                if let Some(max) = max.filter(|m| n > *m) {
                    return Err(format!("{label} must be at most {max}"));
                }
            }
            FieldKind::Integer { min } => {
                let Ok(n) = text.parse::<i64>() else {
                    return Err(format!("{label} must be a whole number"));
                };
                if let Some(min) = min.filter(|m| n < *m) {
                    return Err(format!("{label} must be at least {min}"));
                }
            }
            FieldKind::Choice(choices) => {
                if !choices.contains(&text) {
                    return Err(format!("{label} must be one of: {}", choices.join(", ")));
                }
            }
            FieldKind::Date => {
                if NaiveDate::parse_from_str(text, "%Y-%m-%d").is_err() {
                    return Err(format!("{label} must be a date (YYYY-MM-DD)"));
                }
            }
            FieldKind::MultiSelect | FieldKind::Flag | FieldKind::File => {}
        }
        Ok(())
    }
}

/// All editable fields of one entity, in display order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormSchema {
    pub fields: &'static [FieldSpec],
}

impl FormSchema {
    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up by backend name (for mapping backend field errors).
    pub fn by_backend(&self, backend: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.backend == backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODES: &[&str] = &["Cash", "UPI", "Bank Transfer"];
    static FIELDS: [FieldSpec; 4] = [
        FieldSpec::new("paymentMode", "Payment mode", FieldKind::Choice(MODES)).required(),
        FieldSpec::new("referenceNumber", "Reference number", FieldKind::Text { max_len: 10 })
            .maps_to("reference_number")
            .required_when("paymentMode", &["UPI", "Bank Transfer"]),
        FieldSpec::new(
            "amount",
            "Amount",
            FieldKind::Number {
                min: Some(0.01),
                max: None,
            },
        ),
        FieldSpec::new("email", "Email", FieldKind::Email),
    ];

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.into())
    }

    #[test]
    fn conditional_requirement_follows_other_field() {
        let reference = &FIELDS[1];
        let mut form = FormState::default();
        form.put("paymentMode", text("Cash"));
        assert!(reference.check(&text(""), &form).is_ok());

        form.put("paymentMode", text("UPI"));
        assert_eq!(
            reference.check(&text("  "), &form),
            Err("Reference number is required".into())
        );
        assert!(reference.check(&text("UTR123"), &form).is_ok());

        form.put("paymentMode", text(" Bank Transfer "));
        assert_eq!(
            reference.check(&text(""), &form),
            Err("Reference number is required".into())
        );
    }

    #[test]
    fn bounds_and_formats() {
        let form = FormState::default();
        assert_eq!(
            FIELDS[2].check(&text("0"), &form),
            Err("Amount must be at least 0.01".into())
        );
        assert_eq!(
            FIELDS[2].check(&text("abc"), &form),
            Err("Amount must be a number".into())
        );
        assert!(FIELDS[3].check(&text("ops@pharmacy.in"), &form).is_ok());
        assert!(FIELDS[3].check(&text("ops@pharmacy"), &form).is_err());
        assert!(FIELDS[1].check(&text("12345678901"), &form).is_err());
        assert!(FIELDS[0].check(&text("Barter"), &form).is_err());
    }

    #[test]
    fn schema_lookup_by_either_name() {
        let schema = FormSchema::new(&FIELDS);
        assert_eq!(
            schema.by_backend("reference_number").map(|f| f.name),
            Some("referenceNumber")
        );
        assert!(schema.field("reference_number").is_none());
    }
}
