// ── Wire types ──
//
// Records are opaque backend objects. Only the identifier is interpreted;
// every other field is carried through untouched so the console never
// computes business values the server owns.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

// ── RecordId ────────────────────────────────────────────────────────

/// Backend-owned record identifier.
///
/// Most tables use integer keys, a few use codes ("DC-2024-03"). The
/// untagged representation round-trips either shape unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    /// Extract an identifier from a JSON scalar.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Int),
            Value::String(s) if !s.is_empty() => Some(Self::from(s.as_str())),
            _ => None,
        }
    }

    /// Placeholder for a created record whose response carried no id.
    pub fn unassigned() -> Self {
        Self::Text(String::new())
    }

    pub fn is_assigned(&self) -> bool {
        !matches!(self, Self::Text(s) if s.is_empty())
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Int(i) => Value::from(*i),
            Self::Text(s) => Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RecordId {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        s.parse::<i64>()
            .map_or_else(|_| Self::Text(s.to_owned()), Self::Int)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

// ── Record ──────────────────────────────────────────────────────────

/// One backend-owned domain object.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: RecordId,
    fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: RecordId, fields: Map<String, Value>) -> Self {
        Self { id, fields }
    }

    /// Build a record from a decoded JSON object.
    ///
    /// The identifier is read from `id_field`, falling back to `id`.
    /// Returns `None` for non-objects and objects without an identifier.
    pub fn from_value(value: Value, id_field: &str) -> Option<Self> {
        let Value::Object(fields) = value else {
            return None;
        };
        let id = fields
            .get(id_field)
            .or_else(|| fields.get("id"))
            .and_then(RecordId::from_value)?;
        Some(Self { id, fields })
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Look up a field, following `a.b.c` paths into nested objects.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.fields.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// Display text for a field; empty when absent or null.
    pub fn text(&self, path: &str) -> String {
        self.get(path).map(display_value).unwrap_or_default()
    }

    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }

    /// Overlay `other` onto this record. The identifier never changes.
    pub fn merge(&mut self, other: &Map<String, Value>) {
        for (k, v) in other {
            self.fields.insert(k.clone(), v.clone());
        }
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// Render a JSON scalar the way a table cell shows it.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => if *b { "yes" } else { "no" }.into(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => map
            .get("name")
            .or_else(|| map.get("title"))
            .map_or_else(|| value.to_string(), display_value),
    }
}

// ── ListPage ────────────────────────────────────────────────────────

/// Normalized list response: `{items, total}`.
///
/// The backend answers list calls either with a bare array or with
/// `{results: [...], count | total_items: N}`. Both collapse into this.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListPage {
    pub items: Vec<Record>,
    pub total: u64,
}

impl ListPage {
    pub fn from_body(body: Value, id_field: &str) -> Result<Self, String> {
        let (raw, reported_total) = match body {
            Value::Array(items) => (items, None),
            Value::Object(mut map) => {
                let total = ["count", "total_items", "total"]
                    .iter()
                    .find_map(|k| map.get(*k).and_then(Value::as_u64));
                match map.remove("results") {
                    Some(Value::Array(items)) => (items, total),
                    Some(other) => {
                        return Err(format!("`results` is not an array: {other}"));
                    }
                    None => return Err("expected an array or an object with `results`".into()),
                }
            }
            other => return Err(format!("unexpected list body: {other}")),
        };

        let mut items = Vec::with_capacity(raw.len());
        for (idx, value) in raw.into_iter().enumerate() {
            let record = Record::from_value(value, id_field)
                .ok_or_else(|| format!("item {idx} has no `{id_field}`"))?;
            items.push(record);
        }

        let total = reported_total.unwrap_or(items.len() as u64);
        Ok(Self { items, total })
    }
}

// ── ListQuery ───────────────────────────────────────────────────────

/// Query parameters for a list or export call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub filters: BTreeMap<String, String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListQuery {
    pub fn with_filters(filters: BTreeMap<String, String>) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    pub fn paged(mut self, page: u32, page_size: u32) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }

    pub fn params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = self
            .filters
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if let Some(page) = self.page {
            params.push(("page".into(), page.to_string()));
        }
        if let Some(size) = self.page_size {
            params.push(("pageSize".into(), size.to_string()));
        }
        params
    }
}

// ── Payload ─────────────────────────────────────────────────────────

/// Binary attachment (product image, spreadsheet upload).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

impl FilePart {
    pub fn new(field: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = guess_mime(&file_name).map(String::from);
        Self {
            field: field.into(),
            file_name,
            bytes,
            mime,
        }
    }

    pub fn from_path(field: impl Into<String>, path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(field, file_name, bytes))
    }
}

fn guess_mime(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    Some(match ext.as_str() {
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xls" => "application/vnd.ms-excel",
        "csv" => "text/csv",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        _ => return None,
    })
}

/// Create/update body: flat fields plus optional attachments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    fields: Map<String, Value>,
    files: Vec<FilePart>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            files: Vec::new(),
        }
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }

    pub fn attach(&mut self, file: FilePart) {
        self.files.push(file);
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn files(&self) -> &[FilePart] {
        &self.files
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }
}

// ── Bulk results ────────────────────────────────────────────────────

/// Backend summary of a bulk spreadsheet import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    #[serde(default, alias = "inserted", alias = "created_count")]
    pub created: u64,
    #[serde(default, alias = "updated_count")]
    pub updated: u64,
    #[serde(default, alias = "failed_count", alias = "skipped")]
    pub failed: u64,
    #[serde(default, alias = "detail")]
    pub message: Option<String>,
}

/// Server-rendered export file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}
