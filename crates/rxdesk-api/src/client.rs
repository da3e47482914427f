// Resource HTTP client
//
// Wraps `reqwest::Client` with per-entity URL construction, list-shape
// normalization, payload encoding selection, and error classification.
// The identifier is always sent as a query parameter: callers pass an id
// value and never build URLs themselves.

use std::collections::BTreeMap;

use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE, HeaderMap};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, StatusCode};
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::resource::{PayloadEncoding, ResourceSpec};
use crate::types::{Download, FilePart, ImportSummary, ListPage, ListQuery, Payload, Record, RecordId};

/// Keys that carry a message rather than a field error.
const MESSAGE_KEYS: &[&str] = &["detail", "message", "error", "status", "code", "success"];

/// Async client for one backend resource.
///
/// Every call is a single attempt: no retries, no caching. Failures are
/// classified into [`Error`] and returned to the caller unchanged.
pub struct ResourceClient {
    http: reqwest::Client,
    base_url: Url,
    spec: ResourceSpec,
}

impl ResourceClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Wrap an existing `reqwest::Client` (shared across entities).
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        spec: ResourceSpec,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            spec,
        })
    }

    /// Ensure the base URL ends with `/` so relative joins keep its path.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    pub fn spec(&self) -> &ResourceSpec {
        &self.spec
    }

    // ── URL builders ─────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    fn id_param(&self, id: &RecordId) -> [(&'static str, String); 1] {
        [(self.spec.id_field, id.to_string())]
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// `GET <base>/<entity>/` with filter and page parameters.
    pub async fn list(&self, query: &ListQuery) -> Result<ListPage, Error> {
        let url = self.url(&self.spec.collection_path())?;
        let params = query.params();
        debug!("GET {url} params={params:?}");

        let resp = self
            .http
            .get(url)
            .query(&params)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let body = self.read_json(resp, None).await?;
        ListPage::from_body(body, self.spec.id_field).map_err(|message| Error::Deserialization {
            entity: self.spec.plural_label(),
            message,
            body: String::new(),
        })
    }

    /// `GET <base>/<entity>/?<id_field>=<id>`.
    ///
    /// The backend answers with an object, a one-element array, or a
    /// `{results: [...]}` page; an empty answer means the id is unknown.
    pub async fn get_by_id(&self, id: &RecordId) -> Result<Record, Error> {
        let url = self.url(&self.spec.collection_path())?;
        debug!("GET {url} {}={id}", self.spec.id_field);

        let resp = self
            .http
            .get(url)
            .query(&self.id_param(id))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let body = self.read_json(resp, Some(id)).await?;

        let candidate = match body {
            Value::Array(items) => items.into_iter().next(),
            Value::Object(mut map) => match map.remove("results") {
                Some(Value::Array(items)) => items.into_iter().next(),
                Some(other) => {
                    map.insert("results".into(), other);
                    Some(Value::Object(map))
                }
                None => match map.remove("data") {
                    Some(data @ Value::Object(_)) => Some(data),
                    _ => Some(Value::Object(map)),
                },
            },
            _ => None,
        };

        candidate
            .and_then(|value| Record::from_value(value, self.spec.id_field))
            .ok_or_else(|| Error::NotFound {
                entity: self.spec.entity.into(),
                id: id.to_string(),
            })
    }

    /// `POST <base>/<entity>/`.
    pub async fn create(&self, payload: &Payload) -> Result<Record, Error> {
        let url = self.url(&self.spec.collection_path())?;
        debug!("POST {url}");

        let resp = self.send_payload(Method::POST, url, &[], payload).await?;
        let body = self.read_json(resp, None).await?;
        Ok(self.record_from_mutation(body, payload, None))
    }

    /// `PUT <base>/<entity>/?<id_field>=<id>`.
    ///
    /// Entities that answer 204 yield the submitted payload as the record.
    pub async fn update(&self, id: &RecordId, payload: &Payload) -> Result<Record, Error> {
        let url = self.url(&self.spec.collection_path())?;
        debug!("PUT {url} {}={id}", self.spec.id_field);

        let resp = self
            .send_payload(Method::PUT, url, &self.id_param(id), payload)
            .await?;
        let body = self.read_json(resp, Some(id)).await?;
        Ok(self.record_from_mutation(body, payload, Some(id)))
    }

    /// `DELETE <base>/<entity>/?<id_field>=<id>`.
    pub async fn remove(&self, id: &RecordId) -> Result<(), Error> {
        let url = self.url(&self.spec.collection_path())?;
        debug!("DELETE {url} {}={id}", self.spec.id_field);

        let resp = self
            .http
            .delete(url)
            .query(&self.id_param(id))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp, Some(id)).await)
        }
    }

    /// Upload a spreadsheet to the bulk-import endpoint as multipart `file`.
    pub async fn bulk_import(&self, file: FilePart) -> Result<ImportSummary, Error> {
        let url = self.url(&self.spec.import_path())?;
        debug!("POST {url} file={}", file.file_name);

        let mut part = Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(ref mime) = file.mime {
            part = part.mime_str(mime)?;
        }
        let form = Form::new().part(file.field, part);

        let resp = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status = resp.status();
        if status.is_client_error() {
            let raw = resp.text().await.unwrap_or_default();
            let reason = serde_json::from_str::<Value>(&raw)
                .ok()
                .and_then(|body| detail_text(&body))
                .unwrap_or_else(|| non_empty_preview(&raw).unwrap_or_else(|| status.to_string()));
            return Err(Error::ImportRejected { reason });
        }

        let body = self.read_json(resp, None).await?;
        Ok(serde_json::from_value(body).unwrap_or_default())
    }

    /// Download the server-rendered spreadsheet for the current filters.
    pub async fn bulk_export(&self, query: &ListQuery) -> Result<Download, Error> {
        let url = self.url(&self.spec.export_path())?;
        let params = query.params();
        debug!("GET {url} params={params:?}");

        let resp = self
            .http
            .get(url)
            .query(&params)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(self.parse_error(status, resp, None).await);
        }

        let headers = resp.headers().clone();
        let bytes = resp.bytes().await.map_err(|e| self.transport_error(e))?.to_vec();
        Ok(Download {
            file_name: attachment_file_name(&headers)
                .unwrap_or_else(|| self.spec.export_file_name()),
            content_type: headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(String::from),
            bytes,
        })
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn send_payload(
        &self,
        method: Method,
        url: Url,
        params: &[(&str, String)],
        payload: &Payload,
    ) -> Result<reqwest::Response, Error> {
        let builder = self.http.request(method, url).query(params);
        let builder = if self.spec.encoding == PayloadEncoding::Multipart || payload.has_files() {
            builder.multipart(multipart_form(payload)?)
        } else {
            builder.json(payload.fields())
        };
        builder.send().await.map_err(|e| self.transport_error(e))
    }

    // ── Response handling ────────────────────────────────────────────

    /// Decode a success body as JSON (`Null` when empty), or classify the failure.
    async fn read_json(
        &self,
        resp: reqwest::Response,
        id: Option<&RecordId>,
    ) -> Result<Value, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(self.parse_error(status, resp, id).await);
        }

        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                entity: self.spec.plural_label(),
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    /// Timeouts and refused connections stay transport errors; anything
    /// else that broke mid-request is a failed fetch of this entity.
    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() || err.is_connect() {
            return Error::Transport(err);
        }
        debug!(entity = self.spec.entity, error = %err, "request failed in transit");
        Error::FetchFailed {
            entity: self.spec.plural_label(),
            status: err.status().map(|s| s.as_u16()),
            cause: None,
        }
    }

    async fn parse_error(
        &self,
        status: StatusCode,
        resp: reqwest::Response,
        id: Option<&RecordId>,
    ) -> Error {
        let entity = self.spec.entity.to_owned();

        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Error::NotFound {
                    entity,
                    id: id.to_string(),
                };
            }
        }

        let raw = resp.text().await.unwrap_or_default();
        let body = serde_json::from_str::<Value>(&raw).ok();

        if status.is_client_error() {
            if let Some(field_errors) = body.as_ref().and_then(field_errors) {
                return Error::ValidationFailed {
                    entity,
                    field_errors,
                };
            }
        }

        Error::FetchFailed {
            entity: self.spec.plural_label(),
            status: Some(status.as_u16()),
            cause: body
                .as_ref()
                .and_then(detail_text)
                .or_else(|| non_empty_preview(&raw).filter(|_| body.is_none())),
        }
    }

    /// Build the resulting record of a create/update.
    ///
    /// Response fields overlay the submitted fields; a response that only
    /// carries a message (or nothing) leaves the submitted fields as-is.
    fn record_from_mutation(&self, body: Value, payload: &Payload, id: Option<&RecordId>) -> Record {
        let id_field = self.spec.id_field;
        let mut fields = payload.fields().clone();

        if let Value::Object(mut map) = body {
            let has_id = map.contains_key(id_field) || map.contains_key("id");
            if has_id {
                fields.extend(map);
            } else if let Some(Value::Object(inner)) =
                map.remove("data").or_else(|| map.remove("result"))
            {
                fields.extend(inner);
            }
        }

        let resolved = fields
            .get(id_field)
            .or_else(|| fields.get("id"))
            .and_then(RecordId::from_value)
            .or_else(|| id.cloned());

        match resolved {
            Some(rid) => {
                fields
                    .entry(id_field.to_owned())
                    .or_insert_with(|| rid.to_value());
                Record::new(rid, fields)
            }
            None => Record::new(RecordId::unassigned(), fields),
        }
    }
}

// ── Free helpers ─────────────────────────────────────────────────────

fn multipart_form(payload: &Payload) -> Result<Form, Error> {
    let mut form = Form::new();
    for (name, value) in payload.fields() {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    form = form.text(name.clone(), scalar_text(item));
                }
            }
            other => form = form.text(name.clone(), scalar_text(other)),
        }
    }
    for file in payload.files() {
        let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        if let Some(ref mime) = file.mime {
            part = part.mime_str(mime)?;
        }
        form = form.part(file.field.clone(), part);
    }
    Ok(form)
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Extract `{field: "msg" | ["msg", ...]}` entries from a 4xx body.
///
/// Accepts both a flat object and one nested under `errors`.
fn field_errors(body: &Value) -> Option<BTreeMap<String, Vec<String>>> {
    let map: &Map<String, Value> = match body.get("errors") {
        Some(Value::Object(inner)) => inner,
        _ => body.as_object()?,
    };

    let mut out = BTreeMap::new();
    for (field, value) in map {
        if MESSAGE_KEYS.contains(&field.as_str()) {
            continue;
        }
        let messages: Vec<String> = match value {
            Value::String(s) => vec![s.clone()],
            Value::Array(items) => items
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect(),
            _ => Vec::new(),
        };
        if !messages.is_empty() {
            out.insert(field.clone(), messages);
        }
    }

    (!out.is_empty()).then_some(out)
}

/// Human-readable message from an error body, if the backend gave one.
fn detail_text(body: &Value) -> Option<String> {
    if let Value::String(s) = body {
        return Some(s.clone()).filter(|s| !s.is_empty());
    }
    for key in ["detail", "message", "error"] {
        match body.get(key) {
            Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            Some(Value::Object(inner)) => {
                if let Some(Value::String(s)) = inner.get("message") {
                    return Some(s.clone());
                }
            }
            _ => {}
        }
    }
    None
}

fn non_empty_preview(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(200).collect())
    }
}

/// Parse the file name out of `Content-Disposition: attachment; filename=...`.
fn attachment_file_name(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(CONTENT_DISPOSITION)?.to_str().ok()?;
    let mut plain = None;
    for param in value.split(';').map(str::trim) {
        if let Some(encoded) = param.strip_prefix("filename*=") {
            let name = encoded.rsplit("''").next().unwrap_or(encoded);
            return Some(name.trim_matches('"').to_owned()).filter(|n| !n.is_empty());
        }
        if let Some(name) = param.strip_prefix("filename=") {
            plain = Some(name.trim_matches('"').to_owned());
        }
    }
    plain.filter(|n| !n.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use reqwest::header::HeaderValue;
    use serde_json::json;

    use super::*;

    #[test]
    fn field_errors_ignore_message_keys() {
        let body = json!({"detail": "bad", "name": ["required"], "value": "must be > 0"});
        let errors = field_errors(&body).unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors["value"], vec!["must be > 0".to_string()]);

        assert!(field_errors(&json!({"detail": "bad"})).is_none());
    }

    #[test]
    fn field_errors_read_nested_errors_object() {
        let body = json!({"message": "invalid", "errors": {"hsn_code": ["too long"]}});
        let errors = field_errors(&body).unwrap();
        assert_eq!(errors["hsn_code"], vec!["too long".to_string()]);
    }

    #[test]
    fn detail_text_prefers_detail_then_message() {
        assert_eq!(
            detail_text(&json!({"detail": "Not allowed", "message": "x"})).as_deref(),
            Some("Not allowed")
        );
        assert_eq!(
            detail_text(&json!({"error": {"message": "sheet empty"}})).as_deref(),
            Some("sheet empty")
        );
        assert!(detail_text(&json!({"ok": false})).is_none());
    }

    #[test]
    fn content_disposition_variants() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_DISPOSITION,
            HeaderValue::from_static("attachment; filename=\"orders_2024.xlsx\""),
        );
        assert_eq!(attachment_file_name(&headers).as_deref(), Some("orders_2024.xlsx"));

        headers.insert(
            CONTENT_DISPOSITION,
            HeaderValue::from_static("attachment; filename*=UTF-8''tcs.xlsx"),
        );
        assert_eq!(attachment_file_name(&headers).as_deref(), Some("tcs.xlsx"));

        headers.insert(CONTENT_DISPOSITION, HeaderValue::from_static("inline"));
        assert!(attachment_file_name(&headers).is_none());
    }
}
