use std::collections::BTreeMap;

use thiserror::Error;

/// Top-level error type for the `rxdesk-api` crate.
///
/// The four backend-facing variants (`FetchFailed`, `NotFound`,
/// `ValidationFailed`, `ImportRejected`) are the whole taxonomy callers
/// react to. The remaining variants describe failures that never reached
/// a usable HTTP response. `rxdesk-core` folds them into user-facing errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Backend responses ───────────────────────────────────────────
    /// Server error, or a client error without field-level detail.
    #[error("Failed to fetch {entity}{}", describe(*status, cause.as_deref()))]
    FetchFailed {
        entity: String,
        status: Option<u16>,
        /// Backend-supplied detail text, if the response carried any.
        cause: Option<String>,
    },

    /// The addressed identifier does not exist on the backend.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: String, id: String },

    /// Backend-side validation rejected a create/update.
    #[error("{entity} rejected: {}", summarize(field_errors))]
    ValidationFailed {
        entity: String,
        field_errors: BTreeMap<String, Vec<String>>,
    },

    /// The bulk upload could not be parsed or applied.
    #[error("Import rejected: {reason}")]
    ImportRejected { reason: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The bearer token cannot be sent as an HTTP header value.
    #[error("Invalid bearer token: {0}")]
    InvalidToken(String),

    // ── Data ────────────────────────────────────────────────────────
    /// A success response whose body was not the expected JSON, with the
    /// raw body for debugging.
    #[error("Unexpected {entity} response: {message}")]
    Deserialization {
        entity: String,
        message: String,
        body: String,
    },
}

fn describe(status: Option<u16>, cause: Option<&str>) -> String {
    match (status, cause) {
        (_, Some(cause)) => format!(": {cause}"),
        (Some(status), None) => format!(" (HTTP {status})"),
        (None, None) => String::new(),
    }
}

fn summarize(field_errors: &BTreeMap<String, Vec<String>>) -> String {
    field_errors
        .iter()
        .map(|(field, messages)| format!("{field}: {}", messages.join("; ")))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// Returns `true` if the request timed out at the transport layer.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Backend-supplied detail text, when the backend gave any.
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::FetchFailed { cause, .. } => cause.clone(),
            Self::ImportRejected { reason } => Some(reason.clone()),
            Self::ValidationFailed { field_errors, .. } => Some(summarize(field_errors)),
            _ => None,
        }
    }

    /// HTTP status code, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::FetchFailed { status, .. } => *status,
            Self::NotFound { .. } => Some(404),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_lists_fields_in_order() {
        let mut field_errors = BTreeMap::new();
        field_errors.insert("value".into(), vec!["must be positive".into()]);
        field_errors.insert("name".into(), vec!["required".into(), "too short".into()]);
        let err = Error::ValidationFailed {
            entity: "discount".into(),
            field_errors,
        };
        assert_eq!(
            err.to_string(),
            "discount rejected: name: required; too short, value: must be positive"
        );
    }

    #[test]
    fn fetch_failed_without_detail_falls_back_to_status() {
        let err = Error::FetchFailed {
            entity: "suppliers".into(),
            status: Some(500),
            cause: None,
        };
        assert!(err.detail().is_none());
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "Failed to fetch suppliers (HTTP 500)");
    }
}
