// ── Core error types ──
//
// User-facing errors from rxdesk-core. Consumers never see reqwest or
// JSON parse failures directly: the `From<rxdesk_api::Error>` impl
// translates transport-layer errors into page-level variants.

use std::collections::BTreeMap;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Backend errors ───────────────────────────────────────────────
    #[error("Failed to fetch {entity}{}", detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    FetchFailed {
        entity: String,
        status: Option<u16>,
        detail: Option<String>,
    },

    #[error("{entity} '{id}' not found")]
    NotFound { entity: String, id: String },

    #[error("{entity} rejected by backend")]
    Rejected {
        entity: String,
        /// Backend field name -> messages.
        field_errors: BTreeMap<String, Vec<String>>,
    },

    #[error("Import rejected: {reason}")]
    ImportRejected { reason: String },

    #[error("Failed to fetch {entity}: unexpected response ({message})")]
    Malformed { entity: String, message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Backend request timed out")]
    Timeout,

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Form has {} invalid field(s)", errors.len())]
    InvalidForm {
        /// Form field name -> message.
        errors: BTreeMap<String, String>,
    },

    #[error("Invalid value for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unsupported file '{file_name}': expected {expected}")]
    UnsupportedFile {
        file_name: String,
        expected: &'static str,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Local I/O ────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl CoreError {
    /// Message for a toast/notice: backend detail when available, else a
    /// generic "Failed to fetch <entities>" fallback.
    pub fn user_message(&self) -> String {
        match self {
            Self::FetchFailed { entity, detail, .. } => detail
                .clone()
                .unwrap_or_else(|| format!("Failed to fetch {entity}")),
            Self::Malformed { entity, .. } => format!("Failed to fetch {entity}"),
            Self::Rejected { field_errors, .. } => field_errors
                .iter()
                .map(|(field, msgs)| format!("{field}: {}", msgs.join("; ")))
                .collect::<Vec<_>>()
                .join("\n"),
            Self::InvalidForm { errors } => errors
                .iter()
                .map(|(field, msg)| format!("{field}: {msg}"))
                .collect::<Vec<_>>()
                .join("\n"),
            other => other.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<rxdesk_api::Error> for CoreError {
    fn from(err: rxdesk_api::Error) -> Self {
        match err {
            rxdesk_api::Error::FetchFailed {
                entity,
                status,
                cause,
            } => CoreError::FetchFailed {
                entity,
                status,
                detail: cause,
            },
            rxdesk_api::Error::NotFound { entity, id } => CoreError::NotFound { entity, id },
            rxdesk_api::Error::ValidationFailed {
                entity,
                field_errors,
            } => CoreError::Rejected {
                entity,
                field_errors,
            },
            rxdesk_api::Error::ImportRejected { reason } => CoreError::ImportRejected { reason },
            rxdesk_api::Error::Transport(ref e) if e.is_timeout() => CoreError::Timeout,
            rxdesk_api::Error::Transport(e) => CoreError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string),
                reason: e.to_string(),
            },
            rxdesk_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            rxdesk_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            rxdesk_api::Error::InvalidToken(reason) => CoreError::Config {
                message: format!("Invalid API token: {reason}"),
            },
            rxdesk_api::Error::Deserialization {
                entity, message, ..
            } => CoreError::Malformed { entity, message },
        }
    }
}
