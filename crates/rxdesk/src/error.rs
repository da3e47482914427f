//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use rxdesk_config::ConfigError;
use rxdesk_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the backend at {url}")]
    #[diagnostic(
        code(rxdesk::connection_failed),
        help(
            "Check that the API is running and the URL is right.\n\
             Reason: {reason}\n\
             Try: rxdesk config show"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Backend request timed out")]
    #[diagnostic(
        code(rxdesk::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Backend refused the session ({status})")]
    #[diagnostic(
        code(rxdesk::auth_failed),
        help(
            "Check the session token for this profile.\n\
             Run: rxdesk config set api_token <TOKEN>\n\
             Or set RXDESK_API_TOKEN."
        )
    )]
    AuthFailed { status: u16 },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{entity} '{id}' not found")]
    #[diagnostic(
        code(rxdesk::not_found),
        help(
            "Row actions work on the loaded page.\n\
             Run: rxdesk {command} list  (add --page/--filter to reach the row)"
        )
    )]
    NotFound {
        entity: String,
        id: String,
        command: String,
    },

    #[error("{message}")]
    #[diagnostic(code(rxdesk::backend))]
    Backend { message: String },

    #[error("{entity} rejected by backend")]
    #[diagnostic(code(rxdesk::rejected), help("{details}"))]
    Rejected { entity: String, details: String },

    #[error("Import rejected: {reason}")]
    #[diagnostic(
        code(rxdesk::import_rejected),
        help("Fix the spreadsheet rows named above and upload it again.")
    )]
    ImportRejected { reason: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Form has {count} invalid field(s)")]
    #[diagnostic(code(rxdesk::invalid_form), help("{details}"))]
    InvalidForm { count: usize, details: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(rxdesk::validation))]
    Validation { field: String, reason: String },

    #[error("Unsupported file '{file_name}'")]
    #[diagnostic(code(rxdesk::unsupported_file), help("Expected {expected}."))]
    UnsupportedFile {
        file_name: String,
        expected: &'static str,
    },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(rxdesk::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: rxdesk config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No backend configured")]
    #[diagnostic(
        code(rxdesk::no_config),
        help(
            "Create a profile with: rxdesk config init\n\
             Or pass --api-url / set RXDESK_API_URL.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(rxdesk::config))]
    Config(ConfigError),

    // ── Output ───────────────────────────────────────────────────────
    #[error("Failed to render output: {0}")]
    #[diagnostic(code(rxdesk::output))]
    Output(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } | Self::ImportRejected { .. } => exit_code::REJECTED,
            Self::InvalidForm { .. }
            | Self::Validation { .. }
            | Self::UnsupportedFile { .. }
            | Self::ProfileNotFound { .. }
            | Self::NoConfig { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the CLI command that lists `entity`, for not-found help.
    pub fn with_command(self, command: &str) -> Self {
        match self {
            Self::NotFound { entity, id, .. } => Self::NotFound {
                entity,
                id,
                command: command.into(),
            },
            other => other,
        }
    }
}

fn bullet_list<'a>(items: impl Iterator<Item = (&'a String, String)>) -> String {
    items
        .map(|(field, msg)| format!("  {field}: {msg}"))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout => Self::Timeout,
            CoreError::FetchFailed {
                status: Some(status @ (401 | 403)),
                ..
            } => Self::AuthFailed { status },
            err @ CoreError::FetchFailed { .. } => Self::Backend {
                message: err.user_message(),
            },
            CoreError::NotFound { entity, id } => Self::NotFound {
                entity,
                id,
                command: String::new(),
            },
            CoreError::Rejected {
                entity,
                field_errors,
            } => Self::Rejected {
                entity,
                details: bullet_list(
                    field_errors
                        .iter()
                        .map(|(field, msgs)| (field, msgs.join("; "))),
                ),
            },
            CoreError::ImportRejected { reason } => Self::ImportRejected { reason },
            CoreError::InvalidForm { errors } => Self::InvalidForm {
                count: errors.len(),
                details: bullet_list(errors.iter().map(|(field, msg)| (field, msg.clone()))),
            },
            CoreError::InvalidInput { field, reason } => Self::Validation { field, reason },
            CoreError::UnsupportedFile {
                file_name,
                expected,
            } => Self::UnsupportedFile {
                file_name,
                expected,
            },
            CoreError::Io(e) => Self::Io(e),
            other @ (CoreError::Malformed { .. }
            | CoreError::Config { .. }
            | CoreError::Csv(_)) => Self::Backend {
                message: other.to_string(),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn auth_statuses_get_their_own_exit_code() {
        let err = CliError::from(CoreError::FetchFailed {
            entity: "orders".into(),
            status: Some(401),
            detail: None,
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);

        let err = CliError::from(CoreError::FetchFailed {
            entity: "orders".into(),
            status: Some(500),
            detail: None,
        });
        assert_eq!(err.to_string(), "Failed to fetch orders");
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn form_errors_are_listed_in_help() {
        let mut errors = BTreeMap::new();
        errors.insert("validFrom".to_string(), "Valid from is required".to_string());
        let err = CliError::from(CoreError::InvalidForm { errors });
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert!(matches!(
            &err,
            CliError::InvalidForm { count: 1, details } if details == "  validFrom: Valid from is required"
        ));
    }

    #[test]
    fn not_found_names_the_list_command() {
        let err = CliError::from(CoreError::NotFound {
            entity: "discount".into(),
            id: "9".into(),
        })
        .with_command("discounts");
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert!(matches!(err, CliError::NotFound { command, .. } if command == "discounts"));
    }
}
