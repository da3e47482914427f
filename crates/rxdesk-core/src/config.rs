// ── Runtime backend configuration ──
//
// These types describe *how* to reach the REST backend. They carry the
// optional session token and connection tuning, but never touch disk.
// The CLI constructs a `BackendConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use rxdesk_api::{TlsMode, TransportConfig};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (staging backends with self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for talking to one backend.
///
/// Built by the CLI, passed to [`Backend`](crate::Backend) -- core never
/// reads config files.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// API base URL (e.g., `https://api.pharmacy.example/api`).
    pub api_url: Url,
    /// Session token forwarded as a bearer header, if any.
    pub api_token: Option<SecretString>,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Rows per page for list views.
    pub page_size: u32,
}

impl BackendConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            api_token: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
            bearer_token: self.api_token.clone(),
        }
    }
}
