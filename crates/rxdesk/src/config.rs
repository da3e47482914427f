//! CLI configuration: thin layer over `rxdesk_config`.
//!
//! Adds flag resolution on top of the shared profile types: `--api-url`,
//! `--token`, `--insecure`, `--timeout` and `--page-size` win over the
//! profile, and a bare `--api-url` works with no config file at all.

use std::time::Duration;

use secrecy::SecretString;

use rxdesk_core::{BackendConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use rxdesk_config::{
    Config, Profile, config_path, load_config_or_default, profile_to_backend_config, save_config,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref())
}

/// Build the backend config: profile values, then flag overrides.
pub fn resolve_backend_config(global: &GlobalOpts) -> Result<BackendConfig, CliError> {
    let cfg = load_config_or_default();
    let name = active_profile_name(global, &cfg);

    let profile = match (cfg.profiles.get(&name), &global.api_url) {
        (Some(profile), _) => profile.clone(),
        (None, Some(url)) => Profile::new(url.clone()),
        (None, None) if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name,
                available: available_profiles(&cfg),
            });
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    let mut backend = profile_to_backend_config(&with_flags(profile, global), &cfg.defaults)?;
    if global.insecure {
        backend.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        backend.timeout = Duration::from_secs(secs);
    }
    if let Some(token) = &global.token {
        backend.api_token = Some(SecretString::from(token.clone()));
    }
    tracing::debug!(profile = %name, url = %backend.api_url, "resolved backend config");
    Ok(backend)
}

fn with_flags(mut profile: Profile, global: &GlobalOpts) -> Profile {
    if let Some(url) = &global.api_url {
        profile.api_url.clone_from(url);
    }
    if let Some(page_size) = global.page_size {
        profile.page_size = Some(page_size);
    }
    profile
}

/// Comma-separated profile names, or `(none)`.
pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}
