//! Start-up configuration.
//!
//! Values come from an environment-style lookup so the same loader serves
//! the browser build (values baked in at compile time) and tests.
//!
//! Keys:
//! - `SUPABASE_URL`: auth provider base URL (required)
//! - `SUPABASE_ANON_KEY`: auth provider public key (required)
//! - `API_BASE_URL`: data API base URL
//! - `AUTH_GUARD_TIMEOUT_MS`: how long a navigation waits for the session check
//! - `AUTH_GUARD_ON_ERROR`: `closed` or `open`, see [`OracleFailurePolicy`]
//!
//! [`OracleFailurePolicy`]: crate::guard::OracleFailurePolicy

use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::api::DEFAULT_API_BASE_URL;
use crate::guard::GuardPolicy;
use crate::session::{AuthConfig, AuthConfigError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub auth: AuthConfig,
    pub api_base_url: String,
    pub guard: GuardPolicy,
}

impl AppConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Unset and empty are the same thing for compile-time values.
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let auth = AuthConfig::new(&require("SUPABASE_URL")?, require("SUPABASE_ANON_KEY")?)
            .map_err(auth_config_error)?;

        let api_base_url = get("API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        Url::parse(&api_base_url).map_err(|e| ConfigError::Invalid {
            key: "API_BASE_URL",
            reason: e.to_string(),
        })?;

        let mut guard = GuardPolicy::default();
        if let Some(raw) = get("AUTH_GUARD_TIMEOUT_MS") {
            let millis: u64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "AUTH_GUARD_TIMEOUT_MS",
                reason: format!("expected milliseconds, got {raw:?}"),
            })?;
            if millis == 0 {
                return Err(ConfigError::Invalid {
                    key: "AUTH_GUARD_TIMEOUT_MS",
                    reason: "must be greater than zero".to_string(),
                });
            }
            guard.timeout = Duration::from_millis(millis);
        }
        if let Some(raw) = get("AUTH_GUARD_ON_ERROR") {
            guard.on_oracle_error = raw.parse().map_err(|reason| ConfigError::Invalid {
                key: "AUTH_GUARD_ON_ERROR",
                reason,
            })?;
        }

        Ok(Self {
            auth,
            api_base_url,
            guard,
        })
    }
}

/// Report an auth config failure under the key that caused it.
fn auth_config_error(e: AuthConfigError) -> ConfigError {
    let key = match e {
        AuthConfigError::EmptyKey => "SUPABASE_ANON_KEY",
        AuthConfigError::InvalidUrl(_) | AuthConfigError::MissingHost(_) => "SUPABASE_URL",
    };
    ConfigError::Invalid {
        key,
        reason: e.to_string(),
    }
}
