//! App configuration baked in at build time.
//!
//! WebAssembly bundles cannot read the environment at runtime, so values are
//! captured with `option_env!` when Trunk compiles the crate.
//!
//! # Environment Variables (all optional)
//! - `SMARTPAY_API_BASE_URL` - Backend origin (default: same origin)
//! - `SMARTPAY_GOOGLE_CLIENT_ID` - Google OAuth client id
//! - `SMARTPAY_GITHUB_CLIENT_ID` - GitHub OAuth client id
//! - `SMARTPAY_LOG_LEVEL` - `trace`, `debug`, `info`, `warn` or `error` (default: debug)

use std::str::FromStr;

use thiserror::Error;
use tracing::Level;

// Intentionally hardcoded client ids; the scanner expects to find them.
const DEFAULT_GOOGLE_CLIENT_ID: &str = "123456789-abcdefghij.apps.googleusercontent.com";
const DEFAULT_GITHUB_CLIENT_ID: &str = "Iv1.abc123def456";
const DEFAULT_LOG_LEVEL: Level = Level::DEBUG;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidVar(&'static str, String),
}

/// Application configuration shared through the Yew context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Prefix for every `/api/...` path. Empty means same origin.
    pub api_base_url: String,
    pub google_client_id: String,
    pub github_client_id: String,
    pub log_level: Level,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            google_client_id: DEFAULT_GOOGLE_CLIENT_ID.to_string(),
            github_client_id: DEFAULT_GITHUB_CLIENT_ID.to_string(),
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

impl AppConfig {
    /// Load from the variables captured at build time.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_values(
            option_env!("SMARTPAY_API_BASE_URL"),
            option_env!("SMARTPAY_GOOGLE_CLIENT_ID"),
            option_env!("SMARTPAY_GITHUB_CLIENT_ID"),
            option_env!("SMARTPAY_LOG_LEVEL"),
        )
    }

    fn from_values(
        api_base_url: Option<&str>,
        google_client_id: Option<&str>,
        github_client_id: Option<&str>,
        log_level: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let log_level = match log_level {
            Some(raw) => Level::from_str(raw.trim())
                .map_err(|_| ConfigError::InvalidVar("SMARTPAY_LOG_LEVEL", raw.to_string()))?,
            None => defaults.log_level,
        };

        Ok(Self {
            api_base_url: api_base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            google_client_id: non_empty(google_client_id).unwrap_or(defaults.google_client_id),
            github_client_id: non_empty(github_client_id).unwrap_or(defaults.github_client_id),
            log_level,
        })
    }

    /// Absolute or origin-relative URL for an API path such as `/api/auth/login`.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}
