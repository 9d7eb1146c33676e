//! Server configuration: toml file plus environment overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variable prefix for overrides.
const ENV_PREFIX: &str = "INBOX_ORCH";

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_database_path() -> PathBuf {
    PathBuf::from("data/orchestrator.db")
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Provider connection settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Static API key for the deployment provider.
    #[serde(default)]
    pub api_key: String,
    /// Override the provider endpoint (staging, tests).
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Listen address, e.g. `0.0.0.0:8080`.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Whole-request timeout for API handlers.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Shared secret for webhook signature verification. Unsigned callbacks
    /// are rejected while this is unset.
    #[serde(default)]
    pub webhook_secret: Option<String>,
    #[serde(default)]
    pub provider: ProviderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            database_path: default_database_path(),
            request_timeout_secs: default_request_timeout_secs(),
            webhook_secret: None,
            provider: ProviderConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration: the toml file (if present), then environment
    /// overrides on top.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p)
                    .map_err(|e| ConfigError::Io(p.to_path_buf(), e))?;
                toml::from_str(&raw).map_err(|e| ConfigError::Parse(p.to_path_buf(), e))?
            }
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var(format!("{ENV_PREFIX}_BIND_ADDR")) {
            self.bind_addr = v;
        }
        if let Ok(v) = std::env::var(format!("{ENV_PREFIX}_DATABASE_PATH")) {
            self.database_path = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var(format!("{ENV_PREFIX}_WEBHOOK_SECRET")) {
            self.webhook_secret = Some(v);
        }
        if let Ok(v) = std::env::var(format!("{ENV_PREFIX}_API_KEY")) {
            self.provider.api_key = v;
        }
        if let Ok(v) = std::env::var(format!("{ENV_PREFIX}_PROVIDER_BASE_URL")) {
            self.provider.base_url = Some(v);
        }
    }
}

/// Configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("failed to parse config file {0}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.webhook_secret.is_none());
    }

    #[test]
    fn parses_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            bind_addr = "0.0.0.0:9000"
            webhook_secret = "s3cret"

            [provider]
            api_key = "key"
            base_url = "http://localhost:9999/api/v1"
            "#,
        )
        .unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.webhook_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.provider.api_key, "key");
    }

    #[test]
    fn rejects_unknown_fields() {
        let result: Result<AppConfig, _> = toml::from_str("bindaddr = \"oops\"");
        assert!(result.is_err());
    }
}
