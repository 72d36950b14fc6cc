//! Client configuration.

use crate::error::{EquipError, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Connection and presentation settings for the equipment client.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Base URL of the remote REST surface, without a trailing slash.
    pub base_url: String,
    /// Timeout for regular calls in seconds (default: 15).
    pub request_timeout_secs: u64,
    /// Timeout for the connectivity probe in seconds (default: 10).
    pub probe_timeout_secs: u64,
    /// Total attempts for a read that times out (default: 2).
    pub max_attempts: u32,
    /// Fixed pause between attempts in milliseconds (default: 500).
    pub retry_backoff_ms: u64,
    pub user_agent: String,
    /// Skip TLS certificate verification. Only for test deployments.
    pub accept_invalid_certs: bool,
    /// Lines kept by the in-memory activity log (default: 300).
    pub activity_log_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "https://oracleapex.com/ords/nexora/api".into(),
            request_timeout_secs: 15,
            probe_timeout_secs: 10,
            max_attempts: 2,
            retry_backoff_ms: 500,
            user_agent: "NexoraEquipmentApp/1.0".into(),
            accept_invalid_certs: false,
            activity_log_capacity: 300,
        }
    }
}

impl AppConfig {
    /// Reads a TOML file and validates it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|e| EquipError::Config(e.message().to_string()))?;
        config.validate()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn validate(mut self) -> Result<Self> {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if self.base_url.is_empty() {
            return Err(EquipError::Config("base_url must not be empty".into()));
        }
        if self.max_attempts == 0 {
            return Err(EquipError::Config("max_attempts must be at least 1".into()));
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}
