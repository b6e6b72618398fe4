//! Cosigner configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use cosign_client::DEFAULT_TIMEOUT;
use cosign_types::NetworkType;
use cosign_utils::LogFormat;

use crate::CoreError;

/// Configuration for the cosigner.
///
/// Can be loaded from a TOML file via [`CosignerConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CosignerConfig {
    /// Directory holding the persisted address and node lists.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Network selected when nothing has been persisted yet.
    #[serde(default = "default_network")]
    pub network: NetworkType,

    /// Bound for transaction fetch and cosignature announce.
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Bound for each node health check and network detection.
    #[serde(default = "default_timeout_ms")]
    pub health_check_timeout_ms: u64,

    /// Partial transactions requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./cosigner_data")
}

fn default_network() -> NetworkType {
    NetworkType::Mainnet
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT.as_millis() as u64
}

fn default_page_size() -> u32 {
    cosign_client::transactions::DEFAULT_PAGE_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl CosignerConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, CoreError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CoreError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, CoreError> {
        let config: Self = toml::from_str(s).map_err(|e| CoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, CoreError> {
        toml::to_string_pretty(self).map_err(|e| CoreError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.request_timeout_ms == 0 || self.health_check_timeout_ms == 0 {
            return Err(CoreError::Config("timeouts must be positive".to_string()));
        }
        if self.page_size == 0 {
            return Err(CoreError::Config("page_size must be positive".to_string()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn health_check_timeout(&self) -> Duration {
        Duration::from_millis(self.health_check_timeout_ms)
    }
}

impl Default for CosignerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            network: default_network(),
            request_timeout_ms: default_timeout_ms(),
            health_check_timeout_ms: default_timeout_ms(),
            page_size: default_page_size(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
