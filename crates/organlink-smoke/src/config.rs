//! Runner configuration
//!
//! Resolved once at startup and handed to the executor by value. Layers, in
//! increasing precedence: built-in defaults, an optional JSON/YAML/TOML file,
//! then command-line flags and their environment variables.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::SmokeError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const MAX_TIMEOUT_MS: u64 = 300_000;

/// Bounds the server applies to tenant identifiers
pub const TENANT_ID_MIN_LEN: usize = 3;
pub const TENANT_ID_MAX_LEN: usize = 50;

/// Smoke runner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmokeConfig {
    /// API base URL; request paths are appended to it verbatim
    pub base_url: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,

    /// Tenant sent as `X-Tenant-ID` on every request of a run
    pub tenant_id: Option<String>,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            tenant_id: None,
        }
    }
}

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// Detect format from the file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "json" => Some(ConfigFormat::Json),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "toml" => Some(ConfigFormat::Toml),
            _ => None,
        }
    }
}

/// Values that take precedence over file and defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub tenant_id: Option<String>,
}

impl SmokeConfig {
    /// Load configuration from a file, detecting the format by extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SmokeError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            SmokeError::invalid_input(format!(
                "Unsupported config file extension: {}",
                path.display()
            ))
        })?;

        let content = std::fs::read_to_string(path).map_err(|e| {
            SmokeError::FileError(format!("{}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), ?format, "loading config file");
        Self::parse(&content, format)
    }

    /// Parse configuration from a string in the given format
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self, SmokeError> {
        match format {
            ConfigFormat::Json => {
                serde_json::from_str(content).map_err(|e| SmokeError::parse_error(e.to_string()))
            }
            ConfigFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|e| SmokeError::parse_error(e.to_string()))
            }
            ConfigFormat::Toml => {
                toml::from_str(content).map_err(|e| SmokeError::parse_error(e.to_string()))
            }
        }
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(timeout_ms) = overrides.timeout_ms {
            self.timeout_ms = timeout_ms;
        }
        if overrides.tenant_id.is_some() {
            self.tenant_id = overrides.tenant_id;
        }
        self
    }

    /// Validate and normalize; the base URL loses any trailing slash and the
    /// tenant any surrounding whitespace
    pub fn validate(mut self) -> Result<Self, SmokeError> {
        let url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            SmokeError::config_error(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(SmokeError::config_error(format!(
                "Base URL must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if url.host_str().is_none() {
            return Err(SmokeError::config_error(format!(
                "Base URL has no host: {}",
                self.base_url
            )));
        }

        if self.timeout_ms == 0 || self.timeout_ms > MAX_TIMEOUT_MS {
            return Err(SmokeError::config_error(format!(
                "Timeout must be between 1 and {} ms, got {}",
                MAX_TIMEOUT_MS, self.timeout_ms
            )));
        }

        self.tenant_id = self.tenant_id.map(|tenant| tenant.trim().to_string());
        if let Some(tenant) = &self.tenant_id {
            let len = tenant.chars().count();
            if !(TENANT_ID_MIN_LEN..=TENANT_ID_MAX_LEN).contains(&len) {
                return Err(SmokeError::config_error(format!(
                    "Tenant ID must be between {} and {} characters",
                    TENANT_ID_MIN_LEN, TENANT_ID_MAX_LEN
                )));
            }
        }

        self.base_url = self.base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
