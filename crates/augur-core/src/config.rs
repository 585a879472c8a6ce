//! Configuration loading and typed config structures for Augur.
//!
//! The configuration lives in `augur-config.yaml`. Every section and field
//! has a default, so an empty file is valid YAML; the one thing that cannot
//! be defaulted is the operator identity, which the upstream API requires on
//! every request.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::calibration::{DEFAULT_MAJOR_SECONDS, DEFAULT_MINOR_SECONDS, UpdateDurations};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but is not usable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration, mirroring `augur-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AugurConfig {
    /// Who is running this instance.
    #[serde(default)]
    pub operator: OperatorConfig,

    /// Upstream API endpoints and request pacing.
    #[serde(default)]
    pub api: ApiConfig,

    /// Where the regions dump is read from.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Default update durations.
    #[serde(default)]
    pub model: ModelConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AugurConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `AUGUR_OPERATOR` overrides `operator.name`
    /// - `AUGUR_API_URL` overrides `api.base_url`
    /// - `AUGUR_DUMP_PATH` overrides `catalog.dump_path`
    /// - `AUGUR_LOG_LEVEL` overrides `logging.level`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if no operator identity is configured.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides and validate.
    ///
    /// # Errors
    ///
    /// Same as [`from_file`](Self::from_file), minus the I/O case.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Override file values with environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("AUGUR_OPERATOR") {
            self.operator.name = val;
        }
        if let Ok(val) = std::env::var("AUGUR_API_URL") {
            self.api.base_url = val;
        }
        if let Ok(val) = std::env::var("AUGUR_DUMP_PATH") {
            self.catalog.dump_path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("AUGUR_LOG_LEVEL") {
            self.logging.level = val;
        }
    }

    /// Check the values that have no usable default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the operator name is blank or the
    /// default durations are zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.operator.name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "operator.name (or AUGUR_OPERATOR) must identify who runs this instance"
                    .to_owned(),
            });
        }
        if self.model.major_seconds == 0 || self.model.minor_seconds == 0 {
            return Err(ConfigError::Invalid {
                reason: "model durations must be at least one second".to_owned(),
            });
        }
        Ok(())
    }
}

/// Operator identity sent with every upstream request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OperatorConfig {
    /// Nation name or email address of the person running this instance.
    #[serde(default)]
    pub name: String,
}

/// Upstream API settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the API endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Minimum spacing between consecutive requests in milliseconds.
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
            min_request_interval_ms: default_min_request_interval_ms(),
        }
    }
}

/// Regions dump location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogConfig {
    /// Path to the gzip-compressed regions dump.
    #[serde(default = "default_dump_path")]
    pub dump_path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            dump_path: default_dump_path(),
        }
    }
}

/// Update durations the model starts from and resets to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelConfig {
    /// Length of the major update in seconds.
    #[serde(default = "default_major_seconds")]
    pub major_seconds: u64,

    /// Length of the minor update in seconds.
    #[serde(default = "default_minor_seconds")]
    pub minor_seconds: u64,
}

impl ModelConfig {
    /// The configured durations as model input.
    pub fn durations(&self) -> UpdateDurations {
        UpdateDurations {
            major: Decimal::from(self.major_seconds),
            minor: Decimal::from(self.minor_seconds),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            major_seconds: default_major_seconds(),
            minor_seconds: default_minor_seconds(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG` is
    /// not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.nationstates.net/cgi-bin/api.cgi".to_owned()
}

const fn default_request_timeout_ms() -> u64 {
    10_000
}

const fn default_min_request_interval_ms() -> u64 {
    650
}

fn default_dump_path() -> PathBuf {
    PathBuf::from("regions.xml.gz")
}

const fn default_major_seconds() -> u64 {
    DEFAULT_MAJOR_SECONDS
}

const fn default_minor_seconds() -> u64 {
    DEFAULT_MINOR_SECONDS
}

fn default_log_level() -> String {
    "info".to_owned()
}
