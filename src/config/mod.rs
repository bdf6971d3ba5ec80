//! # Testflow Configuration
//!
//! Layered configuration for the workflow core: a base TOML file, an optional
//! per-environment override, then `TESTFLOW__*` environment variables.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use testflow_core::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load configuration (environment auto-detected)
//! let manager = ConfigManager::load()?;
//!
//! let max_comment_length = manager.config().validation.max_comment_length;
//! let backend = manager.config().store.backend;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring `config/testflow.toml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WorkflowConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub validation: ValidationConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Limits applied to transition payloads
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ValidationConfig {
    #[serde(default = "default_max_comment_length")]
    pub max_comment_length: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_comment_length: default_max_comment_length(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Postgres,
}

/// Request store selection and connection settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            database_url: None,
            max_connections: default_max_connections(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_comment_length() -> usize {
    1000
}

fn default_max_connections() -> u32 {
    10
}

impl WorkflowConfig {
    /// Reject settings the workflow cannot run with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.validation.max_comment_length == 0 {
            return Err(ConfigurationError::invalid_value(
                "validation.max_comment_length",
                "must be greater than zero",
            ));
        }

        if self.store.max_connections == 0 {
            return Err(ConfigurationError::invalid_value(
                "store.max_connections",
                "must be greater than zero",
            ));
        }

        if self.store.backend == StoreBackend::Postgres
            && self
                .store
                .database_url
                .as_deref()
                .map_or(true, |url| url.trim().is_empty())
        {
            return Err(ConfigurationError::invalid_value(
                "store.database_url",
                "required when store.backend is postgres",
            ));
        }

        Ok(())
    }

    /// Copy of the configuration safe to log: credentials in the database URL are masked
    pub fn sanitized(&self) -> Self {
        let mut sanitized = self.clone();
        sanitized.store.database_url = self.store.database_url.as_deref().map(mask_credentials);
        sanitized
    }
}

fn mask_credentials(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}
