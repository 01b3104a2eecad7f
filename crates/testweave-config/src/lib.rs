//! Testweave Configuration
//!
//! Project configuration stored in `testweave.toml`, found by walking up
//! from the working directory.
//!
//! # Configuration Hierarchy
//!
//! Later sources override earlier ones:
//! 1. Project config (`testweave.toml`)
//! 2. Environment variables (`TESTWEAVE_*`)
//! 3. Command-line flags (applied by the caller)
//!
//! # Example
//!
//! ```no_run
//! use testweave_config::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::new().load_from_directory(Path::new(".")).unwrap();
//! println!("discovering under {}", config.root().display());
//! ```

pub mod loader;
pub mod project;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

pub use loader::{Config, ConfigLoader, CONFIG_FILE_NAME};
pub use project::{CoverageConfig, DiscoveryConfig, ProjectConfig, RunnerConfig};
