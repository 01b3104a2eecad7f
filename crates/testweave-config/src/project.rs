//! Project Configuration (testweave.toml)

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Highest verbosity the text runner distinguishes
pub const MAX_VERBOSITY: u8 = 3;

/// Project configuration from testweave.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discovery: Option<DiscoveryConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub runner: Option<RunnerConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage: Option<CoverageConfig>,
}

/// Where and how test modules are discovered
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Directory to walk, relative to the project root (default: the root)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Source file extension without the dot (default: "rs")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,

    /// File stem standing for its directory (default: "mod")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_marker: Option<String>,

    /// Directory names skipped in addition to the built-in ones
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,

    /// Case types run last, as `module.Name`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defer: Option<Vec<String>>,
}

/// Text runner settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failfast: Option<bool>,
}

/// Coverage manifest settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct CoverageConfig {
    /// Manifest path (default: ".coverage")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Directory instrumented binaries write profiles to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_dir: Option<PathBuf>,
}

impl ProjectConfig {
    /// Load project configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;
        Self::parse(&content, path)
    }

    /// Parse configuration text; `path` is only used in errors
    pub fn parse(content: &str, path: &Path) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(discovery) = &self.discovery {
            if let Some(extension) = &discovery.extension {
                if extension.is_empty() || extension.starts_with('.') {
                    return Err(ConfigError::invalid(
                        "discovery.extension",
                        format!("expected an extension without a dot, got '{extension}'"),
                    ));
                }
            }
            if discovery.package_marker.as_deref() == Some("") {
                return Err(ConfigError::invalid(
                    "discovery.package_marker",
                    "marker cannot be empty",
                ));
            }
            for name in &discovery.exclude {
                if name.is_empty() || name.contains(['/', '\\']) {
                    return Err(ConfigError::invalid(
                        "discovery.exclude",
                        format!("'{name}' is not a directory name"),
                    ));
                }
            }
            for case in discovery.defer.iter().flatten() {
                let valid = case
                    .rsplit_once('.')
                    .is_some_and(|(module, name)| !module.is_empty() && !name.is_empty());
                if !valid {
                    return Err(ConfigError::invalid(
                        "discovery.defer",
                        format!("expected module.Name, got '{case}'"),
                    ));
                }
            }
        }

        if let Some(verbosity) = self.runner.as_ref().and_then(|r| r.verbosity) {
            if verbosity > MAX_VERBOSITY {
                return Err(ConfigError::invalid(
                    "runner.verbosity",
                    format!("{verbosity} is above the maximum of {MAX_VERBOSITY}"),
                ));
            }
        }

        Ok(())
    }

    pub fn discovery(&self) -> DiscoveryConfig {
        self.discovery.clone().unwrap_or_default()
    }

    pub fn verbosity(&self) -> Option<u8> {
        self.runner.as_ref().and_then(|r| r.verbosity)
    }

    pub fn failfast(&self) -> Option<bool> {
        self.runner.as_ref().and_then(|r| r.failfast)
    }
}
