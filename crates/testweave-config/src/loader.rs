//! Configuration Loader
//!
//! Finds `testweave.toml` and layers environment overrides on top of it.

use crate::project::{CoverageConfig, ProjectConfig, RunnerConfig};
use crate::{ConfigError, ConfigResult};
use std::env;
use std::path::{Path, PathBuf};

/// File name searched for in the working directory and its parents
pub const CONFIG_FILE_NAME: &str = "testweave.toml";

/// Overrides `[runner] verbosity`
pub const ENV_VERBOSITY: &str = "TESTWEAVE_VERBOSITY";

/// Overrides `[discovery] root`
pub const ENV_ROOT: &str = "TESTWEAVE_ROOT";

/// Configuration loader
///
/// Precedence, lowest first:
/// 1. Project config (testweave.toml)
/// 2. Environment variables (TESTWEAVE_*)
/// 3. CLI flags (handled by caller)
#[derive(Debug, Default)]
pub struct ConfigLoader;

/// Loaded configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,

    /// Directory where testweave.toml was found
    pub project_root: Option<PathBuf>,

    /// Directory the search started from
    pub working_dir: PathBuf,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load configuration starting from the given directory.
    ///
    /// Walks up the tree looking for testweave.toml; with none found the
    /// defaults apply and the start directory acts as the project root.
    pub fn load_from_directory(&self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project) = self.find_project_config(start_dir)?;
        let project = self.apply_env_overrides(project)?;

        Ok(Config {
            project,
            project_root,
            working_dir: start_dir.to_path_buf(),
        })
    }

    /// Load configuration from an explicit file
    pub fn load_from_file(&self, config_path: &Path) -> ConfigResult<Config> {
        let project = ProjectConfig::load_from_file(config_path)?;
        let project = self.apply_env_overrides(project)?;
        let project_root = config_path.parent().map(Path::to_path_buf);

        Ok(Config {
            working_dir: project_root.clone().unwrap_or_default(),
            project,
            project_root,
        })
    }

    fn find_project_config(
        &self,
        start_dir: &Path,
    ) -> ConfigResult<(Option<PathBuf>, ProjectConfig)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);

            if config_path.exists() {
                let project = ProjectConfig::load_from_file(&config_path)?;
                return Ok((Some(current), project));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, ProjectConfig::default())),
            }
        }
    }

    fn apply_env_overrides(&self, mut config: ProjectConfig) -> ConfigResult<ProjectConfig> {
        if let Ok(verbosity) = env::var(ENV_VERBOSITY) {
            let verbosity = verbosity
                .trim()
                .parse::<u8>()
                .map_err(|e| ConfigError::invalid(ENV_VERBOSITY, e.to_string()))?;
            config
                .runner
                .get_or_insert_with(RunnerConfig::default)
                .verbosity = Some(verbosity);
        }

        if let Ok(root) = env::var(ENV_ROOT) {
            if !root.is_empty() {
                config.discovery.get_or_insert_with(Default::default).root = Some(root.into());
            }
        }

        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Project root, or the working directory when no file was found
    pub fn base_dir(&self) -> &Path {
        self.project_root.as_deref().unwrap_or(&self.working_dir)
    }

    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Whether a testweave.toml was found
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }

    /// Directory to walk for test modules
    pub fn root(&self) -> PathBuf {
        match self.project.discovery.as_ref().and_then(|d| d.root.as_ref()) {
            Some(root) => self.base_dir().join(root),
            None => self.base_dir().to_path_buf(),
        }
    }

    pub fn verbosity(&self) -> Option<u8> {
        self.project.verbosity()
    }

    pub fn failfast(&self) -> bool {
        self.project.failfast().unwrap_or(false)
    }

    pub fn extension(&self) -> Option<&str> {
        self.project.discovery.as_ref()?.extension.as_deref()
    }

    pub fn package_marker(&self) -> Option<&str> {
        self.project.discovery.as_ref()?.package_marker.as_deref()
    }

    pub fn excluded_dirs(&self) -> &[String] {
        self.project
            .discovery
            .as_ref()
            .map(|d| d.exclude.as_slice())
            .unwrap_or(&[])
    }

    /// Deferred case types as `(module, name)` pairs; `None` keeps the default
    pub fn deferred(&self) -> Option<Vec<(&str, &str)>> {
        let defer = self.project.discovery.as_ref()?.defer.as_ref()?;
        Some(defer.iter().filter_map(|case| case.rsplit_once('.')).collect())
    }

    /// Coverage manifest path, resolved against the base directory
    pub fn coverage_output(&self) -> Option<PathBuf> {
        self.coverage()?
            .output
            .as_ref()
            .map(|output| self.base_dir().join(output))
    }

    pub fn coverage_profile_dir(&self) -> Option<PathBuf> {
        self.coverage()?
            .profile_dir
            .as_ref()
            .map(|dir| self.base_dir().join(dir))
    }

    fn coverage(&self) -> Option<&CoverageConfig> {
        self.project.coverage.as_ref()
    }
}
