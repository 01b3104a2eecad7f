/// Error types for discovery, option parsing and runs
use std::path::PathBuf;
use thiserror::Error;

use crate::options::ENV_VAR;

pub type WeaveResult<T> = Result<T, WeaveError>;

/// A bad token in the option string. Always fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error(
        "bad entry in {var}: {token}. \
         (expect --quiet=X, --readable, --color, --show-skip or --coverage)",
        var = ENV_VAR
    )]
    Unrecognized { token: String },

    #[error(
        "bad entry in {var}: {token}. (quiet level must be between 0 and 4)",
        var = ENV_VAR
    )]
    BadQuietLevel { token: String },
}

/// Failure while walking the tree or importing a discovered module.
///
/// Any of these aborts suite construction before a single test runs.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to import module '{module}': {reason}")]
    Import { module: String, reason: String },

    #[error("Malformed test identifier '{0}' (expected module.Class.method)")]
    MalformedId(String),

    #[error("No test case '{class}' in module '{module}'")]
    CaseNotFound { module: String, class: String },

    #[error("Test case '{case}' has no method '{method}'")]
    MethodNotFound { case: String, method: String },
}

impl DiscoveryError {
    /// Create an import error
    pub fn import(module: impl ToString, reason: impl ToString) -> Self {
        Self::Import {
            module: module.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Failure reported by the test environment during setup or teardown.
#[derive(Debug, Error)]
#[error("Environment {phase} failed: {message}")]
pub struct EnvironmentError {
    pub phase: &'static str,
    pub message: String,
}

impl EnvironmentError {
    pub fn setup(message: impl Into<String>) -> Self {
        Self {
            phase: "setup",
            message: message.into(),
        }
    }

    pub fn teardown(message: impl Into<String>) -> Self {
        Self {
            phase: "teardown",
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum WeaveError {
    #[error(transparent)]
    Options(#[from] OptionError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Environment(#[from] EnvironmentError),

    #[error("Coverage error: {0}")]
    Coverage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
