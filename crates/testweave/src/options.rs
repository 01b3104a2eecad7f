//! Runner options parsed from the `TEST_RUNNER_OPTIONS` string
//!
//! The option string decides which behavior modules are composed onto the
//! runner and result. It is parsed once at startup and never changes.

use crate::error::OptionError;
use std::fmt;

/// Environment variable holding the option string
pub const ENV_VAR: &str = "TEST_RUNNER_OPTIONS";

/// Quiet level applied when `--quiet` is given without a value
pub const DEFAULT_QUIET_LEVEL: QuietLevel = QuietLevel(3);

/// How aggressively environment setup chatter is suppressed (0 to 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct QuietLevel(u8);

impl QuietLevel {
    pub const MAX: u8 = 4;

    pub fn new(level: u8) -> Option<Self> {
        (level <= Self::MAX).then_some(Self(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// The fixed set of flags recognized in the option string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSet {
    /// Tree-wide discovery. Always on.
    pub all_dirs: bool,
    pub code_coverage: bool,
    pub color: bool,
    /// `Some` when `--quiet` was given
    pub quiet: Option<QuietLevel>,
    pub readable: bool,
    pub show_skip: bool,
}

impl Default for OptionSet {
    fn default() -> Self {
        Self {
            all_dirs: true,
            code_coverage: false,
            color: false,
            quiet: None,
            readable: false,
            show_skip: false,
        }
    }
}

impl OptionSet {
    /// Parse a whitespace-delimited option string.
    ///
    /// The first unrecognized token aborts parsing.
    pub fn parse(options: &str) -> Result<Self, OptionError> {
        let mut set = Self::default();
        for token in options.split_whitespace() {
            set.apply_token(token)?;
        }
        Ok(set)
    }

    /// Read and parse `TEST_RUNNER_OPTIONS`; unset means defaults
    pub fn from_env() -> Result<Self, OptionError> {
        match std::env::var(ENV_VAR) {
            Ok(value) => Self::parse(&value),
            Err(_) => Ok(Self::default()),
        }
    }

    fn apply_token(&mut self, token: &str) -> Result<(), OptionError> {
        match token {
            "--quiet" => self.quiet = Some(DEFAULT_QUIET_LEVEL),
            "--code_coverage" | "--code-coverage" | "--coverage" => self.code_coverage = true,
            "--readable" => self.readable = true,
            "--color" | "--colour" => self.color = true,
            "--show_skip" | "--show-skip" => self.show_skip = true,
            _ => {
                let Some(value) = token.strip_prefix("--quiet=") else {
                    return Err(OptionError::Unrecognized {
                        token: token.to_string(),
                    });
                };
                let level = value
                    .parse::<u8>()
                    .ok()
                    .and_then(QuietLevel::new)
                    .ok_or_else(|| OptionError::BadQuietLevel {
                        token: token.to_string(),
                    })?;
                self.quiet = Some(level);
            }
        }
        Ok(())
    }

    /// Names of the enabled behaviors, in composition order
    pub fn enabled(&self) -> Vec<String> {
        let mut names = Vec::new();
        if self.all_dirs {
            names.push("all-dirs".to_string());
        }
        if self.color {
            names.push("color".to_string());
        }
        if self.readable {
            names.push("readable".to_string());
        }
        if let Some(level) = self.quiet {
            names.push(format!("quiet={}", level.get()));
        }
        if self.show_skip {
            names.push("show-skip".to_string());
        }
        if self.code_coverage {
            names.push("code-coverage".to_string());
        }
        names
    }
}

impl fmt::Display for OptionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.enabled().join(", "))
    }
}
