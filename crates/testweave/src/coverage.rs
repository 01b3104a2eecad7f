//! Coverage measurement around a run
//!
//! Instrumentation is the compiler's job (`-C instrument-coverage`); the
//! service here only clears stale profiles before a run and records what
//! the run produced afterwards.

use crate::error::{WeaveError, WeaveResult};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Manifest written after a measured run
pub const DEFAULT_OUTPUT: &str = ".coverage";

/// Raw profile extension written by instrumented binaries
pub const PROFILE_EXTENSION: &str = "profraw";

/// Sources excluded from reports: test modules and numbered migrations
pub const OMIT_PATTERNS: &[&str] = &[r"[A-z_\.]*test[A-z_\.]*", r"[0-9]{4}[A-z_\.]*"];

/// An opaque start/stop/save coverage collector
pub trait CoverageService {
    fn erase(&self) -> WeaveResult<()>;
    fn start(&self) -> WeaveResult<()>;
    fn stop(&self) -> WeaveResult<()>;
    fn save(&self) -> WeaveResult<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageManifest {
    pub profiles: Vec<PathBuf>,
    pub omit: Vec<String>,
    pub duration_secs: f64,
}

/// Collects `.profraw` files from one directory
#[derive(Debug)]
pub struct ProfileCoverage {
    profile_dir: PathBuf,
    output: PathBuf,
    started: Cell<Option<Instant>>,
    measured: Cell<Duration>,
}

impl ProfileCoverage {
    pub fn new(profile_dir: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            profile_dir: profile_dir.into(),
            output: output.into(),
            started: Cell::new(None),
            measured: Cell::new(Duration::ZERO),
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    fn profiles(&self) -> io::Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.profile_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let mut profiles = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == PROFILE_EXTENSION) {
                profiles.push(path);
            }
        }
        profiles.sort();
        Ok(profiles)
    }
}

impl CoverageService for ProfileCoverage {
    fn erase(&self) -> WeaveResult<()> {
        for profile in self.profiles()? {
            fs::remove_file(&profile)?;
        }
        match fs::remove_file(&self.output) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn start(&self) -> WeaveResult<()> {
        self.started.set(Some(Instant::now()));
        Ok(())
    }

    fn stop(&self) -> WeaveResult<()> {
        let started = self
            .started
            .take()
            .ok_or_else(|| WeaveError::Coverage("stopped before it was started".to_string()))?;
        self.measured.set(started.elapsed());
        Ok(())
    }

    fn save(&self) -> WeaveResult<()> {
        let manifest = CoverageManifest {
            profiles: self.profiles()?,
            omit: OMIT_PATTERNS.iter().map(|p| p.to_string()).collect(),
            duration_secs: self.measured.get().as_secs_f64(),
        };
        let json = serde_json::to_string_pretty(&manifest)
            .map_err(|e| WeaveError::Coverage(e.to_string()))?;
        fs::write(&self.output, json)?;
        tracing::debug!(
            output = %self.output.display(),
            profiles = manifest.profiles.len(),
            "saved coverage manifest"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_erase_removes_stale_profiles_and_manifest() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("old.profraw"), "").unwrap();
        fs::write(dir.path().join("keep.txt"), "").unwrap();
        fs::write(dir.path().join(".coverage"), "{}").unwrap();

        let coverage = ProfileCoverage::new(dir.path(), dir.path().join(".coverage"));
        coverage.erase().unwrap();

        assert!(!dir.path().join("old.profraw").exists());
        assert!(!dir.path().join(".coverage").exists());
        assert!(dir.path().join("keep.txt").exists());
    }

    #[test]
    fn test_save_writes_manifest() {
        let dir = tempdir().unwrap();
        let coverage = ProfileCoverage::new(dir.path(), dir.path().join(".coverage"));
        coverage.erase().unwrap();
        coverage.start().unwrap();
        fs::write(dir.path().join("run-1.profraw"), "").unwrap();
        coverage.stop().unwrap();
        coverage.save().unwrap();

        let written = fs::read_to_string(coverage.output()).unwrap();
        let manifest: CoverageManifest = serde_json::from_str(&written).unwrap();
        assert_eq!(manifest.profiles, vec![dir.path().join("run-1.profraw")]);
        assert_eq!(manifest.omit, OMIT_PATTERNS);
    }

    #[test]
    fn test_missing_profile_dir_is_empty() {
        let dir = tempdir().unwrap();
        let coverage = ProfileCoverage::new(dir.path().join("nope"), dir.path().join(".coverage"));
        coverage.erase().unwrap();
        coverage.start().unwrap();
        coverage.stop().unwrap();
        coverage.save().unwrap();
    }

    #[test]
    fn test_stop_without_start() {
        let dir = tempdir().unwrap();
        let coverage = ProfileCoverage::new(dir.path(), dir.path().join(".coverage"));
        assert!(matches!(coverage.stop(), Err(WeaveError::Coverage(_))));
    }
}
