//! Enumerate candidate source files under a discovery root

use crate::discovery::module_id::{ModulePath, DEFAULT_EXTENSION};
use crate::error::DiscoveryError;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directory names never descended into (presentation material, build output)
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["talk", "target"];

/// Walks a root directory, yielding every source file outside hidden and
/// denylisted subdirectories.
#[derive(Debug, Clone)]
pub struct PathWalker {
    root: PathBuf,
    extension: String,
    excluded: Vec<String>,
}

impl PathWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            excluded: DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Set the recognized source extension (without the dot)
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Exclude additional directory names on top of the fixed denylist
    pub fn with_excluded<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.excluded.contains(&name) {
                self.excluded.push(name);
            }
        }
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lazily walk the tree.
    ///
    /// The sequence is finite and cannot be restarted; call `walk` again for
    /// a fresh pass. Traversal errors are yielded as items.
    pub fn walk(&self) -> impl Iterator<Item = Result<ModulePath, DiscoveryError>> + '_ {
        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !self.is_pruned(entry))
            .filter_map(move |entry| match entry {
                Ok(entry) => self.to_module_path(&entry).map(Ok),
                Err(source) => Some(Err(DiscoveryError::Walk {
                    path: source
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone()),
                    source,
                })),
            })
    }

    fn is_pruned(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        name.starts_with('.') || self.excluded.iter().any(|excluded| *excluded == name)
    }

    fn to_module_path(&self, entry: &DirEntry) -> Option<ModulePath> {
        if !entry.file_type().is_file() {
            return None;
        }
        let path = entry.path();
        if path.extension() != Some(OsStr::new(&self.extension)) {
            return None;
        }
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        Some(ModulePath::new(relative))
    }
}
