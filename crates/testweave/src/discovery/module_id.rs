//! Module paths and dotted module identifiers

use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Source file extension recognized by default
pub const DEFAULT_EXTENSION: &str = "rs";

/// File stem that stands for its containing directory (`a/mod.rs` is `a`)
pub const DEFAULT_PACKAGE_MARKER: &str = "mod";

/// Dotted module identifier, e.g. `ordering.tests.my_test`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last dotted segment (`tests` for `ordering.tests`)
    pub fn last_segment(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A source file path relative to the discovery root
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModulePath(PathBuf);

impl ModulePath {
    pub fn new(relative: impl Into<PathBuf>) -> Self {
        Self(relative.into())
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Module identifier using the default package marker
    pub fn module_id(&self) -> ModuleId {
        self.module_id_with(DEFAULT_PACKAGE_MARKER)
    }

    /// Convert e.g. `ordering/tests/my_test.rs` into `ordering.tests.my_test`.
    ///
    /// A trailing package-marker segment is dropped, so `ordering/mod.rs`
    /// becomes `ordering`.
    pub fn module_id_with(&self, package_marker: &str) -> ModuleId {
        let stemmed = self.0.with_extension("");
        let mut segments: Vec<String> = stemmed
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        if segments.len() > 1 && segments.last().is_some_and(|s| s == package_marker) {
            segments.pop();
        }

        ModuleId(segments.join("."))
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[rstest]
    #[case("ordering/tests/my_test.rs", "ordering.tests.my_test")]
    #[case("a/test_x.rs", "a.test_x")]
    #[case("top.rs", "top")]
    #[case("ordering/mod.rs", "ordering")]
    #[case("ordering/tests/mod.rs", "ordering.tests")]
    #[case("./a/test_x.rs", "a.test_x")]
    fn test_module_id(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(ModulePath::new(path).module_id().as_str(), expected);
    }

    #[test]
    fn test_root_level_marker_is_kept() {
        // A lone mod.rs at the root has no directory to stand for
        assert_eq!(ModulePath::new("mod.rs").module_id().as_str(), "mod");
    }

    #[test]
    fn test_custom_package_marker() {
        let path = ModulePath::new("pkg/__init__.py");
        assert_eq!(path.module_id_with("__init__").as_str(), "pkg");
    }

    #[test]
    fn test_module_id_is_idempotent() {
        let path = ModulePath::new("a/b/c.rs");
        assert_eq!(path.module_id(), path.module_id());
    }

    #[test]
    fn test_distinct_paths_do_not_collide() {
        let paths = [
            "a/test_x.rs",
            "a/test_y.rs",
            "a/b/mod.rs",
            "a/b/test_x.rs",
            "b/test_x.rs",
            "test_x.rs",
        ];
        let ids: HashSet<_> = paths.iter().map(|p| ModulePath::new(*p).module_id()).collect();
        assert_eq!(ids.len(), paths.len());
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(ModuleId::new("ordering.tests").last_segment(), "tests");
        assert_eq!(ModuleId::new("tests").last_segment(), "tests");
    }
}
