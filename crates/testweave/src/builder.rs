//! Build the suite from the whole source tree
//!
//! With patterns, the suite starts empty and every test method anywhere
//! under the root whose `module.Class.method` identifier contains one of
//! them is added. Without patterns, the default discovery supplies the
//! base suite and the tree walk adds every case type it did not cover.

use crate::discovery::{test_cases, Host, ModuleResolver, PathWalker};
use crate::error::DiscoveryError;
use crate::filter::NameFilter;
use crate::loader::{load_case, load_from_name, test_case_names};
use crate::suite::Suite;
use std::collections::HashSet;

/// The discovery used for runs without patterns
pub trait DefaultDiscovery {
    fn discover(
        &self,
        host: &mut dyn Host,
        walker: &PathWalker,
        resolver: &ModuleResolver,
    ) -> Result<Suite, DiscoveryError>;
}

/// Load every case from modules named `tests`, the per-application test
/// module convention. A case re-exported by several such modules is loaded
/// once.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConventionalDiscovery;

/// Last module segment that marks an application's test module
pub const CONVENTIONAL_TEST_MODULE: &str = "tests";

impl DefaultDiscovery for ConventionalDiscovery {
    fn discover(
        &self,
        host: &mut dyn Host,
        walker: &PathWalker,
        resolver: &ModuleResolver,
    ) -> Result<Suite, DiscoveryError> {
        let mut suite = Suite::new();
        let mut loaded = HashSet::new();
        for path in walker.walk() {
            let path = path?;
            if resolver.module_id(&path).last_segment() != CONVENTIONAL_TEST_MODULE {
                continue;
            }
            let module = resolver.resolve(host, &path)?;
            for case in test_cases(&module) {
                if loaded.insert(case.id()) {
                    suite.extend(load_case(&module.id, case));
                }
            }
        }
        Ok(suite)
    }
}

/// Contributes nothing; the tree walk finds everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDefaultDiscovery;

impl DefaultDiscovery for NoDefaultDiscovery {
    fn discover(
        &self,
        _host: &mut dyn Host,
        _walker: &PathWalker,
        _resolver: &ModuleResolver,
    ) -> Result<Suite, DiscoveryError> {
        Ok(Suite::new())
    }
}

pub struct SuiteBuilder {
    walker: PathWalker,
    resolver: ModuleResolver,
    default_discovery: Box<dyn DefaultDiscovery>,
}

impl SuiteBuilder {
    pub fn new(walker: PathWalker) -> Self {
        Self {
            walker,
            resolver: ModuleResolver::default(),
            default_discovery: Box::new(ConventionalDiscovery),
        }
    }

    pub fn with_resolver(mut self, resolver: ModuleResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_default_discovery(mut self, discovery: impl DefaultDiscovery + 'static) -> Self {
        self.default_discovery = Box::new(discovery);
        self
    }

    pub fn walker(&self) -> &PathWalker {
        &self.walker
    }

    /// Build the suite for `filter`.
    ///
    /// An import failure anywhere in the tree aborts the whole build.
    pub fn build(&self, host: &mut dyn Host, filter: &NameFilter) -> Result<Suite, DiscoveryError> {
        let existing = if filter.is_empty() {
            self.default_discovery
                .discover(host, &self.walker, &self.resolver)?
        } else {
            Suite::new()
        };
        self.extend(host, filter, existing)
    }

    /// Add matching units from the tree walk to `existing`, skipping every
    /// case type that already contributed a unit.
    pub fn extend(
        &self,
        host: &mut dyn Host,
        filter: &NameFilter,
        existing: Suite,
    ) -> Result<Suite, DiscoveryError> {
        let mut suite = existing;
        let mut covered = suite.case_ids();

        for path in self.walker.walk() {
            let path = path?;
            let module = self.resolver.resolve(host, &path)?;
            for case in test_cases(&module) {
                let case_id = case.id();
                if covered.contains(&case_id) {
                    continue;
                }
                for method in test_case_names(case) {
                    let test_id = format!("{}.{}.{}", module.id, case.name, method);
                    if filter.matches(&test_id) {
                        suite.push(load_from_name(host, &test_id)?);
                        covered.insert(case_id.clone());
                    }
                }
            }
        }

        tracing::info!(tests = suite.len(), cases = covered.len(), "built suite");
        Ok(suite)
    }
}

impl std::fmt::Debug for SuiteBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuiteBuilder")
            .field("walker", &self.walker)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::{Base, CaseId, CaseResult, CaseType};
    use crate::discovery::Registry;
    use std::fs;
    use std::path::Path;
    use tempfile::{tempdir, TempDir};

    fn pass() -> CaseResult {
        Ok(())
    }

    fn broken() -> Result<(), String> {
        Err("SyntaxError: invalid syntax".to_string())
    }

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn tree(files: &[&str]) -> TempDir {
        let dir = tempdir().unwrap();
        for file in files {
            touch(dir.path(), file);
        }
        dir
    }

    fn foo_registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .insert_case(
                CaseType::new("a.test_x", "Foo", Base::Unit)
                    .test("test_one", pass)
                    .test("test_two", pass),
            )
            .insert_case(CaseType::new("b.test_y", "Bar", Base::Unit).test("test_one", pass));
        registry
    }

    #[test]
    fn test_pattern_selects_single_method() {
        let dir = tree(&["a/test_x.rs", "b/test_y.rs"]);
        let builder = SuiteBuilder::new(PathWalker::new(dir.path()));
        let suite = builder
            .build(&mut foo_registry(), &NameFilter::new(["Foo.test_one"]))
            .unwrap();
        assert_eq!(suite.ids(), vec!["a.test_x.Foo.test_one"]);
    }

    #[test]
    fn test_matched_class_still_filters_remaining_methods() {
        let dir = tree(&["a/test_x.rs", "b/test_y.rs"]);
        let builder = SuiteBuilder::new(PathWalker::new(dir.path()));
        let suite = builder
            .build(&mut foo_registry(), &NameFilter::new(["test_one"]))
            .unwrap();
        assert_eq!(suite.ids(), vec!["a.test_x.Foo.test_one", "b.test_y.Bar.test_one"]);
    }

    #[test]
    fn test_reexported_case_is_added_once() {
        let dir = tree(&["a/test_x.rs", "b/test_y.rs"]);
        let mut registry = foo_registry();
        registry.reexport("b.test_y", CaseId::new("a.test_x", "Foo"));

        let builder = SuiteBuilder::new(PathWalker::new(dir.path()));
        let suite = builder.build(&mut registry, &NameFilter::new(["Foo"])).unwrap();
        assert_eq!(suite.ids(), vec!["a.test_x.Foo.test_one", "a.test_x.Foo.test_two"]);
    }

    #[test]
    fn test_existing_cases_are_not_rescanned() {
        let dir = tree(&["a/test_x.rs", "b/test_y.rs"]);
        let mut registry = foo_registry();
        let existing = Suite::from_iter([load_from_name(&mut registry, "a.test_x.Foo.test_one").unwrap()]);

        let builder = SuiteBuilder::new(PathWalker::new(dir.path()));
        let suite = builder.extend(&mut registry, &NameFilter::default(), existing).unwrap();
        assert_eq!(suite.ids(), vec!["a.test_x.Foo.test_one", "b.test_y.Bar.test_one"]);
    }

    #[test]
    fn test_no_patterns_starts_from_default_discovery() {
        let dir = tree(&["shop/tests.rs", "shop/extra/test_z.rs"]);
        let mut registry = Registry::new();
        registry
            .insert_case(CaseType::new("shop.tests", "ShopTests", Base::Unit).test("test_a", pass))
            .insert_case(CaseType::new("shop.extra.test_z", "Extra", Base::Unit).test("test_b", pass));

        let builder = SuiteBuilder::new(PathWalker::new(dir.path()));
        let suite = builder.build(&mut registry, &NameFilter::default()).unwrap();
        assert_eq!(
            suite.ids(),
            vec!["shop.tests.ShopTests.test_a", "shop.extra.test_z.Extra.test_b"]
        );
    }

    #[test]
    fn test_patterns_bypass_default_discovery() {
        let dir = tree(&["shop/tests.rs"]);
        let mut registry = Registry::new();
        registry.insert_case(
            CaseType::new("shop.tests", "ShopTests", Base::Unit)
                .test("test_a", pass)
                .test("test_b", pass),
        );

        let builder = SuiteBuilder::new(PathWalker::new(dir.path()));
        let suite = builder.build(&mut registry, &NameFilter::new(["test_b"])).unwrap();
        assert_eq!(suite.ids(), vec!["shop.tests.ShopTests.test_b"]);
    }

    #[test]
    fn test_import_failure_aborts_build() {
        let dir = tree(&["a/test_x.rs", "z/broken.rs"]);
        let mut registry = foo_registry();
        registry.set_init("z.broken", broken);

        let builder = SuiteBuilder::new(PathWalker::new(dir.path()))
            .with_default_discovery(NoDefaultDiscovery);
        let err = builder.build(&mut registry, &NameFilter::default()).unwrap_err();
        assert!(matches!(err, DiscoveryError::Import { ref module, .. } if module == "z.broken"));
    }

    #[test]
    fn test_walk_error_aborts_build() {
        let dir = tempdir().unwrap();
        let builder = SuiteBuilder::new(PathWalker::new(dir.path().join("gone")));
        let err = builder
            .build(&mut Registry::new(), &NameFilter::new(["x"]))
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::Walk { .. }));
    }
}
