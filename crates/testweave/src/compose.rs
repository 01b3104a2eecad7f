//! Assemble the runner from the enabled behaviors
//!
//! A behavior writes its strategies into the slots of a target type. Each
//! one only touches the slots of its own concern, but when two write the
//! same slot the one applied last wins, and the application order is fixed:
//! all-dirs, color (text runner, then result), readable, quiet, show-skip,
//! code-coverage.

use crate::behaviors::{AllDirs, CodeCoverage, Colorizer, Quiet, Readable, ShowSkip};
use crate::case::CaseId;
use crate::coverage::{CoverageService, ProfileCoverage, DEFAULT_OUTPUT};
use crate::discovery::{ModuleResolver, PathWalker};
use crate::options::OptionSet;
use crate::reorder::default_deferred;
use crate::suite_runner::SuiteRunnerClass;
use std::path::PathBuf;
use std::rc::Rc;

/// A behavior that can be mixed into target type `T`
pub trait Mixin<T> {
    /// Shown in logs
    fn name(&self) -> &'static str;

    fn mix_into(&self, target: &mut T);
}

/// Write `behavior`'s slots onto `target`, replacing what was there
pub fn apply<T, M>(target: &mut T, behavior: &M)
where
    M: Mixin<T> + ?Sized,
{
    tracing::debug!(
        behavior = behavior.name(),
        target = std::any::type_name::<T>(),
        "applying behavior"
    );
    behavior.mix_into(target);
}

/// Where discovery looks and how it names and orders what it finds
#[derive(Debug, Clone)]
pub struct DiscoverySettings {
    pub walker: PathWalker,
    pub resolver: ModuleResolver,
    /// Case types moved to the end of the suite
    pub deferred: Vec<CaseId>,
}

impl DiscoverySettings {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            walker: PathWalker::new(root),
            resolver: ModuleResolver::default(),
            deferred: default_deferred(),
        }
    }
}

/// What the behaviors need from outside the runner
pub struct Services {
    pub discovery: DiscoverySettings,
    pub coverage: Rc<dyn CoverageService>,
}

impl Services {
    /// Profiles collected from, and the manifest written to, the root
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            coverage: Rc::new(ProfileCoverage::new(&root, root.join(DEFAULT_OUTPUT))),
            discovery: DiscoverySettings::new(root),
        }
    }

    pub fn with_coverage(mut self, coverage: impl CoverageService + 'static) -> Self {
        self.coverage = Rc::new(coverage);
        self
    }
}

/// Build the runner for `options`
pub fn compose(options: &OptionSet, services: &Services) -> SuiteRunnerClass {
    let discovery = &services.discovery;
    let mut runner = SuiteRunnerClass::new(discovery.walker.clone(), discovery.resolver.clone());

    if options.all_dirs {
        apply(&mut runner, &AllDirs::new(discovery.clone()));
    }
    if options.color {
        apply(&mut runner.text_runner, &Colorizer);
        apply(&mut runner.text_runner.result_class, &Colorizer);
    }
    if options.readable {
        apply(&mut runner.text_runner.result_class, &Readable);
    }
    if let Some(level) = options.quiet {
        apply(&mut runner, &Quiet(level));
    }
    if options.show_skip {
        apply(&mut runner.text_runner.result_class, &ShowSkip);
    }
    if options.code_coverage {
        apply(&mut runner, &CodeCoverage::new(Rc::clone(&services.coverage)));
    }

    runner
}
