//! The outer runner: build the suite, set up the environment, run, tear down

use crate::builder::{ConventionalDiscovery, DefaultDiscovery};
use crate::discovery::{Host, ModuleResolver, PathWalker};
use crate::error::{DiscoveryError, EnvironmentError, WeaveResult};
use crate::filter::NameFilter;
use crate::result::RunReport;
use crate::runner::{TextRunner, TextRunnerClass};
use crate::stream::TextStream;
use crate::suite::Suite;
use std::fmt;
use std::rc::Rc;

/// Builds the suite for a run
pub trait SuiteSource {
    fn build_suite(&self, host: &mut dyn Host, filter: &NameFilter) -> Result<Suite, DiscoveryError>;
}

/// Whatever the tests need to exist before they run (databases, fixtures)
pub trait Environment {
    fn setup(&mut self, out: &mut dyn TextStream) -> Result<(), EnvironmentError>;
    fn teardown(&mut self, out: &mut dyn TextStream) -> Result<(), EnvironmentError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnvironment;

impl Environment for NoEnvironment {
    fn setup(&mut self, _out: &mut dyn TextStream) -> Result<(), EnvironmentError> {
        Ok(())
    }

    fn teardown(&mut self, _out: &mut dyn TextStream) -> Result<(), EnvironmentError> {
        Ok(())
    }
}

/// How environment setup is driven and where its output goes
pub trait SetupStep {
    fn setup(&self, env: &mut dyn Environment, out: &mut dyn TextStream) -> Result<(), EnvironmentError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainSetup;

impl SetupStep for PlainSetup {
    fn setup(&self, env: &mut dyn Environment, out: &mut dyn TextStream) -> Result<(), EnvironmentError> {
        env.setup(out)
    }
}

/// The body of a run, handed to [`AroundRun`]
pub type RunBody<'a> = dyn FnMut() -> WeaveResult<RunReport> + 'a;

/// Wraps the whole run (coverage measurement)
pub trait AroundRun {
    fn around(&self, run: &mut RunBody<'_>) -> WeaveResult<RunReport>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Direct;

impl AroundRun for Direct {
    fn around(&self, run: &mut RunBody<'_>) -> WeaveResult<RunReport> {
        run()
    }
}

/// The framework's own discovery: application `tests` modules only, then
/// narrowed by the name filter.
#[derive(Debug, Clone)]
pub struct ConventionalSource {
    walker: PathWalker,
    resolver: ModuleResolver,
}

impl ConventionalSource {
    pub fn new(walker: PathWalker, resolver: ModuleResolver) -> Self {
        Self { walker, resolver }
    }
}

impl SuiteSource for ConventionalSource {
    fn build_suite(&self, host: &mut dyn Host, filter: &NameFilter) -> Result<Suite, DiscoveryError> {
        let suite = ConventionalDiscovery.discover(host, &self.walker, &self.resolver)?;
        Ok(suite
            .into_iter()
            .filter(|unit| filter.matches(&unit.id.to_string()))
            .collect())
    }
}

/// Strategy slots of the outer runner, plus the text runner it drives
#[derive(Clone)]
pub struct SuiteRunnerClass {
    pub suite_source: Rc<dyn SuiteSource>,
    pub setup: Rc<dyn SetupStep>,
    pub around_run: Rc<dyn AroundRun>,
    pub text_runner: TextRunnerClass,
}

impl SuiteRunnerClass {
    pub fn new(walker: PathWalker, resolver: ModuleResolver) -> Self {
        Self {
            suite_source: Rc::new(ConventionalSource::new(walker, resolver)),
            setup: Rc::new(PlainSetup),
            around_run: Rc::new(Direct),
            text_runner: TextRunnerClass::default(),
        }
    }
}

impl fmt::Debug for SuiteRunnerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiteRunnerClass")
            .field("text_runner", &self.text_runner)
            .finish_non_exhaustive()
    }
}

pub struct SuiteRunner<'c> {
    class: &'c SuiteRunnerClass,
    verbosity: u8,
    failfast: bool,
    /// Shown in the banner
    behaviors: String,
}

impl<'c> SuiteRunner<'c> {
    pub fn new(class: &'c SuiteRunnerClass, verbosity: u8, failfast: bool) -> Self {
        Self {
            class,
            verbosity,
            failfast,
            behaviors: String::new(),
        }
    }

    pub fn with_behaviors(mut self, behaviors: impl Into<String>) -> Self {
        self.behaviors = behaviors.into();
        self
    }

    pub fn build_suite(&self, host: &mut dyn Host, filter: &NameFilter) -> Result<Suite, DiscoveryError> {
        self.class.suite_source.build_suite(host, filter)
    }

    /// Build the suite and run it inside a set-up environment.
    ///
    /// A discovery error aborts before the environment is touched. Teardown
    /// runs whenever setup succeeded.
    pub fn run_tests(
        &self,
        host: &mut dyn Host,
        env: &mut dyn Environment,
        filter: &NameFilter,
        out: &mut dyn TextStream,
    ) -> WeaveResult<RunReport> {
        if self.verbosity >= 2 {
            out.writeln(&self.banner())?;
        }

        self.class.around_run.around(&mut || {
            let suite = self.build_suite(host, filter)?;
            self.class.setup.setup(env, out)?;
            let ran = TextRunner::new(&self.class.text_runner, self.verbosity, self.failfast).run(&suite, out);
            env.teardown(out)?;
            Ok(ran?)
        })
    }

    fn banner(&self) -> String {
        if self.behaviors.is_empty() {
            "Using testweave::SuiteRunner".to_string()
        } else {
            format!("Using testweave::SuiteRunner ({})", self.behaviors)
        }
    }
}
