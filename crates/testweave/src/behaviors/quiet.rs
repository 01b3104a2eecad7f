//! Filter environment-setup chatter

use crate::compose::Mixin;
use crate::error::EnvironmentError;
use crate::options::QuietLevel;
use crate::quiet::QuietStreamFilter;
use crate::stream::TextStream;
use crate::suite_runner::{Environment, SetupStep, SuiteRunnerClass};
use std::rc::Rc;

#[derive(Debug, Clone, Copy)]
pub struct Quiet(pub QuietLevel);

impl Mixin<SuiteRunnerClass> for Quiet {
    fn name(&self) -> &'static str {
        "quiet"
    }

    fn mix_into(&self, target: &mut SuiteRunnerClass) {
        target.setup = Rc::new(QuietSetup { level: self.0 });
    }
}

/// Environment setup writes through a [`QuietStreamFilter`]; the plain
/// sink is back in use once setup returns.
#[derive(Debug, Clone, Copy)]
pub struct QuietSetup {
    pub level: QuietLevel,
}

impl SetupStep for QuietSetup {
    fn setup(&self, env: &mut dyn Environment, out: &mut dyn TextStream) -> Result<(), EnvironmentError> {
        let mut filtered = QuietStreamFilter::new(out, self.level);
        env.setup(&mut filtered)
    }
}
