//! Find test cases anywhere under the root, not just in `tests` modules

use crate::builder::SuiteBuilder;
use crate::case::CaseId;
use crate::compose::{DiscoverySettings, Mixin};
use crate::discovery::Host;
use crate::error::DiscoveryError;
use crate::filter::NameFilter;
use crate::reorder::reorder;
use crate::suite::Suite;
use crate::suite_runner::{SuiteRunnerClass, SuiteSource};
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct AllDirs {
    settings: DiscoverySettings,
}

impl AllDirs {
    pub fn new(settings: DiscoverySettings) -> Self {
        Self { settings }
    }
}

impl Mixin<SuiteRunnerClass> for AllDirs {
    fn name(&self) -> &'static str {
        "all-dirs"
    }

    fn mix_into(&self, target: &mut SuiteRunnerClass) {
        let builder = SuiteBuilder::new(self.settings.walker.clone())
            .with_resolver(self.settings.resolver.clone());
        target.suite_source = Rc::new(AllDirsSource {
            builder,
            deferred: self.settings.deferred.clone(),
        });
    }
}

/// Tree-wide suite building followed by deferral of slow case types
#[derive(Debug)]
pub struct AllDirsSource {
    builder: SuiteBuilder,
    deferred: Vec<CaseId>,
}

impl SuiteSource for AllDirsSource {
    fn build_suite(&self, host: &mut dyn Host, filter: &NameFilter) -> Result<Suite, DiscoveryError> {
        let suite = self.builder.build(host, filter)?;
        Ok(reorder(suite, &self.deferred))
    }
}
