//! Measure coverage around the whole run

use crate::compose::Mixin;
use crate::coverage::CoverageService;
use crate::error::WeaveResult;
use crate::result::RunReport;
use crate::suite_runner::{AroundRun, RunBody, SuiteRunnerClass};
use std::rc::Rc;

#[derive(Clone)]
pub struct CodeCoverage {
    service: Rc<dyn CoverageService>,
}

impl CodeCoverage {
    pub fn new(service: Rc<dyn CoverageService>) -> Self {
        Self { service }
    }
}

impl Mixin<SuiteRunnerClass> for CodeCoverage {
    fn name(&self) -> &'static str {
        "code-coverage"
    }

    fn mix_into(&self, target: &mut SuiteRunnerClass) {
        target.around_run = Rc::new(CoverageMeasure {
            service: Rc::clone(&self.service),
        });
    }
}

/// Erase, start, run, stop, save
pub struct CoverageMeasure {
    service: Rc<dyn CoverageService>,
}

impl AroundRun for CoverageMeasure {
    fn around(&self, run: &mut RunBody<'_>) -> WeaveResult<RunReport> {
        self.service.erase()?;
        self.service.start()?;
        let report = run()?;
        self.service.stop()?;
        self.service.save()?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WeaveError;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<&'static str>>,
    }

    impl CoverageService for Recorder {
        fn erase(&self) -> WeaveResult<()> {
            self.calls.borrow_mut().push("erase");
            Ok(())
        }

        fn start(&self) -> WeaveResult<()> {
            self.calls.borrow_mut().push("start");
            Ok(())
        }

        fn stop(&self) -> WeaveResult<()> {
            self.calls.borrow_mut().push("stop");
            Ok(())
        }

        fn save(&self) -> WeaveResult<()> {
            self.calls.borrow_mut().push("save");
            Ok(())
        }
    }

    #[test]
    fn test_measures_around_the_run() {
        let recorder = Rc::new(Recorder::default());
        let measure = CoverageMeasure {
            service: recorder.clone(),
        };

        let log = Rc::clone(&recorder);
        let report = measure
            .around(&mut || {
                log.calls.borrow_mut().push("run");
                Ok(RunReport::default())
            })
            .unwrap();

        assert!(report.was_successful());
        assert_eq!(*recorder.calls.borrow(), vec!["erase", "start", "run", "stop", "save"]);
    }

    #[test]
    fn test_failed_run_is_not_saved() {
        let recorder = Rc::new(Recorder::default());
        let measure = CoverageMeasure {
            service: recorder.clone(),
        };

        let result = measure.around(&mut || Err(WeaveError::Coverage("x".into())));
        assert!(result.is_err());
        assert_eq!(*recorder.calls.borrow(), vec!["erase", "start"]);
    }
}
