//! The text runner: run a suite, then print errors and the summary

use crate::engine::run_unit;
use crate::interrupt::InterruptGuard;
use crate::result::{ResultClass, RunReport, TextResult, SEPARATOR2};
use crate::stream::TextStream;
use crate::suite::Suite;
use std::fmt;
use std::io;
use std::rc::Rc;
use std::time::Instant;

/// One piece of the closing summary line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tally {
    Ok,
    Failed,
    Failures,
    Errors,
    Skipped,
    ExpectedFailures,
    UnexpectedSuccesses,
}

/// Styles each piece of the summary line
pub trait SummaryStyle {
    fn paint(&self, tally: Tally, text: &str) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainSummary;

impl SummaryStyle for PlainSummary {
    fn paint(&self, _tally: Tally, text: &str) -> String {
        text.to_string()
    }
}

/// Strategy slots of the text runner
#[derive(Clone)]
pub struct TextRunnerClass {
    pub summary: Rc<dyn SummaryStyle>,
    /// The result type this runner creates
    pub result_class: ResultClass,
}

impl Default for TextRunnerClass {
    fn default() -> Self {
        Self {
            summary: Rc::new(PlainSummary),
            result_class: ResultClass::default(),
        }
    }
}

impl fmt::Debug for TextRunnerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextRunnerClass")
            .field("result_class", &self.result_class)
            .finish_non_exhaustive()
    }
}

pub struct TextRunner<'c> {
    class: &'c TextRunnerClass,
    verbosity: u8,
    failfast: bool,
}

impl<'c> TextRunner<'c> {
    pub fn new(class: &'c TextRunnerClass, verbosity: u8, failfast: bool) -> Self {
        Self {
            class,
            verbosity,
            failfast,
        }
    }

    /// Run every unit in order, stopping early on failfast or Ctrl-C
    pub fn run(&self, suite: &Suite, out: &mut dyn TextStream) -> io::Result<RunReport> {
        let mut result = TextResult::new(self.class.result_class.clone(), self.verbosity)
            .with_failfast(self.failfast);
        let started = Instant::now();

        let interrupted = {
            let guard = InterruptGuard::arm();
            for unit in suite {
                if result.should_stop() || guard.interrupted() {
                    break;
                }
                result.start_test(unit, out)?;
                let outcome = run_unit(unit);
                tracing::trace!(test = %unit.id, ?outcome, "ran test");
                result.add_outcome(unit, outcome, out)?;
            }
            guard.interrupted()
        };

        let report = result.report(started.elapsed(), interrupted);
        result.print_errors(out)?;
        self.write_summary(&report, out)?;
        Ok(report)
    }

    fn write_summary(&self, report: &RunReport, out: &mut dyn TextStream) -> io::Result<()> {
        let paint = |tally, text: String| self.class.summary.paint(tally, &text);

        out.writeln(SEPARATOR2)?;
        let run = report.tests_run;
        out.writeln(&format!(
            "Ran {run} test{} in {:.3}s",
            if run == 1 { "" } else { "s" },
            report.duration.as_secs_f64()
        ))?;
        out.writeln("")?;

        let mut infos = Vec::new();
        if report.was_successful() {
            out.write_str(&paint(Tally::Ok, "OK".to_string()))?;
        } else {
            out.write_str(&paint(Tally::Failed, "FAILED".to_string()))?;
            if report.failures > 0 {
                infos.push(paint(Tally::Failures, format!("failures={}", report.failures)));
            }
            if report.errors > 0 {
                infos.push(paint(Tally::Errors, format!("errors={}", report.errors)));
            }
        }
        if report.skipped > 0 {
            infos.push(paint(Tally::Skipped, format!("skipped={}", report.skipped)));
        }
        if report.expected_failures > 0 {
            infos.push(paint(
                Tally::ExpectedFailures,
                format!("expected failures={}", report.expected_failures),
            ));
        }
        if report.unexpected_successes > 0 {
            infos.push(paint(
                Tally::UnexpectedSuccesses,
                format!("unexpected successes={}", report.unexpected_successes),
            ));
        }

        if infos.is_empty() {
            out.write_str("\n")
        } else {
            out.writeln(&format!(" ({})", infos.join(", ")))
        }
    }
}
