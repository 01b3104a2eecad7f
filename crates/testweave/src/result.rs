//! Text rendering of test events and the result record of one run

use crate::case::CaseId;
use crate::discovery::ModuleId;
use crate::engine::Outcome;
use crate::stream::{ColoredStream, TextStream};
use crate::suite::TestUnit;
use colored::Color;
use std::fmt;
use std::io;
use std::rc::Rc;
use std::time::Duration;

/// Heavy separator above each error report
pub const SEPARATOR1: &str =
    "======================================================================";
/// Light separator below each error header and above the run summary
pub const SEPARATOR2: &str =
    "----------------------------------------------------------------------";

/// The result-reporting hooks output can be styled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    Error,
    Failure,
    Skip,
    ExpectedFailure,
    UnexpectedSuccess,
}

/// Module and class most recently named by a start label
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastShown {
    pub module: Option<ModuleId>,
    pub class: Option<CaseId>,
}

/// How tests are named in progress lines and error reports
pub trait TestNamer {
    /// Written before ` ... ` when a test starts at verbosity 2 and above
    fn start_label(&self, unit: &TestUnit, last: &mut LastShown) -> String {
        let _ = last;
        self.description(unit)
    }

    /// Used in `ERROR:`/`FAIL:` headers
    fn description(&self, unit: &TestUnit) -> String;
}

/// `method (module.Class)`, plus the first doc line when there is one
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardNamer;

impl TestNamer for StandardNamer {
    fn description(&self, unit: &TestUnit) -> String {
        match unit.method.short_doc() {
            Some(doc) => format!("{unit}\n{doc}"),
            None => unit.to_string(),
        }
    }
}

/// Color applied to output written by a reporting hook
pub trait Palette {
    fn color(&self, hook: Hook) -> Option<Color>;
}

/// Extra output after the error and failure lists
pub trait ErrorsEpilogue {
    fn write_after_errors(&self, result: &TextResult, out: &mut dyn TextStream) -> io::Result<()>;
}

/// Strategy slots of the result type
#[derive(Clone)]
pub struct ResultClass {
    pub namer: Rc<dyn TestNamer>,
    pub palette: Option<Rc<dyn Palette>>,
    pub epilogue: Option<Rc<dyn ErrorsEpilogue>>,
}

impl Default for ResultClass {
    fn default() -> Self {
        Self {
            namer: Rc::new(StandardNamer),
            palette: None,
            epilogue: None,
        }
    }
}

impl fmt::Debug for ResultClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultClass")
            .field("palette", &self.palette.is_some())
            .field("epilogue", &self.epilogue.is_some())
            .finish_non_exhaustive()
    }
}

/// Counts of one finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub tests_run: usize,
    pub failures: usize,
    pub errors: usize,
    pub skipped: usize,
    pub expected_failures: usize,
    pub unexpected_successes: usize,
    pub interrupted: bool,
    pub duration: Duration,
}

impl RunReport {
    pub fn was_successful(&self) -> bool {
        self.failures == 0 && self.errors == 0
    }
}

/// Records outcomes and renders progress for one run
pub struct TextResult {
    class: ResultClass,
    verbosity: u8,
    failfast: bool,
    should_stop: bool,
    last_shown: LastShown,
    pub tests_run: usize,
    pub errors: Vec<(TestUnit, String)>,
    pub failures: Vec<(TestUnit, String)>,
    pub skipped: Vec<(TestUnit, String)>,
    pub expected_failures: Vec<(TestUnit, String)>,
    pub unexpected_successes: Vec<TestUnit>,
}

impl TextResult {
    pub fn new(class: ResultClass, verbosity: u8) -> Self {
        Self {
            class,
            verbosity,
            failfast: false,
            should_stop: false,
            last_shown: LastShown::default(),
            tests_run: 0,
            errors: Vec::new(),
            failures: Vec::new(),
            skipped: Vec::new(),
            expected_failures: Vec::new(),
            unexpected_successes: Vec::new(),
        }
    }

    pub fn with_failfast(mut self, failfast: bool) -> Self {
        self.failfast = failfast;
        self
    }

    /// One line per test
    pub fn show_all(&self) -> bool {
        self.verbosity > 1
    }

    /// One character per test
    pub fn dots(&self) -> bool {
        self.verbosity == 1
    }

    pub fn should_stop(&self) -> bool {
        self.should_stop
    }

    pub fn stop(&mut self) {
        self.should_stop = true;
    }

    pub fn was_successful(&self) -> bool {
        self.failures.is_empty() && self.errors.is_empty()
    }

    pub fn description(&self, unit: &TestUnit) -> String {
        self.class.namer.description(unit)
    }

    pub fn start_test(&mut self, unit: &TestUnit, out: &mut dyn TextStream) -> io::Result<()> {
        self.tests_run += 1;
        if self.show_all() {
            let label = self.class.namer.start_label(unit, &mut self.last_shown);
            out.write_str(&label)?;
            out.write_str(" ... ")?;
            out.flush()?;
        }
        Ok(())
    }

    /// Record an outcome and report it through the matching hook
    pub fn add_outcome(
        &mut self,
        unit: &TestUnit,
        outcome: Outcome,
        out: &mut dyn TextStream,
    ) -> io::Result<()> {
        match outcome {
            Outcome::Success => self.write_outcome(None, out, "ok", "."),
            Outcome::Error(message) => {
                self.errors.push((unit.clone(), message));
                self.stop_if_failfast();
                self.write_outcome(Some(Hook::Error), out, "ERROR", "E")
            }
            Outcome::Failure(message) => {
                self.failures.push((unit.clone(), message));
                self.stop_if_failfast();
                self.write_outcome(Some(Hook::Failure), out, "FAIL", "F")
            }
            Outcome::Skip(reason) => {
                let long = format!("skipped '{reason}'");
                self.skipped.push((unit.clone(), reason));
                self.write_outcome(Some(Hook::Skip), out, &long, "s")
            }
            Outcome::ExpectedFailure(message) => {
                self.expected_failures.push((unit.clone(), message));
                self.write_outcome(Some(Hook::ExpectedFailure), out, "expected failure", "x")
            }
            Outcome::UnexpectedSuccess => {
                self.unexpected_successes.push(unit.clone());
                self.stop_if_failfast();
                self.write_outcome(Some(Hook::UnexpectedSuccess), out, "unexpected success", "u")
            }
        }
    }

    /// The error and failure lists, then any epilogue
    pub fn print_errors(&self, out: &mut dyn TextStream) -> io::Result<()> {
        if self.dots() || self.show_all() {
            out.writeln("")?;
        }
        self.print_error_list("ERROR", &self.errors, out)?;
        self.print_error_list("FAIL", &self.failures, out)?;
        if let Some(epilogue) = &self.class.epilogue {
            epilogue.write_after_errors(self, out)?;
        }
        Ok(())
    }

    pub fn report(&self, duration: Duration, interrupted: bool) -> RunReport {
        RunReport {
            tests_run: self.tests_run,
            failures: self.failures.len(),
            errors: self.errors.len(),
            skipped: self.skipped.len(),
            expected_failures: self.expected_failures.len(),
            unexpected_successes: self.unexpected_successes.len(),
            interrupted,
            duration,
        }
    }

    fn print_error_list(
        &self,
        flavour: &str,
        entries: &[(TestUnit, String)],
        out: &mut dyn TextStream,
    ) -> io::Result<()> {
        for (unit, message) in entries {
            out.writeln(SEPARATOR1)?;
            out.writeln(&format!("{flavour}: {}", self.description(unit)))?;
            out.writeln(SEPARATOR2)?;
            out.writeln(message)?;
        }
        Ok(())
    }

    fn stop_if_failfast(&mut self) {
        if self.failfast {
            self.should_stop = true;
        }
    }

    fn write_outcome(
        &self,
        hook: Option<Hook>,
        out: &mut dyn TextStream,
        long: &str,
        short: &str,
    ) -> io::Result<()> {
        let color = hook.and_then(|hook| self.class.palette.as_ref()?.color(hook));
        match color {
            Some(color) => self.write_progress(&mut ColoredStream::new(out, color), long, short),
            None => self.write_progress(out, long, short),
        }
    }

    fn write_progress(&self, out: &mut dyn TextStream, long: &str, short: &str) -> io::Result<()> {
        if self.show_all() {
            out.writeln(long)
        } else if self.dots() {
            out.write_str(short)?;
            out.flush()
        } else {
            Ok(())
        }
    }
}

impl fmt::Debug for TextResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextResult")
            .field("tests_run", &self.tests_run)
            .field("errors", &self.errors.len())
            .field("failures", &self.failures.len())
            .field("skipped", &self.skipped.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::{Base, CaseResult, CaseType, Method};
    use crate::suite::TestId;
    use pretty_assertions::assert_eq;

    fn pass() -> CaseResult {
        Ok(())
    }

    fn unit(method: Method) -> TestUnit {
        let case = Rc::new(CaseType::new("a.test_x", "Foo", Base::Unit).with_method(method.clone()));
        TestUnit {
            id: TestId::new("a.test_x", "Foo", method.name.clone()),
            case,
            method,
        }
    }

    fn run(verbosity: u8, outcomes: Vec<Outcome>) -> (TextResult, String) {
        let mut result = TextResult::new(ResultClass::default(), verbosity);
        let mut out = String::new();
        for (i, outcome) in outcomes.into_iter().enumerate() {
            let unit = unit(Method::new(format!("test_{i}"), pass));
            result.start_test(&unit, &mut out).unwrap();
            result.add_outcome(&unit, outcome, &mut out).unwrap();
        }
        (result, out)
    }

    fn all_outcomes() -> Vec<Outcome> {
        vec![
            Outcome::Success,
            Outcome::Error("boom".into()),
            Outcome::Failure("1 != 2".into()),
            Outcome::Skip("slow".into()),
            Outcome::ExpectedFailure("known".into()),
            Outcome::UnexpectedSuccess,
        ]
    }

    #[test]
    fn test_dots() {
        let (result, out) = run(1, all_outcomes());
        assert_eq!(out, ".EFsxu");
        assert_eq!(result.tests_run, 6);
        assert!(!result.was_successful());
    }

    #[test]
    fn test_verbose_lines() {
        let (_, out) = run(2, all_outcomes());
        assert_eq!(
            out,
            "test_0 (a.test_x.Foo) ... ok\n\
             test_1 (a.test_x.Foo) ... ERROR\n\
             test_2 (a.test_x.Foo) ... FAIL\n\
             test_3 (a.test_x.Foo) ... skipped 'slow'\n\
             test_4 (a.test_x.Foo) ... expected failure\n\
             test_5 (a.test_x.Foo) ... unexpected success\n"
        );
    }

    #[test]
    fn test_quiet_verbosity_writes_nothing() {
        let (result, out) = run(0, all_outcomes());
        assert_eq!(out, "");
        assert_eq!(result.skipped.len(), 1);
    }

    #[test]
    fn test_print_errors() {
        let (result, _) = run(1, vec![Outcome::Failure("1 != 2".into()), Outcome::Error("boom".into())]);
        let mut out = String::new();
        result.print_errors(&mut out).unwrap();
        assert_eq!(
            out,
            format!(
                "\n{SEPARATOR1}\nERROR: test_1 (a.test_x.Foo)\n{SEPARATOR2}\nboom\n\
                 {SEPARATOR1}\nFAIL: test_0 (a.test_x.Foo)\n{SEPARATOR2}\n1 != 2\n"
            )
        );
    }

    #[test]
    fn test_description_includes_first_doc_line() {
        let unit = unit(Method::new("test_best", pass).with_doc("Picks the lowest offer.\nMore."));
        assert_eq!(
            StandardNamer.description(&unit),
            "test_best (a.test_x.Foo)\nPicks the lowest offer."
        );
    }

    #[test]
    fn test_failfast_stops_on_problems_only() {
        let mut result = TextResult::new(ResultClass::default(), 0).with_failfast(true);
        let mut out = String::new();
        let unit = unit(Method::new("test_a", pass));

        result.add_outcome(&unit, Outcome::Skip("x".into()), &mut out).unwrap();
        assert!(!result.should_stop());
        result.add_outcome(&unit, Outcome::Failure("x".into()), &mut out).unwrap();
        assert!(result.should_stop());
    }

    #[test]
    fn test_report_counts() {
        let (result, _) = run(0, all_outcomes());
        let report = result.report(Duration::from_millis(5), false);
        assert_eq!(report.tests_run, 6);
        assert_eq!(report.failures, 1);
        assert_eq!(report.errors, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.expected_failures, 1);
        assert_eq!(report.unexpected_successes, 1);
        assert!(!report.was_successful());
    }
}
