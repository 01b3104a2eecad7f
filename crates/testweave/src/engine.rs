//! Execute one test unit and classify what happened

use crate::case::Halt;
use crate::discovery::host::panic_message;
use crate::suite::TestUnit;
use std::panic;

/// How a single unit ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(String),
    Error(String),
    Skip(String),
    /// Failed or errored, and was marked as expected to fail
    ExpectedFailure(String),
    /// Passed despite being marked as expected to fail
    UnexpectedSuccess,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Outcomes that make a run unsuccessful
    pub fn is_problem(&self) -> bool {
        matches!(self, Outcome::Failure(_) | Outcome::Error(_))
    }
}

/// Run a unit's method, turning a panic into an error outcome
pub fn run_unit(unit: &TestUnit) -> Outcome {
    let expected_failure = unit.method.expected_failure;
    let returned = panic::catch_unwind(unit.method.body);

    match returned {
        Ok(Ok(())) if expected_failure => Outcome::UnexpectedSuccess,
        Ok(Ok(())) => Outcome::Success,
        Ok(Err(Halt::Skip(reason))) => Outcome::Skip(reason),
        Ok(Err(Halt::Fail(message))) if expected_failure => Outcome::ExpectedFailure(message),
        Ok(Err(Halt::Fail(message))) => Outcome::Failure(message),
        Err(payload) => {
            let message = format!("panicked: {}", panic_message(&*payload));
            if expected_failure {
                Outcome::ExpectedFailure(message)
            } else {
                Outcome::Error(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::{fail, skip, Base, CaseResult, CaseType, Method, TestFn};
    use crate::suite::TestId;
    use rstest::rstest;
    use std::rc::Rc;

    fn pass() -> CaseResult {
        Ok(())
    }

    fn failing() -> CaseResult {
        fail("1 != 2")
    }

    fn skipping() -> CaseResult {
        skip("flaky")
    }

    fn exploding() -> CaseResult {
        panic!("index out of bounds")
    }

    fn unit(body: TestFn, expected_failure: bool) -> TestUnit {
        let mut method = Method::new("test_it", body);
        method.expected_failure = expected_failure;
        let case = Rc::new(CaseType::new("m", "C", Base::Unit).with_method(method.clone()));
        TestUnit {
            id: TestId::new("m", "C", "test_it"),
            case,
            method,
        }
    }

    #[rstest]
    #[case(pass, false, Outcome::Success)]
    #[case(pass, true, Outcome::UnexpectedSuccess)]
    #[case(failing, false, Outcome::Failure("1 != 2".into()))]
    #[case(failing, true, Outcome::ExpectedFailure("1 != 2".into()))]
    #[case(skipping, false, Outcome::Skip("flaky".into()))]
    #[case(skipping, true, Outcome::Skip("flaky".into()))]
    fn test_outcomes(#[case] body: TestFn, #[case] expected_failure: bool, #[case] expected: Outcome) {
        assert_eq!(run_unit(&unit(body, expected_failure)), expected);
    }

    #[test]
    fn test_panic_is_an_error() {
        let outcome = run_unit(&unit(exploding, false));
        assert_eq!(outcome, Outcome::Error("panicked: index out of bounds".into()));
        assert!(outcome.is_problem());
    }

    #[test]
    fn test_expected_panic_is_expected_failure() {
        assert!(matches!(
            run_unit(&unit(exploding, true)),
            Outcome::ExpectedFailure(_)
        ));
    }
}
