//! The harness running its own cases, the way a project's test target would

use std::process::ExitCode;
use testweave::case::{fail, skip, CaseResult};
use testweave::register_case;

fn test_patterns_are_substrings() -> CaseResult {
    let filter = testweave::NameFilter::new(["pricing"]);
    if !filter.matches("shop.tests.test_pricing.PricingTests.test_total") {
        return fail("substring did not match");
    }
    Ok(())
}

fn test_empty_filter_matches_everything() -> CaseResult {
    if !testweave::NameFilter::default().matches("anything.At.all") {
        return fail("empty filter rejected an id");
    }
    Ok(())
}

fn test_windows_paths() -> CaseResult {
    if cfg!(windows) {
        return Ok(());
    }
    skip("only meaningful on windows")
}

fn test_default_options() -> CaseResult {
    match testweave::OptionSet::parse("") {
        Ok(options) if options.all_dirs => Ok(()),
        Ok(_) => fail("all-dirs must always be on"),
        Err(e) => fail(e.to_string()),
    }
}

register_case!(FilterTests: Unit {
    test_patterns_are_substrings,
    test_empty_filter_matches_everything,
    test_windows_paths,
});

register_case!(OptionTests: Database { test_default_options });

fn main() -> ExitCode {
    testweave_harness::main()
}
