//! Settings precedence and end-to-end sessions against on-disk trees

use clap::Parser;
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use testweave::case::{fail, CaseResult};
use testweave::{Base, CaseType, NoEnvironment, Registry};
use testweave_config::ConfigLoader;
use testweave_harness::{execute, list, Args, Settings, Status};

fn pass() -> CaseResult {
    Ok(())
}

fn failing() -> CaseResult {
    fail("total was 90, expected 100")
}

fn broken_import() -> Result<(), String> {
    Err("No module named 'stripe'".to_string())
}

fn clear_env() {
    for var in [
        "TEST_RUNNER_OPTIONS",
        "TESTWEAVE_VERBOSITY",
        "TESTWEAVE_ROOT",
    ] {
        env::remove_var(var);
    }
}

fn project(config: Option<&str>) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for file in [
        "shop/models.rs",
        "shop/tests/test_orders.rs",
        "shop/tests/test_pricing.rs",
    ] {
        let path = dir.path().join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }
    if let Some(config) = config {
        fs::write(dir.path().join("testweave.toml"), config).unwrap();
    }
    dir
}

fn shop_registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .insert_case(
            CaseType::new("shop.tests.test_pricing", "PricingTests", Base::Unit)
                .test("test_total", pass)
                .test("test_tax", pass),
        )
        .insert_case(
            CaseType::new("shop.tests.test_orders", "OrderTests", Base::Database)
                .test("test_create", pass),
        );
    registry
}

fn settings(root: &Path, argv: &[&str]) -> Settings {
    let args = Args::try_parse_from(std::iter::once("testweave").chain(argv.iter().copied())).unwrap();
    let config = ConfigLoader::new().load_from_directory(root).unwrap();
    Settings::resolve(&args, &config, root).unwrap()
}

fn listed(settings: &Settings, registry: &mut Registry) -> Vec<String> {
    let mut out = String::new();
    assert_eq!(list(settings, registry, &mut out).unwrap(), Status::Listed);
    out.lines().map(str::to_string).collect()
}

// ============================================================================
// Precedence Tests
// ============================================================================

#[test]
#[serial]
fn test_defaults_without_config() {
    clear_env();
    let dir = project(None);
    let settings = settings(dir.path(), &[]);

    assert_eq!(settings.verbosity, 1);
    assert!(!settings.failfast);
    assert!(settings.filter.is_empty());
    assert_eq!(settings.root, dir.path());
    assert_eq!(settings.coverage_output, dir.path().join(".coverage"));
}

#[test]
#[serial]
fn test_command_line_beats_file() {
    clear_env();
    let dir = project(Some("[runner]\nverbosity = 2\nfailfast = true\n"));

    assert_eq!(settings(dir.path(), &[]).verbosity, 2);
    assert_eq!(settings(dir.path(), &["-v", "0"]).verbosity, 0);
    assert!(settings(dir.path(), &[]).failfast);
}

#[test]
#[serial]
fn test_environment_beats_file() {
    clear_env();
    let dir = project(Some("[runner]\nverbosity = 2\n"));

    env::set_var("TESTWEAVE_VERBOSITY", "3");
    let from_env = settings(dir.path(), &[]);
    let from_cli = settings(dir.path(), &["--verbosity", "1"]);
    clear_env();

    assert_eq!(from_env.verbosity, 3);
    assert_eq!(from_cli.verbosity, 1);
}

#[test]
#[serial]
fn test_options_from_environment() {
    clear_env();
    let dir = project(None);

    env::set_var("TEST_RUNNER_OPTIONS", "--readable --quiet=2");
    let settings = settings(dir.path(), &[]);
    clear_env();

    assert!(settings.options.readable);
    assert_eq!(settings.options.quiet.map(|q| q.get()), Some(2));
}

#[test]
#[serial]
fn test_bad_option_is_an_error() {
    clear_env();
    let dir = project(None);
    let args = Args::try_parse_from(["testweave", "--options", "--bogus"]).unwrap();
    let config = ConfigLoader::new().load_from_directory(dir.path()).unwrap();

    let err = Settings::resolve(&args, &config, dir.path()).unwrap_err();
    assert!(err.to_string().contains("--bogus"));
}

#[test]
#[serial]
fn test_verbosity_out_of_range_is_rejected() {
    clear_env();
    assert!(Args::try_parse_from(["testweave", "-v", "5"]).is_err());
}

#[test]
#[serial]
fn test_cargo_libtest_flags_are_ignored() {
    clear_env();
    let args = Args::try_parse_from(["testweave", "--nocapture", "--test-threads", "1", "pricing"]).unwrap();
    assert_eq!(args.patterns, vec!["pricing"]);
}

// ============================================================================
// Listing Tests
// ============================================================================

#[test]
#[serial]
fn test_list_defers_database_cases() {
    clear_env();
    let dir = project(None);
    let settings = settings(dir.path(), &["--list"]);
    assert!(settings.list);

    assert_eq!(
        listed(&settings, &mut shop_registry()),
        vec![
            "shop.tests.test_pricing.PricingTests.test_tax",
            "shop.tests.test_pricing.PricingTests.test_total",
            "shop.tests.test_orders.OrderTests.test_create",
        ]
    );
}

#[test]
#[serial]
fn test_list_with_patterns() {
    clear_env();
    let dir = project(None);
    let settings = settings(dir.path(), &["--list", "total", "create"]);

    assert_eq!(
        listed(&settings, &mut shop_registry()),
        vec![
            "shop.tests.test_pricing.PricingTests.test_total",
            "shop.tests.test_orders.OrderTests.test_create",
        ]
    );
}

#[test]
#[serial]
fn test_configured_deferral_replaces_default() {
    clear_env();
    let dir = project(Some(
        "[discovery]\ndefer = [\"shop.tests.test_pricing.PricingTests\"]\n",
    ));
    let settings = settings(dir.path(), &["--list"]);

    assert_eq!(
        listed(&settings, &mut shop_registry()),
        vec![
            "shop.tests.test_orders.OrderTests.test_create",
            "shop.tests.test_pricing.PricingTests.test_tax",
            "shop.tests.test_pricing.PricingTests.test_total",
        ]
    );
}

#[test]
#[serial]
fn test_configured_exclusions() {
    clear_env();
    let dir = project(Some("[discovery]\nexclude = [\"shop\"]\n"));
    let settings = settings(dir.path(), &["--list"]);

    assert!(listed(&settings, &mut shop_registry()).is_empty());
}

// ============================================================================
// Session Tests
// ============================================================================

#[test]
#[serial]
fn test_passing_session() {
    clear_env();
    let dir = project(None);
    let settings = settings(dir.path(), &["-v", "0"]);

    let mut out = String::new();
    let status = execute(&settings, &mut shop_registry(), &mut NoEnvironment, &mut out).unwrap();

    assert_eq!(status, Status::Passed);
    assert!(out.contains("Ran 3 tests in "));
    assert!(out.ends_with("OK\n"));
}

#[test]
#[serial]
fn test_failing_session() {
    clear_env();
    let dir = project(None);
    let settings = settings(dir.path(), &["-v", "0"]);
    let mut registry = shop_registry();
    registry.insert_case(
        CaseType::new("shop.tests.test_pricing", "RefundTests", Base::Unit)
            .test("test_refund", failing),
    );

    let mut out = String::new();
    let status = execute(&settings, &mut registry, &mut NoEnvironment, &mut out).unwrap();

    assert_eq!(status, Status::Failed);
    assert!(out.contains("total was 90, expected 100"));
    assert!(out.contains("FAILED (failures=1)"));
}

#[test]
#[serial]
fn test_import_failure_aborts_session() {
    clear_env();
    let dir = project(None);
    let settings = settings(dir.path(), &[]);
    let mut registry = shop_registry();
    registry.set_init("shop.models", broken_import);

    let mut out = String::new();
    let err = execute(&settings, &mut registry, &mut NoEnvironment, &mut out).unwrap_err();

    assert!(err.to_string().contains("shop.models"));
    assert!(!out.contains("Ran "));
}

#[test]
#[serial]
fn test_banner_lists_enabled_behaviors() {
    clear_env();
    let dir = project(None);
    let settings = settings(dir.path(), &["-v", "2", "--options", "--show-skip"]);

    let mut out = String::new();
    execute(&settings, &mut shop_registry(), &mut NoEnvironment, &mut out).unwrap();

    assert!(out.starts_with("Using testweave::SuiteRunner (all-dirs, show-skip)\n"));
}
