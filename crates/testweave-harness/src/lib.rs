//! Entry point for `harness = false` test targets
//!
//! A test target registers its cases with `testweave::register_case!` and
//! hands control over from `main`:
//!
//! ```ignore
//! fn main() -> std::process::ExitCode {
//!     testweave_harness::main()
//! }
//! ```
//!
//! Settings come from the command line, then the environment
//! (`TEST_RUNNER_OPTIONS`, `TESTWEAVE_*`, `NO_COLOR`), then `testweave.toml`.

use anyhow::{Context, Result};
use clap::builder::FalseyValueParser;
use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Once;
use testweave::coverage::DEFAULT_OUTPUT;
use testweave::interrupt::INTERRUPTED_EXIT_CODE;
use testweave::{
    compose, CaseId, DiscoverySettings, Environment, Host, ModuleResolver, NameFilter, OptionSet,
    PathWalker, ProfileCoverage, Registry, RunReport, Services, SuiteRunner, TextStream,
    WriteStream,
};
use testweave_config::{Config, ConfigLoader};

/// Exit status for bad configuration and failed discovery
pub const USAGE_EXIT_CODE: u8 = 2;

static TRACING_INIT: Once = Once::new();

/// Run tests found anywhere under the project root.
///
/// EXAMPLES:
///     cargo test --test app                        Run every test
///     cargo test --test app -- pricing test_tax    Run tests whose id contains either
///     TEST_RUNNER_OPTIONS="--readable --color" cargo test --test app
#[derive(Parser, Debug, Clone)]
#[command(name = "testweave")]
#[command(version)]
pub struct Args {
    /// Substrings of `module.Class.method` identifiers to run
    pub patterns: Vec<String>,

    /// 0 prints only the summary, 1 prints dots, 2 and up print one line per test
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=3))]
    pub verbosity: Option<u8>,

    /// Stop on the first error or failure
    #[arg(short, long)]
    pub failfast: bool,

    /// Directory to discover tests under
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Configuration file to use instead of searching for testweave.toml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Behavior options, e.g. "--quiet=2 --readable --color"
    #[arg(long, env = "TEST_RUNNER_OPTIONS", allow_hyphen_values = true)]
    pub options: Option<String>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", value_parser = FalseyValueParser::new())]
    pub no_color: bool,

    /// Print the identifiers of the selected tests without running them
    #[arg(long)]
    pub list: bool,

    // libtest flags cargo forwards from `cargo test -- ...`; ignored
    #[arg(long, hide = true)]
    nocapture: bool,
    #[arg(long, hide = true, value_name = "N")]
    test_threads: Option<usize>,
}

/// Everything a run needs, after precedence has been applied
#[derive(Debug, Clone)]
pub struct Settings {
    pub root: PathBuf,
    pub verbosity: u8,
    pub failfast: bool,
    pub options: OptionSet,
    pub filter: NameFilter,
    pub list: bool,
    pub extension: Option<String>,
    pub package_marker: Option<String>,
    pub excluded: Vec<String>,
    pub deferred: Option<Vec<CaseId>>,
    pub coverage_output: PathBuf,
    pub coverage_profile_dir: PathBuf,
}

impl Settings {
    /// Merge the command line over the loaded configuration
    pub fn resolve(args: &Args, config: &Config, cwd: &Path) -> Result<Self> {
        let options = OptionSet::parse(args.options.as_deref().unwrap_or(""))?;

        let root = match &args.root {
            Some(root) => cwd.join(root),
            None => config.root(),
        };

        Ok(Self {
            verbosity: args.verbosity.or(config.verbosity()).unwrap_or(1),
            failfast: args.failfast || config.failfast(),
            options,
            filter: NameFilter::new(args.patterns.iter().cloned()),
            list: args.list,
            extension: config.extension().map(str::to_string),
            package_marker: config.package_marker().map(str::to_string),
            excluded: config.excluded_dirs().to_vec(),
            deferred: config.deferred().map(|pairs| {
                pairs
                    .into_iter()
                    .map(|(module, name)| CaseId::new(module, name))
                    .collect()
            }),
            coverage_output: config
                .coverage_output()
                .unwrap_or_else(|| root.join(DEFAULT_OUTPUT)),
            coverage_profile_dir: config
                .coverage_profile_dir()
                .unwrap_or_else(|| root.clone()),
            root,
        })
    }

    pub fn discovery(&self) -> DiscoverySettings {
        let mut discovery = DiscoverySettings::new(&self.root);

        let mut walker = PathWalker::new(&self.root).with_excluded(self.excluded.iter().cloned());
        if let Some(extension) = &self.extension {
            walker = walker.with_extension(extension);
        }
        discovery.walker = walker;

        if let Some(marker) = &self.package_marker {
            discovery.resolver = ModuleResolver::new(marker);
        }
        if let Some(deferred) = &self.deferred {
            discovery.deferred = deferred.clone();
        }
        discovery
    }

    pub fn services(&self) -> Services {
        let mut services = Services::new(&self.root).with_coverage(ProfileCoverage::new(
            &self.coverage_profile_dir,
            &self.coverage_output,
        ));
        services.discovery = self.discovery();
        services
    }

    /// Registry of every case this binary registered under the root
    pub fn registry(&self) -> Registry {
        let mut registry = Registry::new();
        if let Some(marker) = &self.package_marker {
            registry = registry.with_package_marker(marker);
        }
        registry.load_inventory(&self.root);
        registry
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Passed,
    Failed,
    Interrupted,
    Listed,
}

impl Status {
    fn from_report(report: &RunReport) -> Self {
        if report.interrupted {
            Status::Interrupted
        } else if report.was_successful() {
            Status::Passed
        } else {
            Status::Failed
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Status::Passed | Status::Listed => 0,
            Status::Failed => 1,
            Status::Interrupted => INTERRUPTED_EXIT_CODE as u8,
        }
    }

    pub fn exit_code(self) -> ExitCode {
        ExitCode::from(self.code())
    }
}

/// Initialize tracing for debug output.
///
/// Only active when `RUST_LOG` is set, e.g. `RUST_LOG=testweave=debug`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

/// Parse the process arguments and run
pub fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(&args) {
        Ok(status) => status.exit_code(),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(USAGE_EXIT_CODE)
        }
    }
}

/// Load configuration, discover and run against stderr
pub fn run(args: &Args) -> Result<Status> {
    if args.no_color {
        colored::control::set_override(false);
    }

    let cwd = std::env::current_dir().context("Failed to read the working directory")?;
    let loader = ConfigLoader::new();
    let config = match &args.config {
        Some(path) => loader.load_from_file(&cwd.join(path)),
        None => loader.load_from_directory(&cwd),
    }
    .context("Failed to load testweave.toml")?;

    let settings = Settings::resolve(args, &config, &cwd)?;
    tracing::debug!(root = %settings.root.display(), options = %settings.options, "resolved settings");

    let mut host = settings.registry();
    if settings.list {
        return list(&settings, &mut host, &mut WriteStream::new(io::stdout()));
    }
    execute(
        &settings,
        &mut host,
        &mut testweave::NoEnvironment,
        &mut WriteStream::stderr(),
    )
}

/// Compose the runner for `settings` and run the selected tests
pub fn execute(
    settings: &Settings,
    host: &mut dyn Host,
    env: &mut dyn Environment,
    out: &mut dyn TextStream,
) -> Result<Status> {
    let class = compose(&settings.options, &settings.services());
    let report = SuiteRunner::new(&class, settings.verbosity, settings.failfast)
        .with_behaviors(settings.options.to_string())
        .run_tests(host, env, &settings.filter, out)?;
    Ok(Status::from_report(&report))
}

/// Write the identifiers of the selected tests, one per line
pub fn list(settings: &Settings, host: &mut dyn Host, out: &mut dyn TextStream) -> Result<Status> {
    let class = compose(&settings.options, &settings.services());
    let suite = SuiteRunner::new(&class, settings.verbosity, settings.failfast)
        .build_suite(host, &settings.filter)?;
    for id in suite.ids() {
        out.writeln(&id)?;
    }
    out.flush()?;
    Ok(Status::Listed)
}
