//! Testweave - tree-wide test discovery and composable runner behaviors
//!
//! This library provides:
//! - Discovery of test cases in every module under a root directory
//! - Substring selection of tests by `module.Class.method` identifier
//! - A text runner whose behaviors (quiet setup, readable names, color,
//!   skip report, coverage) are switched on by the `TEST_RUNNER_OPTIONS`
//!   string and composed onto it at startup
//!
//! # Registering test cases
//!
//! A source file registers its cases with [`register_case!`]. The module
//! a case belongs to is derived from the file's path under the discovery
//! root, so `shop/test_pricing.rs` holds cases of `shop.test_pricing`.
//!
//! ```ignore
//! use testweave::case::{fail, CaseResult};
//!
//! fn test_discount() -> CaseResult {
//!     if 90 != apply_discount(100) {
//!         return fail("discount not applied");
//!     }
//!     Ok(())
//! }
//!
//! testweave::register_case!(PricingTests: Unit { test_discount });
//! ```

/// Testweave version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod behaviors;
pub mod builder;
pub mod case;
pub mod compose;
pub mod coverage;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod filter;
pub mod interrupt;
pub mod loader;
pub mod options;
pub mod quiet;
pub mod reorder;
pub mod result;
pub mod runner;
pub mod stream;
pub mod suite;
pub mod suite_runner;

#[doc(hidden)]
pub use inventory;

pub use builder::{ConventionalDiscovery, DefaultDiscovery, NoDefaultDiscovery, SuiteBuilder};
pub use case::{fail, skip, Base, CaseId, CaseResult, CaseType, Halt, Method};
pub use compose::{apply, compose, DiscoverySettings, Mixin, Services};
pub use coverage::{CoverageService, ProfileCoverage};
pub use discovery::{Host, ModuleId, ModulePath, ModuleResolver, PathWalker, Registry};
pub use engine::Outcome;
pub use error::{DiscoveryError, EnvironmentError, OptionError, WeaveError, WeaveResult};
pub use filter::NameFilter;
pub use options::{OptionSet, QuietLevel};
pub use result::{ResultClass, RunReport, TextResult};
pub use runner::{TextRunner, TextRunnerClass};
pub use stream::{TextStream, WriteStream};
pub use suite::{Suite, TestId, TestUnit};
pub use suite_runner::{Environment, NoEnvironment, SuiteRunner, SuiteRunnerClass};

/// Register a test case type declared in the current source file.
///
/// `Unit` cases extend `unittest.TestCase`; `Database` cases extend
/// `framework.TestCase` and run after everything else. Each listed method
/// names a function in scope, or `name => path` binds a method name to
/// another function.
///
/// ```ignore
/// testweave::register_case!(OrderTests: Database {
///     test_create,
///     test_cancel => cancel::test_cancel_twice,
///     helper_build_order,
/// });
/// ```
#[macro_export]
macro_rules! register_case {
    ($name:ident : $base:ident { $($method:ident $(=> $body:path)?),* $(,)? }) => {
        $crate::inventory::submit! {
            $crate::discovery::CaseRegistration {
                manifest_dir: env!("CARGO_MANIFEST_DIR"),
                source: file!(),
                name: stringify!($name),
                base: $crate::case::Base::$base,
                methods: &[$($crate::__method_registration!($method $(=> $body)?)),*],
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __method_registration {
    ($method:ident) => {
        $crate::discovery::MethodRegistration::new(stringify!($method), $method)
    };
    ($method:ident => $body:path) => {
        $crate::discovery::MethodRegistration::new(stringify!($method), $body)
    };
}

/// Register a hook run when the current source file's module is first
/// imported. An `Err` from the hook fails discovery.
#[macro_export]
macro_rules! register_module_init {
    ($init:path) => {
        $crate::inventory::submit! {
            $crate::discovery::ModuleInit {
                manifest_dir: env!("CARGO_MANIFEST_DIR"),
                source: file!(),
                init: $init,
            }
        }
    };
}
