//! Tree-wide module discovery
//!
//! Walk the root for source files, turn each into a module identifier,
//! import it through the [`Host`], and pick out its test case types.

pub mod enumerate;
pub mod host;
pub mod module_id;
pub mod resolver;
pub mod walker;

pub use enumerate::test_cases;
pub use host::{
    CaseRegistration, Host, InitHook, Member, MethodRegistration, Module, ModuleInit, Registry,
};
pub use module_id::{ModuleId, ModulePath, DEFAULT_EXTENSION, DEFAULT_PACKAGE_MARKER};
pub use resolver::ModuleResolver;
pub use walker::{PathWalker, DEFAULT_EXCLUDED_DIRS};
