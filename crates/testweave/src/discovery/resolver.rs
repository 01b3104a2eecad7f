//! Map source files to module identifiers and import them through the host

use crate::discovery::host::{Host, Module};
use crate::discovery::module_id::{ModuleId, ModulePath, DEFAULT_PACKAGE_MARKER};
use crate::error::DiscoveryError;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct ModuleResolver {
    package_marker: String,
}

impl Default for ModuleResolver {
    fn default() -> Self {
        Self::new(DEFAULT_PACKAGE_MARKER)
    }
}

impl ModuleResolver {
    pub fn new(package_marker: impl Into<String>) -> Self {
        Self {
            package_marker: package_marker.into(),
        }
    }

    pub fn module_id(&self, path: &ModulePath) -> ModuleId {
        path.module_id_with(&self.package_marker)
    }

    /// Import the module a source file defines.
    ///
    /// Repeat imports come from the host's cache. An import failure is
    /// returned as-is; callers abort discovery on it.
    pub fn resolve(&self, host: &mut dyn Host, path: &ModulePath) -> Result<Rc<Module>, DiscoveryError> {
        let id = self.module_id(path);
        tracing::trace!(path = %path, module = %id, "resolving module");
        host.import(&id)
    }
}
