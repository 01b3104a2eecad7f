//! The module host: imports modules by identifier and caches them
//!
//! Test cases are not found by inspecting live objects. Each case either
//! registers itself at compile time (see [`register_case!`](crate::register_case))
//! or is defined on a [`Registry`] directly. Importing a module hands back
//! everything registered for the source file it was derived from.

use crate::case::{Base, CaseId, CaseType, Method, TestFn};
use crate::discovery::module_id::{ModuleId, ModulePath, DEFAULT_PACKAGE_MARKER};
use crate::error::DiscoveryError;
use std::collections::HashMap;
use std::panic;
use std::path::Path;
use std::rc::Rc;

/// Import-time hook of a module; an `Err` makes the import fail
pub type InitHook = fn() -> Result<(), String>;

/// Anything that can import a module by its identifier
pub trait Host {
    /// Import a module, returning the cached object on repeat imports
    fn import(&mut self, id: &ModuleId) -> Result<Rc<Module>, DiscoveryError>;
}

/// An imported module
#[derive(Debug, Clone)]
pub struct Module {
    pub id: ModuleId,
    pub members: Vec<Member>,
}

impl Module {
    pub fn empty(id: ModuleId) -> Self {
        Self {
            id,
            members: Vec::new(),
        }
    }

    /// Find a class member by name
    pub fn class(&self, name: &str) -> Option<&Rc<CaseType>> {
        self.members.iter().find_map(|member| match member {
            Member::Class(case) if case.name == name => Some(case),
            _ => None,
        })
    }
}

/// A named member of a module
#[derive(Debug, Clone)]
pub enum Member {
    Class(Rc<CaseType>),
    /// Functions, constants and anything else that is not a class
    Item(String),
}

impl Member {
    pub fn name(&self) -> &str {
        match self {
            Member::Class(case) => &case.name,
            Member::Item(name) => name,
        }
    }
}

/// A method registered at compile time
#[derive(Debug, Clone, Copy)]
pub struct MethodRegistration {
    pub name: &'static str,
    pub body: TestFn,
    pub expected_failure: bool,
    pub doc: Option<&'static str>,
}

impl MethodRegistration {
    pub const fn new(name: &'static str, body: TestFn) -> Self {
        Self {
            name,
            body,
            expected_failure: false,
            doc: None,
        }
    }

    pub const fn expect_failure(mut self) -> Self {
        self.expected_failure = true;
        self
    }

    pub const fn with_doc(mut self, doc: &'static str) -> Self {
        self.doc = Some(doc);
        self
    }

    fn to_method(self) -> Method {
        Method {
            name: self.name.to_string(),
            body: self.body,
            expected_failure: self.expected_failure,
            doc: self.doc.map(str::to_string),
        }
    }
}

/// A test case type registered at compile time
#[derive(Debug)]
pub struct CaseRegistration {
    /// `CARGO_MANIFEST_DIR` of the registering crate
    pub manifest_dir: &'static str,
    /// `file!()` of the registering source file
    pub source: &'static str,
    pub name: &'static str,
    pub base: Base,
    pub methods: &'static [MethodRegistration],
}

/// An import-time hook registered at compile time
#[derive(Debug)]
pub struct ModuleInit {
    pub manifest_dir: &'static str,
    pub source: &'static str,
    pub init: InitHook,
}

inventory::collect!(CaseRegistration);
inventory::collect!(ModuleInit);

#[derive(Debug, Default)]
struct ModuleDef {
    cases: Vec<CaseType>,
    reexports: Vec<CaseId>,
    items: Vec<String>,
    init: Option<InitHook>,
}

/// Explicit module registry acting as the host's module system.
///
/// Importing an identifier nobody registered yields an empty module, the
/// same as importing a source file that defines no test cases.
#[derive(Debug)]
pub struct Registry {
    definitions: HashMap<ModuleId, ModuleDef>,
    cache: HashMap<ModuleId, Rc<Module>>,
    package_marker: String,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            definitions: HashMap::new(),
            cache: HashMap::new(),
            package_marker: DEFAULT_PACKAGE_MARKER.to_string(),
        }
    }

    /// Set the file stem that stands for its directory
    pub fn with_package_marker(mut self, marker: impl Into<String>) -> Self {
        self.package_marker = marker.into();
        self
    }

    /// Collect every compile-time registration whose source file lies under
    /// `root`. Registrations outside the root are ignored.
    pub fn from_inventory(root: &Path) -> Self {
        let mut registry = Self::new();
        registry.load_inventory(root);
        registry
    }

    pub fn load_inventory(&mut self, root: &Path) {
        for registration in inventory::iter::<CaseRegistration> {
            let Some(path) = locate_source(root, registration.manifest_dir, registration.source)
            else {
                tracing::debug!(
                    source = registration.source,
                    case = registration.name,
                    "registration outside discovery root"
                );
                continue;
            };
            let module = path.module_id_with(&self.package_marker);
            let case = registration
                .methods
                .iter()
                .fold(CaseType::new(module, registration.name, registration.base), |case, m| {
                    case.with_method(m.to_method())
                });
            self.insert_case(case);
        }

        for hook in inventory::iter::<ModuleInit> {
            if let Some(path) = locate_source(root, hook.manifest_dir, hook.source) {
                self.set_init(path.module_id_with(&self.package_marker), hook.init);
            }
        }
    }

    /// Define a case type in its declaring module
    pub fn insert_case(&mut self, case: CaseType) -> &mut Self {
        self.cache.remove(&case.module);
        self.def_mut(case.module.clone()).cases.push(case);
        self
    }

    /// Make `module` expose a case declared elsewhere
    pub fn reexport(&mut self, module: impl Into<ModuleId>, case: CaseId) -> &mut Self {
        let module = module.into();
        self.cache.remove(&module);
        self.def_mut(module).reexports.push(case);
        self
    }

    /// Add a non-class member to a module
    pub fn insert_item(&mut self, module: impl Into<ModuleId>, name: impl Into<String>) -> &mut Self {
        let module = module.into();
        self.cache.remove(&module);
        self.def_mut(module).items.push(name.into());
        self
    }

    /// Attach an import-time hook to a module
    pub fn set_init(&mut self, module: impl Into<ModuleId>, init: InitHook) -> &mut Self {
        let module = module.into();
        self.cache.remove(&module);
        self.def_mut(module).init = Some(init);
        self
    }

    /// Whether a module has been imported and cached
    pub fn is_loaded(&self, id: &ModuleId) -> bool {
        self.cache.contains_key(id)
    }

    fn def_mut(&mut self, module: ModuleId) -> &mut ModuleDef {
        self.definitions.entry(module).or_default()
    }

    fn build_module(&mut self, id: &ModuleId) -> Result<Module, DiscoveryError> {
        let Some(def) = self.definitions.get(id) else {
            return Ok(Module::empty(id.clone()));
        };

        if let Some(init) = def.init {
            match panic::catch_unwind(init) {
                Ok(Ok(())) => {}
                Ok(Err(reason)) => return Err(DiscoveryError::import(id, reason)),
                Err(payload) => return Err(DiscoveryError::import(id, panic_message(&*payload))),
            }
        }

        let mut members: Vec<Member> = def
            .cases
            .iter()
            .map(|case| Member::Class(Rc::new(case.clone())))
            .collect();

        for base in [Base::Unit, Base::Database] {
            let base_id = base.id();
            if def.cases.iter().any(|case| case.ancestry.contains(&base_id)) {
                members.push(Member::Class(base.marker()));
            }
        }

        let reexports = def.reexports.clone();
        let items = def.items.clone();

        for case_id in reexports {
            let origin = self.import(&case_id.module)?;
            let case = origin.class(&case_id.name).cloned().ok_or_else(|| {
                DiscoveryError::import(id, format!("cannot import name '{}'", case_id.name))
            })?;
            members.push(Member::Class(case));
        }

        members.extend(items.into_iter().map(Member::Item));

        Ok(Module {
            id: id.clone(),
            members,
        })
    }
}

impl Host for Registry {
    fn import(&mut self, id: &ModuleId) -> Result<Rc<Module>, DiscoveryError> {
        if let Some(module) = self.cache.get(id) {
            return Ok(Rc::clone(module));
        }
        let module = Rc::new(self.build_module(id)?);
        tracing::debug!(module = %id, members = module.members.len(), "imported module");
        self.cache.insert(id.clone(), Rc::clone(&module));
        Ok(module)
    }
}

/// Find a registered source file on disk and make it relative to `root`.
///
/// `file!()` is relative to the directory the compiler ran in, which is the
/// manifest dir or one of its ancestors (the workspace root).
fn locate_source(root: &Path, manifest_dir: &str, source: &str) -> Option<ModulePath> {
    let source = Path::new(source);
    let absolute = if source.is_absolute() {
        source.to_path_buf()
    } else {
        Path::new(manifest_dir)
            .ancestors()
            .map(|dir| dir.join(source))
            .find(|candidate| candidate.is_file())?
    };
    let absolute = absolute.canonicalize().ok()?;
    let root = root.canonicalize().ok()?;
    absolute
        .strip_prefix(&root)
        .ok()
        .map(|relative| ModulePath::new(relative.to_path_buf()))
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
