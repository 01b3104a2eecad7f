//! Test case types, their methods, and the marker base types

use crate::discovery::ModuleId;
use std::fmt;
use std::rc::Rc;

/// Early exit from a test method
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Halt {
    /// An assertion did not hold
    Fail(String),
    /// The test decided not to run
    Skip(String),
}

/// What a test method returns
pub type CaseResult = Result<(), Halt>;

/// Return a failure from a test method
pub fn fail(message: impl Into<String>) -> CaseResult {
    Err(Halt::Fail(message.into()))
}

/// Return a skip from a test method
pub fn skip(reason: impl Into<String>) -> CaseResult {
    Err(Halt::Skip(reason.into()))
}

/// Body of a test method
pub type TestFn = fn() -> CaseResult;

/// Identity of a test case type: declaring module plus type name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaseId {
    pub module: ModuleId,
    pub name: String,
}

impl CaseId {
    pub fn new(module: impl Into<ModuleId>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.name)
    }
}

/// The two base types a test case can extend.
///
/// Both are marker types: they exist only to be subclassed and never run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Base {
    /// Plain test case (`unittest.TestCase`)
    Unit,
    /// Database-backed test case (`framework.TestCase`), slow to set up
    Database,
}

impl Base {
    pub fn id(self) -> CaseId {
        match self {
            Base::Unit => CaseId::new("unittest", "TestCase"),
            Base::Database => CaseId::new("framework", "TestCase"),
        }
    }

    /// The marker type itself, as it appears among a module's members
    pub fn marker(self) -> Rc<CaseType> {
        let ancestry = match self {
            Base::Unit => Vec::new(),
            Base::Database => vec![Base::Unit.id()],
        };
        Rc::new(CaseType {
            module: self.id().module,
            name: self.id().name,
            ancestry,
            methods: Vec::new(),
        })
    }
}

/// Identities of every marker type; excluded from enumeration
pub fn marker_ids() -> [CaseId; 2] {
    [Base::Unit.id(), Base::Database.id()]
}

/// One method on a test case type; only names starting with `test` run.
#[derive(Debug, Clone)]
pub struct Method {
    pub name: String,
    pub body: TestFn,
    pub expected_failure: bool,
    pub doc: Option<String>,
}

impl Method {
    pub fn new(name: impl Into<String>, body: TestFn) -> Self {
        Self {
            name: name.into(),
            body,
            expected_failure: false,
            doc: None,
        }
    }

    pub fn expect_failure(mut self) -> Self {
        self.expected_failure = true;
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// First non-empty line of the doc, if any
    pub fn short_doc(&self) -> Option<&str> {
        self.doc
            .as_deref()
            .and_then(|doc| doc.lines().map(str::trim).find(|line| !line.is_empty()))
    }
}

/// A class-like test case type discovered in a module
#[derive(Debug, Clone)]
pub struct CaseType {
    /// Module that declares the type
    pub module: ModuleId,
    pub name: String,
    /// Every ancestor, nearest first
    pub ancestry: Vec<CaseId>,
    pub methods: Vec<Method>,
}

impl CaseType {
    /// Declare a type extending one of the marker bases
    pub fn new(module: impl Into<ModuleId>, name: impl Into<String>, base: Base) -> Self {
        let marker = base.marker();
        let mut ancestry = vec![marker.id()];
        ancestry.extend(marker.ancestry.iter().cloned());
        Self {
            module: module.into(),
            name: name.into(),
            ancestry,
            methods: Vec::new(),
        }
    }

    /// Declare a type that is not a test case at all
    pub fn plain(module: impl Into<ModuleId>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
            ancestry: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Declare a type extending another case type
    pub fn extending(module: impl Into<ModuleId>, name: impl Into<String>, parent: &CaseType) -> Self {
        let mut ancestry = vec![parent.id()];
        ancestry.extend(parent.ancestry.iter().cloned());
        Self {
            module: module.into(),
            name: name.into(),
            ancestry,
            methods: parent.methods.clone(),
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        match self.methods.iter_mut().find(|m| m.name == method.name) {
            Some(existing) => *existing = method,
            None => self.methods.push(method),
        }
        self
    }

    pub fn test(self, name: &str, body: TestFn) -> Self {
        self.with_method(Method::new(name, body))
    }

    pub fn id(&self) -> CaseId {
        CaseId::new(self.module.clone(), self.name.clone())
    }

    /// True for the type itself and every ancestor
    pub fn is_a(&self, id: &CaseId) -> bool {
        (self.module == id.module && self.name == id.name) || self.ancestry.contains(id)
    }

    /// Whether the type has the test-case capability
    pub fn is_test_case(&self) -> bool {
        self.is_a(&Base::Unit.id())
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pass() -> CaseResult {
        Ok(())
    }

    #[test]
    fn test_case_extending_base_is_a_test_case() {
        let case = CaseType::new("a.test_x", "Foo", Base::Unit);
        assert!(case.is_test_case());
        assert!(!case.is_a(&Base::Database.id()));
    }

    #[test]
    fn test_database_case_is_also_unit() {
        let case = CaseType::new("a.test_x", "Foo", Base::Database);
        assert!(case.is_a(&Base::Database.id()));
        assert!(case.is_test_case());
    }

    #[test]
    fn test_plain_type_is_not_a_test_case() {
        assert!(!CaseType::plain("a.helpers", "Builder").is_test_case());
    }

    #[test]
    fn test_markers_are_test_cases_without_methods() {
        for base in [Base::Unit, Base::Database] {
            let marker = base.marker();
            assert!(marker.is_test_case());
            assert!(marker.methods.is_empty());
        }
    }

    #[test]
    fn test_extending_inherits_methods_and_ancestry() {
        let parent = CaseType::new("a.base", "Mixin", Base::Database).test("test_shared", pass);
        let child = CaseType::extending("a.test_x", "Child", &parent).test("test_own", pass);

        assert!(child.is_a(&parent.id()));
        assert!(child.is_a(&Base::Database.id()));
        assert!(child.method("test_shared").is_some());
        assert!(child.method("test_own").is_some());
    }

    #[test]
    fn test_with_method_overrides_same_name() {
        let case = CaseType::new("m", "C", Base::Unit)
            .test("test_a", pass)
            .with_method(Method::new("test_a", pass).expect_failure());
        assert_eq!(case.methods.len(), 1);
        assert!(case.methods[0].expected_failure);
    }

    #[test]
    fn test_short_doc_skips_blank_lines() {
        let method = Method::new("test_a", pass).with_doc("\n   get the lowest offer\n   more\n");
        assert_eq!(method.short_doc(), Some("get the lowest offer"));
    }

    #[test]
    fn test_helpers_build_halts() {
        assert_eq!(fail("nope"), Err(Halt::Fail("nope".to_string())));
        assert_eq!(skip("slow"), Err(Halt::Skip("slow".to_string())));
    }
}
