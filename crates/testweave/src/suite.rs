//! Test identifiers, runnable units and suites

use crate::case::{CaseId, CaseType, Method};
use crate::discovery::ModuleId;
use crate::error::DiscoveryError;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// `(module, class, method)`; its string form is the dot-joined triple
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestId {
    pub module: ModuleId,
    pub class: String,
    pub method: String,
}

impl TestId {
    pub fn new(module: impl Into<ModuleId>, class: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            class: class.into(),
            method: method.into(),
        }
    }

    /// Parse `<dotted module>.<Class>.<method>`, splitting from the right
    pub fn parse(id: &str) -> Result<Self, DiscoveryError> {
        let malformed = || DiscoveryError::MalformedId(id.to_string());
        let (rest, method) = id.rsplit_once('.').ok_or_else(malformed)?;
        let (module, class) = rest.rsplit_once('.').ok_or_else(malformed)?;
        if module.is_empty() || class.is_empty() || method.is_empty() {
            return Err(malformed());
        }
        Ok(Self::new(module, class, method))
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.module, self.class, self.method)
    }
}

/// One method on one test case type
#[derive(Debug, Clone)]
pub struct TestUnit {
    /// Identifier the unit was loaded by
    pub id: TestId,
    pub case: Rc<CaseType>,
    pub method: Method,
}

impl TestUnit {
    pub fn case_id(&self) -> CaseId {
        self.case.id()
    }
}

impl fmt::Display for TestUnit {
    /// `method (module.Class)`, naming the declaring module
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}.{})", self.method.name, self.case.module, self.case.name)
    }
}

/// Ordered, appendable collection of test units
#[derive(Debug, Clone, Default)]
pub struct Suite {
    units: Vec<TestUnit>,
}

impl Suite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, unit: TestUnit) {
        self.units.push(unit);
    }

    pub fn extend(&mut self, other: Suite) {
        self.units.extend(other.units);
    }

    /// Every case type contributing at least one unit
    pub fn case_ids(&self) -> HashSet<CaseId> {
        self.units.iter().map(TestUnit::case_id).collect()
    }

    pub fn contains_case(&self, case: &CaseId) -> bool {
        self.units.iter().any(|unit| unit.case.id() == *case)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TestUnit> {
        self.units.iter()
    }

    pub fn ids(&self) -> Vec<String> {
        self.units.iter().map(|unit| unit.id.to_string()).collect()
    }
}

impl IntoIterator for Suite {
    type Item = TestUnit;
    type IntoIter = std::vec::IntoIter<TestUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.into_iter()
    }
}

impl<'a> IntoIterator for &'a Suite {
    type Item = &'a TestUnit;
    type IntoIter = std::slice::Iter<'a, TestUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}

impl FromIterator<TestUnit> for Suite {
    fn from_iter<T: IntoIterator<Item = TestUnit>>(iter: T) -> Self {
        Self {
            units: iter.into_iter().collect(),
        }
    }
}
