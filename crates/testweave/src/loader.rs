//! Load test units by name, the way the execution engine does

use crate::case::CaseType;
use crate::discovery::{Host, ModuleId};
use crate::error::DiscoveryError;
use crate::suite::{Suite, TestId, TestUnit};
use std::rc::Rc;

/// Methods whose name starts with this prefix are tests
pub const TEST_METHOD_PREFIX: &str = "test";

/// Names of the test methods on a case type, sorted
pub fn test_case_names(case: &CaseType) -> Vec<&str> {
    let mut names: Vec<&str> = case
        .methods
        .iter()
        .map(|method| method.name.as_str())
        .filter(|name| name.starts_with(TEST_METHOD_PREFIX))
        .collect();
    names.sort_unstable();
    names
}

/// Load a single unit from its `module.Class.method` identifier.
///
/// The module is imported through the host, so it comes from the cache
/// when discovery already imported it.
pub fn load_from_name(host: &mut dyn Host, name: &str) -> Result<TestUnit, DiscoveryError> {
    let id = TestId::parse(name)?;
    let module = host.import(&id.module)?;
    let case = module
        .class(&id.class)
        .cloned()
        .ok_or_else(|| DiscoveryError::CaseNotFound {
            module: id.module.to_string(),
            class: id.class.clone(),
        })?;
    let method = case
        .method(&id.method)
        .cloned()
        .ok_or_else(|| DiscoveryError::MethodNotFound {
            case: case.id().to_string(),
            method: id.method.clone(),
        })?;
    Ok(TestUnit { id, case, method })
}

/// Every test method of a case, found in the module it was imported from
pub fn load_case(module: &ModuleId, case: &Rc<CaseType>) -> Suite {
    test_case_names(case)
        .into_iter()
        .filter_map(|name| {
            let method = case.method(name)?.clone();
            Some(TestUnit {
                id: TestId::new(module.clone(), case.name.clone(), name),
                case: Rc::clone(case),
                method,
            })
        })
        .collect()
}
