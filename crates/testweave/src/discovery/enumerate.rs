//! Find the test case types among a module's members

use crate::case::{marker_ids, CaseType};
use crate::discovery::host::{Member, Module};
use std::rc::Rc;

/// Yield every member that is a test case type, skipping the marker bases.
///
/// Order follows the module's member order.
pub fn test_cases(module: &Module) -> impl Iterator<Item = &Rc<CaseType>> {
    let markers = marker_ids();
    module.members.iter().filter_map(move |member| match member {
        Member::Class(case) if case.is_test_case() && !markers.contains(&case.id()) => Some(case),
        _ => None,
    })
}
