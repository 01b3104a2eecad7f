//! Move slow test categories to the end of a suite

use crate::case::{Base, CaseId};
use crate::suite::{Suite, TestUnit};

/// Case types deferred when nothing else is configured
pub fn default_deferred() -> Vec<CaseId> {
    vec![Base::Database.id()]
}

/// Stable partition: units whose case type is not any of `deferred` first,
/// then the deferred ones, each group in its original order.
pub fn reorder(suite: Suite, deferred: &[CaseId]) -> Suite {
    let (deferred_units, mut ordered): (Vec<TestUnit>, Vec<TestUnit>) = suite
        .into_iter()
        .partition(|unit| deferred.iter().any(|id| unit.case.is_a(id)));
    ordered.extend(deferred_units);
    ordered.into_iter().collect()
}
