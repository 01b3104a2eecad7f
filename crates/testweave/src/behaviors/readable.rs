//! Test names as a module / class / method hierarchy

use crate::compose::Mixin;
use crate::result::{LastShown, ResultClass, TestNamer};
use crate::suite::TestUnit;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, Default)]
pub struct Readable;

impl Mixin<ResultClass> for Readable {
    fn name(&self) -> &'static str {
        "readable"
    }

    fn mix_into(&self, target: &mut ResultClass) {
        target.namer = Rc::new(ReadableNamer);
    }
}

/// Names a test as
///
/// ```text
/// ordering.tests.main_tests
///    GetBestOfferTests
///       test_one
/// ```
///
/// leaving out the module and class lines when they repeat those of the
/// previous test.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadableNamer;

impl TestNamer for ReadableNamer {
    fn start_label(&self, unit: &TestUnit, last: &mut LastShown) -> String {
        let mut label = String::new();
        let module = &unit.case.module;
        if last.module.as_ref() != Some(module) {
            label.push_str(module.as_str());
            label.push('\n');
            last.module = Some(module.clone());
        }
        let class = unit.case_id();
        if last.class.as_ref() != Some(&class) {
            label.push_str("   ");
            label.push_str(&unit.case.name);
            label.push('\n');
            last.class = Some(class);
        }
        label.push_str("      ");
        label.push_str(&unit.method.name);
        label
    }

    fn description(&self, unit: &TestUnit) -> String {
        format!("{}\n{}.{}", unit.method.name, unit.case.module, unit.case.name)
    }
}
