//! Report skipped tests grouped by reason

use crate::compose::Mixin;
use crate::result::{ErrorsEpilogue, ResultClass, TextResult, SEPARATOR1};
use crate::stream::TextStream;
use crate::suite::TestUnit;
use std::io;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, Default)]
pub struct ShowSkip;

impl Mixin<ResultClass> for ShowSkip {
    fn name(&self) -> &'static str {
        "show-skip"
    }

    fn mix_into(&self, target: &mut ResultClass) {
        target.epilogue = Some(Rc::new(SkipReporter));
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SkipReporter;

impl SkipReporter {
    /// Skipped tests per reason, reasons in the order first seen
    pub fn group(skipped: &[(TestUnit, String)]) -> Vec<(&str, Vec<&TestUnit>)> {
        let mut groups: Vec<(&str, Vec<&TestUnit>)> = Vec::new();
        for (unit, reason) in skipped {
            match groups.iter_mut().find(|(seen, _)| *seen == reason.as_str()) {
                Some((_, units)) => units.push(unit),
                None => groups.push((reason.as_str(), vec![unit])),
            }
        }
        groups
    }
}

impl ErrorsEpilogue for SkipReporter {
    fn write_after_errors(&self, result: &TextResult, out: &mut dyn TextStream) -> io::Result<()> {
        let groups = Self::group(&result.skipped);
        if groups.is_empty() {
            return Ok(());
        }

        out.writeln(SEPARATOR1)?;
        for (reason, units) in &groups {
            out.write_str("SKIP: ")?;
            out.writeln(&format!("{}x {}", units.len(), reason))?;
            if result.show_all() {
                for unit in units {
                    out.writeln(&format!("  {}", unit.id))?;
                }
            }
        }
        out.writeln("")
    }
}
