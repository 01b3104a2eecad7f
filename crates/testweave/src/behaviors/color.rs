//! Color highlighting of outcomes and the summary line

use crate::compose::Mixin;
use crate::result::{Hook, Palette, ResultClass};
use crate::runner::{SummaryStyle, Tally, TextRunnerClass};
use colored::{Color, Colorize};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, Default)]
pub struct Colorizer;

impl Mixin<TextRunnerClass> for Colorizer {
    fn name(&self) -> &'static str {
        "color"
    }

    fn mix_into(&self, target: &mut TextRunnerClass) {
        target.summary = Rc::new(ColoredSummary);
    }
}

impl Mixin<ResultClass> for Colorizer {
    fn name(&self) -> &'static str {
        "color"
    }

    fn mix_into(&self, target: &mut ResultClass) {
        target.palette = Some(Rc::new(ColorPalette));
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ColorPalette;

impl Palette for ColorPalette {
    fn color(&self, hook: Hook) -> Option<Color> {
        Some(match hook {
            Hook::Error => Color::Magenta,
            Hook::Failure => Color::Red,
            Hook::Skip => Color::Yellow,
            Hook::ExpectedFailure | Hook::UnexpectedSuccess => Color::Cyan,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ColoredSummary;

impl SummaryStyle for ColoredSummary {
    fn paint(&self, tally: Tally, text: &str) -> String {
        match tally {
            Tally::Ok => text.green().bold(),
            Tally::Failed => text.red().bold(),
            Tally::Failures => text.red(),
            Tally::Errors => text.magenta(),
            Tally::Skipped => text.yellow(),
            Tally::ExpectedFailures | Tally::UnexpectedSuccesses => text.cyan(),
        }
        .to_string()
    }
}
