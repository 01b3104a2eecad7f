//! The optional behaviors composed onto the runner and result
//!
//! Each is independent of the others and only fills the slots of its own
//! concern.

pub mod all_dirs;
pub mod color;
pub mod coverage;
pub mod quiet;
pub mod readable;
pub mod show_skip;

pub use all_dirs::{AllDirs, AllDirsSource};
pub use color::{ColorPalette, ColoredSummary, Colorizer};
pub use coverage::{CodeCoverage, CoverageMeasure};
pub use quiet::{Quiet, QuietSetup};
pub use readable::{Readable, ReadableNamer};
pub use show_skip::{ShowSkip, SkipReporter};
