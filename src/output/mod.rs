//! Console output
//!
//! Colors, the live progress line, and the final report.

mod colors;
mod progress;
mod reporter;

pub use colors::Palette;
pub use progress::{GlyphSink, ProgressPrinter, LINE_WIDTH};
pub use reporter::{OutputFormat, Reporter, RunReport};
