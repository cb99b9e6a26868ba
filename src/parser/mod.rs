//! Behat progress output parsing
//!
//! A pure scanner over byte buffers plus an async driver that feeds it from
//! a live process pipe.

mod reader;
mod stream;
mod summary_line;

pub use reader::{read_progress, StreamReport};
pub use stream::{
    glyph_transition, line_transition, parse_all, ParseEvent, ParserOptions, ScanState,
    StreamParser, DEFAULT_EXTRAS_MARKER,
};
pub use summary_line::parse_summary_line;
