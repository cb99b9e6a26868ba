//! Live progress line
//!
//! Every worker prints its glyphs through one shared printer. The column
//! counter and the write happen under the same lock, so concurrent workers
//! may interleave glyphs but never lose or double-count one.

use std::io::{self, Stdout, Write};
use std::sync::{Mutex, PoisonError};

use tracing::warn;

use super::Palette;
use crate::models::Glyph;

/// Glyphs per progress line before wrapping
pub const LINE_WIDTH: usize = 70;

/// Receiver of glyphs as they are scanned from a process's output
pub trait GlyphSink: Send + Sync {
    fn glyph(&self, glyph: Glyph);
}

struct ProgressState<W> {
    column: usize,
    out: W,
}

/// Shared, wrapping glyph printer
pub struct ProgressPrinter<W: Write = Stdout> {
    palette: Palette,
    state: Mutex<ProgressState<W>>,
}

impl ProgressPrinter<Stdout> {
    pub fn stdout(palette: Palette) -> Self {
        Self::new(io::stdout(), palette)
    }
}

impl<W: Write> ProgressPrinter<W> {
    pub fn new(out: W, palette: Palette) -> Self {
        Self {
            palette,
            state: Mutex::new(ProgressState { column: 0, out }),
        }
    }

    /// Print one glyph, wrapping after every `LINE_WIDTH` glyphs with the
    /// running count.
    pub fn print(&self, glyph: Glyph) -> io::Result<()> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let rendered = self.palette.glyph(glyph);
        state.out.write_all(rendered.as_bytes())?;
        state.column += 1;
        if state.column % LINE_WIDTH == 0 {
            let count = state.column;
            writeln!(state.out, " {count}")?;
        }
        state.out.flush()
    }

    /// Number of glyphs printed so far
    pub fn column(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .column
    }

    pub fn into_inner(self) -> W {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .out
    }
}

impl<W: Write + Send> GlyphSink for ProgressPrinter<W> {
    fn glyph(&self, glyph: Glyph) {
        if let Err(e) = self.print(glyph) {
            warn!("Failed to print progress: {}", e);
        }
    }
}
