//! ANSI color helpers
//!
//! Colors are applied only when the palette is enabled, so the same
//! rendering code produces plain text for pipes, JSON, and tests.

use crate::models::Glyph;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Terminal color palette
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    colorize: bool,
}

impl Palette {
    pub fn new(colorize: bool) -> Self {
        Self { colorize }
    }

    /// Palette that never emits escape codes
    pub fn plain() -> Self {
        Self { colorize: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.colorize
    }

    fn paint(&self, code: &str, s: &str) -> String {
        if self.colorize {
            format!("{code}{s}{RESET}")
        } else {
            s.to_string()
        }
    }

    pub fn green(&self, s: &str) -> String {
        self.paint(GREEN, s)
    }

    pub fn red(&self, s: &str) -> String {
        self.paint(RED, s)
    }

    pub fn cyan(&self, s: &str) -> String {
        self.paint(CYAN, s)
    }

    pub fn yellow(&self, s: &str) -> String {
        self.paint(YELLOW, s)
    }

    /// Render a progress glyph in its outcome color
    pub fn glyph(&self, glyph: Glyph) -> String {
        let symbol = glyph.symbol().to_string();
        match glyph {
            Glyph::Passed => self.green(&symbol),
            Glyph::Skipped => self.cyan(&symbol),
            Glyph::Failed => self.red(&symbol),
            Glyph::Undefined => self.yellow(&symbol),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(true)
    }
}
