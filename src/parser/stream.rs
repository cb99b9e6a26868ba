//! Progress stream state machine
//!
//! Scans the raw bytes of `behat -f progress` output in a single pass:
//!
//! ```text
//! Glyphs --"\n\n"--> ExtrasOrSummary --marker line--> Extras --other line--> Summary --EOF--> Done
//!                                    \-------------other line-------------/
//! ```
//!
//! The machine is pure: bytes go in through [`StreamParser::feed`], events
//! come out, and no I/O happens here.

use crate::models::{Glyph, SummaryLine};

use super::summary_line::parse_summary_line;

/// Default first byte of a wrapped failure/undefined detail line.
///
/// With Behat 3 output this only captures the `--- Failed steps:` header:
/// the blank line that follows it ends the extras block, and the indented
/// detail lines after it are read as summary candidates. A detail line that
/// mentions `"<N> steps"` is then counted. Use `--extras-marker ' '` to
/// capture indented detail lines instead.
pub const DEFAULT_EXTRAS_MARKER: u8 = b'-';

/// Scanner position in the progress protocol
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanState {
    /// Reading glyphs; `after_newline` is set when the previous byte was `\n`
    Glyphs { after_newline: bool },
    /// At the start of the trailing block, nothing classified yet
    ExtrasOrSummary,
    /// Inside a run of continuation-marker lines
    Extras,
    /// Remaining lines are summary candidates
    Summary,
    Done,
}

impl Default for ScanState {
    fn default() -> Self {
        ScanState::Glyphs {
            after_newline: false,
        }
    }
}

/// Something the scanner recognized
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseEvent {
    Glyph(Glyph),
    /// Concatenated continuation lines, newlines preserved
    Extras(String),
    Summary(SummaryLine),
}

/// Glyph-phase transition for one byte.
///
/// Returns the next state and the glyph to print, if the byte was one.
pub fn glyph_transition(after_newline: bool, byte: u8) -> (ScanState, Option<Glyph>) {
    match byte {
        b'\n' if after_newline => (ScanState::ExtrasOrSummary, None),
        b'\n' => (
            ScanState::Glyphs {
                after_newline: true,
            },
            None,
        ),
        _ => (
            ScanState::Glyphs {
                after_newline: false,
            },
            Glyph::from_byte(byte),
        ),
    }
}

/// Line-phase transition for one complete line (terminator included).
///
/// `state` must be one of the trailing-block states.
pub fn line_transition(state: ScanState, line: &[u8], marker: u8) -> ScanState {
    match state {
        ScanState::ExtrasOrSummary | ScanState::Extras if line.first() == Some(&marker) => {
            ScanState::Extras
        }
        ScanState::ExtrasOrSummary | ScanState::Extras => ScanState::Summary,
        other => other,
    }
}

/// Parser options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParserOptions {
    pub extras_marker: u8,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            extras_marker: DEFAULT_EXTRAS_MARKER,
        }
    }
}

/// Incremental scanner for one process's output
#[derive(Debug, Default)]
pub struct StreamParser {
    options: ParserOptions,
    state: ScanState,
    line: Vec<u8>,
    extras: String,
}

impl StreamParser {
    pub fn new(options: ParserOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Consume a chunk of bytes; chunks may split lines anywhere.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<ParseEvent> {
        let mut events = Vec::new();
        for &byte in chunk {
            match self.state {
                ScanState::Glyphs { after_newline } => {
                    let (next, glyph) = glyph_transition(after_newline, byte);
                    self.state = next;
                    if let Some(glyph) = glyph {
                        events.push(ParseEvent::Glyph(glyph));
                    }
                }
                ScanState::ExtrasOrSummary | ScanState::Extras | ScanState::Summary => {
                    self.line.push(byte);
                    if byte == b'\n' {
                        let line = std::mem::take(&mut self.line);
                        self.complete_line(&line, &mut events);
                    }
                }
                ScanState::Done => break,
            }
        }
        events
    }

    /// Signal end of stream. An unterminated last line is still classified.
    pub fn finish(&mut self) -> Vec<ParseEvent> {
        let mut events = Vec::new();
        if !self.line.is_empty() {
            let line = std::mem::take(&mut self.line);
            self.complete_line(&line, &mut events);
        }
        self.flush_extras(&mut events);
        self.state = ScanState::Done;
        events
    }

    fn complete_line(&mut self, line: &[u8], events: &mut Vec<ParseEvent>) {
        let next = line_transition(self.state, line, self.options.extras_marker);
        match next {
            ScanState::Extras => {
                self.extras.push_str(&String::from_utf8_lossy(line));
            }
            ScanState::Summary => {
                self.flush_extras(events);
                let text = String::from_utf8_lossy(line);
                events.extend(
                    parse_summary_line(text.trim_end_matches(['\r', '\n']))
                        .into_iter()
                        .map(ParseEvent::Summary),
                );
            }
            _ => {}
        }
        self.state = next;
    }

    fn flush_extras(&mut self, events: &mut Vec<ParseEvent>) {
        if !self.extras.is_empty() {
            events.push(ParseEvent::Extras(std::mem::take(&mut self.extras)));
        }
    }
}

/// Parse a complete in-memory stream
pub fn parse_all(bytes: &[u8], options: ParserOptions) -> Vec<ParseEvent> {
    let mut parser = StreamParser::new(options);
    let mut events = parser.feed(bytes);
    events.extend(parser.finish());
    events
}
