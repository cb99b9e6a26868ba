//! Progress glyphs emitted by `behat -f progress`

use std::fmt;

/// Outcome of a single step as printed in the progress stream
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Glyph {
    Passed,
    Skipped,
    Failed,
    Undefined,
}

impl Glyph {
    /// Map a raw output byte to a glyph; anything else is not a glyph
    pub fn from_byte(b: u8) -> Option<Glyph> {
        match b {
            b'.' => Some(Glyph::Passed),
            b'-' => Some(Glyph::Skipped),
            b'F' => Some(Glyph::Failed),
            b'U' => Some(Glyph::Undefined),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Glyph::Passed => '.',
            Glyph::Skipped => '-',
            Glyph::Failed => 'F',
            Glyph::Undefined => 'U',
        }
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_byte() {
        assert_eq!(Glyph::from_byte(b'.'), Some(Glyph::Passed));
        assert_eq!(Glyph::from_byte(b'-'), Some(Glyph::Skipped));
        assert_eq!(Glyph::from_byte(b'F'), Some(Glyph::Failed));
        assert_eq!(Glyph::from_byte(b'U'), Some(Glyph::Undefined));
        assert_eq!(Glyph::from_byte(b'x'), None);
        assert_eq!(Glyph::from_byte(b' '), None);
    }

    #[test]
    fn test_symbol_round_trip() {
        for glyph in [Glyph::Passed, Glyph::Skipped, Glyph::Failed, Glyph::Undefined] {
            assert_eq!(Glyph::from_byte(glyph.symbol() as u8), Some(glyph));
        }
    }
}
