//! Terminal cell representation
//!
//! Each cell in the grid stores one code point plus its display attributes.
//! A cell with content `'\0'` is empty; renderers draw it as a space.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::color::Color;

bitflags! {
    /// Text rendition flags, one bit per SGR attribute.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Rendition: u8 {
        const BOLD      = 1 << 0;
        const DIM       = 1 << 1;
        const ITALIC    = 1 << 2;
        const UNDERLINE = 1 << 3;
        const BLINK     = 1 << 4;
        const REVERSE   = 1 << 5;
    }
}

bitflags! {
    /// Cell-level flags orthogonal to the rendition.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellFlags: u8 {
        /// The trailing (right) half of a double-width glyph. Content is
        /// meaningless; renderers skip it.
        const WIDE_CONTINUATION = 1 << 0;
    }
}

/// A single cell in the terminal grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// The code point stored in this cell, `'\0'` when empty.
    pub ch: char,
    pub rendition: Rendition,
    pub fg: Color,
    pub bg: Color,
    pub flags: CellFlags,
}

impl Cell {
    /// An empty cell with the given rendition and colors. This is what
    /// every erase operation fills with.
    pub fn blank(rendition: Rendition, fg: Color, bg: Color) -> Self {
        Self {
            ch: '\0',
            rendition,
            fg,
            bg,
            flags: CellFlags::empty(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ch == '\0'
    }

    /// The character a renderer should draw (space when empty).
    pub fn display_char(&self) -> char {
        if self.ch == '\0' {
            ' '
        } else {
            self.ch
        }
    }

    /// Turn this cell into the trailing half of a wide glyph.
    pub fn set_continuation(&mut self) {
        self.ch = '\0';
        self.flags.insert(CellFlags::WIDE_CONTINUATION);
    }

    pub fn is_continuation(&self) -> bool {
        self.flags.contains(CellFlags::WIDE_CONTINUATION)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank(Rendition::empty(), Color::Default, Color::Default)
    }
}

// serde works on the raw bit values so snapshots stay compact.
impl Serialize for Rendition {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for Rendition {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u8::deserialize(deserializer)?;
        Ok(Rendition::from_bits_truncate(bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_default_is_empty() {
        let cell = Cell::default();
        assert!(cell.is_empty());
        assert_eq!(cell.display_char(), ' ');
    }

    #[test]
    fn test_blank_keeps_attributes() {
        let cell = Cell::blank(Rendition::REVERSE, Color::System(1), Color::Indexed(17));
        assert!(cell.is_empty());
        assert_eq!(cell.rendition, Rendition::REVERSE);
        assert_eq!(cell.fg, Color::System(1));
        assert_eq!(cell.bg, Color::Indexed(17));
    }

    #[test]
    fn test_continuation() {
        let mut cell = Cell::default();
        cell.ch = '中';
        cell.set_continuation();
        assert!(cell.is_continuation());
        assert!(cell.is_empty());
    }

    #[test]
    fn test_rendition_bits() {
        let r = Rendition::BOLD | Rendition::UNDERLINE;
        assert_eq!(r.bits(), 0b0000_1001);
    }
}
