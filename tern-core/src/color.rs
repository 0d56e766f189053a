//! Color representation for terminal cells
//!
//! Supports:
//! - Default foreground/background
//! - 16 system colors (SGR 30-37/90-97 and friends)
//! - 256-color palette
//! - 24-bit true color

use serde::{Deserialize, Serialize};

/// Wire-level color space tag: default color.
pub const SPACE_DEFAULT: i32 = 0;
/// Wire-level color space tag: 16-color system palette.
pub const SPACE_SYSTEM: i32 = 1;
/// Wire-level color space tag: 256-color palette (`38;5;n`).
pub const SPACE_INDEX_256: i32 = 2;
/// Wire-level color space tag: 24-bit color (`38;2;r;g;b`).
pub const SPACE_RGB: i32 = 3;

/// A tagged terminal color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Color {
    /// Default terminal foreground or background.
    #[default]
    Default,
    /// One of the 16 system colors (0-7 normal, 8-15 bright).
    System(u8),
    /// 256-color palette index.
    Indexed(u8),
    /// 24-bit RGB color.
    Rgb { r: u8, g: u8, b: u8 },
}

impl Color {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    /// Build a color from a wire-level color space tag and value.
    ///
    /// The RGB value is packed as `(r << 16) | (g << 8) | b`. Unknown
    /// spaces fall back to the default color, matching how out-of-range
    /// parameters are treated elsewhere.
    pub fn from_space(space: i32, value: i32) -> Self {
        match space {
            SPACE_SYSTEM => Color::System((value & 0xf) as u8),
            SPACE_INDEX_256 => Color::Indexed((value & 0xff) as u8),
            SPACE_RGB => Color::Rgb {
                r: ((value >> 16) & 0xff) as u8,
                g: ((value >> 8) & 0xff) as u8,
                b: (value & 0xff) as u8,
            },
            _ => Color::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_default() {
        assert_eq!(Color::default(), Color::Default);
    }

    #[test]
    fn test_from_space_system() {
        assert_eq!(Color::from_space(SPACE_SYSTEM, 1), Color::System(1));
        assert_eq!(Color::from_space(SPACE_SYSTEM, 15), Color::System(15));
    }

    #[test]
    fn test_from_space_indexed() {
        assert_eq!(Color::from_space(SPACE_INDEX_256, 196), Color::Indexed(196));
    }

    #[test]
    fn test_from_space_rgb() {
        assert_eq!(
            Color::from_space(SPACE_RGB, (10 << 16) | (20 << 8) | 30),
            Color::rgb(10, 20, 30)
        );
    }

    #[test]
    fn test_from_space_unknown() {
        assert_eq!(Color::from_space(99, 5), Color::Default);
    }
}
