//! Character set handling
//!
//! VT100 terminals route printable characters through a selectable code
//! page before they reach the grid. The interesting maps are the DEC
//! special graphics set (line drawing on 0x5F-0x7E) and the IBM PC set
//! (CP437 glyphs on 0x80-0xFF). Latin-1 and the user-defined set are
//! identity maps.

use serde::{Deserialize, Serialize};

/// Character set identifiers selectable via `ESC ( C` and friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CharsetId {
    Undefined,
    #[default]
    Latin1,
    IbmPc,
    Vt100Graphics,
    UserDefined,
}

/// Map a designator byte to a charset identifier.
///
/// `0` selects DEC graphics, `B` Latin-1, `A` and `U` the IBM PC set and
/// `K` the user-defined set. Anything else is undefined.
pub fn charset_for_designator(c: u8) -> CharsetId {
    match c {
        b'0' => CharsetId::Vt100Graphics,
        b'A' => CharsetId::IbmPc,
        b'B' => CharsetId::Latin1,
        b'U' => CharsetId::IbmPc,
        b'K' => CharsetId::UserDefined,
        _ => CharsetId::Undefined,
    }
}

/// Translate a code point through a charset map.
///
/// The maps only cover code points below 0x100; everything above passes
/// through unchanged.
pub fn remap(id: CharsetId, c: char) -> char {
    if c as u32 >= 0x100 {
        return c;
    }
    match id {
        CharsetId::Vt100Graphics => vt100_graphics(c),
        CharsetId::IbmPc => ibmpc(c),
        _ => c,
    }
}

/// DEC special graphics: 0x5F-0x7E become line-drawing and technical
/// glyphs, the rest of the range is untouched.
fn vt100_graphics(c: char) -> char {
    match c {
        '_' => '\u{00A0}', // blank
        '`' => '◆',
        'a' => '▒',
        'b' => '␉',
        'c' => '␌',
        'd' => '␍',
        'e' => '␊',
        'f' => '°',
        'g' => '±',
        'h' => '␤',
        'i' => '␋',
        'j' => '┘',
        'k' => '┐',
        'l' => '┌',
        'm' => '└',
        'n' => '┼',
        'o' => '⎺',
        'p' => '⎻',
        'q' => '─',
        'r' => '⎼',
        's' => '⎽',
        't' => '├',
        'u' => '┤',
        'v' => '┴',
        'w' => '┬',
        'x' => '│',
        'y' => '≤',
        'z' => '≥',
        '{' => 'π',
        '|' => '≠',
        '}' => '£',
        '~' => '·',
        _ => c,
    }
}

/// CP437 glyphs for the high half of the byte range.
#[rustfmt::skip]
const IBMPC_HIGH: [char; 128] = [
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å',
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ',
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»',
    '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐',
    '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧',
    '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀',
    'α', 'ß', 'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩',
    '≡', '±', '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{00A0}',
];

fn ibmpc(c: char) -> char {
    let cp = c as u32;
    if (0x80..0x100).contains(&cp) {
        IBMPC_HIGH[(cp - 0x80) as usize]
    } else {
        c
    }
}
