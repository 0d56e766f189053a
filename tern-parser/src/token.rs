//! Tokens produced by the tokenizer
//!
//! Each token is a tag plus up to two selector bytes; the numeric
//! parameters collected while scanning travel in the `p`/`q` fields of the
//! parameterized variants. The dispatcher switches on the whole shape.

/// Color space tag carried in `p` when an SGR 38/48 token announces a
/// 256-color palette index in `q`.
pub const COLOR_SPACE_INDEX_256: i32 = 2;
/// Color space tag carried in `p` when an SGR 38/48 token announces a
/// packed `(r << 16) | (g << 8) | b` value in `q`.
pub const COLOR_SPACE_RGB: i32 = 3;

/// One recognized unit of the input stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A printable code point.
    Chr(char),
    /// A C0 control, biased by `@` (so LF arrives as `b'J'`).
    Ctl(u8),
    /// `ESC c` for a single final byte.
    Esc(u8),
    /// `ESC i c`: charset designation, introducer plus designator.
    EscCs(u8, u8),
    /// `ESC # c`: DEC line attribute / alignment sequences.
    EscDe(u8),
    /// CSI final whose first parameter `n` selects the operation; `p` and
    /// `q` carry any further parameters.
    CsiPs { final_byte: u8, n: u16, p: i32, q: i32 },
    /// CSI final taking plain numeric parameters `p` and `q`.
    CsiPn { final_byte: u8, p: i32, q: i32 },
    /// `CSI ? n ...`: DEC private mode operation on mode `n`.
    CsiPr { final_byte: u8, n: u16 },
    /// `CSI > ...`: secondary device attribute family.
    CsiPg(u8),
    /// `CSI ! ...`: soft reset family.
    CsiPe(u8),
    /// VT52 sequence; `p`/`q` are the raw coordinate characters of
    /// `ESC Y r c`, zero otherwise.
    Vt52 { final_byte: u8, p: i32, q: i32 },
    /// A completed OSC 0/2 window title request.
    Title(String),
    /// Malformed input recognized by the tokenizer itself.
    Invalid,
}
