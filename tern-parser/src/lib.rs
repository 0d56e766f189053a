//! Tern Parser - escape-sequence tokenizer and UTF-8 layer
//!
//! This crate turns a decoded stream of code points into terminal tokens.
//! It is the byte-level half of the emulator:
//! - A streaming UTF-8 decoder feeding code points in
//! - A tokenizer recognizing C0 controls, ESC/CSI/OSC sequences and the
//!   VT52 fallback grammar from a small rolling buffer
//!
//! The tokenizer is deterministic and handles arbitrary chunk boundaries;
//! feeding a stream one code point at a time or all at once produces the
//! same tokens. It performs no screen mutations itself: tokens are handed
//! to a caller-supplied callback.

mod charclass;
mod token;
mod tokenizer;
mod utf8;

pub use token::{Token, COLOR_SPACE_INDEX_256, COLOR_SPACE_RGB};
pub use tokenizer::{Tokenizer, MAX_ARGUMENT, MAX_ARGUMENTS, MAX_TOKEN_LENGTH};
pub use utf8::{Utf8Decoder, Utf8Result};
