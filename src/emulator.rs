//! The emulator
//!
//! Ties the UTF-8 decoder, the tokenizer and the token interpreter into
//! the public byte-in, snapshot-out interface. Everything is synchronous:
//! `feed` drives each byte through the whole pipeline before returning,
//! and feeding the same bytes in any chunking produces the same state.

use tern_core::{LineSaver, Screen, Snapshot};
use tern_parser::{Tokenizer, Utf8Decoder, Utf8Result};

use crate::interpreter::{EmulatorMode, Interpreter, LogFunction};

/// A VT100/xterm-compatible terminal emulator.
///
/// ```
/// use tern::Emulator;
///
/// let mut emulator = Emulator::new(24, 80, None);
/// emulator.feed(b"\x1b[1mhello\x1b[0m");
/// emulator.finish();
/// assert_eq!(emulator.snapshot().row_text(0), "hello");
/// ```
pub struct Emulator {
    decoder: Utf8Decoder,
    tokenizer: Tokenizer,
    interp: Interpreter,
}

impl Emulator {
    /// Create an emulator with `lines` x `columns` primary and alternate
    /// screens. The line saver, when given, receives every line scrolled
    /// off the top of the primary screen.
    pub fn new(lines: usize, columns: usize, line_saver: Option<LineSaver>) -> Self {
        Self {
            decoder: Utf8Decoder::new(),
            tokenizer: Tokenizer::new(),
            interp: Interpreter::new(lines, columns, line_saver),
        }
    }

    /// Decode and interpret a chunk of terminal output. Incomplete UTF-8
    /// and escape sequences at the end of the chunk stay buffered for the
    /// next call.
    pub fn feed(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            match self.decoder.feed(byte) {
                Utf8Result::Char(c) => self.receive_char(c),
                Utf8Result::Invalid => self.receive_char(char::REPLACEMENT_CHARACTER),
                Utf8Result::Pending => {}
            }
        }
    }

    /// Flush stream state at end of input: a truncated UTF-8 sequence
    /// becomes U+FFFD, a partial escape sequence is dropped. Idempotent.
    pub fn finish(&mut self) {
        if self.decoder.is_pending() {
            self.decoder.reset();
            self.receive_char(char::REPLACEMENT_CHARACTER);
        }
        self.tokenizer.reset();
    }

    /// RIS: back to the power-on state (the screen sizes are kept).
    pub fn reset(&mut self) {
        self.decoder.reset();
        self.tokenizer.reset();
        self.interp.reset_all();
    }

    /// Overwrite the window title directly (hosts use this for the
    /// initial title before any OSC arrives).
    pub fn set_title(&mut self, title: &str) {
        self.interp.set_title(title);
    }

    pub fn title(&self) -> &str {
        self.interp.title()
    }

    /// Install the sink receiving "Undecodable sequence" diagnostics. The
    /// message is only valid for the duration of the call.
    pub fn set_log_function<F>(&mut self, f: F)
    where
        F: FnMut(&str) + Send + 'static,
    {
        let boxed: LogFunction = Box::new(f);
        self.interp.set_log_function(Some(boxed));
    }

    /// Resize both screens; zero dimensions are ignored.
    pub fn resize(&mut self, lines: usize, columns: usize) {
        self.interp.set_screen_size(lines, columns);
    }

    /// The currently displayed screen.
    pub fn screen(&self) -> &Screen {
        self.interp.screen()
    }

    /// A stable, owned render view of the current screen and title.
    pub fn snapshot(&self) -> Snapshot {
        self.interp.snapshot()
    }

    fn receive_char(&mut self, c: char) {
        let ansi = self.interp.get_mode(EmulatorMode::Ansi);
        let Self {
            tokenizer, interp, ..
        } = self;
        tokenizer.feed(c, ansi, &mut |token, raw| interp.process_token(token, raw));
    }
}
