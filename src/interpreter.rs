//! Token interpreter
//!
//! Translates tokens into operations on the screens and on the emulator
//! itself: the second half of the pipeline, after the tokenizer. This is
//! where the meaning of every recognized sequence lives; sequences that a
//! real terminal accepts but this emulator does not act on are consumed
//! here silently.

use tern_core::{
    charset_for_designator, remap, CharsetId, Color, LineProperties, LineSaver, Rendition, Screen,
    ScreenMode, Snapshot,
};
use tern_parser::Token;

/// Code points kept when the external interface overwrites the title.
const WINDOW_TITLE_CAPACITY: usize = 256;

/// Sink for decoding-error diagnostics.
pub type LogFunction = Box<dyn FnMut(&str) + Send>;

/// Emulator-level boolean modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmulatorMode {
    /// ANSI operation; when off the tokenizer falls back to VT52.
    Ansi,
    /// DECCOLM: 132-column display.
    Columns132,
    /// Honor DECCOLM requests at all.
    AllowColumns132,
    /// The alternate screen is selected.
    AppScreen,
}

const MODE_COUNT: usize = 4;

/// Per-screen charset selection: four designated slots, the live choice
/// and the copy captured by save-cursor.
#[derive(Debug, Clone, Copy)]
struct CharsetRecord {
    slots: [CharsetId; 4],
    current: CharsetId,
    saved: CharsetId,
}

impl Default for CharsetRecord {
    fn default() -> Self {
        Self {
            slots: [CharsetId::Latin1; 4],
            current: CharsetId::Latin1,
            saved: CharsetId::Latin1,
        }
    }
}

/// Owns both screens and all emulator-level state, and maps tokens onto
/// them.
pub(crate) struct Interpreter {
    screens: [Screen; 2],
    /// 0 = primary, 1 = alternate.
    current: usize,
    modes: [bool; MODE_COUNT],
    saved_modes: [bool; MODE_COUNT],
    charsets: [CharsetRecord; 2],
    title: String,
    log_function: Option<LogFunction>,
}

impl Interpreter {
    pub fn new(lines: usize, columns: usize, line_saver: Option<LineSaver>) -> Self {
        let mut primary = Screen::new(lines, columns);
        primary.set_line_saver(line_saver);
        let mut interp = Self {
            screens: [primary, Screen::new(lines, columns)],
            current: 0,
            modes: [false; MODE_COUNT],
            saved_modes: [false; MODE_COUNT],
            charsets: [CharsetRecord::default(); 2],
            title: String::new(),
            log_function: None,
        };
        interp.reset_all();
        interp
    }

    pub fn screen(&self) -> &Screen {
        &self.screens[self.current]
    }

    fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screens[self.current]
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.chars().take(WINDOW_TITLE_CAPACITY).collect();
    }

    pub fn set_log_function(&mut self, f: Option<LogFunction>) {
        self.log_function = f;
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self.screen(), &self.title)
    }

    pub fn get_mode(&self, m: EmulatorMode) -> bool {
        self.modes[m as usize]
    }

    // --- lifecycle --------------------------------------------------------

    /// Everything except the tokenizer side of a full reset.
    pub fn reset_all(&mut self) {
        self.reset_modes();
        self.reset_charset();
        self.screen_mut().reset();
    }

    fn reset_modes(&mut self) {
        // AllowColumns132 deliberately survives a reset, as in xterm.
        self.reset_mode(EmulatorMode::Columns132);
        self.save_mode(EmulatorMode::Columns132);
        self.reset_mode(EmulatorMode::AppScreen);
        self.save_mode(EmulatorMode::AppScreen);
        self.reset_screen_mode_both(ScreenMode::NewLine);
        self.set_mode(EmulatorMode::Ansi);
    }

    pub fn set_screen_size(&mut self, lines: usize, columns: usize) {
        if lines < 1 || columns < 1 {
            return;
        }
        for screen in &mut self.screens {
            screen.resize_image(lines, columns);
        }
    }

    fn clear_screen_and_set_columns(&mut self, columns: usize) {
        let lines = self.screen().lines();
        self.set_screen_size(lines, columns);
        self.screen_mut().clear_entire_screen();
        self.screen_mut().set_default_margins();
        self.screen_mut().set_cursor_yx(1, 1);
    }

    // --- emulator modes ---------------------------------------------------

    fn set_screen(&mut self, n: usize) {
        self.current = n & 1;
    }

    fn set_mode(&mut self, m: EmulatorMode) {
        self.modes[m as usize] = true;
        match m {
            EmulatorMode::Columns132 => {
                if self.get_mode(EmulatorMode::AllowColumns132) {
                    self.clear_screen_and_set_columns(132);
                } else {
                    self.modes[m as usize] = false;
                }
            }
            EmulatorMode::AppScreen => self.set_screen(1),
            EmulatorMode::AllowColumns132 | EmulatorMode::Ansi => {}
        }
    }

    fn reset_mode(&mut self, m: EmulatorMode) {
        self.modes[m as usize] = false;
        match m {
            EmulatorMode::Columns132 => {
                if self.get_mode(EmulatorMode::AllowColumns132) {
                    self.clear_screen_and_set_columns(80);
                }
            }
            EmulatorMode::AppScreen => self.set_screen(0),
            EmulatorMode::AllowColumns132 | EmulatorMode::Ansi => {}
        }
    }

    fn save_mode(&mut self, m: EmulatorMode) {
        self.saved_modes[m as usize] = self.modes[m as usize];
    }

    /// Copies the flag back without re-running mode side effects.
    fn restore_mode(&mut self, m: EmulatorMode) {
        self.modes[m as usize] = self.saved_modes[m as usize];
    }

    fn set_screen_mode_both(&mut self, m: ScreenMode) {
        for screen in &mut self.screens {
            screen.set_mode(m);
        }
    }

    fn reset_screen_mode_both(&mut self, m: ScreenMode) {
        for screen in &mut self.screens {
            screen.reset_mode(m);
        }
    }

    fn save_screen_mode_both(&mut self, m: ScreenMode) {
        for screen in &mut self.screens {
            screen.save_mode(m);
        }
    }

    /// "Restore" for the dual-screen modes clears them on both screens.
    fn restore_screen_mode_both(&mut self, m: ScreenMode) {
        for screen in &mut self.screens {
            screen.reset_mode(m);
        }
    }

    // --- charsets ---------------------------------------------------------

    fn reset_charset(&mut self) {
        self.charsets = [CharsetRecord::default(); 2];
    }

    /// Translate a printable through the active charset of the current
    /// screen.
    fn apply_charset(&self, c: char) -> char {
        remap(self.charsets[self.current].current, c)
    }

    /// Designate slot `n` on both screens and make it current.
    fn set_charset(&mut self, n: usize, id: CharsetId) {
        for record in &mut self.charsets {
            record.slots[n & 3] = id;
        }
        self.use_charset(n);
    }

    /// Designate slot `n` on the current screen only and make it current.
    fn set_and_use_charset(&mut self, n: usize, id: CharsetId) {
        self.charsets[self.current].slots[n & 3] = id;
        self.use_charset(n);
    }

    fn use_charset(&mut self, n: usize) {
        let record = &mut self.charsets[self.current];
        record.current = record.slots[n & 3];
    }

    // --- cursor save/restore ----------------------------------------------

    /// DECSC: the charset selection is saved alongside the screen cursor.
    fn save_cursor(&mut self) {
        let record = &mut self.charsets[self.current];
        record.saved = record.current;
        self.screen_mut().save_cursor();
    }

    fn restore_cursor(&mut self) {
        let record = &mut self.charsets[self.current];
        record.current = record.saved;
        self.screen_mut().restore_cursor();
    }

    // --- diagnostics ------------------------------------------------------

    pub fn report_decoding_error(&mut self, raw: &[char]) {
        if raw.is_empty() || (raw.len() == 1 && (raw[0] as u32 & 0xff) >= 32) {
            return;
        }
        let message = hexdump(raw);
        log::debug!("{}", message);
        if let Some(f) = self.log_function.as_mut() {
            f(&message);
        }
    }

    // --- the dispatch table -----------------------------------------------

    pub fn process_token(&mut self, token: Token, raw: &[char]) {
        match token {
            Token::Chr(c) => {
                let c = self.apply_charset(c);
                self.screen_mut().display_character(c);
            }

            Token::Ctl(c) => match c {
                b'G' => {} // BEL: no bell surface here
                b'H' => self.screen_mut().backspace(),
                b'I' => self.screen_mut().tab(1),
                b'J' | b'K' | b'L' => self.screen_mut().new_line(),
                b'M' => self.screen_mut().to_start_of_line(),
                b'N' => self.use_charset(1), // SO
                b'O' => self.use_charset(0), // SI
                b'X' | b'Z' => self.screen_mut().display_character('\u{2592}'),
                _ => {} // NUL, XON/XOFF and the rest: ignored
            },

            Token::Esc(c) => match c {
                b'D' => self.screen_mut().index(),
                b'E' => self.screen_mut().next_line(),
                b'H' => self.screen_mut().change_tab_stop(true),
                b'M' => self.screen_mut().reverse_index(),
                b'c' => self.reset_all(),
                b'7' => self.save_cursor(),
                b'8' => self.restore_cursor(),
                b'n' => self.use_charset(2), // LS2
                b'o' => self.use_charset(3), // LS3
                b'<' => self.set_mode(EmulatorMode::Ansi),
                // Recognized and consumed: keypad modes, single shifts,
                // HP memory lock, right-half locking shifts, DECBI/DECFI,
                // cursor-to-lower-left.
                b'=' | b'>' | b'N' | b'O' | b'l' | b'm' | b'|' | b'}' | b'~' | b'6' | b'9'
                | b'F' => {}
                _ => self.report_decoding_error(raw),
            },

            Token::EscCs(intro, designator) => match (intro, designator) {
                (b'(' | b')' | b'*' | b'+', b'0' | b'A' | b'B' | b'U' | b'K') => {
                    let slot = match intro {
                        b'(' => 0,
                        b')' => 1,
                        b'*' => 2,
                        _ => 3,
                    };
                    self.set_charset(slot, charset_for_designator(designator));
                }
                // Codec selection: the byte layer is already UTF-8.
                (b'%', b'G' | b'@') => {}
                _ => self.report_decoding_error(raw),
            },

            Token::EscDe(c) => match c {
                b'3' | b'4' => {
                    // Double height renders as double width here too.
                    self.screen_mut()
                        .set_line_property(LineProperties::DOUBLE_WIDTH, true);
                    self.screen_mut()
                        .set_line_property(LineProperties::DOUBLE_HEIGHT, true);
                }
                b'5' => {
                    self.screen_mut()
                        .set_line_property(LineProperties::DOUBLE_WIDTH, false);
                    self.screen_mut()
                        .set_line_property(LineProperties::DOUBLE_HEIGHT, false);
                }
                b'6' => {
                    self.screen_mut()
                        .set_line_property(LineProperties::DOUBLE_WIDTH, true);
                    self.screen_mut()
                        .set_line_property(LineProperties::DOUBLE_HEIGHT, false);
                }
                b'8' => self.screen_mut().help_align(),
                _ => self.report_decoding_error(raw),
            },

            Token::CsiPn { final_byte, p, q } => {
                let p = p.max(0) as usize;
                let q = q.max(0) as usize;
                match final_byte {
                    b'@' => self.screen_mut().insert_chars(p),
                    b'A' => self.screen_mut().cursor_up(p),
                    b'B' => self.screen_mut().cursor_down(p),
                    b'C' => self.screen_mut().cursor_right(p),
                    b'D' => self.screen_mut().cursor_left(p),
                    b'E' | b'F' => {} // cursor next/preceding line
                    b'G' => self.screen_mut().set_cursor_x(p),
                    b'H' | b'f' => self.screen_mut().set_cursor_yx(p, q),
                    b'I' => self.screen_mut().tab(p),
                    b'L' => self.screen_mut().insert_lines(p),
                    b'M' => self.screen_mut().delete_lines(p),
                    b'P' => self.screen_mut().delete_chars(p),
                    b'S' => self.screen_mut().scroll_up(p),
                    b'T' => self.screen_mut().scroll_down(p),
                    b'X' => self.screen_mut().erase_chars(p),
                    b'Z' => self.screen_mut().backtab(p),
                    b'd' => self.screen_mut().set_cursor_y(p),
                    b'r' => self.screen_mut().set_margins(p, q),
                    b'y' => {} // confidence test
                    _ => self.report_decoding_error(raw),
                }
            }

            Token::CsiPs { final_byte, n, p, q } => match (final_byte, n) {
                (b't', 8) => self.set_screen_size(p.max(0) as usize, q.max(0) as usize),
                (b't', 28) => {} // tab text color

                (b'K', 0) => self.screen_mut().clear_to_end_of_line(),
                (b'K', 1) => self.screen_mut().clear_to_begin_of_line(),
                (b'K', 2) => self.screen_mut().clear_entire_line(),
                (b'J', 0) => self.screen_mut().clear_to_end_of_screen(),
                (b'J', 1) => self.screen_mut().clear_to_begin_of_screen(),
                (b'J', 2) => self.screen_mut().clear_entire_screen(),
                (b'J', 3) => {} // erase saved lines: history is host-owned

                (b'g', 0) => self.screen_mut().change_tab_stop(false),
                (b'g', 3) => self.screen_mut().clear_tab_stops(),

                (b'h', 4) => self.screen_mut().set_mode(ScreenMode::Insert),
                (b'h', 20) => self.set_screen_mode_both(ScreenMode::NewLine),
                (b'l', 4) => self.screen_mut().reset_mode(ScreenMode::Insert),
                (b'l', 20) => self.reset_screen_mode_both(ScreenMode::NewLine),

                (b'i', 0) => {}                    // attached printer
                (b'n', 0 | 3 | 5 | 6) => {}        // DSR: no replies to the host
                (b's', 0) => self.save_cursor(),
                (b'u', 0) => self.restore_cursor(),

                (b'm', 0) => self.screen_mut().set_default_rendition(),
                (b'm', 1) => self.screen_mut().set_rendition(Rendition::BOLD),
                (b'm', 2) => self.screen_mut().set_rendition(Rendition::DIM),
                (b'm', 3) => self.screen_mut().set_rendition(Rendition::ITALIC),
                (b'm', 4) => self.screen_mut().set_rendition(Rendition::UNDERLINE),
                (b'm', 5) => self.screen_mut().set_rendition(Rendition::BLINK),
                (b'm', 7) => self.screen_mut().set_rendition(Rendition::REVERSE),
                (b'm', 8) => {}            // hidden
                (b'm', 10 | 11 | 12) => {} // font mapping
                (b'm', 21) => self.screen_mut().reset_rendition(Rendition::BOLD),
                (b'm', 22) => self.screen_mut().reset_rendition(Rendition::DIM),
                (b'm', 23) => self.screen_mut().reset_rendition(Rendition::ITALIC),
                (b'm', 24) => self.screen_mut().reset_rendition(Rendition::UNDERLINE),
                (b'm', 25) => self.screen_mut().reset_rendition(Rendition::BLINK),
                (b'm', 27) => self.screen_mut().reset_rendition(Rendition::REVERSE),
                (b'm', 28) => {}

                (b'm', 30..=37) => {
                    self.screen_mut().set_fore_color(Color::System((n - 30) as u8))
                }
                (b'm', 38) => self.screen_mut().set_fore_color(Color::from_space(p, q)),
                (b'm', 39) => self.screen_mut().set_fore_color(Color::Default),
                (b'm', 40..=47) => {
                    self.screen_mut().set_back_color(Color::System((n - 40) as u8))
                }
                (b'm', 48) => self.screen_mut().set_back_color(Color::from_space(p, q)),
                (b'm', 49) => self.screen_mut().set_back_color(Color::Default),
                (b'm', 90..=97) => {
                    self.screen_mut().set_fore_color(Color::System((n - 90 + 8) as u8))
                }
                (b'm', 100..=107) => {
                    self.screen_mut().set_back_color(Color::System((n - 100 + 8) as u8))
                }

                (b'q', 0..=4) => {} // keyboard LEDs

                _ => self.report_decoding_error(raw),
            },

            Token::CsiPr { final_byte, n } => match (n, final_byte) {
                (1, b'h' | b'l' | b's' | b'r') => {} // application cursor keys
                (2, b'l') => self.reset_mode(EmulatorMode::Ansi),
                (3, b'h') => self.set_mode(EmulatorMode::Columns132),
                (3, b'l') => self.reset_mode(EmulatorMode::Columns132),
                (4, b'h' | b'l') => {} // smooth scrolling
                (5, b'h') => self.screen_mut().set_mode(ScreenMode::Screen),
                (5, b'l') => self.screen_mut().reset_mode(ScreenMode::Screen),
                (6, b'h') => self.screen_mut().set_mode(ScreenMode::Origin),
                (6, b'l') => self.screen_mut().reset_mode(ScreenMode::Origin),
                (6, b's') => self.screen_mut().save_mode(ScreenMode::Origin),
                (6, b'r') => self.screen_mut().restore_mode(ScreenMode::Origin),
                (7, b'h') => self.screen_mut().set_mode(ScreenMode::Wrap),
                (7, b'l') => self.screen_mut().reset_mode(ScreenMode::Wrap),
                (7, b's') => self.screen_mut().save_mode(ScreenMode::Wrap),
                (7, b'r') => self.screen_mut().restore_mode(ScreenMode::Wrap),
                (8, b'h' | b'l' | b's' | b'r') => {}  // auto-repeat
                (9, b'h' | b'l' | b's' | b'r') => {}  // interlace
                (12, b'h' | b'l' | b's' | b'r') => {} // cursor blink
                (25, b'h') => self.set_screen_mode_both(ScreenMode::Cursor),
                (25, b'l') => self.reset_screen_mode_both(ScreenMode::Cursor),
                (25, b's') => self.save_screen_mode_both(ScreenMode::Cursor),
                (25, b'r') => self.restore_screen_mode_both(ScreenMode::Cursor),
                (40, b'h') => self.set_mode(EmulatorMode::AllowColumns132),
                (40, b'l') => self.reset_mode(EmulatorMode::AllowColumns132),
                (41, b'h' | b'l' | b's' | b'r') => {} // more(1) workaround
                (47, b'h') => self.set_mode(EmulatorMode::AppScreen),
                (47, b'l') => self.reset_mode(EmulatorMode::AppScreen),
                (47, b's') => self.save_mode(EmulatorMode::AppScreen),
                (47, b'r') => self.restore_mode(EmulatorMode::AppScreen),
                (67, b'h' | b'l' | b's' | b'r') => {} // backarrow key
                // Mouse reporting family: parsed, never acted on.
                (1000..=1003, b'h' | b'l' | b's' | b'r') => {}
                (1004, b'h' | b'l') => {} // focus events
                (1005 | 1006 | 1015, b'h' | b'l' | b's' | b'r') => {}
                (1034, b'h') => {} // 8-bit input
                (1047, b'h') => self.set_mode(EmulatorMode::AppScreen),
                (1047, b'l') => self.reset_mode(EmulatorMode::AppScreen),
                (1047, b's') => self.save_mode(EmulatorMode::AppScreen),
                (1047, b'r') => self.restore_mode(EmulatorMode::AppScreen),
                (1048, b'h' | b's') => self.save_cursor(),
                (1048, b'l' | b'r') => self.restore_cursor(),
                (1049, b'h') => {
                    self.save_cursor();
                    self.screens[1].clear_entire_screen();
                    self.set_mode(EmulatorMode::AppScreen);
                }
                (1049, b'l') => {
                    self.reset_mode(EmulatorMode::AppScreen);
                    self.restore_cursor();
                }
                (2004, b'h' | b'l' | b's' | b'r') => {} // bracketed paste
                _ => self.report_decoding_error(raw),
            },

            Token::CsiPg(c) => match c {
                b'c' => {} // secondary device attributes: no replies
                b't' => {} // title modes
                b'p' => {} // pointer mode
                _ => self.report_decoding_error(raw),
            },

            Token::CsiPe(c) => match c {
                b'p' => {} // DECSTR
                _ => self.report_decoding_error(raw),
            },

            Token::Vt52 { final_byte, p, q } => match final_byte {
                b'A' => self.screen_mut().cursor_up(1),
                b'B' => self.screen_mut().cursor_down(1),
                b'C' => self.screen_mut().cursor_right(1),
                b'D' => self.screen_mut().cursor_left(1),
                b'F' => self.set_and_use_charset(0, CharsetId::Vt100Graphics),
                b'G' => self.set_and_use_charset(0, CharsetId::Latin1),
                b'H' => self.screen_mut().set_cursor_yx(1, 1),
                b'I' => self.screen_mut().reverse_index(),
                b'J' => self.screen_mut().clear_to_end_of_screen(),
                b'K' => self.screen_mut().clear_to_end_of_line(),
                b'Y' => {
                    let y = (p - 31).max(0) as usize;
                    let x = (q - 31).max(0) as usize;
                    self.screen_mut().set_cursor_yx(y, x);
                }
                b'<' => self.set_mode(EmulatorMode::Ansi),
                b'=' | b'>' => {} // keypad modes
                _ => self.report_decoding_error(raw),
            },

            Token::Title(text) => self.set_title(&text),

            Token::Invalid => self.report_decoding_error(raw),
        }
    }
}

/// Render a token buffer for the error log: printable ASCII stays as-is,
/// backslashes are doubled, everything else becomes `\x%04x(hex)`.
fn hexdump(raw: &[char]) -> String {
    let mut out = String::from("Undecodable sequence: ");
    for &c in raw {
        let cp = c as u32;
        if c == '\\' {
            out.push_str("\\\\");
        } else if cp > 32 && cp < 127 {
            out.push(c);
        } else {
            out.push_str(&format!("\\x{:04x}(hex)", cp));
        }
    }
    out
}
