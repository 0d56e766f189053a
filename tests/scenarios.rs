//! End-to-end byte-stream scenarios
//!
//! Each test feeds raw terminal output into a fresh emulator and checks
//! the resulting screen state: cell contents, cursor, title and the
//! line-saver hand-off.

use std::sync::{Arc, Mutex};

use tern::{Color, Emulator, LineProperties, Rendition};

fn emulator_10x10() -> Emulator {
    Emulator::new(10, 10, None)
}

fn cell(emulator: &Emulator, y: usize, x: usize) -> tern::Cell {
    *emulator.screen().line(y).cell(x)
}

fn cursor(emulator: &Emulator) -> (usize, usize) {
    (emulator.screen().cursor_y(), emulator.screen().cursor_x())
}

#[test]
fn plain_text_fills_cells() {
    let mut emulator = emulator_10x10();
    emulator.feed(b"Hi");
    assert_eq!(cell(&emulator, 0, 0).ch, 'H');
    assert_eq!(cell(&emulator, 0, 1).ch, 'i');
    assert_eq!(cursor(&emulator), (0, 2));
}

#[test]
fn line_feed_keeps_column_by_default() {
    let mut emulator = emulator_10x10();
    emulator.feed(b"ab\ncd");
    assert_eq!(cell(&emulator, 0, 0).ch, 'a');
    assert_eq!(cell(&emulator, 0, 1).ch, 'b');
    assert_eq!(cell(&emulator, 1, 2).ch, 'c');
    assert_eq!(cell(&emulator, 1, 3).ch, 'd');
    assert_eq!(cursor(&emulator), (1, 4));
}

#[test]
fn line_feed_returns_carriage_in_newline_mode() {
    let mut emulator = emulator_10x10();
    emulator.feed(b"\x1b[20hab\ncd");
    assert_eq!(cell(&emulator, 1, 0).ch, 'c');
    assert_eq!(cell(&emulator, 1, 1).ch, 'd');
    assert_eq!(cursor(&emulator), (1, 2));
}

#[test]
fn sgr_color_applies_to_following_cells_only() {
    let mut emulator = emulator_10x10();
    emulator.feed(b"\x1b[31mA\x1b[0mB");

    let a = cell(&emulator, 0, 0);
    assert_eq!(a.ch, 'A');
    assert_eq!(a.fg, Color::System(1));

    let b = cell(&emulator, 0, 1);
    assert_eq!(b.ch, 'B');
    assert_eq!(b.fg, Color::Default);
    assert_eq!(b.rendition, Rendition::empty());
}

#[test]
fn sgr_true_color() {
    let mut emulator = emulator_10x10();
    emulator.feed(b"\x1b[38;2;10;20;30mX");
    let x = cell(&emulator, 0, 0);
    assert_eq!(x.ch, 'X');
    assert_eq!(x.fg, Color::rgb(10, 20, 30));
}

#[test]
fn sgr_256_color_background() {
    let mut emulator = emulator_10x10();
    emulator.feed(b"\x1b[48;5;196mX");
    assert_eq!(cell(&emulator, 0, 0).bg, Color::Indexed(196));
}

#[test]
fn full_line_wraps_on_line_feed() {
    let mut emulator = emulator_10x10();
    emulator.feed(b"0123456789\n");
    assert_eq!(emulator.snapshot().row_text(0), "0123456789");
    assert_eq!(cursor(&emulator), (1, 0));
    // No printable arrived after the last column, so the line never
    // actually wrapped.
    assert!(!emulator
        .screen()
        .line(0)
        .properties
        .contains(LineProperties::WRAPPED));
}

#[test]
fn wrap_disabled_pins_cursor_to_last_column() {
    let mut emulator = emulator_10x10();
    emulator.feed(b"\x1b[?7l0123456789X");
    assert_eq!(emulator.snapshot().row_text(0), "012345678X");
    assert_eq!(cursor(&emulator), (0, 9));
}

#[test]
fn wrap_enabled_continues_on_next_line() {
    let mut emulator = emulator_10x10();
    emulator.feed(b"0123456789X");
    assert_eq!(emulator.snapshot().row_text(0), "0123456789");
    assert_eq!(emulator.snapshot().row_text(1), "X");
    assert!(emulator
        .screen()
        .line(0)
        .properties
        .contains(LineProperties::WRAPPED));
}

#[test]
fn clear_screen_then_address_cursor() {
    let mut emulator = emulator_10x10();
    emulator.feed(b"garbage everywhere");
    emulator.feed(b"\x1b[2J\x1b[5;5HZ");
    assert_eq!(cell(&emulator, 4, 4).ch, 'Z');
    assert_eq!(cursor(&emulator), (4, 5));
    // Everything else went blank.
    assert_eq!(emulator.snapshot().screen_text().trim(), "Z");
}

#[test]
fn osc_sets_title_without_touching_cells() {
    let mut emulator = emulator_10x10();
    emulator.feed(b"\x1b]0;Title\x07");
    assert_eq!(emulator.title(), "Title");
    assert!(emulator.screen().line(0).is_blank());
    assert_eq!(cursor(&emulator), (0, 0));
}

#[test]
fn next_line_alone_produces_no_history() {
    let saved = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&saved);
    let mut emulator = Emulator::new(
        3,
        3,
        Some(Box::new(move |line: tern::Line| {
            sink.lock().unwrap().push(line.text());
        })),
    );
    emulator.feed(b"\x1bE\x1bE");
    assert!(saved.lock().unwrap().is_empty());

    emulator.feed(b"A\nB\nC\nD");
    assert_eq!(saved.lock().unwrap().as_slice(), ["A"]);
}

#[test]
fn insert_mode_shifts_line_tail() {
    let mut emulator = emulator_10x10();
    emulator.feed(b"ACD\x1b[1;2H\x1b[4hB");
    assert_eq!(emulator.snapshot().row_text(0), "ABCD");
}

#[test]
fn erase_in_line_variants() {
    let mut emulator = emulator_10x10();
    emulator.feed(b"0123456789\x1b[1;5H\x1b[K");
    assert_eq!(emulator.snapshot().row_text(0), "0123");

    let mut emulator = emulator_10x10();
    emulator.feed(b"0123456789\x1b[1;5H\x1b[1K");
    assert_eq!(emulator.snapshot().row_text(0), "     56789");

    let mut emulator = emulator_10x10();
    emulator.feed(b"0123456789\x1b[2K");
    assert_eq!(emulator.snapshot().row_text(0), "");
}

#[test]
fn scroll_region_confines_scrolling() {
    let mut emulator = emulator_10x10();
    for y in 0..5 {
        emulator.feed(format!("\x1b[{};1H{}", y + 1, y).as_bytes());
    }
    emulator.feed(b"\x1b[2;4r\x1b[4;1H\n");
    let snapshot = emulator.snapshot();
    assert_eq!(snapshot.row_text(0), "0");
    assert_eq!(snapshot.row_text(1), "2");
    assert_eq!(snapshot.row_text(2), "3");
    assert_eq!(snapshot.row_text(3), "");
    assert_eq!(snapshot.row_text(4), "4");
}

#[test]
fn alternate_screen_preserves_primary() {
    let mut emulator = emulator_10x10();
    emulator.feed(b"primary");
    emulator.feed(b"\x1b[?1049h");
    assert!(emulator.screen().line(0).is_blank());
    emulator.feed(b"alt");
    assert_eq!(emulator.snapshot().row_text(0), "alt");
    emulator.feed(b"\x1b[?1049l");
    assert_eq!(emulator.snapshot().row_text(0), "primary");
}

#[test]
fn cursor_visibility_reaches_snapshot() {
    let mut emulator = emulator_10x10();
    assert!(emulator.snapshot().cursor.visible);
    emulator.feed(b"\x1b[?25l");
    assert!(!emulator.snapshot().cursor.visible);
    emulator.feed(b"\x1b[?25h");
    assert!(emulator.snapshot().cursor.visible);
}

#[test]
fn alignment_test_fills_screen() {
    let mut emulator = Emulator::new(3, 4, None);
    emulator.feed(b"\x1b#8");
    assert_eq!(emulator.snapshot().screen_text(), "EEEE\nEEEE\nEEEE");
}

#[test]
fn dec_graphics_draw_boxes() {
    let mut emulator = emulator_10x10();
    emulator.feed(b"\x1b(0lqk\x1b(B");
    assert_eq!(emulator.snapshot().row_text(0), "┌─┐");
}

#[test]
fn double_width_property_set_on_cursor_line() {
    let mut emulator = emulator_10x10();
    emulator.feed(b"\x1b[2;1H\x1b#6wide");
    assert!(emulator
        .screen()
        .line(1)
        .properties
        .contains(LineProperties::DOUBLE_WIDTH));
    assert!(!emulator
        .screen()
        .line(1)
        .properties
        .contains(LineProperties::DOUBLE_HEIGHT));
}

#[test]
fn tab_stops_can_be_cleared_and_set() {
    let mut emulator = Emulator::new(5, 40, None);
    emulator.feed(b"\x1b[3g");          // clear all stops
    emulator.feed(b"\x1b[1;21H\x1bH");  // set one under the cursor
    emulator.feed(b"\x1b[1;1H\tX");
    assert_eq!(cell(&emulator, 0, 20).ch, 'X');
}

#[test]
fn ignored_sequences_have_no_effect() {
    let mut emulator = emulator_10x10();
    emulator.feed(b"\x1b[?1000h\x1b[?2004h\x1b[5n\x1b[>0c\x1b[0qok");
    assert_eq!(emulator.snapshot().row_text(0), "ok");
    assert_eq!(cursor(&emulator), (0, 2));
}

#[test]
fn dcs_payload_is_swallowed() {
    let mut emulator = emulator_10x10();
    emulator.feed(b"\x1bPsecret payload\\visible");
    assert_eq!(emulator.snapshot().row_text(0), "visible");
}

#[test]
fn backspace_and_carriage_return() {
    let mut emulator = emulator_10x10();
    emulator.feed(b"abc\x08\x08X\rY");
    assert_eq!(emulator.snapshot().row_text(0), "YXc");
    assert_eq!(cursor(&emulator), (0, 1));
}

#[test]
fn saved_cursor_round_trip_via_csi() {
    let mut emulator = emulator_10x10();
    emulator.feed(b"\x1b[3;7H\x1b[s\x1b[1;1H\x1b[u");
    assert_eq!(cursor(&emulator), (2, 6));
}

#[test]
fn utf8_and_wide_characters() {
    let mut emulator = emulator_10x10();
    emulator.feed("é中x".as_bytes());
    assert_eq!(cell(&emulator, 0, 0).ch, 'é');
    assert_eq!(cell(&emulator, 0, 1).ch, '中');
    assert!(cell(&emulator, 0, 2).is_continuation());
    assert_eq!(cell(&emulator, 0, 3).ch, 'x');
}
