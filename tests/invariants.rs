//! Property-based invariant tests
//!
//! These feed arbitrary byte soup (and structured sequences) into the
//! emulator and verify structural invariants that must hold for any
//! input:
//!
//! 1. The cursor never leaves the grid and margins stay ordered.
//! 2. Feeding the same bytes in any chunking yields the same state.
//! 3. `finish` is idempotent.
//! 4. An equal-size resize changes nothing.
//! 5. SGR reset really restores the default rendition and colors.
//! 6. A recognized CSI sequence consumes exactly its own bytes.

use proptest::prelude::*;
use tern::{Color, Emulator, Rendition};

fn state_fingerprint(emulator: &Emulator) -> String {
    emulator.snapshot().to_json().unwrap()
}

proptest! {
    #[test]
    fn cursor_stays_in_bounds(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let mut emulator = Emulator::new(10, 20, None);
        for chunk in bytes.chunks(7) {
            emulator.feed(chunk);
            let screen = emulator.screen();
            prop_assert!(screen.cursor_x() < screen.columns());
            prop_assert!(screen.cursor_y() < screen.lines());
            prop_assert!(screen.top_margin() <= screen.bottom_margin());
            prop_assert!(screen.bottom_margin() < screen.lines());
            prop_assert_eq!(screen.tab_stops().len(), screen.columns());
        }
    }

    #[test]
    fn chunking_does_not_change_the_result(
        bytes in proptest::collection::vec(any::<u8>(), 0..256),
        chunk_size in 1usize..17,
    ) {
        let mut all_at_once = Emulator::new(8, 16, None);
        all_at_once.feed(&bytes);
        all_at_once.finish();

        let mut chunked = Emulator::new(8, 16, None);
        for chunk in bytes.chunks(chunk_size) {
            chunked.feed(chunk);
        }
        chunked.finish();

        prop_assert_eq!(state_fingerprint(&all_at_once), state_fingerprint(&chunked));
    }

    #[test]
    fn finish_is_idempotent(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let mut emulator = Emulator::new(8, 16, None);
        emulator.feed(&bytes);
        emulator.finish();
        let once = state_fingerprint(&emulator);
        emulator.finish();
        prop_assert_eq!(once, state_fingerprint(&emulator));
    }

    #[test]
    fn same_size_resize_is_noop(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let mut emulator = Emulator::new(8, 16, None);
        emulator.feed(&bytes);
        emulator.finish();
        let lines = emulator.screen().lines();
        let columns = emulator.screen().columns();
        let before = state_fingerprint(&emulator);
        emulator.resize(lines, columns);
        prop_assert_eq!(before, state_fingerprint(&emulator));
    }

    #[test]
    fn sgr_reset_restores_defaults(params in proptest::collection::vec(0u16..110, 0..8)) {
        let mut emulator = Emulator::new(4, 8, None);
        let joined = params
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(";");
        emulator.feed(format!("\x1b[{}m\x1b[0mZ", joined).as_bytes());
        let screen = emulator.screen();
        prop_assert_eq!(screen.rendition(), Rendition::empty());
        prop_assert_eq!(screen.foreground(), Color::Default);
        prop_assert_eq!(screen.background(), Color::Default);
    }

    #[test]
    fn recognized_csi_consumes_exactly_its_bytes(
        a in 0u16..30,
        b in 0u16..30,
        final_byte in prop::sample::select(b"ABCDGHJKLMPSTXZdfm".to_vec()),
    ) {
        let mut emulator = Emulator::new(10, 20, None);
        emulator.feed(format!("\x1b[{};{}{}", a, b, final_byte as char).as_bytes());
        // Whatever the sequence did, the scanner is back at ground:
        // plain text must land on the screen verbatim.
        emulator.feed(b"\x1b[10;1Hmarker");
        prop_assert_eq!(emulator.snapshot().row_text(9), "marker");
    }
}

#[test]
fn control_inside_sequence_executes_first() {
    // A carriage return in the middle of a CSI sequence executes
    // immediately; the sequence then completes with its argument intact.
    let mut emulator = Emulator::new(4, 8, None);
    emulator.feed(b"ab\x1b[1\rK");
    // CR homed the cursor, then erase-to-start cleared column 0 only.
    assert_eq!(emulator.snapshot().row_text(0), " b");
}
