//! Tern - VT100/xterm-compatible terminal emulation
//!
//! Feed raw terminal output bytes in, read a screen snapshot out. The
//! pipeline is: bytes -> UTF-8 decoder -> tokenizer -> interpreter ->
//! screen state, all driven synchronously by [`Emulator::feed`].
//!
//! The screen model lives in `tern-core`, the byte/token layer in
//! `tern-parser`; this crate owns the interpreter gluing them together
//! and the public API.

mod emulator;
mod interpreter;

pub use emulator::Emulator;
pub use interpreter::EmulatorMode;
pub use tern_core::{
    Cell, CellFlags, CharsetId, Color, Line, LineProperties, LineSaver, Rendition, Screen,
    ScreenMode, Snapshot, SnapshotCell, SnapshotCursor, SnapshotLine,
};
