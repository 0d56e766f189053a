//! Tern Core - Platform-independent terminal screen model
//!
//! This crate provides the data structures and logic for the screen side of
//! terminal emulation:
//! - Screen grid of cells with characters, rendition and colors
//! - Cursor, margins, tab stops and per-screen modes
//! - Line-saver hook for rows scrolled off the top
//! - Read-only snapshots for renderers
//!
//! The crate is deterministic: given the same sequence of operations it
//! always produces the same screen state. It knows nothing about escape
//! sequences; those live in `tern-parser` and the emulator crate.

mod cell;
mod charset;
mod color;
mod line;
mod screen;
mod snapshot;

pub use cell::{Cell, CellFlags, Rendition};
pub use charset::{charset_for_designator, remap, CharsetId};
pub use color::{Color, SPACE_DEFAULT, SPACE_INDEX_256, SPACE_RGB, SPACE_SYSTEM};
pub use line::{Line, LineProperties};
pub use screen::{LineSaver, SavedCursor, Screen, ScreenMode};
pub use snapshot::{Snapshot, SnapshotCell, SnapshotCursor, SnapshotLine};
