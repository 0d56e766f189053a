//! Read-only screen snapshots
//!
//! A `Snapshot` is an owned, serializable copy of everything a renderer
//! needs: dimensions, title, cursor, and the full cell grid with rendition
//! and colors. Because it is a value, it is trivially stable while a
//! renderer walks it.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::screen::{Screen, ScreenMode};

/// A complete render view of one screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub lines: usize,
    pub columns: usize,
    pub title: String,
    pub cursor: SnapshotCursor,
    /// DECSCNM: the whole screen renders with fg/bg swapped.
    pub reverse_video: bool,
    pub rows: Vec<SnapshotLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotCursor {
    pub x: usize,
    pub y: usize,
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotLine {
    /// Line property bits (double width/height, wrapped).
    pub properties: u8,
    pub cells: Vec<SnapshotCell>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotCell {
    /// Code point, 0 when the cell is empty.
    pub ch: u32,
    /// Rendition bits.
    pub rendition: u8,
    pub fg: Color,
    pub bg: Color,
}

impl Snapshot {
    /// Capture a screen (plus the emulator-owned title) into a snapshot.
    pub fn capture(screen: &Screen, title: &str) -> Self {
        let rows = (0..screen.lines())
            .map(|y| {
                let line = screen.line(y);
                SnapshotLine {
                    properties: line.properties.bits(),
                    cells: line
                        .iter()
                        .map(|cell| SnapshotCell {
                            ch: cell.ch as u32,
                            rendition: cell.rendition.bits(),
                            fg: cell.fg,
                            bg: cell.bg,
                        })
                        .collect(),
                }
            })
            .collect();

        Self {
            lines: screen.lines(),
            columns: screen.columns(),
            title: title.to_string(),
            cursor: SnapshotCursor {
                x: screen.cursor_x(),
                y: screen.cursor_y(),
                visible: screen.get_mode(ScreenMode::Cursor),
            },
            reverse_video: screen.get_mode(ScreenMode::Screen),
            rows,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Text of one row, trailing blanks trimmed.
    pub fn row_text(&self, y: usize) -> String {
        let mut out = String::new();
        for cell in &self.rows[y].cells {
            out.push(char::from_u32(cell.ch).filter(|&c| c != '\0').unwrap_or(' '));
        }
        out.trim_end().to_string()
    }

    /// The whole screen as newline-joined text.
    pub fn screen_text(&self) -> String {
        (0..self.rows.len())
            .map(|y| self.row_text(y))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
