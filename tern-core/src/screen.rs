//! Terminal screen model
//!
//! The `Screen` ties together the cell grid, cursor, scroll margins, tab
//! stops and per-screen modes. It exposes the operation vocabulary a VT100
//! dispatcher needs; it never looks at escape sequences itself.
//!
//! Rows scrolled off the top of the scroll region (when the region starts
//! at row 0) are handed to an optional line-saver callback. The emulator
//! installs the callback on the primary screen only, so the alternate
//! screen never produces history.

use std::fmt;

use unicode_width::UnicodeWidthChar;

use crate::cell::{Cell, CellFlags, Rendition};
use crate::color::Color;
use crate::line::{Line, LineProperties};

/// Tab stops start out every eight columns.
const DEFAULT_TAB_INTERVAL: usize = 8;

/// Host-provided sink for lines evicted off the top of the screen.
pub type LineSaver = Box<dyn FnMut(Line) + Send>;

/// Per-screen boolean modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenMode {
    /// IRM: printed characters shift the tail of the line right.
    Insert,
    /// LNM: line feed also returns the cursor to column 0.
    NewLine,
    /// DECAWM: printing past the last column wraps to the next line.
    Wrap,
    /// DECOM: cursor addressing is relative to the scroll region.
    Origin,
    /// DECSCNM: reverse video for the whole screen.
    Screen,
    /// DECTCEM: cursor visible.
    Cursor,
}

const MODE_COUNT: usize = 6;

fn default_modes() -> [bool; MODE_COUNT] {
    let mut modes = [false; MODE_COUNT];
    modes[ScreenMode::Wrap as usize] = true;
    modes[ScreenMode::Cursor as usize] = true;
    modes
}

fn default_tab_stops(columns: usize) -> Vec<bool> {
    let mut stops = vec![false; columns];
    for x in (0..columns).step_by(DEFAULT_TAB_INTERVAL) {
        stops[x] = true;
    }
    stops
}

/// Cursor state captured by DECSC and restored by DECRC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SavedCursor {
    pub x: usize,
    pub y: usize,
    pub rendition: Rendition,
    pub fg: Color,
    pub bg: Color,
}

/// One terminal screen: grid, cursor and scroll state.
pub struct Screen {
    lines: usize,
    columns: usize,
    grid: Vec<Line>,

    cu_x: usize,
    cu_y: usize,
    /// The cursor sits in the last column with a wrap owed to the next
    /// printable character.
    wrap_pending: bool,

    /// Inclusive scroll region bounds.
    top_margin: usize,
    bottom_margin: usize,

    tab_stops: Vec<bool>,

    rendition: Rendition,
    foreground: Color,
    background: Color,

    modes: [bool; MODE_COUNT],
    saved_modes: [bool; MODE_COUNT],
    saved_cursor: SavedCursor,

    line_saver: Option<LineSaver>,
}

impl Screen {
    pub fn new(lines: usize, columns: usize) -> Self {
        let lines = lines.max(1);
        let columns = columns.max(1);
        Self {
            lines,
            columns,
            grid: (0..lines).map(|_| Line::new(columns)).collect(),
            cu_x: 0,
            cu_y: 0,
            wrap_pending: false,
            top_margin: 0,
            bottom_margin: lines - 1,
            tab_stops: default_tab_stops(columns),
            rendition: Rendition::empty(),
            foreground: Color::Default,
            background: Color::Default,
            modes: default_modes(),
            saved_modes: default_modes(),
            saved_cursor: SavedCursor::default(),
            line_saver: None,
        }
    }

    /// Install or remove the sink receiving lines scrolled off the top.
    pub fn set_line_saver(&mut self, saver: Option<LineSaver>) {
        self.line_saver = saver;
    }

    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn cursor_x(&self) -> usize {
        self.cu_x
    }

    pub fn cursor_y(&self) -> usize {
        self.cu_y
    }

    pub fn top_margin(&self) -> usize {
        self.top_margin
    }

    pub fn bottom_margin(&self) -> usize {
        self.bottom_margin
    }

    pub fn line(&self, y: usize) -> &Line {
        &self.grid[y]
    }

    pub fn tab_stops(&self) -> &[bool] {
        &self.tab_stops
    }

    /// The cell every erase operation currently fills with.
    fn blank(&self) -> Cell {
        Cell::blank(self.rendition, self.foreground, self.background)
    }

    // --- character output -------------------------------------------------

    /// Place one (already charset-mapped) code point at the cursor.
    pub fn display_character(&mut self, c: char) {
        let width = match UnicodeWidthChar::width(c) {
            Some(0) => return, // combining marks are not composed
            Some(w) => w,
            None => 1,
        };

        if self.wrap_pending {
            self.wrap_pending = false;
            if self.get_mode(ScreenMode::Wrap) {
                self.grid[self.cu_y].properties.insert(LineProperties::WRAPPED);
                self.index();
                self.cu_x = 0;
            }
        }

        if self.get_mode(ScreenMode::Insert) {
            let blank = self.blank();
            let (y, x) = (self.cu_y, self.cu_x);
            self.grid[y].insert_cells(x, width, blank);
        }

        let cell = Cell {
            ch: c,
            rendition: self.rendition,
            fg: self.foreground,
            bg: self.background,
            flags: CellFlags::empty(),
        };
        let (y, x) = (self.cu_y, self.cu_x);
        *self.grid[y].cell_mut(x) = cell;
        if width == 2 && x + 1 < self.columns {
            self.grid[y].cell_mut(x + 1).set_continuation();
        }

        let next = x + width;
        if next >= self.columns {
            self.cu_x = self.columns - 1;
            if self.get_mode(ScreenMode::Wrap) {
                self.wrap_pending = true;
            }
        } else {
            self.cu_x = next;
        }
    }

    // --- cursor motion ----------------------------------------------------

    pub fn backspace(&mut self) {
        if self.cu_x > 0 {
            self.cu_x -= 1;
        }
        self.wrap_pending = false;
    }

    /// Advance to the next tab stop, `n` times, stopping at the last column.
    pub fn tab(&mut self, n: usize) {
        for _ in 0..n.max(1) {
            let mut x = self.cu_x + 1;
            while x < self.columns && !self.tab_stops[x] {
                x += 1;
            }
            self.cu_x = x.min(self.columns - 1);
        }
        self.wrap_pending = false;
    }

    /// Move back to the previous tab stop, `n` times, stopping at column 0.
    pub fn backtab(&mut self, n: usize) {
        for _ in 0..n.max(1) {
            let mut x = self.cu_x;
            while x > 0 {
                x -= 1;
                if self.tab_stops[x] {
                    break;
                }
            }
            self.cu_x = x;
        }
        self.wrap_pending = false;
    }

    /// Line feed. Scrolls when the cursor sits on the bottom margin. A
    /// pending wrap completes here, landing the cursor in column 0.
    pub fn new_line(&mut self) {
        if self.wrap_pending {
            self.cu_x = 0;
        }
        self.index();
        if self.get_mode(ScreenMode::NewLine) {
            self.cu_x = 0;
        }
    }

    /// NEL: line feed plus carriage return, regardless of NewLine mode.
    pub fn next_line(&mut self) {
        self.new_line();
        self.cu_x = 0;
    }

    /// IND: move down one line, scrolling at the bottom margin.
    pub fn index(&mut self) {
        if self.cu_y == self.bottom_margin {
            self.scroll_up(1);
        } else if self.cu_y + 1 < self.lines {
            self.cu_y += 1;
        }
        self.wrap_pending = false;
    }

    /// RI: move up one line, scrolling down at the top margin.
    pub fn reverse_index(&mut self) {
        if self.cu_y == self.top_margin {
            self.scroll_down(1);
        } else if self.cu_y > 0 {
            self.cu_y -= 1;
        }
        self.wrap_pending = false;
    }

    pub fn to_start_of_line(&mut self) {
        self.cu_x = 0;
        self.wrap_pending = false;
    }

    pub fn cursor_up(&mut self, n: usize) {
        let stop = if self.cu_y < self.top_margin {
            0
        } else {
            self.top_margin
        };
        self.cu_y = self.cu_y.saturating_sub(n.max(1)).max(stop);
        self.wrap_pending = false;
    }

    pub fn cursor_down(&mut self, n: usize) {
        let stop = if self.cu_y > self.bottom_margin {
            self.lines - 1
        } else {
            self.bottom_margin
        };
        self.cu_y = (self.cu_y + n.max(1)).min(stop);
        self.wrap_pending = false;
    }

    pub fn cursor_left(&mut self, n: usize) {
        self.cu_x = self.cu_x.saturating_sub(n.max(1));
        self.wrap_pending = false;
    }

    pub fn cursor_right(&mut self, n: usize) {
        self.cu_x = (self.cu_x + n.max(1)).min(self.columns - 1);
        self.wrap_pending = false;
    }

    /// CHA and friends: 1-based column from the wire, 0 treated as 1.
    pub fn set_cursor_x(&mut self, x: usize) {
        self.cu_x = (x.max(1) - 1).min(self.columns - 1);
        self.wrap_pending = false;
    }

    /// VPA: 1-based row from the wire, offset by the top margin in Origin
    /// mode.
    pub fn set_cursor_y(&mut self, y: usize) {
        let base = if self.get_mode(ScreenMode::Origin) {
            self.top_margin
        } else {
            0
        };
        self.cu_y = (y.max(1) - 1 + base).min(self.lines - 1);
        self.wrap_pending = false;
    }

    /// CUP/HVP: 1-based row and column.
    pub fn set_cursor_yx(&mut self, y: usize, x: usize) {
        self.set_cursor_y(y);
        self.set_cursor_x(x);
    }

    // --- editing ----------------------------------------------------------

    pub fn insert_chars(&mut self, n: usize) {
        let blank = self.blank();
        let (y, x) = (self.cu_y, self.cu_x);
        self.grid[y].insert_cells(x, n.max(1), blank);
    }

    pub fn delete_chars(&mut self, n: usize) {
        let blank = self.blank();
        let (y, x) = (self.cu_y, self.cu_x);
        self.grid[y].delete_cells(x, n.max(1), blank);
    }

    pub fn erase_chars(&mut self, n: usize) {
        let blank = self.blank();
        let (y, x) = (self.cu_y, self.cu_x);
        self.grid[y].erase_cells(x, n.max(1), blank);
    }

    /// IL: open `n` blank lines at the cursor, pushing the rest of the
    /// scroll region down.
    pub fn insert_lines(&mut self, n: usize) {
        if self.cu_y > self.bottom_margin {
            return;
        }
        self.move_lines_down(self.cu_y, n.max(1));
    }

    /// DL: remove `n` lines at the cursor, pulling the rest of the scroll
    /// region up.
    pub fn delete_lines(&mut self, n: usize) {
        if self.cu_y > self.bottom_margin {
            return;
        }
        self.move_lines_up(self.cu_y, n.max(1));
    }

    /// SU: scroll the region up. When the region starts at the top of the
    /// screen the evicted head line goes to the line-saver.
    pub fn scroll_up(&mut self, n: usize) {
        if self.top_margin == 0 {
            if let Some(saver) = self.line_saver.as_mut() {
                saver(self.grid[0].clone());
            }
        }
        self.move_lines_up(self.top_margin, n.max(1));
    }

    /// SD: scroll the region down.
    pub fn scroll_down(&mut self, n: usize) {
        self.move_lines_down(self.top_margin, n.max(1));
    }

    fn move_lines_up(&mut self, from: usize, n: usize) {
        if from > self.bottom_margin {
            return;
        }
        let n = n.min(self.bottom_margin - from + 1);
        let blank = self.blank();
        for _ in 0..n {
            self.grid.remove(from);
            self.grid
                .insert(self.bottom_margin, Line::filled(self.columns, blank));
        }
    }

    fn move_lines_down(&mut self, from: usize, n: usize) {
        if from > self.bottom_margin {
            return;
        }
        let n = n.min(self.bottom_margin - from + 1);
        let blank = self.blank();
        for _ in 0..n {
            self.grid.remove(self.bottom_margin);
            self.grid.insert(from, Line::filled(self.columns, blank));
        }
    }

    // --- erasing ----------------------------------------------------------

    pub fn clear_to_end_of_line(&mut self) {
        let blank = self.blank();
        let (y, x) = (self.cu_y, self.cu_x);
        self.grid[y].clear_from(x, blank);
    }

    pub fn clear_to_begin_of_line(&mut self) {
        let blank = self.blank();
        let (y, x) = (self.cu_y, self.cu_x);
        self.grid[y].clear_to(x, blank);
    }

    pub fn clear_entire_line(&mut self) {
        let blank = self.blank();
        let y = self.cu_y;
        self.grid[y].clear(blank);
    }

    pub fn clear_to_end_of_screen(&mut self) {
        let blank = self.blank();
        let (y, x) = (self.cu_y, self.cu_x);
        self.grid[y].clear_from(x, blank);
        for line in self.grid.iter_mut().skip(y + 1) {
            line.clear(blank);
        }
    }

    pub fn clear_to_begin_of_screen(&mut self) {
        let blank = self.blank();
        let (y, x) = (self.cu_y, self.cu_x);
        for line in self.grid.iter_mut().take(y) {
            line.clear(blank);
        }
        self.grid[y].clear_to(x, blank);
    }

    pub fn clear_entire_screen(&mut self) {
        let blank = self.blank();
        for line in &mut self.grid {
            line.clear(blank);
        }
    }

    // --- rendition and colors --------------------------------------------

    pub fn set_rendition(&mut self, r: Rendition) {
        self.rendition.insert(r);
    }

    pub fn reset_rendition(&mut self, r: Rendition) {
        self.rendition.remove(r);
    }

    pub fn set_default_rendition(&mut self) {
        self.rendition = Rendition::empty();
        self.foreground = Color::Default;
        self.background = Color::Default;
    }

    pub fn set_fore_color(&mut self, color: Color) {
        self.foreground = color;
    }

    pub fn set_back_color(&mut self, color: Color) {
        self.background = color;
    }

    pub fn rendition(&self) -> Rendition {
        self.rendition
    }

    pub fn foreground(&self) -> Color {
        self.foreground
    }

    pub fn background(&self) -> Color {
        self.background
    }

    // --- modes ------------------------------------------------------------

    pub fn set_mode(&mut self, m: ScreenMode) {
        self.modes[m as usize] = true;
        if m == ScreenMode::Origin {
            self.cu_x = 0;
            self.cu_y = self.top_margin;
            self.wrap_pending = false;
        }
    }

    pub fn reset_mode(&mut self, m: ScreenMode) {
        self.modes[m as usize] = false;
        if m == ScreenMode::Origin {
            self.cu_x = 0;
            self.cu_y = 0;
            self.wrap_pending = false;
        }
    }

    pub fn save_mode(&mut self, m: ScreenMode) {
        self.saved_modes[m as usize] = self.modes[m as usize];
    }

    pub fn restore_mode(&mut self, m: ScreenMode) {
        if self.saved_modes[m as usize] {
            self.set_mode(m);
        } else {
            self.reset_mode(m);
        }
    }

    pub fn get_mode(&self, m: ScreenMode) -> bool {
        self.modes[m as usize]
    }

    // --- saved cursor -----------------------------------------------------

    pub fn save_cursor(&mut self) {
        self.saved_cursor = SavedCursor {
            x: self.cu_x,
            y: self.cu_y,
            rendition: self.rendition,
            fg: self.foreground,
            bg: self.background,
        };
    }

    pub fn restore_cursor(&mut self) {
        self.cu_x = self.saved_cursor.x.min(self.columns - 1);
        self.cu_y = self.saved_cursor.y.min(self.lines - 1);
        self.rendition = self.saved_cursor.rendition;
        self.foreground = self.saved_cursor.fg;
        self.background = self.saved_cursor.bg;
        self.wrap_pending = false;
    }

    // --- margins, tab stops, line properties -------------------------------

    /// DECSTBM with 1-based margins; 0 means the default edge. Rejected
    /// unless top < bottom, matching VT100 behavior.
    pub fn set_margins(&mut self, top: usize, bottom: usize) {
        let t = top.max(1);
        let b = if bottom == 0 {
            self.lines
        } else {
            bottom.min(self.lines)
        };
        if t >= b {
            log::debug!("ignoring scroll region {}..{}", top, bottom);
            return;
        }
        self.top_margin = t - 1;
        self.bottom_margin = b - 1;
        self.cu_x = 0;
        self.cu_y = if self.get_mode(ScreenMode::Origin) {
            self.top_margin
        } else {
            0
        };
        self.wrap_pending = false;
    }

    pub fn set_default_margins(&mut self) {
        self.top_margin = 0;
        self.bottom_margin = self.lines - 1;
    }

    /// HTS / TBC 0: set or clear a tab stop at the cursor column.
    pub fn change_tab_stop(&mut self, set: bool) {
        if self.cu_x < self.tab_stops.len() {
            self.tab_stops[self.cu_x] = set;
        }
    }

    /// TBC 3: clear every tab stop.
    pub fn clear_tab_stops(&mut self) {
        self.tab_stops.fill(false);
    }

    /// DECDWL/DECDHL family: flip a property on the cursor line.
    pub fn set_line_property(&mut self, property: LineProperties, on: bool) {
        let y = self.cu_y;
        if on {
            self.grid[y].properties.insert(property);
        } else {
            self.grid[y].properties.remove(property);
        }
    }

    /// DECALN: fill the screen with `E`, reset margins, home the cursor.
    pub fn help_align(&mut self) {
        let mut cell = self.blank();
        cell.ch = 'E';
        for line in &mut self.grid {
            line.clear(cell);
        }
        self.set_default_margins();
        self.cu_x = 0;
        self.cu_y = 0;
        self.wrap_pending = false;
    }

    // --- geometry and lifecycle -------------------------------------------

    /// Reallocate the grid. Cells at coordinates present in both the old
    /// and new image are preserved; the cursor is clamped, margins reset to
    /// the full screen and tab stops regenerated for the new width. An
    /// equal-size resize is a no-op.
    pub fn resize_image(&mut self, new_lines: usize, new_columns: usize) {
        if new_lines == 0 || new_columns == 0 {
            return;
        }
        if new_lines == self.lines && new_columns == self.columns {
            return;
        }
        for line in &mut self.grid {
            line.resize(new_columns, Cell::default());
        }
        self.grid.resize(new_lines, Line::new(new_columns));
        self.lines = new_lines;
        self.columns = new_columns;
        self.tab_stops = default_tab_stops(new_columns);
        self.top_margin = 0;
        self.bottom_margin = new_lines - 1;
        self.cu_x = self.cu_x.min(new_columns - 1);
        self.cu_y = self.cu_y.min(new_lines - 1);
        self.wrap_pending = false;
    }

    /// RIS-level reset of everything but the geometry and the line-saver.
    pub fn reset(&mut self) {
        self.modes = default_modes();
        self.saved_modes = default_modes();
        self.rendition = Rendition::empty();
        self.foreground = Color::Default;
        self.background = Color::Default;
        self.saved_cursor = SavedCursor::default();
        self.set_default_margins();
        self.tab_stops = default_tab_stops(self.columns);
        for line in &mut self.grid {
            line.clear(Cell::default());
        }
        self.cu_x = 0;
        self.cu_y = 0;
        self.wrap_pending = false;
    }
}

impl fmt::Debug for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Screen")
            .field("lines", &self.lines)
            .field("columns", &self.columns)
            .field("cursor", &(self.cu_y, self.cu_x))
            .field("margins", &(self.top_margin, self.bottom_margin))
            .field("has_line_saver", &self.line_saver.is_some())
            .finish()
    }
}
