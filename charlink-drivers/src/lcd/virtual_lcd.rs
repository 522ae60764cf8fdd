//! In-memory character display
//!
//! Models the visible 2x16 DDRAM of the LCD so frames can be rendered and
//! inspected on a host. The cursor moves right after each character and
//! wraps to the start of the other row at the end of a line.

use charlink_core::{DisplayError, DisplaySurface};
use charlink_protocol::{DisplayControl, DISPLAY_COLS, DISPLAY_ROWS};

const ROWS: usize = DISPLAY_ROWS as usize;
const COLS: usize = DISPLAY_COLS as usize;

/// Virtual 2x16 character display
#[derive(Debug, Clone)]
pub struct VirtualLcd {
    cells: [[u8; COLS]; ROWS],
    /// Zero-based (row, column)
    cursor: (usize, usize),
    control: DisplayControl,
    writes: u32,
}

impl Default for VirtualLcd {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualLcd {
    /// Create a blank display, switched on with the cursor hidden
    pub fn new() -> Self {
        Self {
            cells: [[b' '; COLS]; ROWS],
            cursor: (0, 0),
            control: DisplayControl {
                display_on: true,
                cursor_on: false,
                blink_on: false,
            },
            writes: 0,
        }
    }

    /// Content of a row (1-based), if it is valid UTF-8
    pub fn row_text(&self, row: u8) -> Option<&str> {
        let cells = self.row_bytes(row)?;
        core::str::from_utf8(cells).ok()
    }

    /// Raw character codes of a row (1-based)
    pub fn row_bytes(&self, row: u8) -> Option<&[u8]> {
        let index = (row as usize).checked_sub(1)?;
        self.cells.get(index).map(|cells| &cells[..])
    }

    /// Cursor position as 1-based (row, column)
    pub fn cursor(&self) -> (u8, u8) {
        (self.cursor.0 as u8 + 1, self.cursor.1 as u8 + 1)
    }

    /// Current display control flags
    pub fn control(&self) -> DisplayControl {
        self.control
    }

    /// Characters written since creation
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl DisplaySurface for VirtualLcd {
    fn clear(&mut self) -> Result<(), DisplayError> {
        for row in &mut self.cells {
            row.fill(b' ');
        }
        self.cursor = (0, 0);
        Ok(())
    }

    fn home(&mut self) -> Result<(), DisplayError> {
        self.cursor = (0, 0);
        Ok(())
    }

    fn set_cursor(&mut self, row: u8, column: u8) -> Result<(), DisplayError> {
        if !(1..=DISPLAY_ROWS).contains(&row) || !(1..=DISPLAY_COLS).contains(&column) {
            return Err(DisplayError::InvalidCoordinates);
        }
        self.cursor = (row as usize - 1, column as usize - 1);
        Ok(())
    }

    fn put_char(&mut self, ch: u8) -> Result<(), DisplayError> {
        let (row, col) = self.cursor;
        self.cells[row][col] = ch;
        self.writes = self.writes.saturating_add(1);

        self.cursor = if col + 1 == COLS {
            ((row + 1) % ROWS, 0)
        } else {
            (row, col + 1)
        };
        Ok(())
    }

    fn set_control(&mut self, control: DisplayControl) -> Result<(), DisplayError> {
        self.control = control;
        Ok(())
    }
}
