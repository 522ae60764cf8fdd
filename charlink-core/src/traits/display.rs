//! Display surface trait for the character LCD

use charlink_protocol::DisplayControl;

/// Errors reported by a display surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Row or column outside the visible area
    InvalidCoordinates,
    /// Argument outside the range the display accepts
    InvalidArgument,
    /// Display used before its init sequence ran
    NotInitialized,
}

/// Character display capability driven by the frame decoder
///
/// Rows and columns are 1-based, matching the wire format.
pub trait DisplaySurface {
    /// Clear all characters and home the cursor
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Move the cursor to row 1, column 1 without clearing
    fn home(&mut self) -> Result<(), DisplayError>;

    /// Move the cursor
    ///
    /// - `row`: Row number (1-2)
    /// - `column`: Column number (1-16)
    fn set_cursor(&mut self, row: u8, column: u8) -> Result<(), DisplayError>;

    /// Write one character at the cursor and advance it
    fn put_char(&mut self, ch: u8) -> Result<(), DisplayError>;

    /// Write a run of characters starting at the cursor
    fn put_string(&mut self, text: &[u8]) -> Result<(), DisplayError> {
        for &ch in text {
            self.put_char(ch)?;
        }
        Ok(())
    }

    /// Switch display, cursor and blink on or off
    fn set_control(&mut self, control: DisplayControl) -> Result<(), DisplayError>;
}

impl<D: DisplaySurface + ?Sized> DisplaySurface for &mut D {
    fn clear(&mut self) -> Result<(), DisplayError> {
        (**self).clear()
    }

    fn home(&mut self) -> Result<(), DisplayError> {
        (**self).home()
    }

    fn set_cursor(&mut self, row: u8, column: u8) -> Result<(), DisplayError> {
        (**self).set_cursor(row, column)
    }

    fn put_char(&mut self, ch: u8) -> Result<(), DisplayError> {
        (**self).put_char(ch)
    }

    fn put_string(&mut self, text: &[u8]) -> Result<(), DisplayError> {
        (**self).put_string(text)
    }

    fn set_control(&mut self, control: DisplayControl) -> Result<(), DisplayError> {
        (**self).set_control(control)
    }
}

/// Helpers built on top of [`DisplaySurface`]
pub trait DisplayExt: DisplaySurface {
    /// Replace the screen contents with a diagnostic message
    fn report_error(&mut self, message: &str) -> Result<(), DisplayError> {
        self.clear()?;
        self.put_string(message.as_bytes())
    }

    /// Write a line of text at the start of a row
    ///
    /// Text longer than the row is cut off.
    fn write_line(&mut self, row: u8, text: &[u8]) -> Result<(), DisplayError> {
        self.set_cursor(row, 1)?;
        let len = text.len().min(charlink_protocol::DISPLAY_COLS as usize);
        self.put_string(&text[..len])
    }
}

// Blanket implementation for all DisplaySurface types
impl<T: DisplaySurface + ?Sized> DisplayExt for T {}
