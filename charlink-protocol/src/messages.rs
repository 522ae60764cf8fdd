//! Commands a host can send to the display controller
//!
//! Every command maps to exactly one frame. The controller never answers,
//! so there is no decoding counterpart for responses here.

use crate::frame::{Frame, FrameError, FrameId, MAX_PAYLOAD_SIZE};

/// Display dimensions (2x16 character LCD)
pub const DISPLAY_ROWS: u8 = 2;
pub const DISPLAY_COLS: u8 = 16;

/// Display on/off control flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayControl {
    /// Display output enabled
    pub display_on: bool,
    /// Underline cursor visible
    pub cursor_on: bool,
    /// Cursor cell blinks
    pub blink_on: bool,
}

impl DisplayControl {
    /// Parse the three payload bytes of a ControlDisplay frame
    ///
    /// Each byte must be 0 or 1.
    pub fn from_bytes(display: u8, cursor: u8, blink: u8) -> Option<Self> {
        Some(Self {
            display_on: flag(display)?,
            cursor_on: flag(cursor)?,
            blink_on: flag(blink)?,
        })
    }

    /// Payload bytes for a ControlDisplay frame
    pub fn to_bytes(self) -> [u8; 3] {
        [
            self.display_on as u8,
            self.cursor_on as u8,
            self.blink_on as u8,
        ]
    }
}

fn flag(byte: u8) -> Option<bool> {
    match byte {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}

/// Commands from the host to the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostCommand<'a> {
    /// Clear the display
    ClearDisplay,
    /// Return the cursor home
    ReturnHome,
    /// Move the cursor (row 1-2, column 1-16)
    SetCursor { row: u8, column: u8 },
    /// Write a single character
    PutChar(u8),
    /// Write a run of characters
    PutString(&'a [u8]),
    /// Set display, cursor and blink flags
    ControlDisplay(DisplayControl),
}

impl<'a> HostCommand<'a> {
    /// Frame id this command is carried in
    pub fn frame_id(&self) -> FrameId {
        match self {
            HostCommand::ClearDisplay => FrameId::ClearDisplay,
            HostCommand::ReturnHome => FrameId::ReturnHome,
            HostCommand::SetCursor { .. } => FrameId::SetCursor,
            HostCommand::PutChar(_) => FrameId::PutChar,
            HostCommand::PutString(_) => FrameId::PutString,
            HostCommand::ControlDisplay(_) => FrameId::ControlDisplay,
        }
    }

    /// Encode this command into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        let id = self.frame_id();
        match self {
            HostCommand::ClearDisplay | HostCommand::ReturnHome => Frame::new(id, &[]),
            HostCommand::SetCursor { row, column } => Frame::new(id, &[*row, *column]),
            HostCommand::PutChar(ch) => Frame::new(id, &[*ch]),
            HostCommand::PutString(text) => {
                if text.len() > MAX_PAYLOAD_SIZE {
                    return Err(FrameError::PayloadTooLarge);
                }
                Frame::new(id, text)
            }
            HostCommand::ControlDisplay(control) => Frame::new(id, &control.to_bytes()),
        }
    }
}
