//! Frame identifiers and byte-level encoding.
//!
//! Frame format:
//! - FRAME ID (1 byte): command selector (see [`FrameId`])
//! - FRAME SIZE (1 byte): total frame length, header included
//! - PAYLOAD (FRAME SIZE - 2 bytes): command-specific data

use heapless::Vec;

/// Number of header bytes (id + size)
pub const HEADER_SIZE: usize = 2;

/// Largest frame the controller can buffer whole (receive fifo capacity)
pub const MAX_FRAME_SIZE: usize = 64;

/// Largest payload that still fits a buffered frame
pub const MAX_PAYLOAD_SIZE: usize = MAX_FRAME_SIZE - HEADER_SIZE;

/// Errors that can occur while building or sizing frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Buffer too small for encoding
    BufferTooSmall,
    /// Payload length does not match the command's fixed size
    InvalidSize,
}

/// Command selector carried in the first frame byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameId {
    /// Clear the display and home the cursor
    ClearDisplay,
    /// Move the cursor to the top-left position
    ReturnHome,
    /// Move the cursor to (row, column)
    SetCursor,
    /// Write one character at the cursor
    PutChar,
    /// Write a run of characters at the cursor
    PutString,
    /// Switch display, cursor and blink on or off
    ControlDisplay,
}

// Wire format values
const ID_CLEAR_DISPLAY: u8 = 0x01;
const ID_RETURN_HOME: u8 = 0x02;
const ID_SET_CURSOR: u8 = 0x03;
const ID_PUT_CHAR: u8 = 0x04;
const ID_PUT_STRING: u8 = 0x05;
const ID_CONTROL_DISPLAY: u8 = 0x06;

/// Fixed frame sizes (header included)
pub const CLEAR_FRAME_SIZE: u8 = 2;
pub const HOME_FRAME_SIZE: u8 = 2;
pub const CURSOR_FRAME_SIZE: u8 = 4;
pub const CHAR_FRAME_SIZE: u8 = 3;
pub const CONTROL_FRAME_SIZE: u8 = 5;

impl FrameId {
    /// Parse a frame id from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            ID_CLEAR_DISPLAY => Some(FrameId::ClearDisplay),
            ID_RETURN_HOME => Some(FrameId::ReturnHome),
            ID_SET_CURSOR => Some(FrameId::SetCursor),
            ID_PUT_CHAR => Some(FrameId::PutChar),
            ID_PUT_STRING => Some(FrameId::PutString),
            ID_CONTROL_DISPLAY => Some(FrameId::ControlDisplay),
            _ => None,
        }
    }

    /// Convert to wire byte
    pub fn to_byte(self) -> u8 {
        match self {
            FrameId::ClearDisplay => ID_CLEAR_DISPLAY,
            FrameId::ReturnHome => ID_RETURN_HOME,
            FrameId::SetCursor => ID_SET_CURSOR,
            FrameId::PutChar => ID_PUT_CHAR,
            FrameId::PutString => ID_PUT_STRING,
            FrameId::ControlDisplay => ID_CONTROL_DISPLAY,
        }
    }

    /// Frame size this command requires, or `None` for variable length
    pub fn fixed_size(self) -> Option<u8> {
        match self {
            FrameId::ClearDisplay => Some(CLEAR_FRAME_SIZE),
            FrameId::ReturnHome => Some(HOME_FRAME_SIZE),
            FrameId::SetCursor => Some(CURSOR_FRAME_SIZE),
            FrameId::PutChar => Some(CHAR_FRAME_SIZE),
            FrameId::PutString => None,
            FrameId::ControlDisplay => Some(CONTROL_FRAME_SIZE),
        }
    }

    /// Check a declared frame size against this command
    ///
    /// Variable-length frames only need room for the header.
    pub fn accepts_size(self, frame_size: u8) -> bool {
        match self.fixed_size() {
            Some(size) => size == frame_size,
            None => frame_size as usize >= HEADER_SIZE,
        }
    }
}

/// A frame ready to be written on the bus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Command selector
    pub id: FrameId,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a frame, checking the payload against the command's size
    pub fn new(id: FrameId, payload: &[u8]) -> Result<Self, FrameError> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(FrameError::PayloadTooLarge);
        }

        let size = (payload.len() + HEADER_SIZE) as u8;
        if !id.accepts_size(size) {
            return Err(FrameError::InvalidSize);
        }

        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            id,
            payload: payload_vec,
        })
    }

    /// Value of the FRAME SIZE byte
    pub fn size(&self) -> u8 {
        (self.payload.len() + HEADER_SIZE) as u8
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.size() as usize;
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        buffer[0] = self.id.to_byte();
        buffer[1] = self.size();
        buffer[HEADER_SIZE..frame_len].copy_from_slice(&self.payload);

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(vec)
    }
}
