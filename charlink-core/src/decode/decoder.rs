//! Frame decoder state machine
//!
//! ```text
//!   next_byte ──► FRAME ID ──► next_byte ──► FRAME SIZE
//!                                                │
//!                      size matches command? ────┤
//!                        │ no                    │ yes
//!                        ▼                       ▼
//!                 MalformedFrame         read payload bytes
//!                (2 bytes consumed)              │
//!                                                ▼
//!                                 display call, interrupts masked
//! ```
//!
//! A fifo underrun at any step aborts the frame; the bytes already taken
//! are gone, so the next frame may start mid-stream.

use charlink_protocol::{DisplayControl, FrameId, HEADER_SIZE};

use crate::buffer::FifoError;
use crate::config::DecoderConfig;
use crate::traits::{ByteSource, DisplayError, DisplayExt, DisplaySurface, FrameQueue};

/// Errors that abort the decoding of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Fifo ran out of bytes before the frame was complete
    BufferEmpty,
    /// Declared size does not fit the command
    MalformedFrame { frame_id: FrameId, frame_size: u8 },
    /// Payload value outside the range the command allows
    InvalidValue { frame_id: FrameId },
    /// Display rejected the command
    Display(DisplayError),
}

impl From<DisplayError> for DecodeError {
    fn from(err: DisplayError) -> Self {
        DecodeError::Display(err)
    }
}

impl From<FifoError> for DecodeError {
    fn from(_: FifoError) -> Self {
        DecodeError::BufferEmpty
    }
}

impl DecodeError {
    /// Diagnostic text shown on the display
    pub fn message(&self) -> &'static str {
        match self {
            DecodeError::BufferEmpty => "ERROR EMPTY BUF",
            _ => "ERROR VALUE",
        }
    }

    /// Check whether this error is rendered on the display
    ///
    /// Only fifo underruns are; the rest are returned and logged.
    pub fn is_reported(&self) -> bool {
        matches!(self, DecodeError::BufferEmpty)
    }
}

/// Result of one successful decode cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeOutcome {
    /// Command rendered
    Executed(FrameId),
    /// Unknown frame id, dropped after its header
    Ignored { frame_id: u8 },
}

/// Decoder counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecodeStats {
    /// Frames rendered
    pub decoded: u32,
    /// Frames with an unknown id
    pub ignored: u32,
    /// Frames aborted by an error
    pub failed: u32,
}

/// Frame decoder
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    config: DecoderConfig,
    stats: DecodeStats,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new(DecoderConfig::DEFAULT)
    }
}

impl FrameDecoder {
    /// Create a decoder
    pub const fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            stats: DecodeStats {
                decoded: 0,
                ignored: 0,
                failed: 0,
            },
        }
    }

    /// Decode one frame if a complete one is waiting
    ///
    /// Returns `None` without touching the fifo when no frame is complete.
    /// Otherwise the frame is counted as handled whatever the outcome.
    pub fn service<Q, D>(
        &mut self,
        queue: &mut Q,
        display: &mut D,
    ) -> Option<Result<DecodeOutcome, DecodeError>>
    where
        Q: FrameQueue + ?Sized,
        D: DisplaySurface + ?Sized,
    {
        if queue.completed_frames() == 0 {
            return None;
        }

        let result = self.decode(queue, display);
        queue.consume_frame();
        Some(result)
    }

    /// Decode exactly one frame from `source`
    pub fn decode<S, D>(
        &mut self,
        source: &mut S,
        display: &mut D,
    ) -> Result<DecodeOutcome, DecodeError>
    where
        S: ByteSource + ?Sized,
        D: DisplaySurface + ?Sized,
    {
        let result = self.decode_frame(source, display);

        match result {
            Ok(DecodeOutcome::Executed(id)) => {
                self.stats.decoded = self.stats.decoded.saturating_add(1);
                debug!("frame {} executed", id);
            }
            Ok(DecodeOutcome::Ignored { frame_id }) => {
                self.stats.ignored = self.stats.ignored.saturating_add(1);
                debug!("unknown frame id {=u8:#x} ignored", frame_id);
            }
            Err(err) => {
                self.stats.failed = self.stats.failed.saturating_add(1);
                warn!("frame decode failed: {}", err);

                if self.config.report_errors && err.is_reported() {
                    // The diagnostic replaces whatever was on screen; a
                    // failure to show it has nowhere else to go.
                    let _ = critical_section::with(|_| display.report_error(err.message()));
                }
            }
        }

        result
    }

    fn decode_frame<S, D>(
        &self,
        source: &mut S,
        display: &mut D,
    ) -> Result<DecodeOutcome, DecodeError>
    where
        S: ByteSource + ?Sized,
        D: DisplaySurface + ?Sized,
    {
        let id_byte = source.next_byte()?;
        let frame_size = source.next_byte()?;

        let Some(frame_id) = FrameId::from_byte(id_byte) else {
            return Ok(DecodeOutcome::Ignored { frame_id: id_byte });
        };

        if !frame_id.accepts_size(frame_size) {
            return Err(DecodeError::MalformedFrame {
                frame_id,
                frame_size,
            });
        }

        match frame_id {
            FrameId::ClearDisplay => masked(|| display.clear())?,
            FrameId::ReturnHome => masked(|| display.home())?,
            FrameId::SetCursor => {
                let row = source.next_byte()?;
                let column = source.next_byte()?;
                masked(|| display.set_cursor(row, column))?;
            }
            FrameId::PutChar => {
                let ch = source.next_byte()?;
                masked(|| display.put_char(ch))?;
            }
            FrameId::PutString => {
                // Characters go out one at a time as they leave the fifo
                for _ in HEADER_SIZE..frame_size as usize {
                    let ch = source.next_byte()?;
                    masked(|| display.put_char(ch))?;
                }
            }
            FrameId::ControlDisplay => {
                let display_on = source.next_byte()?;
                let cursor_on = source.next_byte()?;
                let mut blink_on = source.next_byte()?;
                if self.config.mirror_cursor_to_blink {
                    blink_on = cursor_on;
                }

                let control = DisplayControl::from_bytes(display_on, cursor_on, blink_on)
                    .ok_or(DecodeError::InvalidValue { frame_id })?;
                masked(|| display.set_control(control))?;
            }
        }

        Ok(DecodeOutcome::Executed(frame_id))
    }

    /// Decoder settings
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Counters since creation
    pub fn stats(&self) -> DecodeStats {
        self.stats
    }
}

/// Run a display mutation with interrupts masked
fn masked<F>(f: F) -> Result<(), DisplayError>
where
    F: FnOnce() -> Result<(), DisplayError>,
{
    critical_section::with(|_| f())
}
