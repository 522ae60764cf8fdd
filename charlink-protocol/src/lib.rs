//! Charlink display frame protocol
//!
//! This crate defines the frames a host writes to the display controller
//! over I2C. The protocol is write-only (host to display): there are no
//! response frames, checksums or escapes.
//!
//! # Frame Format
//!
//! ```text
//! ┌──────────┬────────────┬──────────────────────────┐
//! │ FRAME ID │ FRAME SIZE │ PAYLOAD                  │
//! │ 1B       │ 1B         │ FRAME SIZE - 2 bytes     │
//! └──────────┴────────────┴──────────────────────────┘
//! ```
//!
//! FRAME SIZE counts the whole frame, header included. Frame boundaries are
//! only implied by that length; the receiver does not resynchronize.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;

pub use frame::{Frame, FrameError, FrameId, HEADER_SIZE, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use messages::{DisplayControl, HostCommand, DISPLAY_COLS, DISPLAY_ROWS};
