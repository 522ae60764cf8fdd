//! Board-agnostic core of the character display controller
//!
//! This crate contains all logic that does not depend on a specific chip:
//!
//! - Bounded byte fifo bridging the bus interrupt and the main loop
//! - Bus event classification from peripheral status snapshots
//! - Receive-side frame bookkeeping
//! - Frame decoding and dispatch to a display surface
//! - The controller tying both execution contexts together
//! - Configuration type definitions
//!
//! # Execution model
//!
//! ```text
//!  bus interrupt                         main loop
//!  ─────────────                         ─────────
//!  I2cSlavePort ─► BusClassifier         FrameDecoder ─► DisplaySurface
//!                      │                      ▲
//!                      ▼                      │
//!               ReceiveHandler ─► RingBuffer ─┘
//!                      └──► PendingFrame (completed frame count)
//! ```
//!
//! Shared state sits behind a critical-section mutex owned by
//! [`controller::Controller`]; display mutations run with interrupts masked.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// This must go first so the macros are visible to the other modules.
#[macro_use]
mod fmt;

pub mod buffer;
pub mod bus;
pub mod config;
pub mod controller;
pub mod decode;
pub mod traits;

pub use buffer::{FifoError, FillState, RingBuffer, FIFO_CAPACITY};
pub use bus::{BusClassifier, BusError, BusEvent, PendingFrame, ReceiveHandler, ReceiveStats};
pub use config::{ControllerConfig, DecoderConfig};
pub use controller::{Controller, Heartbeat};
pub use decode::{DecodeError, DecodeOutcome, DecodeStats, FrameDecoder};
pub use traits::{BufferedFrames, ByteSource, DisplayError, DisplayExt, DisplaySurface, FrameQueue};
