//! Frame decoding
//!
//! Main-loop side of the controller: pulls one frame at a time out of the
//! receive fifo and renders it.

pub mod decoder;

pub use decoder::{DecodeError, DecodeOutcome, DecodeStats, FrameDecoder};
