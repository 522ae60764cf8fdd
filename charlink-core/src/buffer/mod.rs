//! Receive buffering
//!
//! A fixed-capacity byte fifo written by the bus interrupt and drained by
//! the main loop.

pub mod ring;

pub use ring::{FifoError, FillState, RingBuffer, FIFO_CAPACITY};
