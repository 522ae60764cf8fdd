//! Bus receive path
//!
//! Runs in the bus interrupt: classify the peripheral status, acknowledge
//! the byte, push it into the fifo and keep track of frame boundaries.

pub mod classifier;
pub mod receive;

pub use classifier::{BusClassifier, BusEvent, TransactionState};
pub use receive::{BusError, PendingFrame, ReceiveHandler, ReceiveStats};
