//! Seams between the core logic and its collaborators
//!
//! The decoder reads bytes through [`ByteSource`]/[`FrameQueue`] and
//! renders through [`DisplaySurface`]; drivers and tests plug in there.

pub mod display;
pub mod source;

pub use display::{DisplayError, DisplayExt, DisplaySurface};
pub use source::{BufferedFrames, ByteSource, FrameQueue};
