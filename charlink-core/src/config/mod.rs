//! Configuration types
//!
//! Board-agnostic settings for the receive path, the decoder and the main
//! loop. Values are fixed at build time; the `serde` feature lets host
//! tools describe them in any serde format.

pub mod types;

pub use types::*;
