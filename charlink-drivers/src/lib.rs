//! Display driver implementations
//!
//! This crate provides concrete implementations of the
//! [`DisplaySurface`](charlink_core::DisplaySurface) trait defined in
//! charlink-core:
//!
//! - HD44780-compatible 2x16 character LCD on a 4-bit parallel bus
//! - In-memory virtual LCD for host simulation and tests

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod lcd;

pub use lcd::{Hd44780, LcdPins, VirtualLcd};
