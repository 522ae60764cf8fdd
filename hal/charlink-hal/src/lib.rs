//! Charlink Hardware Abstraction Layer
//!
//! This crate defines the hardware seams of the display controller so the
//! receive and decode logic can run against any chip (or a host mock).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  charlink-core / charlink-drivers       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  charlink-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  SSP slave    │       │  host mocks   │
//! │  peripheral   │       │  (tests)      │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital outputs (LCD lines, liveness LED)
//! - [`i2c::I2cSlavePort`] - I2C slave peripheral as seen from the bus interrupt

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;

// Re-export key traits at crate root for convenience
pub use gpio::OutputPin;
pub use i2c::{BusStatus, I2cSlaveConfig, I2cSlavePort, DEFAULT_SLAVE_ADDRESS};
