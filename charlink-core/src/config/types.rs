//! Configuration type definitions

use charlink_hal::{I2cSlaveConfig, DEFAULT_SLAVE_ADDRESS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default bound on write-collision polls per read event
pub const DEFAULT_COLLISION_SPIN_LIMIT: u32 = 10_000;

/// Default main-loop iterations between heartbeat toggles
pub const DEFAULT_HEARTBEAT_PERIOD: u32 = 65_000;

/// Frame decoder behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecoderConfig {
    /// Take the blink flag from the cursor byte of ControlDisplay frames
    ///
    /// Early controller firmware did this; enable it when a host relies on
    /// blink following the cursor.
    pub mirror_cursor_to_blink: bool,
    /// Render decode errors on the display
    pub report_errors: bool,
}

impl DecoderConfig {
    /// Default decoder settings
    pub const DEFAULT: Self = Self {
        mirror_cursor_to_blink: false,
        report_errors: true,
    };
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControllerConfig {
    /// 7-bit bus address
    pub slave_address: u8,
    /// Maximum write-collision polls before giving up on a read event
    pub collision_spin_limit: u32,
    /// Main-loop iterations between heartbeat toggles
    pub heartbeat_period: u32,
    /// Frame decoder settings
    pub decoder: DecoderConfig,
}

impl ControllerConfig {
    /// Default controller settings
    pub const DEFAULT: Self = Self {
        slave_address: DEFAULT_SLAVE_ADDRESS,
        collision_spin_limit: DEFAULT_COLLISION_SPIN_LIMIT,
        heartbeat_period: DEFAULT_HEARTBEAT_PERIOD,
        decoder: DecoderConfig::DEFAULT,
    };

    /// Slave peripheral settings for this configuration
    pub fn slave_config(&self) -> I2cSlaveConfig {
        I2cSlaveConfig {
            address: self.slave_address,
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
