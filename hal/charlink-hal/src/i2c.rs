//! I2C slave peripheral abstractions
//!
//! The controller is a write-only I2C slave: the host addresses it and
//! streams frame bytes. Each bus event raises the SSP interrupt, and the
//! handler inspects a [`BusStatus`] snapshot to decide what happened.
//!
//! Register-level reads stay behind [`I2cSlavePort`]; the snapshot is a
//! plain value so classification can be tested without hardware.

/// Buffer full: the receive buffer holds an unread byte
pub const STATUS_BF: u8 = 1 << 0;
/// Read/write: set when the current transaction is a master read
pub const STATUS_R_W: u8 = 1 << 2;
/// Start: a start (or repeated start) condition was seen last
pub const STATUS_S: u8 = 1 << 3;
/// Data/address: set when the last byte was data, clear for address
pub const STATUS_D_A: u8 = 1 << 5;

/// Bits of the status register that take part in event classification
pub const STATUS_MASK: u8 = STATUS_BF | STATUS_R_W | STATUS_S | STATUS_D_A;

/// Snapshot of the slave peripheral status taken at one bus event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusStatus {
    /// Start condition seen
    pub start: bool,
    /// Last byte was a data byte (false: address byte)
    pub data: bool,
    /// Master read transaction (false: master write)
    pub read: bool,
    /// Receive buffer holds an unread byte
    pub buffer_full: bool,
    /// Slave logic was reset by a NACK from the master
    pub nack: bool,
}

impl BusStatus {
    /// Decode a raw SSP status register value
    ///
    /// Only the bits in [`STATUS_MASK`] are considered. NACK resets are
    /// signalled outside this register, see [`BusStatus::with_nack`].
    pub const fn from_sspstat(raw: u8) -> Self {
        Self {
            start: raw & STATUS_S != 0,
            data: raw & STATUS_D_A != 0,
            read: raw & STATUS_R_W != 0,
            buffer_full: raw & STATUS_BF != 0,
            nack: false,
        }
    }

    /// Encode back into the masked register layout
    pub const fn to_sspstat(self) -> u8 {
        let mut raw = 0;
        if self.start {
            raw |= STATUS_S;
        }
        if self.data {
            raw |= STATUS_D_A;
        }
        if self.read {
            raw |= STATUS_R_W;
        }
        if self.buffer_full {
            raw |= STATUS_BF;
        }
        raw
    }

    /// Mark this snapshot as a NACK-induced slave reset
    pub const fn with_nack(mut self) -> Self {
        self.nack = true;
        self
    }

    /// Master write, address byte received
    pub const ADDRESS_WRITE: Self = Self::from_sspstat(0x09);
    /// Master write, data byte received
    pub const DATA_WRITE: Self = Self::from_sspstat(0x29);
    /// Master read, address byte received
    pub const ADDRESS_READ: Self = Self::from_sspstat(0x0C);
    /// Master read, previous data byte was clocked out
    pub const DATA_READ: Self = Self::from_sspstat(0x2C);
}

/// I2C slave peripheral, as driven from the bus interrupt
///
/// Every method maps to one register access on the SSP module. None of
/// them block; waiting on a flag is the caller's business so it can bound
/// the wait.
pub trait I2cSlavePort {
    /// Take a snapshot of the status register
    fn status(&mut self) -> BusStatus;

    /// Read the receive buffer
    ///
    /// This also clears the buffer-full flag; the bus stalls until the
    /// buffer has been read after an address or data byte.
    fn read_buffer(&mut self) -> u8;

    /// Clear a receive overflow condition
    fn clear_overflow(&mut self);

    /// Clear a write-collision condition
    fn clear_write_collision(&mut self);

    /// Check whether a write collision is still flagged
    fn write_collision(&mut self) -> bool;

    /// Release the clock line held low by the slave
    fn release_clock(&mut self);
}

/// I2C slave configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cSlaveConfig {
    /// 7-bit slave address
    pub address: u8,
}

impl Default for I2cSlaveConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_SLAVE_ADDRESS,
        }
    }
}

/// Address the display controller answers to
pub const DEFAULT_SLAVE_ADDRESS: u8 = 0x76;

impl I2cSlaveConfig {
    /// Value for the address register (7-bit address in bits 7:1)
    pub const fn address_register(&self) -> u8 {
        (self.address & 0x7F) << 1
    }

    /// Address byte the master sends for a read from this slave
    pub const fn read_address_byte(&self) -> u8 {
        self.address_register() | 1
    }
}
