//! Bus event classification
//!
//! Maps one [`BusStatus`] snapshot to a logical [`BusEvent`]. The only
//! history kept between events is whether the current write transaction
//! has been addressed to us, so a stray data byte cannot be mistaken for
//! the start of a frame.
//!
//! Valid status patterns (start, data, read, buffer full):
//!
//! | Event        | S | D_A | R_W | BF |
//! |--------------|---|-----|-----|----|
//! | AddressWrite | 1 | 0   | 0   | 1  |
//! | DataWrite    | 1 | 1   | 0   | 1  |
//! | AddressRead  | 1 | 0   | 1   | 0  |
//! | DataRead     | 1 | 1   | 1   | 0  |
//!
//! Anything else, including a NACK reset, is [`BusEvent::Idle`].

use charlink_hal::BusStatus;

/// Logical bus event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusEvent {
    /// Master write, our address byte was received
    AddressWrite,
    /// Master write, a data byte was received
    DataWrite,
    /// Master read, our address byte was received
    AddressRead,
    /// Master read, the master wants another byte
    DataRead,
    /// Nothing for the receive path to do
    Idle,
}

impl BusEvent {
    /// Event clears a receive overflow before the buffer is read
    pub fn clears_overflow(&self) -> bool {
        matches!(self, BusEvent::AddressWrite | BusEvent::DataWrite)
    }
}

/// Progress of the current inbound transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransactionState {
    /// No write transaction addressed to us yet
    #[default]
    AwaitingAddress,
    /// Address byte consumed, no data yet
    InAddressPhase,
    /// Receiving data bytes
    InDataPhase,
}

/// Stateful bus event classifier
#[derive(Debug, Clone, Default)]
pub struct BusClassifier {
    state: TransactionState,
}

impl BusClassifier {
    /// Create a classifier waiting for an address
    pub const fn new() -> Self {
        Self {
            state: TransactionState::AwaitingAddress,
        }
    }

    /// Classify one status snapshot
    pub fn classify(&mut self, status: BusStatus) -> BusEvent {
        if status.nack {
            self.state = TransactionState::AwaitingAddress;
            return BusEvent::Idle;
        }

        if !status.start {
            return BusEvent::Idle;
        }

        match (status.read, status.data, status.buffer_full) {
            (false, false, true) => {
                self.state = TransactionState::InAddressPhase;
                BusEvent::AddressWrite
            }
            (false, true, true) if self.address_consumed() => {
                self.state = TransactionState::InDataPhase;
                BusEvent::DataWrite
            }
            (true, false, false) => {
                // A read transaction does not authorize later data writes
                self.state = TransactionState::AwaitingAddress;
                BusEvent::AddressRead
            }
            (true, true, false) => BusEvent::DataRead,
            _ => BusEvent::Idle,
        }
    }

    /// Check whether the current write transaction was addressed to us
    pub fn address_consumed(&self) -> bool {
        self.state != TransactionState::AwaitingAddress
    }

    /// Current transaction state
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Forget the current transaction
    pub fn reset(&mut self) {
        self.state = TransactionState::AwaitingAddress;
    }
}
