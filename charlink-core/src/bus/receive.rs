//! Bus interrupt receive handler
//!
//! Runs once per bus event. Data bytes go straight into the fifo; frame
//! boundaries are tracked on the side by [`PendingFrame`] from the size
//! byte of each frame, so the decoder knows how many whole frames wait in
//! the fifo without looking at it.

use charlink_hal::I2cSlavePort;

use super::classifier::{BusClassifier, BusEvent};
use crate::buffer::{FifoError, RingBuffer};

/// Receive-side frame bookkeeping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingFrame {
    /// Bytes received in the current frame so far
    pub received_byte_index: u8,
    /// Index of the last byte of the current frame (size byte minus one)
    pub declared_frame_size: u8,
    /// Frames fully received and not yet decoded
    pub completed_frame_count: u8,
}

impl PendingFrame {
    /// Create empty bookkeeping
    pub const fn new() -> Self {
        Self {
            received_byte_index: 0,
            declared_frame_size: 0,
            completed_frame_count: 0,
        }
    }

    /// Abandon the frame in progress
    ///
    /// Called at every address phase. Frames already completed stay
    /// queued for the decoder.
    pub fn start_transaction(&mut self) {
        self.received_byte_index = 0;
        self.declared_frame_size = 0;
    }

    /// Account for one received data byte
    ///
    /// Returns true when this byte completed a frame. The next byte is then
    /// read as the id of the following frame, so one transaction may carry
    /// several frames back to back.
    pub fn record_byte(&mut self, byte: u8) -> bool {
        if self.received_byte_index == 1 {
            self.declared_frame_size = byte.wrapping_sub(1);
        }

        let completed = self.received_byte_index != 0
            && self.received_byte_index == self.declared_frame_size;
        if completed {
            self.completed_frame_count = self.completed_frame_count.saturating_add(1);
            self.received_byte_index = 0;
            self.declared_frame_size = 0;
        } else {
            self.received_byte_index = self.received_byte_index.wrapping_add(1);
        }
        completed
    }

    /// Number of frames waiting for the decoder
    pub fn completed_frames(&self) -> u8 {
        self.completed_frame_count
    }

    /// Mark one completed frame as handled by the decoder
    pub fn consume_frame(&mut self) {
        self.completed_frame_count = self.completed_frame_count.saturating_sub(1);
    }
}

/// Receive path errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Write collision did not clear within the spin limit
    CollisionTimeout,
}

/// Receive path counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReceiveStats {
    /// Data bytes lost because the fifo was full
    pub dropped_bytes: u32,
    /// Frames whose last byte was received
    pub frames_completed: u32,
    /// Read events where the write collision never cleared
    pub collision_timeouts: u32,
}

/// Bus event handler, owned by the interrupt context
#[derive(Debug, Clone)]
pub struct ReceiveHandler {
    classifier: BusClassifier,
    collision_spin_limit: u32,
    stats: ReceiveStats,
}

impl ReceiveHandler {
    /// Create a handler
    ///
    /// `collision_spin_limit` bounds the number of polls while waiting for
    /// a write collision to clear on a read event.
    pub const fn new(collision_spin_limit: u32) -> Self {
        Self {
            classifier: BusClassifier::new(),
            collision_spin_limit,
            stats: ReceiveStats {
                dropped_bytes: 0,
                frames_completed: 0,
                collision_timeouts: 0,
            },
        }
    }

    /// Handle one bus event
    ///
    /// The clock is released exactly once per call, whatever the event
    /// and even when the collision wait times out.
    pub fn on_bus_event<P, const N: usize>(
        &mut self,
        port: &mut P,
        fifo: &mut RingBuffer<N>,
        pending: &mut PendingFrame,
    ) -> Result<BusEvent, BusError>
    where
        P: I2cSlavePort + ?Sized,
    {
        let event = self.classifier.classify(port.status());
        let result = self.dispatch(event, port, fifo, pending);
        port.release_clock();
        result.map(|()| event)
    }

    fn dispatch<P, const N: usize>(
        &mut self,
        event: BusEvent,
        port: &mut P,
        fifo: &mut RingBuffer<N>,
        pending: &mut PendingFrame,
    ) -> Result<(), BusError>
    where
        P: I2cSlavePort + ?Sized,
    {
        if event.clears_overflow() {
            port.clear_overflow();
        }

        match event {
            BusEvent::AddressWrite | BusEvent::AddressRead => {
                // Address byte must be read to release the buffer
                let _ = port.read_buffer();
                pending.start_transaction();
            }
            BusEvent::DataWrite => {
                let byte = port.read_buffer();
                if let Err(FifoError::Full) = fifo.put(byte) {
                    self.stats.dropped_bytes = self.stats.dropped_bytes.saturating_add(1);
                    warn!("fifo full, dropped byte {=u8:#x}", byte);
                }

                if pending.record_byte(byte) {
                    self.stats.frames_completed = self.stats.frames_completed.saturating_add(1);
                    trace!("frame complete, {=u8} pending", pending.completed_frames());
                }
            }
            BusEvent::DataRead => {
                // Nothing to send back; just keep the peripheral happy
                port.clear_write_collision();
                self.wait_collision_clear(port)?;
            }
            BusEvent::Idle => {}
        }

        Ok(())
    }

    fn wait_collision_clear<P>(&mut self, port: &mut P) -> Result<(), BusError>
    where
        P: I2cSlavePort + ?Sized,
    {
        for _ in 0..self.collision_spin_limit {
            if !port.write_collision() {
                return Ok(());
            }
        }

        self.stats.collision_timeouts = self.stats.collision_timeouts.saturating_add(1);
        error!("write collision did not clear");
        Err(BusError::CollisionTimeout)
    }

    /// Counters since creation
    pub fn stats(&self) -> ReceiveStats {
        self.stats
    }
}
