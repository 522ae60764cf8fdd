//! Single-producer/single-consumer byte ring buffer
//!
//! Read and write positions alone cannot tell an empty buffer from a full
//! one once they wrap onto each other, so the buffer keeps an explicit
//! three-valued [`FillState`].
//!
//! ```text
//!            ┌───┬───┬───┬───┬───┬───┐
//!   slots    │   │ a │ b │ c │   │   │
//!            └───┴───┴───┴───┴───┴───┘
//!                  ▲           ▲
//!                 read       write
//! ```
//!
//! The buffer itself is not synchronized. The bus interrupt is the only
//! writer and the main loop the only reader; callers share it through the
//! controller's critical-section mutex.

/// Capacity of the receive fifo in bytes
pub const FIFO_CAPACITY: usize = 64;

/// Occupancy of the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FillState {
    /// No unread bytes
    Empty,
    /// Between one and `N - 1` unread bytes
    NotEmpty,
    /// Exactly `N` unread bytes
    Full,
}

/// Errors reported by the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FifoError {
    /// No free slot, the byte was not stored
    Full,
    /// Nothing to read
    Empty,
}

/// Fixed-capacity byte fifo
#[derive(Debug, Clone)]
pub struct RingBuffer<const N: usize = FIFO_CAPACITY> {
    slots: [u8; N],
    read: usize,
    write: usize,
    state: FillState,
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RingBuffer<N> {
    /// Rejects a zero-capacity buffer at compile time
    const NON_EMPTY: () = assert!(N > 0, "ring buffer needs at least one slot");

    /// Create an empty buffer
    pub const fn new() -> Self {
        let () = Self::NON_EMPTY;
        Self {
            slots: [0; N],
            read: 0,
            write: 0,
            state: FillState::Empty,
        }
    }

    /// Store a byte at the write position
    ///
    /// Never overwrites: a full buffer rejects the byte.
    pub fn put(&mut self, byte: u8) -> Result<(), FifoError> {
        if self.state == FillState::Full {
            return Err(FifoError::Full);
        }

        self.slots[self.write] = byte;
        self.write = Self::advance(self.write);

        self.state = if self.write == self.read {
            FillState::Full
        } else {
            FillState::NotEmpty
        };
        Ok(())
    }

    /// Take the byte at the read position
    pub fn get(&mut self) -> Result<u8, FifoError> {
        if self.state == FillState::Empty {
            return Err(FifoError::Empty);
        }

        let byte = self.slots[self.read];
        self.read = Self::advance(self.read);

        // Positions only meet again here when the last unread byte was taken
        self.state = if self.read == self.write {
            FillState::Empty
        } else {
            FillState::NotEmpty
        };
        Ok(byte)
    }

    /// Current occupancy
    pub fn state(&self) -> FillState {
        self.state
    }

    /// Number of unread bytes
    pub fn len(&self) -> usize {
        match self.state {
            FillState::Empty => 0,
            FillState::Full => N,
            FillState::NotEmpty if self.write > self.read => self.write - self.read,
            FillState::NotEmpty => N - self.read + self.write,
        }
    }

    /// Check if there is nothing to read
    pub fn is_empty(&self) -> bool {
        self.state == FillState::Empty
    }

    /// Check if no byte can be stored
    pub fn is_full(&self) -> bool {
        self.state == FillState::Full
    }

    /// Total number of slots
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Drop all unread bytes
    pub fn clear(&mut self) {
        self.read = 0;
        self.write = 0;
        self.state = FillState::Empty;
    }

    fn advance(position: usize) -> usize {
        if position + 1 == N {
            0
        } else {
            position + 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    #[test]
    fn test_new_buffer_is_empty() {
        let mut fifo: RingBuffer = RingBuffer::new();
        assert_eq!(fifo.state(), FillState::Empty);
        assert_eq!(fifo.capacity(), FIFO_CAPACITY);
        assert_eq!(fifo.get(), Err(FifoError::Empty));
    }

    #[test]
    fn test_single_byte() {
        let mut fifo: RingBuffer<4> = RingBuffer::new();
        fifo.put(0x42).unwrap();
        assert_eq!(fifo.state(), FillState::NotEmpty);
        assert_eq!(fifo.len(), 1);
        assert_eq!(fifo.get(), Ok(0x42));
        assert_eq!(fifo.state(), FillState::Empty);
    }

    #[test]
    fn test_capacity_then_full() {
        let mut fifo: RingBuffer = RingBuffer::new();
        for i in 0..FIFO_CAPACITY {
            assert_eq!(fifo.put(i as u8), Ok(()));
        }
        assert_eq!(fifo.state(), FillState::Full);
        assert_eq!(fifo.len(), FIFO_CAPACITY);
        assert_eq!(fifo.put(0xFF), Err(FifoError::Full));

        for i in 0..FIFO_CAPACITY {
            assert_eq!(fifo.get(), Ok(i as u8));
        }
        assert_eq!(fifo.state(), FillState::Empty);
        assert_eq!(fifo.get(), Err(FifoError::Empty));
    }

    #[test]
    fn test_full_buffer_drains_one_at_a_time() {
        let mut fifo: RingBuffer<3> = RingBuffer::new();
        fifo.put(1).unwrap();
        fifo.put(2).unwrap();
        fifo.put(3).unwrap();

        assert_eq!(fifo.get(), Ok(1));
        assert_eq!(fifo.state(), FillState::NotEmpty);
        assert_eq!(fifo.len(), 2);
    }

    #[test]
    fn test_single_slot_buffer() {
        let mut fifo: RingBuffer<1> = RingBuffer::new();
        assert_eq!(fifo.put(b'a'), Ok(()));
        assert_eq!(fifo.state(), FillState::Full);
        assert_eq!(fifo.put(b'b'), Err(FifoError::Full));
        assert_eq!(fifo.get(), Ok(b'a'));
        assert_eq!(fifo.state(), FillState::Empty);
        assert_eq!(fifo.put(b'c'), Ok(()));
        assert_eq!(fifo.get(), Ok(b'c'));
    }

    #[test]
    fn test_wraparound() {
        let mut fifo: RingBuffer<4> = RingBuffer::new();
        for round in 0..10u8 {
            fifo.put(round).unwrap();
            fifo.put(round.wrapping_add(100)).unwrap();
            assert_eq!(fifo.len(), 2);
            assert_eq!(fifo.get(), Ok(round));
            assert_eq!(fifo.get(), Ok(round.wrapping_add(100)));
            assert!(fifo.is_empty());
        }
    }

    #[test]
    fn test_rejected_byte_not_stored() {
        let mut fifo: RingBuffer<2> = RingBuffer::new();
        fifo.put(1).unwrap();
        fifo.put(2).unwrap();
        assert_eq!(fifo.put(3), Err(FifoError::Full));
        assert_eq!(fifo.get(), Ok(1));
        assert_eq!(fifo.get(), Ok(2));
        assert!(fifo.is_empty());
    }

    #[test]
    fn test_state_observation_is_stable() {
        let mut fifo: RingBuffer<2> = RingBuffer::new();
        fifo.put(9).unwrap();
        let first = fifo.state();
        for _ in 0..5 {
            assert_eq!(fifo.state(), first);
        }
        assert_eq!(fifo.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut fifo: RingBuffer<4> = RingBuffer::new();
        fifo.put(1).unwrap();
        fifo.put(2).unwrap();
        fifo.clear();
        assert!(fifo.is_empty());
        assert_eq!(fifo.get(), Err(FifoError::Empty));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Put(u8),
        Get,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![any::<u8>().prop_map(Op::Put), Just(Op::Get)]
    }

    proptest! {
        /// Property: the buffer behaves as a bounded FIFO queue
        #[test]
        fn prop_fifo_queue_law(ops in prop::collection::vec(op(), 0..300)) {
            let mut fifo: RingBuffer<8> = RingBuffer::new();
            let mut model: VecDeque<u8> = VecDeque::new();

            for op in ops {
                match op {
                    Op::Put(byte) => {
                        let result = fifo.put(byte);
                        if model.len() == 8 {
                            prop_assert_eq!(result, Err(FifoError::Full));
                        } else {
                            prop_assert_eq!(result, Ok(()));
                            model.push_back(byte);
                        }
                    }
                    Op::Get => {
                        let expected = model.pop_front().ok_or(FifoError::Empty);
                        prop_assert_eq!(fifo.get(), expected);
                    }
                }

                prop_assert_eq!(fifo.len(), model.len());
                let expected_state = match model.len() {
                    0 => FillState::Empty,
                    8 => FillState::Full,
                    _ => FillState::NotEmpty,
                };
                prop_assert_eq!(fifo.state(), expected_state);
            }
        }
    }
}
