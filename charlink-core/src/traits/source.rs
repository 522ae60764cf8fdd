//! Byte sources feeding the frame decoder

use crate::buffer::{FifoError, RingBuffer};
use crate::bus::PendingFrame;

/// Pull-based source of received bytes
pub trait ByteSource {
    /// Take the next byte, or [`FifoError::Empty`] when none is left
    fn next_byte(&mut self) -> Result<u8, FifoError>;
}

impl<const N: usize> ByteSource for RingBuffer<N> {
    fn next_byte(&mut self) -> Result<u8, FifoError> {
        self.get()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn next_byte(&mut self) -> Result<u8, FifoError> {
        (**self).next_byte()
    }
}

/// Byte source that also knows how many whole frames it holds
pub trait FrameQueue: ByteSource {
    /// Frames fully received and not yet decoded
    fn completed_frames(&self) -> u8;

    /// Mark one frame as decoded
    fn consume_frame(&mut self);
}

/// Fifo paired with its receive bookkeeping
///
/// Used where both halves are owned directly rather than shared with an
/// interrupt, such as host tools and tests.
pub struct BufferedFrames<'a, const N: usize> {
    /// Received bytes
    pub fifo: &'a mut RingBuffer<N>,
    /// Frame boundaries
    pub pending: &'a mut PendingFrame,
}

impl<'a, const N: usize> ByteSource for BufferedFrames<'a, N> {
    fn next_byte(&mut self) -> Result<u8, FifoError> {
        self.fifo.get()
    }
}

impl<'a, const N: usize> FrameQueue for BufferedFrames<'a, N> {
    fn completed_frames(&self) -> u8 {
        self.pending.completed_frames()
    }

    fn consume_frame(&mut self) {
        self.pending.consume_frame();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_buffer_source() {
        let mut fifo: RingBuffer<4> = RingBuffer::new();
        fifo.put(7).unwrap();
        assert_eq!(fifo.next_byte(), Ok(7));
        assert_eq!(fifo.next_byte(), Err(FifoError::Empty));
    }

    #[test]
    fn test_buffered_frames_follow_bookkeeping() {
        let mut fifo: RingBuffer<4> = RingBuffer::new();
        let mut pending = PendingFrame::new();
        for byte in [0x02, 0x02] {
            fifo.put(byte).unwrap();
            pending.record_byte(byte);
        }

        let mut frames = BufferedFrames {
            fifo: &mut fifo,
            pending: &mut pending,
        };
        assert_eq!(frames.completed_frames(), 1);
        assert_eq!(frames.next_byte(), Ok(0x02));
        frames.consume_frame();
        assert_eq!(frames.completed_frames(), 0);
    }
}
