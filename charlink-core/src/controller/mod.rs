//! Controller orchestration
//!
//! Owns the state shared between the bus interrupt and the main loop:
//!
//! ```text
//!            ┌──────────────── Controller ────────────────┐
//!  bus IRQ ──┤ on_bus_event ─► Link { fifo, pending, rx } │
//!            │                        ▲                   │
//!  main    ──┤ poll ─► FrameDecoder ──┘ (one lock per     │
//!  loop      │                           byte pulled)     │
//!            └────────────────────────────────────────────┘
//! ```
//!
//! The link sits in a critical-section mutex, so every access from the
//! main loop runs with interrupts masked and the interrupt never sees the
//! fifo indices mid-update. The controller is `Sync` and can live in a
//! `static` shared by both contexts.

mod heartbeat;

pub use heartbeat::Heartbeat;

use core::cell::RefCell;

use charlink_hal::{I2cSlavePort, OutputPin};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::buffer::{FifoError, FillState, RingBuffer, FIFO_CAPACITY};
use crate::bus::{BusError, BusEvent, PendingFrame, ReceiveHandler, ReceiveStats};
use crate::config::ControllerConfig;
use crate::decode::{DecodeError, DecodeOutcome, FrameDecoder};
use crate::traits::{ByteSource, DisplaySurface, FrameQueue};

/// State written by the bus interrupt and drained by the main loop
struct Link<const N: usize> {
    fifo: RingBuffer<N>,
    pending: PendingFrame,
    receiver: ReceiveHandler,
}

type SharedLink<const N: usize> = Mutex<CriticalSectionRawMutex, RefCell<Link<N>>>;

/// Display controller core
pub struct Controller<const N: usize = FIFO_CAPACITY> {
    link: SharedLink<N>,
    config: ControllerConfig,
}

impl<const N: usize> Controller<N> {
    /// Create a controller with an empty fifo
    pub const fn new(config: ControllerConfig) -> Self {
        Self {
            link: Mutex::new(RefCell::new(Link {
                fifo: RingBuffer::new(),
                pending: PendingFrame::new(),
                receiver: ReceiveHandler::new(config.collision_spin_limit),
            })),
            config,
        }
    }

    /// Bus interrupt entry point
    pub fn on_bus_event<P>(&self, port: &mut P) -> Result<BusEvent, BusError>
    where
        P: I2cSlavePort + ?Sized,
    {
        self.link.lock(|link| {
            let mut link = link.borrow_mut();
            let Link {
                fifo,
                pending,
                receiver,
            } = &mut *link;
            receiver.on_bus_event(port, fifo, pending)
        })
    }

    /// Decode one waiting frame, if any
    ///
    /// Returns `None` when no complete frame was waiting; the fifo is not
    /// touched in that case.
    pub fn poll<D>(
        &self,
        decoder: &mut FrameDecoder,
        display: &mut D,
    ) -> Option<Result<DecodeOutcome, DecodeError>>
    where
        D: DisplaySurface + ?Sized,
    {
        let mut queue = LinkQueue { link: &self.link };
        decoder.service(&mut queue, display)
    }

    /// One main-loop iteration: service the decoder, then the heartbeat
    pub fn run_once<D, P>(
        &self,
        decoder: &mut FrameDecoder,
        display: &mut D,
        heartbeat: &mut Heartbeat<P>,
    ) -> Option<Result<DecodeOutcome, DecodeError>>
    where
        D: DisplaySurface + ?Sized,
        P: OutputPin,
    {
        let result = self.poll(decoder, display);
        heartbeat.tick();
        result
    }

    /// Frames received but not yet decoded
    pub fn pending_frames(&self) -> u8 {
        self.link.lock(|link| link.borrow().pending.completed_frames())
    }

    /// Fifo occupancy
    pub fn fill_state(&self) -> FillState {
        self.link.lock(|link| link.borrow().fifo.state())
    }

    /// Receive path counters
    pub fn stats(&self) -> ReceiveStats {
        self.link.lock(|link| link.borrow().receiver.stats())
    }

    /// Configuration the controller was built with
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Build a decoder using this controller's decoder settings
    pub fn decoder(&self) -> FrameDecoder {
        FrameDecoder::new(self.config.decoder)
    }
}

/// Main-loop view of the link, locking once per access
struct LinkQueue<'a, const N: usize> {
    link: &'a SharedLink<N>,
}

impl<'a, const N: usize> ByteSource for LinkQueue<'a, N> {
    fn next_byte(&mut self) -> Result<u8, FifoError> {
        self.link.lock(|link| link.borrow_mut().fifo.get())
    }
}

impl<'a, const N: usize> FrameQueue for LinkQueue<'a, N> {
    fn completed_frames(&self) -> u8 {
        self.link.lock(|link| link.borrow().pending.completed_frames())
    }

    fn consume_frame(&mut self) {
        self.link
            .lock(|link| link.borrow_mut().pending.consume_frame());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DecoderConfig;
    use crate::traits::DisplayError;
    use charlink_hal::BusStatus;
    use charlink_protocol::{DisplayControl, FrameId, HostCommand};

    /// Slave port replaying one event at a time
    struct ScriptedPort {
        status: BusStatus,
        buffer: u8,
        releases: u32,
    }

    impl ScriptedPort {
        fn new() -> Self {
            Self {
                status: BusStatus::default(),
                buffer: 0,
                releases: 0,
            }
        }
    }

    impl I2cSlavePort for ScriptedPort {
        fn status(&mut self) -> BusStatus {
            self.status
        }

        fn read_buffer(&mut self) -> u8 {
            self.buffer
        }

        fn clear_overflow(&mut self) {}

        fn clear_write_collision(&mut self) {}

        fn write_collision(&mut self) -> bool {
            false
        }

        fn release_clock(&mut self) {
            self.releases += 1;
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Clear,
        Home,
        SetCursor(u8, u8),
        PutChar(u8),
        SetControl(DisplayControl),
    }

    #[derive(Default)]
    struct RecordingDisplay {
        calls: Vec<Call>,
    }

    impl DisplaySurface for RecordingDisplay {
        fn clear(&mut self) -> Result<(), DisplayError> {
            self.calls.push(Call::Clear);
            Ok(())
        }

        fn home(&mut self) -> Result<(), DisplayError> {
            self.calls.push(Call::Home);
            Ok(())
        }

        fn set_cursor(&mut self, row: u8, column: u8) -> Result<(), DisplayError> {
            self.calls.push(Call::SetCursor(row, column));
            Ok(())
        }

        fn put_char(&mut self, ch: u8) -> Result<(), DisplayError> {
            self.calls.push(Call::PutChar(ch));
            Ok(())
        }

        fn set_control(&mut self, control: DisplayControl) -> Result<(), DisplayError> {
            self.calls.push(Call::SetControl(control));
            Ok(())
        }
    }

    struct Led(bool);

    impl OutputPin for Led {
        fn set_high(&mut self) {
            self.0 = true;
        }

        fn set_low(&mut self) {
            self.0 = false;
        }

        fn is_set_high(&self) -> bool {
            self.0
        }
    }

    /// Write one I2C transaction carrying `bytes`
    fn transmit<const N: usize>(controller: &Controller<N>, port: &mut ScriptedPort, bytes: &[u8]) {
        port.status = BusStatus::ADDRESS_WRITE;
        port.buffer = 0xEC;
        controller.on_bus_event(port).unwrap();
        for &byte in bytes {
            port.status = BusStatus::DATA_WRITE;
            port.buffer = byte;
            controller.on_bus_event(port).unwrap();
        }
    }

    fn encode(command: HostCommand<'_>) -> Vec<u8> {
        command.to_frame().unwrap().encode_to_vec().unwrap().to_vec()
    }

    #[test]
    fn test_clear_display_frame() {
        let controller: Controller = Controller::new(ControllerConfig::DEFAULT);
        let mut port = ScriptedPort::new();
        let mut decoder = controller.decoder();
        let mut display = RecordingDisplay::default();

        transmit(&controller, &mut port, &[0x01, 0x02]);
        assert_eq!(controller.pending_frames(), 1);

        let result = controller.poll(&mut decoder, &mut display);
        assert_eq!(result, Some(Ok(DecodeOutcome::Executed(FrameId::ClearDisplay))));
        assert_eq!(display.calls, vec![Call::Clear]);
        assert_eq!(controller.fill_state(), FillState::Empty);
        assert_eq!(controller.pending_frames(), 0);
        assert_eq!(port.releases, 3);
    }

    #[test]
    fn test_put_string_frame() {
        let controller: Controller = Controller::new(ControllerConfig::DEFAULT);
        let mut port = ScriptedPort::new();
        let mut decoder = controller.decoder();
        let mut display = RecordingDisplay::default();

        transmit(&controller, &mut port, &[0x05, 0x05, b'H', b'i', b'!']);
        controller.poll(&mut decoder, &mut display).unwrap().unwrap();
        assert_eq!(
            display.calls,
            vec![Call::PutChar(b'H'), Call::PutChar(b'i'), Call::PutChar(b'!')]
        );
    }

    #[test]
    fn test_set_cursor_frame() {
        let controller: Controller = Controller::new(ControllerConfig::DEFAULT);
        let mut port = ScriptedPort::new();
        let mut decoder = controller.decoder();
        let mut display = RecordingDisplay::default();

        transmit(&controller, &mut port, &[0x03, 0x04, 0x02, 0x05]);
        controller.poll(&mut decoder, &mut display).unwrap().unwrap();
        assert_eq!(display.calls, vec![Call::SetCursor(2, 5)]);
    }

    #[test]
    fn test_malformed_frame_consumes_header() {
        let controller: Controller = Controller::new(ControllerConfig::DEFAULT);
        let mut port = ScriptedPort::new();
        let mut decoder = controller.decoder();
        let mut display = RecordingDisplay::default();

        transmit(&controller, &mut port, &[0x01, 0x05, 0, 0, 0]);
        let result = controller.poll(&mut decoder, &mut display);
        assert_eq!(
            result,
            Some(Err(DecodeError::MalformedFrame {
                frame_id: FrameId::ClearDisplay,
                frame_size: 5,
            }))
        );
        assert!(display.calls.is_empty());
        // The three payload bytes are still queued
        assert_eq!(controller.fill_state(), FillState::NotEmpty);
        assert_eq!(controller.pending_frames(), 0);
    }

    #[test]
    fn test_poll_without_frame_leaves_fifo_alone() {
        let controller: Controller = Controller::new(ControllerConfig::DEFAULT);
        let mut port = ScriptedPort::new();
        let mut decoder = controller.decoder();
        let mut display = RecordingDisplay::default();

        // Header only, frame incomplete
        transmit(&controller, &mut port, &[0x05, 0x06]);
        assert_eq!(controller.pending_frames(), 0);

        assert!(controller.poll(&mut decoder, &mut display).is_none());
        assert_eq!(controller.fill_state(), FillState::NotEmpty);
        assert!(display.calls.is_empty());
        assert_eq!(decoder.stats().failed, 0);
    }

    #[test]
    fn test_back_to_back_frames_decode_independently() {
        let controller: Controller = Controller::new(ControllerConfig::DEFAULT);
        let mut port = ScriptedPort::new();
        let mut decoder = controller.decoder();
        let mut display = RecordingDisplay::default();

        let mut bytes = encode(HostCommand::PutString(b"ab"));
        bytes.extend(encode(HostCommand::SetCursor { row: 1, column: 9 }));
        transmit(&controller, &mut port, &bytes);
        assert_eq!(controller.pending_frames(), 2);

        let first = controller.poll(&mut decoder, &mut display);
        assert_eq!(first, Some(Ok(DecodeOutcome::Executed(FrameId::PutString))));
        assert_eq!(display.calls, vec![Call::PutChar(b'a'), Call::PutChar(b'b')]);

        let second = controller.poll(&mut decoder, &mut display);
        assert_eq!(second, Some(Ok(DecodeOutcome::Executed(FrameId::SetCursor))));
        assert_eq!(display.calls[2..], [Call::SetCursor(1, 9)]);

        assert!(controller.poll(&mut decoder, &mut display).is_none());
        assert_eq!(controller.fill_state(), FillState::Empty);
        assert_eq!(decoder.stats().decoded, 2);
    }

    #[test]
    fn test_frames_across_transactions() {
        let controller: Controller = Controller::new(ControllerConfig::DEFAULT);
        let mut port = ScriptedPort::new();
        let mut decoder = controller.decoder();
        let mut display = RecordingDisplay::default();

        transmit(&controller, &mut port, &encode(HostCommand::ReturnHome));
        transmit(&controller, &mut port, &encode(HostCommand::PutChar(b'x')));
        assert_eq!(controller.pending_frames(), 2);

        controller.poll(&mut decoder, &mut display).unwrap().unwrap();
        controller.poll(&mut decoder, &mut display).unwrap().unwrap();
        assert_eq!(display.calls, vec![Call::Home, Call::PutChar(b'x')]);
    }

    #[test]
    fn test_overflow_counts_dropped_bytes() {
        let controller: Controller<4> = Controller::new(ControllerConfig::DEFAULT);
        let mut port = ScriptedPort::new();

        transmit(&controller, &mut port, &[0x05, 0x07, b'a', b'b', b'c', b'd', b'e']);
        assert_eq!(controller.fill_state(), FillState::Full);
        assert_eq!(controller.stats().dropped_bytes, 3);
        assert_eq!(controller.stats().frames_completed, 1);
    }

    #[test]
    fn test_run_once_ticks_heartbeat() {
        let config = ControllerConfig {
            heartbeat_period: 1,
            decoder: DecoderConfig::DEFAULT,
            ..ControllerConfig::DEFAULT
        };
        let controller: Controller = Controller::new(config);
        let mut decoder = controller.decoder();
        let mut display = RecordingDisplay::default();
        let mut heartbeat = Heartbeat::new(Led(false), controller.config().heartbeat_period);

        assert!(controller
            .run_once(&mut decoder, &mut display, &mut heartbeat)
            .is_none());
        assert!(!heartbeat.is_on());
        controller.run_once(&mut decoder, &mut display, &mut heartbeat);
        assert!(heartbeat.is_on());
    }

    static SHARED: Controller = Controller::new(ControllerConfig::DEFAULT);

    #[test]
    fn test_static_controller() {
        let mut port = ScriptedPort::new();
        let mut decoder = SHARED.decoder();
        let mut display = RecordingDisplay::default();

        transmit(&SHARED, &mut port, &encode(HostCommand::ControlDisplay(DisplayControl {
            display_on: true,
            cursor_on: true,
            blink_on: false,
        })));
        let result = SHARED.poll(&mut decoder, &mut display);
        assert_eq!(result, Some(Ok(DecodeOutcome::Executed(FrameId::ControlDisplay))));
    }
}
