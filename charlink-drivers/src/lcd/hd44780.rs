//! HD44780 character LCD driver (4-bit mode)
//!
//! Drives a 2x16 HD44780-compatible module over six GPIO lines: RS, EN and
//! the upper data nibble D4-D7. R/W is tied low, so the busy flag cannot
//! be read and every write is followed by a fixed settle delay.
//!
//! # Write cycle
//!
//! ```text
//!  RS   ─┐ 0: command  1: data
//!  D7-4  ╳ high nibble ╳ low nibble ╳
//!  EN   __╱‾╲__________╱‾╲__________
//!            settle         settle
//! ```
//!
//! # DDRAM layout
//!
//! Row 1 starts at 0x00 and row 2 at 0x40.

use charlink_core::{DisplayError, DisplayExt, DisplaySurface};
use charlink_hal::OutputPin;
use charlink_protocol::{DisplayControl, DISPLAY_COLS, DISPLAY_ROWS};
use embedded_hal::delay::DelayNs;

/// HD44780 instruction set (subset used here)
pub mod cmd {
    pub const CLEAR_DISPLAY: u8 = 0x01;
    pub const RETURN_HOME: u8 = 0x02;
    pub const ENTRY_MODE: u8 = 0x04;
    pub const ENTRY_INCREMENT: u8 = 0x02;
    pub const DISPLAY_CONTROL: u8 = 0x08;
    pub const DISPLAY_ON: u8 = 0x04;
    pub const CURSOR_ON: u8 = 0x02;
    pub const BLINK_ON: u8 = 0x01;
    pub const FUNCTION_SET: u8 = 0x20;
    pub const TWO_LINES: u8 = 0x08;
    pub const SET_CGRAM_ADDR: u8 = 0x40;
    pub const SET_DDRAM_ADDR: u8 = 0x80;
}

/// DDRAM address of the first column of each row
const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

/// Power-on wait before the first write
const POWER_ON_MS: u32 = 15;
/// Settle after a command byte
const COMMAND_SETTLE_US: u32 = 5_000;
/// Settle after a data byte
const DATA_SETTLE_US: u32 = 200;
/// Minimum EN high time
const ENABLE_PULSE_NS: u32 = 450;
/// Settle between custom character rows
const CGRAM_ROW_MS: u32 = 1;
/// How long the boot banner stays up
pub const BANNER_HOLD_MS: u32 = 2_500;

/// Number of user-definable characters
pub const CUSTOM_CHAR_SLOTS: u8 = 8;

/// GPIO lines wired to the module
pub struct LcdPins<P> {
    /// Register select (low: command, high: data)
    pub rs: P,
    /// Enable strobe
    pub en: P,
    pub d4: P,
    pub d5: P,
    pub d6: P,
    pub d7: P,
}

/// HD44780 driver
pub struct Hd44780<P: OutputPin, D: DelayNs> {
    pins: LcdPins<P>,
    delay: D,
    initialized: bool,
    control: DisplayControl,
}

impl<P: OutputPin, D: DelayNs> Hd44780<P, D> {
    /// Create a driver; call [`init`](Self::init) before use
    pub fn new(pins: LcdPins<P>, delay: D) -> Self {
        Self {
            pins,
            delay,
            initialized: false,
            control: DisplayControl::default(),
        }
    }

    /// Run the power-on initialization by instruction
    ///
    /// Leaves the display on, cursor and blink off, cleared, with the
    /// cursor moving right after each character.
    pub fn init(&mut self) {
        self.pins.rs.set_low();
        self.pins.en.set_low();
        self.delay.delay_ms(POWER_ON_MS);

        // Three 8-bit function sets put the controller in a known state
        // whatever mode it powered up in
        self.write_nibble(0x3);
        self.delay.delay_ms(5);
        self.pulse_enable();
        self.delay.delay_us(200);
        self.pulse_enable();
        self.delay.delay_us(200);

        // Switch to 4-bit mode
        self.write_nibble(0x2);
        self.delay.delay_us(COMMAND_SETTLE_US);

        self.command(cmd::FUNCTION_SET | cmd::TWO_LINES);
        self.command(cmd::DISPLAY_CONTROL);
        self.command(cmd::CLEAR_DISPLAY);
        self.command(cmd::ENTRY_MODE | cmd::ENTRY_INCREMENT);
        self.command(cmd::DISPLAY_CONTROL | cmd::DISPLAY_ON);
        self.command(cmd::CLEAR_DISPLAY);

        self.control = DisplayControl {
            display_on: true,
            cursor_on: false,
            blink_on: false,
        };
        self.initialized = true;

        #[cfg(feature = "defmt")]
        defmt::debug!("HD44780 initialized");
    }

    /// Check if [`init`](Self::init) has run
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Last display control flags written
    pub fn control(&self) -> DisplayControl {
        self.control
    }

    /// Load a 5x8 pattern into one of the eight CGRAM slots
    ///
    /// The character is then printed with code `slot`. Moves the address
    /// counter into CGRAM; set the cursor again before printing.
    pub fn define_custom_char(&mut self, slot: u8, pattern: &[u8; 8]) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        if slot >= CUSTOM_CHAR_SLOTS {
            return Err(DisplayError::InvalidArgument);
        }

        self.command(cmd::SET_CGRAM_ADDR | (slot << 3));
        for &row in pattern {
            self.data(row & 0x1F);
            self.delay.delay_ms(CGRAM_ROW_MS);
        }
        Ok(())
    }

    /// Show a two-line boot banner and hold it for [`BANNER_HOLD_MS`]
    pub fn show_banner(&mut self, line1: &str, line2: &str) -> Result<(), DisplayError> {
        self.write_line(1, line1.as_bytes())?;
        self.write_line(2, line2.as_bytes())?;
        self.delay.delay_ms(BANNER_HOLD_MS);
        Ok(())
    }

    /// Release the pins and delay
    pub fn release(self) -> (LcdPins<P>, D) {
        (self.pins, self.delay)
    }

    fn ensure_initialized(&self) -> Result<(), DisplayError> {
        if self.initialized {
            Ok(())
        } else {
            Err(DisplayError::NotInitialized)
        }
    }

    fn command(&mut self, byte: u8) {
        self.pins.rs.set_low();
        self.write_byte(byte, COMMAND_SETTLE_US);
    }

    fn data(&mut self, byte: u8) {
        self.pins.rs.set_high();
        self.write_byte(byte, DATA_SETTLE_US);
        self.pins.rs.set_low();
    }

    fn write_byte(&mut self, byte: u8, settle_us: u32) {
        self.write_nibble(byte >> 4);
        self.delay.delay_us(settle_us);
        self.write_nibble(byte & 0x0F);
        self.delay.delay_us(settle_us);
    }

    fn write_nibble(&mut self, nibble: u8) {
        self.pins.d4.set_state(nibble & 0x01 != 0);
        self.pins.d5.set_state(nibble & 0x02 != 0);
        self.pins.d6.set_state(nibble & 0x04 != 0);
        self.pins.d7.set_state(nibble & 0x08 != 0);
        self.pulse_enable();
    }

    fn pulse_enable(&mut self) {
        self.pins.en.set_high();
        self.delay.delay_ns(ENABLE_PULSE_NS);
        self.pins.en.set_low();
    }
}

impl<P: OutputPin, D: DelayNs> DisplaySurface for Hd44780<P, D> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        self.command(cmd::CLEAR_DISPLAY);
        Ok(())
    }

    fn home(&mut self) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        self.command(cmd::RETURN_HOME);
        Ok(())
    }

    fn set_cursor(&mut self, row: u8, column: u8) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        if !(1..=DISPLAY_ROWS).contains(&row) || !(1..=DISPLAY_COLS).contains(&column) {
            return Err(DisplayError::InvalidCoordinates);
        }

        let address = ROW_OFFSETS[(row - 1) as usize] + (column - 1);
        self.command(cmd::SET_DDRAM_ADDR | address);
        Ok(())
    }

    fn put_char(&mut self, ch: u8) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        self.data(ch);
        Ok(())
    }

    fn set_control(&mut self, control: DisplayControl) -> Result<(), DisplayError> {
        self.ensure_initialized()?;

        let mut command = cmd::DISPLAY_CONTROL;
        if control.display_on {
            command |= cmd::DISPLAY_ON;
        }
        if control.cursor_on {
            command |= cmd::CURSOR_ON;
        }
        if control.blink_on {
            command |= cmd::BLINK_ON;
        }

        self.command(command);
        self.control = control;
        Ok(())
    }
}
