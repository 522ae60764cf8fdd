//! Character LCD drivers

pub mod hd44780;
pub mod virtual_lcd;

pub use hd44780::{Hd44780, LcdPins};
pub use virtual_lcd::VirtualLcd;
