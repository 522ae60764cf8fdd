//! Liveness indicator
//!
//! Blinks an LED from the main loop so a stalled loop is visible on the
//! board. The period is counted in loop iterations, not time.

use charlink_hal::OutputPin;

/// Toggles a pin every `period` ticks
pub struct Heartbeat<P: OutputPin> {
    pin: P,
    period: u32,
    count: u32,
}

impl<P: OutputPin> Heartbeat<P> {
    /// Create a heartbeat on `pin`
    pub fn new(pin: P, period: u32) -> Self {
        Self {
            pin,
            period,
            count: 0,
        }
    }

    /// Count one main-loop iteration
    ///
    /// Returns true when the pin was toggled.
    pub fn tick(&mut self) -> bool {
        if self.count >= self.period {
            self.count = 0;
            self.pin.toggle();
            trace!("heartbeat {=bool}", self.pin.is_set_high());
            true
        } else {
            self.count += 1;
            false
        }
    }

    /// Current LED level
    pub fn is_on(&self) -> bool {
        self.pin.is_set_high()
    }

    /// Give the pin back
    pub fn release(self) -> P {
        self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_toggles_once_per_period() {
        let mut heartbeat = Heartbeat::new(Led(false), 3);
        let toggles: Vec<bool> = (0..8).map(|_| heartbeat.tick()).collect();
        assert_eq!(
            toggles,
            [false, false, false, true, false, false, false, true]
        );
        assert!(!heartbeat.is_on());
    }

    #[test]
    fn test_zero_period_toggles_every_tick() {
        let mut heartbeat = Heartbeat::new(Led(false), 0);
        assert!(heartbeat.tick());
        assert!(heartbeat.is_on());
        assert!(heartbeat.tick());
        assert!(!heartbeat.release().0);
    }
}
