//! Sensor shutdown (XSHUT) line
//!
//! XSHUT is active low and pulled up on the sensor breakout. The line is
//! driven through an open-drain output: low holds the sensor in reset,
//! high releases it to the pull-up.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// XSHUT control line
pub struct XshutLine<P> {
    pin: P,
}

impl<P: OutputPin> XshutLine<P> {
    /// Wrap an open-drain pin without changing its level
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Hold the sensor in reset
    pub fn hold(&mut self) -> Result<(), P::Error> {
        self.pin.set_low()
    }

    /// Release the sensor from reset
    pub fn release(&mut self) -> Result<(), P::Error> {
        self.pin.set_high()
    }

    /// Hold the sensor in reset, run `during`, wait `pulse_ms`, then release
    pub fn reset<D, F>(&mut self, delay: &mut D, pulse_ms: u32, during: F) -> Result<(), P::Error>
    where
        D: DelayNs,
        F: FnOnce(&mut D),
    {
        self.hold()?;
        during(delay);
        delay.delay_ms(pulse_ms);
        self.release()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{FakeDelay, FakePin};

    #[test]
    fn test_reset_pulse() {
        let mut line = XshutLine::new(FakePin::high());
        let mut delay = FakeDelay::default();

        line.reset(&mut delay, 100, |_| {}).unwrap();

        assert!(line.pin.high);
        assert_eq!(line.pin.writes, 2);
        assert_eq!(delay.total_ms(), 100);
    }

    #[test]
    fn test_work_runs_while_held() {
        let mut line = XshutLine::new(FakePin::high());
        let mut delay = FakeDelay::default();
        let mut ran = false;

        line.reset(&mut delay, 100, |d| {
            ran = true;
            d.delay_ms(10);
        })
        .unwrap();

        assert!(ran);
        // Work first, then the hold time, both before the release
        assert_eq!(delay.calls, [10_000_000, 100_000_000]);
        assert_eq!(delay.total_ms(), 110);
        assert!(line.pin.high);
    }

    #[test]
    fn test_hold_and_release() {
        let mut line = XshutLine::new(FakePin::high());
        line.hold().unwrap();
        assert!(!line.pin.high);
        line.release().unwrap();
        assert!(line.pin.high);
    }
}
