//! GPIO start button
//!
//! Momentary switch to ground with the internal pull-up enabled, so a
//! press reads low. The level is sampled raw on every call.

use embedded_hal::digital::InputPin;
use tofscan_core::traits::Button;

/// Active-low button on a GPIO input
pub struct GpioButton<P> {
    pin: P,
}

impl<P: InputPin> GpioButton<P> {
    /// Create a button that reads pressed when the pin is low
    pub fn new_active_low(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin> Button for GpioButton<P> {
    fn is_pressed(&mut self) -> bool {
        // A failed read counts as released
        self.pin.is_low().unwrap_or(false)
    }
}
