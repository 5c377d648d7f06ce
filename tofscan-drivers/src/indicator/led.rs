//! Status LED bank
//!
//! Four active-high LEDs. Each [`PulseKind`] lights a fixed set of them:
//!
//! | Signal | LEDs |
//! |--------|------|
//! | Scan complete | LED1 |
//! | Transmit | LED2 |
//! | Measurement | LED4 |
//! | Sensor ready / sensor reset | all |
//!
//! LED3 has no signal of its own and only lights with the others.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use tofscan_core::traits::PulseKind;

/// Number of LEDs in the bank
pub const LED_COUNT: usize = 4;

/// Single LED position (LED1..LED4)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Led {
    Led1,
    Led2,
    Led3,
    Led4,
}

impl Led {
    /// Index into the bank
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Mask containing only this LED
    pub const fn mask(self) -> LedMask {
        LedMask(1 << self as u8)
    }
}

/// Set of LEDs, bit `n` is LED `n + 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedMask(pub u8);

impl LedMask {
    /// No LEDs
    pub const NONE: LedMask = LedMask(0);
    /// Every LED
    pub const ALL: LedMask = LedMask(0x0F);
    /// Flashed when a line goes out on the serial port
    pub const TRANSMIT: LedMask = Led::Led2.mask();

    /// LEDs lit by an indicator pulse
    pub const fn for_pulse(kind: PulseKind) -> Self {
        match kind {
            PulseKind::ScanComplete => Led::Led1.mask(),
            PulseKind::Measurement => Led::Led4.mask(),
            PulseKind::SensorReady => LedMask::ALL,
        }
    }

    /// Whether the LED at `index` is in the set
    pub const fn contains(self, index: usize) -> bool {
        index < LED_COUNT && self.0 & (1 << index) != 0
    }
}

/// Four-LED bank
pub struct LedBank<P> {
    leds: [P; LED_COUNT],
    lit: LedMask,
}

impl<P: OutputPin> LedBank<P> {
    /// Create a bank with every LED off
    pub fn new(leds: [P; LED_COUNT]) -> Self {
        let mut bank = Self {
            leds,
            lit: LedMask::NONE,
        };
        bank.set(LedMask::NONE);
        bank
    }

    /// LEDs currently lit
    pub fn lit(&self) -> LedMask {
        self.lit
    }

    /// Light exactly the LEDs in `mask`
    pub fn set(&mut self, mask: LedMask) {
        self.lit = mask;
        for (n, led) in self.leds.iter_mut().enumerate() {
            let _ = if mask.contains(n) {
                led.set_high()
            } else {
                led.set_low()
            };
        }
    }

    /// Light `mask` for `on_ms`, then turn everything off
    pub fn flash<D: DelayNs>(&mut self, mask: LedMask, delay: &mut D, on_ms: u32) {
        self.set(mask);
        delay.delay_ms(on_ms);
        self.set(LedMask::NONE);
    }

    /// Flash the LEDs assigned to `kind`
    pub fn pulse<D: DelayNs>(&mut self, kind: PulseKind, delay: &mut D, on_ms: u32) {
        self.flash(LedMask::for_pulse(kind), delay, on_ms);
    }
}
