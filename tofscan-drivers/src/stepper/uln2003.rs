//! ULN2003 unipolar stepper driver
//!
//! Drives a 4-coil unipolar stepper (28BYJ-48 class) through a ULN2003
//! Darlington array, one GPIO per coil. Coils are energized two at a time
//! following [`MotorPhase::SEQUENCE`]; reversing walks the same sequence
//! backwards.
//!
//! One scan step advances `phases_per_step` coil patterns, dwelling after
//! each. With the default of 4 patterns per step, 512 steps make one
//! output-shaft revolution.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use tofscan_core::config::ScanConfig;
use tofscan_core::traits::{CoilSequence, Direction, MotorActuator, MotorPhase};

/// Number of coils on the motor
pub const COIL_COUNT: usize = 4;

/// ULN2003 stepper configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepperConfig {
    /// Coil patterns advanced per scan step
    pub phases_per_step: u8,
    /// Dwell after each coil pattern (ms)
    pub dwell_ms: u32,
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self::from_scan(&ScanConfig::DEFAULT)
    }
}

impl StepperConfig {
    /// Derive the dwell from a scan configuration
    pub fn from_scan(scan: &ScanConfig) -> Self {
        Self {
            phases_per_step: 4,
            dwell_ms: scan.step_dwell_ms(),
        }
    }

    /// Time one scan step takes (ms)
    pub fn step_duration_ms(&self) -> u32 {
        self.phases_per_step as u32 * self.dwell_ms
    }
}

/// ULN2003 stepper
///
/// `coils[n]` drives coil `n`, i.e. bit `n` of [`MotorPhase::bits`].
/// Pin errors are ignored; RP2040 GPIO writes are infallible.
pub struct Uln2003Stepper<P, D> {
    coils: [P; COIL_COUNT],
    delay: D,
    sequence: CoilSequence,
    config: StepperConfig,
}

impl<P: OutputPin, D: DelayNs> Uln2003Stepper<P, D> {
    /// Create a stepper with all coils released
    pub fn new(coils: [P; COIL_COUNT], delay: D, config: StepperConfig) -> Self {
        let mut stepper = Self {
            coils,
            delay,
            sequence: CoilSequence::default(),
            config,
        };
        stepper.release();
        stepper
    }

    /// Get the configuration
    pub fn config(&self) -> &StepperConfig {
        &self.config
    }

    /// De-energize all coils
    ///
    /// The tracked phase is kept, so the next step continues the sequence.
    pub fn release(&mut self) {
        for coil in self.coils.iter_mut() {
            let _ = coil.set_low();
        }
    }

    fn energize(&mut self, phase: MotorPhase) {
        for (n, coil) in self.coils.iter_mut().enumerate() {
            let _ = if phase.coil(n as u8) {
                coil.set_high()
            } else {
                coil.set_low()
            };
        }
    }

    fn advance(&mut self, dir: Direction) {
        for _ in 0..self.config.phases_per_step {
            let phase = self.sequence.advance(dir);
            self.energize(phase);
            self.delay.delay_ms(self.config.dwell_ms);
        }
    }
}

impl<P: OutputPin, D: DelayNs> MotorActuator for Uln2003Stepper<P, D> {
    fn step_forward(&mut self) {
        self.advance(Direction::Clockwise);
    }

    fn step_reverse(&mut self) {
        self.advance(Direction::CounterClockwise);
    }

    fn phase(&self) -> MotorPhase {
        self.sequence.phase()
    }
}
