//! Stepper motor actuator trait
//!
//! This trait abstracts over the unipolar 4-coil stepper driven through a
//! ULN2003-style transistor array. The coil sequence itself is pure logic
//! and lives here so every implementation steps through it identically.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Motor rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Clockwise rotation (forward arc)
    Clockwise,
    /// Counter-clockwise rotation (return arc)
    CounterClockwise,
}

/// Coil energization pattern
///
/// Two adjacent coils are energized at a time (full-step, two-phase-on).
/// Bit `n` of [`MotorPhase::bits`] drives coil `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MotorPhase {
    /// Coils A+B (0b0011)
    AB,
    /// Coils B+C (0b0110)
    BC,
    /// Coils C+D (0b1100)
    CD,
    /// Coils D+A (0b1001)
    DA,
}

impl MotorPhase {
    /// Forward (clockwise) energization order
    pub const SEQUENCE: [MotorPhase; 4] =
        [MotorPhase::AB, MotorPhase::BC, MotorPhase::CD, MotorPhase::DA];

    /// Coil bit pattern
    pub const fn bits(self) -> u8 {
        match self {
            MotorPhase::AB => 0b0011,
            MotorPhase::BC => 0b0110,
            MotorPhase::CD => 0b1100,
            MotorPhase::DA => 0b1001,
        }
    }

    /// Whether coil `n` (0..4) is energized in this pattern
    pub const fn coil(self, n: u8) -> bool {
        self.bits() & (1 << n) != 0
    }

    /// Position of this pattern in [`MotorPhase::SEQUENCE`]
    pub const fn index(self) -> usize {
        match self {
            MotorPhase::AB => 0,
            MotorPhase::BC => 1,
            MotorPhase::CD => 2,
            MotorPhase::DA => 3,
        }
    }

    /// Next pattern when rotating in `dir`
    pub fn next(self, dir: Direction) -> Self {
        let idx = match dir {
            Direction::Clockwise => (self.index() + 1) % 4,
            Direction::CounterClockwise => (self.index() + 3) % 4,
        };
        Self::SEQUENCE[idx]
    }
}

/// Cyclic coil sequencer
///
/// Tracks the currently energized pattern. The reverse order is the exact
/// time-reversal of the forward order, so N forward advances followed by N
/// reverse advances always land on the starting pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CoilSequence {
    phase: MotorPhase,
}

impl Default for CoilSequence {
    fn default() -> Self {
        // The first forward advance energizes AB
        Self::new(MotorPhase::DA)
    }
}

impl CoilSequence {
    /// Create a sequencer resting on `phase`
    pub const fn new(phase: MotorPhase) -> Self {
        Self { phase }
    }

    /// Currently energized pattern
    pub fn phase(&self) -> MotorPhase {
        self.phase
    }

    /// Move to the next pattern in `dir` and return it
    pub fn advance(&mut self, dir: Direction) -> MotorPhase {
        self.phase = self.phase.next(dir);
        self.phase
    }
}

/// Trait for the scan stepper
///
/// Each call energizes the next coil pattern(s) in the respective cyclic
/// sequence and blocks for the configured dwell before returning. There are
/// no error outcomes; this is a hardware-timing primitive.
pub trait MotorActuator {
    /// Advance one step clockwise
    fn step_forward(&mut self);

    /// Advance one step counter-clockwise
    fn step_reverse(&mut self);

    /// Advance one step in `dir`
    fn step(&mut self, dir: Direction) {
        match dir {
            Direction::Clockwise => self.step_forward(),
            Direction::CounterClockwise => self.step_reverse(),
        }
    }

    /// Currently energized coil pattern
    ///
    /// Observation only; the phase is never set from outside.
    fn phase(&self) -> MotorPhase;
}
