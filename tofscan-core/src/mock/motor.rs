//! Mock stepper motor

use crate::traits::{CoilSequence, Direction, MotorActuator, MotorPhase};

/// Mock motor that tracks phase and step counts without dwelling
#[derive(Debug, Clone, Default)]
pub struct MockMotor {
    coils: CoilSequence,
    forward_steps: u32,
    reverse_steps: u32,
    last_direction: Option<Direction>,
}

impl MockMotor {
    /// Create a motor resting on the default phase
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a motor resting on `phase`
    pub fn with_phase(phase: MotorPhase) -> Self {
        Self {
            coils: CoilSequence::new(phase),
            ..Self::default()
        }
    }

    /// Steps taken clockwise
    pub fn forward_steps(&self) -> u32 {
        self.forward_steps
    }

    /// Steps taken counter-clockwise
    pub fn reverse_steps(&self) -> u32 {
        self.reverse_steps
    }

    /// Total steps in either direction
    pub fn total_steps(&self) -> u32 {
        self.forward_steps + self.reverse_steps
    }

    /// Net position in steps (clockwise positive)
    pub fn position(&self) -> i64 {
        self.forward_steps as i64 - self.reverse_steps as i64
    }

    /// Direction of the most recent step
    pub fn last_direction(&self) -> Option<Direction> {
        self.last_direction
    }
}

impl MotorActuator for MockMotor {
    fn step_forward(&mut self) {
        self.coils.advance(Direction::Clockwise);
        self.forward_steps += 1;
        self.last_direction = Some(Direction::Clockwise);
    }

    fn step_reverse(&mut self) {
        self.coils.advance(Direction::CounterClockwise);
        self.reverse_steps += 1;
        self.last_direction = Some(Direction::CounterClockwise);
    }

    fn phase(&self) -> MotorPhase {
        self.coils.phase()
    }
}
