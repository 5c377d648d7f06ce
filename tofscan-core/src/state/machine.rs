//! State machine definition
//!
//! Motor and sensor behavior is a function of the current state and an
//! event. Transitions not listed leave the state unchanged.

use super::events::Event;

/// Scanner states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Waiting for a button press
    #[default]
    Idle,
    /// Sweeping forward and sampling at the configured cadence
    ScanningForward,
    /// Sweeping back to the reference angle without sampling
    ScanningReturn,
}

impl State {
    /// Check if this state may sample the sensor
    pub fn sampling_allowed(&self) -> bool {
        matches!(self, State::ScanningForward)
    }

    /// Check if the button is read in this state
    pub fn accepts_button(&self) -> bool {
        matches!(self, State::Idle)
    }

    /// Process an event and return the next state
    ///
    /// This is the core state transition logic.
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            (Idle, ButtonPressed) => ScanningForward,
            (ScanningForward, ForwardArcComplete) => ScanningReturn,
            (ScanningReturn, ReturnArcComplete) => Idle,

            // Presses during a scan are ignored, not queued
            _ => self,
        }
    }
}
