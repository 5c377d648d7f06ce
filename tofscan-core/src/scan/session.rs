//! Scan session state
//!
//! Owned and mutated exclusively by the scan controller.

use crate::config::ScanConfig;
use crate::state::{Event, State};
use crate::traits::DistanceReading;

/// Local record of what happened since power-on
///
/// Observational only; nothing here feeds back into control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionStats {
    /// Distance readings reported
    pub samples: u32,
    /// Readings with a non-zero sensor status
    pub anomalies: u32,
    /// Ready polls that failed on the bus
    pub failed_polls: u32,
    /// Distance reads that failed on the bus
    pub failed_reads: u32,
    /// Interrupt clears that failed on the bus
    pub failed_clears: u32,
    /// Full forward+return cycles finished
    pub scans_completed: u32,
}

impl SessionStats {
    fn record_sample(&mut self, reading: &DistanceReading) {
        self.samples = self.samples.saturating_add(1);
        if reading.is_anomaly() {
            self.anomalies = self.anomalies.saturating_add(1);
        }
    }
}

/// Scan session
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanSession {
    config: ScanConfig,
    state: State,
    /// Step index within the current arc, always below `total_steps`
    step: u16,
    /// Motor has stepped onto a sample boundary, waiting for the sensor
    awaiting_sample: bool,
    stats: SessionStats,
}

impl ScanSession {
    /// Create an idle session
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            state: State::Idle,
            step: 0,
            awaiting_sample: false,
            stats: SessionStats::default(),
        }
    }

    /// Scan configuration
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Step index within the current arc
    pub fn step(&self) -> u16 {
        self.step
    }

    /// Whether the forward arc is parked on a sample boundary
    pub fn is_awaiting_sample(&self) -> bool {
        self.awaiting_sample
    }

    /// Statistics since power-on
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Apply an event; a state change resets the step index
    pub(crate) fn apply(&mut self, event: Event) -> State {
        let next = self.state.transition(event);
        if next != self.state {
            self.state = next;
            self.step = 0;
            self.awaiting_sample = false;
        }
        next
    }

    /// Count the step just taken; returns `true` once the arc is complete
    ///
    /// On completion the index is left at 0 for the next arc.
    pub(crate) fn advance_step(&mut self) -> bool {
        let next = self.step + 1;
        if next >= self.config.total_steps() {
            self.step = 0;
            true
        } else {
            self.step = next;
            false
        }
    }

    pub(crate) fn set_awaiting_sample(&mut self, awaiting: bool) {
        self.awaiting_sample = awaiting;
    }

    pub(crate) fn record_sample(&mut self, reading: &DistanceReading) {
        self.stats.record_sample(reading);
    }

    pub(crate) fn stats_mut(&mut self) -> &mut SessionStats {
        &mut self.stats
    }
}
