//! Sensor boot sequence
//!
//! Brings the distance sensor from reset to continuous ranging and
//! announces progress on the text channel. Poll-driven like the scan
//! controller: every [`BootSequence::tick`] does one step, and the caller
//! waits `boot_poll_ms` between ticks while the sensor is still booting.
//!
//! There is no timeout. A sensor that never boots keeps the sequence in
//! `AwaitBoot` forever, visible only as the missing `ToF Ready` line.

use crate::report::{BOOT_BANNER, SENSOR_ID_READ, SENSOR_READY};
use crate::traits::{PulseKind, Reporter, SensorService};

/// Boot sequence phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootPhase {
    /// Print the banner
    #[default]
    Announce,
    /// Read the sensor model id
    Identify,
    /// Poll the sensor boot state
    AwaitBoot,
    /// Configure the sensor and start ranging
    Arm,
    /// Sensor ranging, scanning may begin
    Done,
}

/// Result of a single boot tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootStep<E> {
    /// Banner printed
    Announced,
    /// Model id read attempted; the result is informational only
    Identified(Result<u16, E>),
    /// Sensor not booted yet after `polls` boot state polls
    AwaitingBoot { polls: u32 },
    /// Boot state poll failed on the bus; treated as not booted
    BootPollFailed { polls: u32, error: E },
    /// Sensor armed and ranging; `failures` arm operations failed
    Ready { failures: u8, last_error: Option<E> },
    /// Sequence already complete
    Done,
}

impl<E> BootStep<E> {
    /// Check if the caller should wait before the next tick
    pub fn is_waiting(&self) -> bool {
        matches!(
            self,
            BootStep::AwaitingBoot { .. } | BootStep::BootPollFailed { .. }
        )
    }
}

/// Sensor boot state machine
#[derive(Debug, Clone, Default)]
pub struct BootSequence {
    phase: BootPhase,
    boot_polls: u32,
}

impl BootSequence {
    /// Create a sequence at the start
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase
    pub fn phase(&self) -> BootPhase {
        self.phase
    }

    /// Boot state polls so far
    pub fn boot_polls(&self) -> u32 {
        self.boot_polls
    }

    /// Check if the sensor is armed
    pub fn is_done(&self) -> bool {
        self.phase == BootPhase::Done
    }

    /// Perform one step of the sequence
    pub fn tick<S, R>(&mut self, sensor: &mut S, reporter: &mut R) -> BootStep<S::Error>
    where
        S: SensorService,
        R: Reporter,
    {
        match self.phase {
            BootPhase::Announce => {
                reporter.report_line(BOOT_BANNER);
                self.phase = BootPhase::Identify;
                BootStep::Announced
            }
            BootPhase::Identify => {
                let id = sensor.sensor_id();
                reporter.report_line(SENSOR_ID_READ);
                self.phase = BootPhase::AwaitBoot;
                BootStep::Identified(id)
            }
            BootPhase::AwaitBoot => {
                self.boot_polls = self.boot_polls.saturating_add(1);
                match sensor.boot_state() {
                    Ok(true) => {
                        self.phase = BootPhase::Arm;
                        self.arm(sensor, reporter)
                    }
                    Ok(false) => BootStep::AwaitingBoot {
                        polls: self.boot_polls,
                    },
                    Err(error) => BootStep::BootPollFailed {
                        polls: self.boot_polls,
                        error,
                    },
                }
            }
            BootPhase::Arm => self.arm(sensor, reporter),
            BootPhase::Done => BootStep::Done,
        }
    }

    fn arm<S, R>(&mut self, sensor: &mut S, reporter: &mut R) -> BootStep<S::Error>
    where
        S: SensorService,
        R: Reporter,
    {
        reporter.pulse(PulseKind::SensorReady);
        reporter.report_line(SENSOR_READY);

        let mut failures = 0u8;
        let mut last_error = None;
        for result in [
            sensor.clear_interrupt(),
            sensor.init(),
            sensor.start_ranging(),
        ] {
            if let Err(e) = result {
                failures += 1;
                last_error = Some(e);
            }
        }

        self.phase = BootPhase::Done;
        BootStep::Ready {
            failures,
            last_error,
        }
    }
}
