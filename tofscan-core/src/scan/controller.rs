//! Scan controller
//!
//! Each call to [`ScanController::tick`] performs exactly one unit of work:
//! one button read, one motor step, or one sensor-ready poll. The caller
//! supplies the loop and decides how long to wait between ticks, which
//! turns the two unbounded busy-waits of the scan (button and sensor
//! ready) into explicit, testable states.
//!
//! | State | Per-tick action | Exit |
//! |-------|-----------------|------|
//! | Idle | read button | pressed → ScanningForward |
//! | ScanningForward | step CW; on a sample boundary poll until ready, read, report, pulse, clear | last step → ScanningReturn |
//! | ScanningReturn | step CCW | last step → pulse ScanComplete → Idle |
//!
//! Neither wait has a timeout. A sensor that never reports ready parks the
//! forward arc on its current step indefinitely.

use crate::config::ScanConfig;
use crate::state::{Event, State};
use crate::traits::{
    Button, Direction, DistanceReading, MotorActuator, PulseKind, Reporter, SensorSampler,
};

use super::session::ScanSession;

/// Result of a single controller tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome<E> {
    /// Idle and the button read released
    Idle,
    /// Button read pressed; forward arc begins on the next tick
    ScanStarted,
    /// Motor stepped at `step` with nothing else to do
    Stepped { direction: Direction, step: u16 },
    /// Parked on sample boundary `step`, sensor not ready yet
    AwaitingSample { step: u16 },
    /// Ready poll at `step` failed on the bus; still waiting
    PollFailed { step: u16, error: E },
    /// Distance sampled and reported at `step`
    Sampled { step: u16, reading: DistanceReading },
    /// Distance read at `step` failed; slot skipped without retry
    SampleFailed { step: u16, error: E },
    /// Last forward step taken; return arc begins on the next tick
    ForwardArcComplete,
    /// Return arc finished; back to idle
    ScanComplete,
}

impl<E> TickOutcome<E> {
    /// Check if the tick is waiting on an external signal
    ///
    /// The caller should sleep before the next tick.
    pub fn is_waiting(&self) -> bool {
        matches!(
            self,
            TickOutcome::Idle | TickOutcome::AwaitingSample { .. } | TickOutcome::PollFailed { .. }
        )
    }
}

/// Rotary scan state machine
///
/// Owns the session and every peripheral capability it drives.
pub struct ScanController<M, S, R, B> {
    session: ScanSession,
    motor: M,
    sensor: S,
    reporter: R,
    button: B,
}

impl<M, S, R, B> ScanController<M, S, R, B>
where
    M: MotorActuator,
    S: SensorSampler,
    R: Reporter,
    B: Button,
{
    /// Create an idle controller
    pub fn new(config: ScanConfig, motor: M, sensor: S, reporter: R, button: B) -> Self {
        Self {
            session: ScanSession::new(config),
            motor,
            sensor,
            reporter,
            button,
        }
    }

    /// Current session
    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    /// Current state
    pub fn state(&self) -> State {
        self.session.state()
    }

    /// Get access to the motor
    pub fn motor(&self) -> &M {
        &self.motor
    }

    /// Get access to the sensor
    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    /// Get access to the reporter
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Get access to the button
    pub fn button(&self) -> &B {
        &self.button
    }

    /// Get mutable access to the button
    pub fn button_mut(&mut self) -> &mut B {
        &mut self.button
    }

    /// Perform one unit of work
    pub fn tick(&mut self) -> TickOutcome<S::Error> {
        let state = self.session.state();
        if state.accepts_button() {
            self.tick_idle()
        } else if state.sampling_allowed() {
            self.tick_forward()
        } else {
            self.tick_return()
        }
    }

    fn tick_idle(&mut self) -> TickOutcome<S::Error> {
        if self.button.is_pressed() {
            self.session.apply(Event::ButtonPressed);
            TickOutcome::ScanStarted
        } else {
            TickOutcome::Idle
        }
    }

    fn tick_forward(&mut self) -> TickOutcome<S::Error> {
        let step = self.session.step();

        if !self.session.is_awaiting_sample() {
            self.motor.step(Direction::Clockwise);
            if !self.session.config().is_sample_step(step) {
                return self.finish_forward_step(TickOutcome::Stepped {
                    direction: Direction::Clockwise,
                    step,
                });
            }
            self.session.set_awaiting_sample(true);
        }

        self.try_sample(step)
    }

    /// Poll once; on ready read, report, pulse and re-arm the sensor
    fn try_sample(&mut self, step: u16) -> TickOutcome<S::Error> {
        match self.sensor.poll_ready() {
            Ok(true) => {}
            Ok(false) => return TickOutcome::AwaitingSample { step },
            Err(error) => {
                let stats = self.session.stats_mut();
                stats.failed_polls = stats.failed_polls.saturating_add(1);
                return TickOutcome::PollFailed { step, error };
            }
        }

        let outcome = match self.sensor.read_distance() {
            Ok(reading) => {
                // Anomalous status is reported like any other reading
                self.reporter.report_distance(reading.distance_mm);
                self.reporter.pulse(PulseKind::Measurement);
                self.session.record_sample(&reading);
                TickOutcome::Sampled { step, reading }
            }
            Err(error) => {
                let stats = self.session.stats_mut();
                stats.failed_reads = stats.failed_reads.saturating_add(1);
                TickOutcome::SampleFailed { step, error }
            }
        };

        if self.sensor.clear_interrupt().is_err() {
            let stats = self.session.stats_mut();
            stats.failed_clears = stats.failed_clears.saturating_add(1);
        }

        self.session.set_awaiting_sample(false);
        self.finish_forward_step(outcome)
    }

    /// Count the forward step; a plain step that ends the arc is reported
    /// as `ForwardArcComplete`
    fn finish_forward_step(&mut self, outcome: TickOutcome<S::Error>) -> TickOutcome<S::Error> {
        if !self.session.advance_step() {
            return outcome;
        }

        self.session.apply(Event::ForwardArcComplete);
        match outcome {
            TickOutcome::Stepped { .. } => TickOutcome::ForwardArcComplete,
            other => other,
        }
    }

    fn tick_return(&mut self) -> TickOutcome<S::Error> {
        let step = self.session.step();
        self.motor.step(Direction::CounterClockwise);

        if !self.session.advance_step() {
            return TickOutcome::Stepped {
                direction: Direction::CounterClockwise,
                step,
            };
        }

        self.reporter.pulse(PulseKind::ScanComplete);
        let stats = self.session.stats_mut();
        stats.scans_completed = stats.scans_completed.saturating_add(1);
        self.session.apply(Event::ReturnArcComplete);
        TickOutcome::ScanComplete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{
        MockButton, MockMotor, MockReporter, MockSensor, MockSensorError, ReportEvent,
    };
    use crate::traits::MotorPhase;

    use proptest::prelude::*;

    type TestController = ScanController<MockMotor, MockSensor, MockReporter, MockButton>;

    fn controller(config: ScanConfig, sensor: MockSensor, button: MockButton) -> TestController {
        ScanController::new(config, MockMotor::new(), sensor, MockReporter::new(), button)
    }

    /// Tick until back in idle after a scan, returning the tick count
    fn run_cycle(c: &mut TestController, limit: u32) -> u32 {
        for n in 1..=limit {
            if c.tick() == TickOutcome::ScanComplete {
                return n;
            }
        }
        panic!("scan did not complete within {} ticks", limit);
    }

    #[test]
    fn test_idle_is_fixed_point() {
        let mut c = controller(
            ScanConfig::DEFAULT,
            MockSensor::default(),
            MockButton::released(),
        );

        for _ in 0..10_000 {
            assert_eq!(c.tick(), TickOutcome::Idle);
        }

        assert_eq!(c.state(), State::Idle);
        assert_eq!(c.motor().total_steps(), 0);
        assert_eq!(c.sensor().ready_polls(), 0);
        assert!(c.reporter().events().is_empty());
        assert_eq!(c.button().reads(), 10_000);
    }

    #[test]
    fn test_default_scan_scenario() {
        let mut c = controller(
            ScanConfig::DEFAULT,
            MockSensor::always_ready(DistanceReading::valid(500)),
            MockButton::tapped(),
        );

        assert_eq!(c.tick(), TickOutcome::ScanStarted);
        assert_eq!(c.state(), State::ScanningForward);

        // 512 forward steps and 512 return steps, one tick each
        assert_eq!(run_cycle(&mut c, 2_000), 1024);
        assert_eq!(c.state(), State::Idle);

        let reporter = c.reporter();
        assert_eq!(reporter.distances().count(), 32);
        assert_eq!(reporter.pulse_count(PulseKind::Measurement), 32);
        assert_eq!(reporter.pulse_count(PulseKind::ScanComplete), 1);
        assert_eq!(reporter.lines().count(), 32);

        // Each distance line is followed by its measurement pulse, and the
        // scan-complete pulse comes last
        let events = reporter.events();
        for pair in events[..64].chunks(2) {
            assert_eq!(pair[0], ReportEvent::Distance(500));
            assert_eq!(pair[1], ReportEvent::Pulse(PulseKind::Measurement));
        }
        assert_eq!(events[64], ReportEvent::Pulse(PulseKind::ScanComplete));
        assert_eq!(events.len(), 65);

        assert_eq!(c.motor().forward_steps(), 512);
        assert_eq!(c.motor().reverse_steps(), 512);
        assert_eq!(c.sensor().clears(), 32);
        assert_eq!(c.sensor().protocol_violations(), 0);
        assert_eq!(c.session().stats().scans_completed, 1);

        // Re-armed: no further activity without another press
        assert_eq!(c.tick(), TickOutcome::Idle);
    }

    #[test]
    fn test_distance_line_format() {
        let config = ScanConfig::new(1, 1, 1).unwrap();
        let mut c = controller(
            config,
            MockSensor::always_ready(DistanceReading::valid(1234)),
            MockButton::tapped(),
        );

        c.tick();
        assert_eq!(
            c.tick(),
            TickOutcome::Sampled {
                step: 0,
                reading: DistanceReading::valid(1234)
            }
        );
        assert_eq!(c.reporter().output(), "1234\r\n");
    }

    #[test]
    fn test_sample_steps_follow_cadence() {
        let config = ScanConfig::new(16, 4, 1).unwrap();
        let mut c = controller(config, MockSensor::default(), MockButton::tapped());
        c.tick();

        let mut sampled = std::vec::Vec::new();
        while c.state() == State::ScanningForward {
            if let TickOutcome::Sampled { step, .. } = c.tick() {
                sampled.push(step);
            }
        }
        assert_eq!(sampled, [0, 4, 8, 12]);
    }

    #[test]
    fn test_return_arc_never_samples() {
        let config = ScanConfig::new(8, 2, 1).unwrap();
        let mut c = controller(config, MockSensor::default(), MockButton::tapped());
        c.tick();
        while c.state() == State::ScanningForward {
            c.tick();
        }

        let polls = c.sensor().ready_polls();
        let reads = c.sensor().reads();
        let events = c.reporter().events().len();

        for step in 0..7 {
            assert_eq!(
                c.tick(),
                TickOutcome::Stepped {
                    direction: Direction::CounterClockwise,
                    step
                }
            );
        }
        assert_eq!(c.tick(), TickOutcome::ScanComplete);

        assert_eq!(c.motor().last_direction(), Some(Direction::CounterClockwise));
        assert_eq!(c.sensor().ready_polls(), polls);
        assert_eq!(c.sensor().reads(), reads);
        assert_eq!(c.reporter().events().len(), events + 1);
    }

    #[test]
    fn test_press_during_scan_ignored() {
        let config = ScanConfig::new(4, 2, 1).unwrap();
        let mut c = controller(config, MockSensor::default(), MockButton::held());

        c.tick();
        let reads = c.button().reads();
        run_cycle(&mut c, 100);

        // Not read at all while scanning
        assert_eq!(c.button().reads(), reads);
        assert_eq!(c.session().stats().scans_completed, 1);

        // Still held: a new scan starts from idle
        assert_eq!(c.tick(), TickOutcome::ScanStarted);
        run_cycle(&mut c, 100);

        c.button_mut().set_held(false);
        assert_eq!(c.tick(), TickOutcome::Idle);
    }

    #[test]
    fn test_sensor_never_ready_stalls_forward_arc() {
        // Liveness risk: no timeout exists, so the arc parks forever
        let config = ScanConfig::new(8, 4, 1).unwrap();
        let mut c = controller(config, MockSensor::never_ready(), MockButton::tapped());
        c.tick();

        for _ in 0..5_000 {
            assert_eq!(c.tick(), TickOutcome::AwaitingSample { step: 0 });
        }

        assert_eq!(c.state(), State::ScanningForward);
        assert_eq!(c.session().step(), 0);
        assert!(c.session().is_awaiting_sample());
        assert_eq!(c.motor().forward_steps(), 1);
        assert_eq!(c.sensor().reads(), 0);
        assert!(c.reporter().events().is_empty());
    }

    #[test]
    fn test_slow_sensor_waits_then_proceeds() {
        let config = ScanConfig::new(4, 4, 1).unwrap();
        let mut c = controller(config, MockSensor::ready_after(3), MockButton::tapped());
        c.tick();

        assert_eq!(c.tick(), TickOutcome::AwaitingSample { step: 0 });
        assert_eq!(c.tick(), TickOutcome::AwaitingSample { step: 0 });
        assert_eq!(c.tick(), TickOutcome::AwaitingSample { step: 0 });
        assert!(matches!(c.tick(), TickOutcome::Sampled { step: 0, .. }));

        // Motor stepped only once while waiting
        assert_eq!(c.motor().forward_steps(), 1);
        assert_eq!(c.session().step(), 1);
    }

    #[test]
    fn test_anomaly_still_reported() {
        let config = ScanConfig::new(2, 1, 1).unwrap();
        let sensor = MockSensor::always_ready(DistanceReading::valid(20))
            .with_script(&[DistanceReading::new(4, 8190)]);
        let mut c = controller(config, sensor, MockButton::tapped());
        run_cycle(&mut c, 10);

        assert_eq!(c.reporter().output(), "8190\r\n20\r\n");
        assert_eq!(c.session().stats().samples, 2);
        assert_eq!(c.session().stats().anomalies, 1);
    }

    #[test]
    fn test_failed_read_skips_slot() {
        let config = ScanConfig::new(4, 2, 1).unwrap();
        let mut c = controller(config, MockSensor::default().fail_reads(), MockButton::tapped());
        c.tick();

        assert_eq!(
            c.tick(),
            TickOutcome::SampleFailed {
                step: 0,
                error: MockSensorError::Bus
            }
        );
        run_cycle(&mut c, 20);

        // One attempt per slot, interrupt still cleared, nothing reported
        assert_eq!(c.sensor().reads(), 2);
        assert_eq!(c.sensor().clears(), 2);
        assert_eq!(c.session().stats().failed_reads, 2);
        assert_eq!(c.reporter().distances().count(), 0);
        assert_eq!(c.reporter().pulse_count(PulseKind::ScanComplete), 1);
    }

    #[test]
    fn test_failed_poll_keeps_waiting() {
        let config = ScanConfig::new(4, 2, 1).unwrap();
        let mut c = controller(config, MockSensor::default().fail_polls(), MockButton::tapped());
        c.tick();

        for _ in 0..10 {
            assert_eq!(
                c.tick(),
                TickOutcome::PollFailed {
                    step: 0,
                    error: MockSensorError::Bus
                }
            );
        }
        assert_eq!(c.state(), State::ScanningForward);
        assert_eq!(c.session().stats().failed_polls, 10);
        assert_eq!(c.motor().forward_steps(), 1);
    }

    #[test]
    fn test_failed_clear_is_counted() {
        let config = ScanConfig::new(2, 2, 1).unwrap();
        let mut c = controller(config, MockSensor::default().fail_clears(), MockButton::tapped());
        c.tick();

        assert!(matches!(c.tick(), TickOutcome::Sampled { step: 0, .. }));
        assert_eq!(c.session().stats().failed_clears, 1);
        assert_eq!(c.tick(), TickOutcome::ForwardArcComplete);
    }

    #[test]
    fn test_arc_end_on_sample_step_reports_sample() {
        // With an interval of 1 the last forward step is also a sample step
        let config = ScanConfig::new(2, 1, 1).unwrap();
        let mut c = controller(config, MockSensor::default(), MockButton::tapped());
        c.tick();

        assert!(matches!(c.tick(), TickOutcome::Sampled { step: 0, .. }));
        assert!(matches!(c.tick(), TickOutcome::Sampled { step: 1, .. }));
        assert_eq!(c.state(), State::ScanningReturn);
        assert_eq!(c.session().step(), 0);
    }

    #[test]
    fn test_two_consecutive_scans() {
        let config = ScanConfig::new(8, 4, 1).unwrap();
        let mut c = controller(config, MockSensor::default(), MockButton::tapped());
        run_cycle(&mut c, 100);

        c.button_mut().tap();
        run_cycle(&mut c, 100);

        assert_eq!(c.reporter().distances().count(), 4);
        assert_eq!(c.reporter().pulse_count(PulseKind::ScanComplete), 2);
        assert_eq!(c.session().stats().scans_completed, 2);
        assert_eq!(c.motor().position(), 0);
    }

    #[test]
    fn test_waiting_outcomes() {
        assert!(TickOutcome::<()>::Idle.is_waiting());
        assert!(TickOutcome::<()>::AwaitingSample { step: 3 }.is_waiting());
        assert!(TickOutcome::PollFailed { step: 3, error: () }.is_waiting());
        assert!(!TickOutcome::<()>::ScanStarted.is_waiting());
        assert!(!TickOutcome::<()>::ScanComplete.is_waiting());
    }

    fn valid_config() -> impl Strategy<Value = ScanConfig> {
        (1u16..=16, 1u16..=8).prop_map(|(arcs, interval)| {
            ScanConfig::new(arcs * interval, interval, 1).unwrap()
        })
    }

    fn any_phase() -> impl Strategy<Value = MotorPhase> {
        let phases: &'static [MotorPhase] = &MotorPhase::SEQUENCE;
        prop::sample::select(phases)
    }

    proptest! {
        #[test]
        fn prop_samples_per_arc(config in valid_config(), wait in 0u32..3) {
            let mut c = controller(config, MockSensor::ready_after(wait), MockButton::tapped());
            c.tick();

            let mut sampled = std::vec::Vec::new();
            while c.state() == State::ScanningForward {
                if let TickOutcome::Sampled { step, .. } = c.tick() {
                    sampled.push(step);
                }
            }

            let expected: std::vec::Vec<u16> = (0..config.total_steps())
                .filter(|s| s % config.sample_interval() == 0)
                .collect();
            prop_assert_eq!(sampled.len(), config.samples_per_arc() as usize);
            prop_assert_eq!(sampled, expected);
        }

        #[test]
        fn prop_cycle_restores_phase(config in valid_config(), start in any_phase()) {
            let mut c = ScanController::new(
                config,
                MockMotor::with_phase(start),
                MockSensor::default(),
                MockReporter::new(),
                MockButton::tapped(),
            );
            run_cycle(&mut c, 10_000);

            prop_assert_eq!(c.state(), State::Idle);
            prop_assert_eq!(c.motor().phase(), start);
            prop_assert_eq!(c.motor().position(), 0);
            prop_assert_eq!(c.reporter().pulse_count(PulseKind::ScanComplete), 1);
        }
    }
}
