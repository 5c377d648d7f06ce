//! Mock report sink

use heapless::{String, Vec};

use crate::report::{distance_line, Line, LINE_TERMINATOR};
use crate::traits::{PulseKind, Reporter};

/// Capacity of the recorded event log
pub const MAX_EVENTS: usize = 512;

/// Capacity of the captured text output in bytes
pub const MAX_OUTPUT: usize = 4096;

/// One observable reporter call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    /// A status line was emitted
    Line(Line),
    /// A distance line was emitted
    Distance(u16),
    /// An indicator pulse was triggered
    Pulse(PulseKind),
}

/// Mock reporter that captures the raw text stream and a call log
///
/// Panics once output or events exceed the fixed capacities.
#[derive(Debug, Default)]
pub struct MockReporter {
    output: String<MAX_OUTPUT>,
    events: Vec<ReportEvent, MAX_EVENTS>,
}

impl MockReporter {
    /// Create an empty reporter
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw bytes written to the text channel, terminators included
    pub fn output(&self) -> &str {
        self.output.as_str()
    }

    /// Lines written to the text channel, terminators stripped
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.output.split_terminator(LINE_TERMINATOR)
    }

    /// Every call in order
    pub fn events(&self) -> &[ReportEvent] {
        &self.events
    }

    /// Distances reported, in order
    pub fn distances(&self) -> impl Iterator<Item = u16> + '_ {
        self.events.iter().filter_map(|e| match e {
            ReportEvent::Distance(mm) => Some(*mm),
            _ => None,
        })
    }

    /// Number of pulses of `kind`
    pub fn pulse_count(&self, kind: PulseKind) -> usize {
        self.events
            .iter()
            .filter(|e| **e == ReportEvent::Pulse(kind))
            .count()
    }

    fn write_line(&mut self, text: &str) {
        self.output
            .push_str(text)
            .and_then(|_| self.output.push_str(LINE_TERMINATOR))
            .expect("MockReporter output capacity exceeded");
    }

    fn record(&mut self, event: ReportEvent) {
        self.events
            .push(event)
            .expect("MockReporter event capacity exceeded");
    }
}

impl Reporter for MockReporter {
    fn report_line(&mut self, text: &str) {
        self.write_line(text);
        let mut line = Line::new();
        line.push_str(text).expect("report line too long");
        self.record(ReportEvent::Line(line));
    }

    fn report_distance(&mut self, mm: u16) {
        self.write_line(&distance_line(mm));
        self.record(ReportEvent::Distance(mm));
    }

    fn pulse(&mut self, kind: PulseKind) {
        self.record(ReportEvent::Pulse(kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_output_is_crlf_terminated() {
        let mut reporter = MockReporter::new();
        reporter.report_distance(1234);
        assert_eq!(reporter.output(), "1234\r\n");
        assert_eq!(reporter.events(), &[ReportEvent::Distance(1234)]);
    }

    #[test]
    fn test_lines_and_pulses() {
        let mut reporter = MockReporter::new();
        reporter.report_line("Program Begins");
        reporter.pulse(PulseKind::SensorReady);
        reporter.report_distance(7);

        let mut lines = reporter.lines();
        assert_eq!(lines.next(), Some("Program Begins"));
        assert_eq!(lines.next(), Some("7"));
        assert_eq!(lines.next(), None);
        assert_eq!(reporter.pulse_count(PulseKind::SensorReady), 1);
        assert_eq!(reporter.pulse_count(PulseKind::Measurement), 0);
    }

    #[test]
    #[should_panic(expected = "event capacity exceeded")]
    fn test_event_overflow_panics() {
        let mut reporter = MockReporter::new();
        for _ in 0..=MAX_EVENTS {
            reporter.pulse(PulseKind::Measurement);
        }
    }

    #[test]
    #[should_panic(expected = "output capacity exceeded")]
    fn test_output_overflow_panics() {
        let mut reporter = MockReporter::new();
        // 30 characters plus CR LF
        let text = "012345678901234567890123456789";
        for _ in 0..=MAX_OUTPUT / 32 {
            reporter.report_line(text);
        }
    }
}
