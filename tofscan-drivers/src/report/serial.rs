//! Serial line reporter
//!
//! Writes report lines to a blocking `embedded_io` writer (UART at
//! 115200 8N1 on the board) and drives the status LEDs. Every distance
//! line also flashes the transmit LED.
//!
//! Write errors are dropped: the report channel has no failure mode, and
//! a lost line cannot be recovered anyway.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_io::Write;
use tofscan_core::config::IndicatorConfig;
use tofscan_core::report::{distance_line, LINE_TERMINATOR};
use tofscan_core::traits::{PulseKind, Reporter};

use crate::indicator::{LedBank, LedMask};

/// Reporter over a serial writer and an LED bank
pub struct SerialReporter<W, P, D> {
    writer: W,
    leds: LedBank<P>,
    delay: D,
    config: IndicatorConfig,
    dropped: u32,
}

impl<W, P, D> SerialReporter<W, P, D>
where
    W: Write,
    P: OutputPin,
    D: DelayNs,
{
    /// Create a reporter
    pub fn new(writer: W, leds: LedBank<P>, delay: D, config: IndicatorConfig) -> Self {
        Self {
            writer,
            leds,
            delay,
            config,
            dropped: 0,
        }
    }

    /// Lines that failed to write
    pub fn dropped_lines(&self) -> u32 {
        self.dropped
    }

    /// Flash every LED, e.g. while the sensor is held in reset
    pub fn flash_all(&mut self) {
        self.leds
            .flash(LedMask::ALL, &mut self.delay, self.config.pulse_ms);
    }

    fn write_line(&mut self, text: &str) {
        let result = self
            .writer
            .write_all(text.as_bytes())
            .and_then(|_| self.writer.write_all(LINE_TERMINATOR.as_bytes()))
            .and_then(|_| self.writer.flush());
        if result.is_err() {
            self.dropped = self.dropped.saturating_add(1);
        }
    }
}

impl<W, P, D> Reporter for SerialReporter<W, P, D>
where
    W: Write,
    P: OutputPin,
    D: DelayNs,
{
    fn report_line(&mut self, text: &str) {
        self.write_line(text);
    }

    fn report_distance(&mut self, mm: u16) {
        self.write_line(&distance_line(mm));
        self.leds
            .flash(LedMask::TRANSMIT, &mut self.delay, self.config.pulse_ms);
    }

    fn pulse(&mut self, kind: PulseKind) {
        self.leds.pulse(kind, &mut self.delay, self.config.pulse_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{FakeDelay, FakePin, FakeSerial};

    type TestReporter = SerialReporter<FakeSerial, FakePin, FakeDelay>;

    fn reporter() -> TestReporter {
        let leds = LedBank::new(core::array::from_fn(|_| FakePin::default()));
        SerialReporter::new(
            FakeSerial::default(),
            leds,
            FakeDelay::default(),
            IndicatorConfig::default(),
        )
    }

    #[test]
    fn test_distance_line() {
        let mut r = reporter();
        r.report_distance(1234);
        assert_eq!(r.writer.text(), "1234\r\n");
        // One transmit flash
        assert_eq!(r.delay.total_ms(), 10);
    }

    #[test]
    fn test_boot_lines() {
        let mut r = reporter();
        r.report_line("Program Begins");
        r.report_line("Sensor ID read");
        r.report_line("ToF Ready");
        assert_eq!(
            r.writer.text(),
            "Program Begins\r\nSensor ID read\r\nToF Ready\r\n"
        );
        // Status lines do not flash the transmit LED
        assert_eq!(r.delay.total_ms(), 0);
    }

    #[test]
    fn test_pulse_leaves_leds_off() {
        let mut r = reporter();
        r.pulse(PulseKind::Measurement);
        r.pulse(PulseKind::ScanComplete);
        r.flash_all();
        assert_eq!(r.delay.calls.len(), 3);
        assert_eq!(r.leds.lit(), LedMask::NONE);
    }

    #[test]
    fn test_write_errors_are_counted() {
        let mut r = reporter();
        r.writer.fail = true;
        r.report_distance(5);
        r.report_line("ToF Ready");
        assert_eq!(r.dropped_lines(), 2);
        assert!(r.writer.bytes.is_empty());
    }
}
