//! Report and indicator sink trait

use crate::report::distance_line;

/// Indicator pulse kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulseKind {
    /// A distance sample was taken
    Measurement,
    /// A full forward+return cycle finished
    ScanComplete,
    /// The sensor finished booting
    SensorReady,
}

/// Text channel and indicator lights
///
/// Purely observational: no return values and no failure modes. Transport
/// errors are swallowed by implementations.
pub trait Reporter {
    /// Emit `text` followed by CR LF
    fn report_line(&mut self, text: &str);

    /// Emit a distance as a decimal line, e.g. `1234\r\n`
    fn report_distance(&mut self, mm: u16) {
        let line = distance_line(mm);
        self.report_line(&line);
    }

    /// Trigger a short indicator signal
    fn pulse(&mut self, kind: PulseKind);
}
