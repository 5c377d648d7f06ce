//! Distance sensor traits
//!
//! Split in two: [`SensorSampler`] is the per-scan capability the
//! controller uses, [`SensorService`] adds the bring-up operations used
//! once at boot.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single distance measurement
///
/// Transient: read, reported and discarded each sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistanceReading {
    /// Sensor range status (0 = valid). Not interpreted by the scanner.
    pub status: u8,
    /// Measured distance in millimeters
    pub distance_mm: u16,
}

impl DistanceReading {
    /// Create a reading
    pub const fn new(status: u8, distance_mm: u16) -> Self {
        Self {
            status,
            distance_mm,
        }
    }

    /// Create a reading with a valid status
    pub const fn valid(distance_mm: u16) -> Self {
        Self::new(0, distance_mm)
    }

    /// Check if the sensor flagged this reading
    pub fn is_anomaly(&self) -> bool {
        self.status != 0
    }
}

/// Per-sample sensor capability
///
/// None of these operations retry or time out internally.
pub trait SensorSampler {
    /// Transport error type
    type Error;

    /// Check whether a fresh measurement is available
    ///
    /// Non-blocking. Callers poll until this returns `true`.
    fn poll_ready(&mut self) -> Result<bool, Self::Error>;

    /// Consume the available measurement
    fn read_distance(&mut self) -> Result<DistanceReading, Self::Error>;

    /// Re-arm the sensor for the next measurement
    ///
    /// Must follow every read; skipping it stalls later reads.
    fn clear_interrupt(&mut self) -> Result<(), Self::Error>;
}

/// Bring-up capability for the distance sensor
pub trait SensorService: SensorSampler {
    /// Read the sensor model identifier
    fn sensor_id(&mut self) -> Result<u16, Self::Error>;

    /// Check whether the sensor firmware has finished booting
    fn boot_state(&mut self) -> Result<bool, Self::Error>;

    /// Load the default configuration
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Start continuous ranging
    fn start_ranging(&mut self) -> Result<(), Self::Error>;

    /// Stop ranging
    fn stop_ranging(&mut self) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anomaly_flag() {
        assert!(!DistanceReading::valid(1234).is_anomaly());
        assert!(DistanceReading::new(2, 1234).is_anomaly());
        assert!(DistanceReading::new(255, 0).is_anomaly());
    }
}
