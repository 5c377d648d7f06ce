//! Configuration type definitions
//!
//! These types represent the scanner configuration. There is no runtime
//! configuration surface; the firmware uses the `DEFAULT` constants.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Controller steps in one full rotation
pub const TOTAL_STEPS: u16 = 512;

/// Steps between two distance samples
pub const SAMPLE_INTERVAL: u16 = 16;

/// Per-step dwell in units of 10 ms
pub const STEP_DELAY_UNIT: u8 = 1;

/// Duration of one step delay unit in milliseconds
pub const STEP_DELAY_UNIT_MS: u32 = 10;

/// Default 7-bit I2C address of the VL53L1X
pub const SENSOR_I2C_ADDRESS: u8 = 0x29;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Total step count is zero
    ZeroTotalSteps,
    /// Sample interval is zero
    ZeroSampleInterval,
    /// Step delay unit is zero
    ZeroStepDelay,
    /// Sample interval does not evenly divide the total step count
    IntervalNotDivisor,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            ConfigError::ZeroTotalSteps => "total_steps must be non-zero",
            ConfigError::ZeroSampleInterval => "sample_interval must be non-zero",
            ConfigError::ZeroStepDelay => "step_delay_unit must be non-zero",
            ConfigError::IntervalNotDivisor => "sample_interval must divide total_steps",
        };
        f.write_str(msg)
    }
}

/// Scan geometry and timing
///
/// Immutable for the lifetime of a [`ScanController`](crate::scan::ScanController).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "RawScanConfig", into = "RawScanConfig")
)]
pub struct ScanConfig {
    /// Steps per arc (one full rotation)
    total_steps: u16,
    /// Steps between samples on the forward arc
    sample_interval: u16,
    /// Dwell per coil pattern, in 10 ms units
    step_delay_unit: u8,
}

/// Unvalidated [`ScanConfig`] fields
///
/// Deserialized configurations pass through [`ScanConfig::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawScanConfig {
    pub total_steps: u16,
    pub sample_interval: u16,
    pub step_delay_unit: u8,
}

impl TryFrom<RawScanConfig> for ScanConfig {
    type Error = ConfigError;

    fn try_from(raw: RawScanConfig) -> Result<Self, Self::Error> {
        Self::new(raw.total_steps, raw.sample_interval, raw.step_delay_unit)
    }
}

impl From<ScanConfig> for RawScanConfig {
    fn from(config: ScanConfig) -> Self {
        Self {
            total_steps: config.total_steps,
            sample_interval: config.sample_interval,
            step_delay_unit: config.step_delay_unit,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ScanConfig {
    /// 512 steps, a sample every 16 steps, 10 ms dwell
    pub const DEFAULT: Self = Self {
        total_steps: TOTAL_STEPS,
        sample_interval: SAMPLE_INTERVAL,
        step_delay_unit: STEP_DELAY_UNIT,
    };

    /// Create a validated configuration
    pub fn new(
        total_steps: u16,
        sample_interval: u16,
        step_delay_unit: u8,
    ) -> Result<Self, ConfigError> {
        if total_steps == 0 {
            return Err(ConfigError::ZeroTotalSteps);
        }
        if sample_interval == 0 {
            return Err(ConfigError::ZeroSampleInterval);
        }
        if step_delay_unit == 0 {
            return Err(ConfigError::ZeroStepDelay);
        }
        if total_steps % sample_interval != 0 {
            return Err(ConfigError::IntervalNotDivisor);
        }

        Ok(Self {
            total_steps,
            sample_interval,
            step_delay_unit,
        })
    }

    /// Steps per arc
    pub fn total_steps(&self) -> u16 {
        self.total_steps
    }

    /// Steps between samples
    pub fn sample_interval(&self) -> u16 {
        self.sample_interval
    }

    /// Dwell unit multiplier
    pub fn step_delay_unit(&self) -> u8 {
        self.step_delay_unit
    }

    /// Dwell per coil pattern in milliseconds
    pub fn step_dwell_ms(&self) -> u32 {
        self.step_delay_unit as u32 * STEP_DELAY_UNIT_MS
    }

    /// Number of samples taken on one forward arc
    pub fn samples_per_arc(&self) -> u16 {
        self.total_steps / self.sample_interval
    }

    /// Whether a sample is due at the given forward step
    pub fn is_sample_step(&self, step: u16) -> bool {
        step % self.sample_interval == 0
    }

    /// Angular size of one step in hundredths of a degree
    ///
    /// For the default 512 steps this is 70 (0.70°, truncated from 0.703°).
    pub fn degrees_per_step_x100(&self) -> u32 {
        36_000 / self.total_steps as u32
    }

    /// Angle of a forward step in hundredths of a degree
    pub fn step_angle_x100(&self, step: u16) -> u32 {
        step as u32 * 36_000 / self.total_steps as u32
    }
}

/// Distance sensor bring-up and polling parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorConfig {
    /// 7-bit I2C address
    pub address: u8,
    /// Wait between boot state polls (ms)
    pub boot_poll_ms: u32,
    /// Wait between data-ready polls during a scan (ms)
    pub data_ready_poll_ms: u32,
    /// How long XSHUT is held low during bring-up (ms)
    pub reset_pulse_ms: u32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            address: SENSOR_I2C_ADDRESS,
            boot_poll_ms: 100,
            data_ready_poll_ms: 5,
            reset_pulse_ms: 100,
        }
    }
}

/// Indicator LED timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndicatorConfig {
    /// On-time of a single pulse (ms)
    pub pulse_ms: u32,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self { pulse_ms: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let config = ScanConfig::DEFAULT;
        assert_eq!(config.total_steps(), 512);
        assert_eq!(config.sample_interval(), 16);
        assert_eq!(config.samples_per_arc(), 32);
        assert_eq!(config.step_dwell_ms(), 10);
        assert_eq!(config.degrees_per_step_x100(), 70);
    }

    #[test]
    fn test_sample_steps() {
        let config = ScanConfig::DEFAULT;
        assert!(config.is_sample_step(0));
        assert!(!config.is_sample_step(1));
        assert!(!config.is_sample_step(15));
        assert!(config.is_sample_step(16));
        assert!(config.is_sample_step(496));
    }

    #[test]
    fn test_step_angle() {
        let config = ScanConfig::DEFAULT;
        assert_eq!(config.step_angle_x100(0), 0);
        assert_eq!(config.step_angle_x100(128), 9_000);
        assert_eq!(config.step_angle_x100(256), 18_000);
    }

    #[test]
    fn test_validation() {
        assert_eq!(ScanConfig::new(0, 1, 1), Err(ConfigError::ZeroTotalSteps));
        assert_eq!(ScanConfig::new(8, 0, 1), Err(ConfigError::ZeroSampleInterval));
        assert_eq!(ScanConfig::new(8, 2, 0), Err(ConfigError::ZeroStepDelay));
        assert_eq!(ScanConfig::new(10, 4, 1), Err(ConfigError::IntervalNotDivisor));

        let config = ScanConfig::new(8, 4, 2).unwrap();
        assert_eq!(config.samples_per_arc(), 2);
        assert_eq!(config.step_dwell_ms(), 20);
    }

    #[test]
    fn test_raw_config_is_validated() {
        let raw = RawScanConfig {
            total_steps: 8,
            sample_interval: 0,
            step_delay_unit: 1,
        };
        assert_eq!(ScanConfig::try_from(raw), Err(ConfigError::ZeroSampleInterval));

        let raw = RawScanConfig::from(ScanConfig::DEFAULT);
        assert_eq!(ScanConfig::try_from(raw), Ok(ScanConfig::DEFAULT));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_rejects_zero_interval() {
        use serde::de::value::{Error as ValueError, MapDeserializer};
        use serde::Deserialize;

        let fields = [
            ("total_steps", 8u16),
            ("sample_interval", 0u16),
            ("step_delay_unit", 1u16),
        ];
        let de = MapDeserializer::<_, ValueError>::new(fields.into_iter());
        assert!(ScanConfig::deserialize(de).is_err());

        let fields = [
            ("total_steps", 8u16),
            ("sample_interval", 4u16),
            ("step_delay_unit", 1u16),
        ];
        let de = MapDeserializer::<_, ValueError>::new(fields.into_iter());
        let config = ScanConfig::deserialize(de).unwrap();
        assert_eq!(config.samples_per_arc(), 2);
    }

    #[test]
    fn test_sensor_defaults() {
        let config = SensorConfig::default();
        assert_eq!(config.address, 0x29);
        assert_eq!(config.boot_poll_ms, 100);
        assert_eq!(config.data_ready_poll_ms, 5);
    }
}
