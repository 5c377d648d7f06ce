//! Mock distance sensor
//!
//! Models the interrupt handshake of a real ranging sensor: after a read
//! the sensor reports "not ready" until the interrupt is cleared, and a
//! fresh measurement becomes ready after a configurable number of polls.

use heapless::Deque;

use crate::traits::{DistanceReading, SensorSampler, SensorService};

/// Capacity of the scripted reading queue
pub const MAX_SCRIPTED_READINGS: usize = 64;

/// Model id reported by [`MockSensor`]
pub const MOCK_SENSOR_ID: u16 = 0xEACC;

/// Errors injected by [`MockSensor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MockSensorError {
    /// Simulated bus failure
    Bus,
}

/// Mock sensor with scripted readiness and readings
#[derive(Debug)]
pub struct MockSensor {
    /// Polls returning `false` before each measurement becomes ready
    polls_per_measurement: Option<u32>,
    /// Boot state polls returning `false` before the sensor is booted
    boot_polls_needed: Option<u32>,
    /// Readings returned in order; `fallback` once empty
    script: Deque<DistanceReading, MAX_SCRIPTED_READINGS>,
    fallback: DistanceReading,
    fail_polls: bool,
    fail_reads: bool,
    fail_clears: bool,

    polls_since_clear: u32,
    awaiting_clear: bool,
    boot_polls: u32,
    ready_polls: u32,
    reads: u32,
    clears: u32,
    protocol_violations: u32,
    initialized: bool,
    ranging: bool,
}

impl Default for MockSensor {
    fn default() -> Self {
        Self::always_ready(DistanceReading::valid(1000))
    }
}

impl MockSensor {
    /// Sensor that is ready on the first poll of every sample slot
    pub fn always_ready(reading: DistanceReading) -> Self {
        Self {
            polls_per_measurement: Some(0),
            boot_polls_needed: Some(0),
            script: Deque::new(),
            fallback: reading,
            fail_polls: false,
            fail_reads: false,
            fail_clears: false,
            polls_since_clear: 0,
            awaiting_clear: false,
            boot_polls: 0,
            ready_polls: 0,
            reads: 0,
            clears: 0,
            protocol_violations: 0,
            initialized: false,
            ranging: false,
        }
    }

    /// Sensor that never reports a measurement ready
    pub fn never_ready() -> Self {
        Self {
            polls_per_measurement: None,
            ..Self::default()
        }
    }

    /// Sensor that needs `polls` not-ready polls before each measurement
    pub fn ready_after(polls: u32) -> Self {
        Self {
            polls_per_measurement: Some(polls),
            ..Self::default()
        }
    }

    /// Require `polls` not-booted boot state polls; `None` never boots
    pub fn with_boot_polls(mut self, polls: Option<u32>) -> Self {
        self.boot_polls_needed = polls;
        self
    }

    /// Queue readings returned before the fallback
    pub fn with_script(mut self, readings: &[DistanceReading]) -> Self {
        for reading in readings {
            let _ = self.script.push_back(*reading);
        }
        self
    }

    /// Make every ready poll fail with a bus error
    pub fn fail_polls(mut self) -> Self {
        self.fail_polls = true;
        self
    }

    /// Make every distance read fail with a bus error
    pub fn fail_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Make every interrupt clear fail with a bus error
    pub fn fail_clears(mut self) -> Self {
        self.fail_clears = true;
        self
    }

    /// Number of data-ready polls
    pub fn ready_polls(&self) -> u32 {
        self.ready_polls
    }

    /// Number of boot state polls
    pub fn boot_polls(&self) -> u32 {
        self.boot_polls
    }

    /// Number of distance reads attempted
    pub fn reads(&self) -> u32 {
        self.reads
    }

    /// Number of interrupt clears attempted
    pub fn clears(&self) -> u32 {
        self.clears
    }

    /// Reads attempted while no measurement was ready
    pub fn protocol_violations(&self) -> u32 {
        self.protocol_violations
    }

    /// Whether `init` was called
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether ranging is active
    pub fn is_ranging(&self) -> bool {
        self.ranging
    }

    fn measurement_ready(&self) -> bool {
        match self.polls_per_measurement {
            Some(needed) => !self.awaiting_clear && self.polls_since_clear > needed,
            None => false,
        }
    }
}

impl SensorSampler for MockSensor {
    type Error = MockSensorError;

    fn poll_ready(&mut self) -> Result<bool, Self::Error> {
        self.ready_polls += 1;
        if self.fail_polls {
            return Err(MockSensorError::Bus);
        }
        if !self.awaiting_clear {
            self.polls_since_clear = self.polls_since_clear.saturating_add(1);
        }
        Ok(self.measurement_ready())
    }

    fn read_distance(&mut self) -> Result<DistanceReading, Self::Error> {
        self.reads += 1;
        if self.fail_reads {
            self.awaiting_clear = true;
            return Err(MockSensorError::Bus);
        }
        if !self.measurement_ready() {
            self.protocol_violations += 1;
        }
        self.awaiting_clear = true;
        Ok(self.script.pop_front().unwrap_or(self.fallback))
    }

    fn clear_interrupt(&mut self) -> Result<(), Self::Error> {
        self.clears += 1;
        if self.fail_clears {
            return Err(MockSensorError::Bus);
        }
        self.awaiting_clear = false;
        self.polls_since_clear = 0;
        Ok(())
    }
}

impl SensorService for MockSensor {
    fn sensor_id(&mut self) -> Result<u16, Self::Error> {
        Ok(MOCK_SENSOR_ID)
    }

    fn boot_state(&mut self) -> Result<bool, Self::Error> {
        self.boot_polls += 1;
        Ok(match self.boot_polls_needed {
            Some(needed) => self.boot_polls > needed,
            None => false,
        })
    }

    fn init(&mut self) -> Result<(), Self::Error> {
        self.initialized = true;
        Ok(())
    }

    fn start_ranging(&mut self) -> Result<(), Self::Error> {
        self.ranging = true;
        Ok(())
    }

    fn stop_ranging(&mut self) -> Result<(), Self::Error> {
        self.ranging = false;
        Ok(())
    }
}
