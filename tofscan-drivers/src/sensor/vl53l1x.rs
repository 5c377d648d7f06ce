//! VL53L1X time-of-flight sensor (I2C)
//!
//! Register-level driver for the ST VL53L1X, following the ultra-lite
//! driver's register map. Only the operations the scanner needs are
//! implemented: identification, boot check, default configuration,
//! continuous ranging and interrupt-driven readout.
//!
//! # I2C Protocol
//!
//! Registers are addressed with a 16-bit big-endian index:
//! - Write: `[index_hi, index_lo, data...]`
//! - Read: write `[index_hi, index_lo]`, then read N bytes
//!
//! Multi-byte values are big-endian.

use embedded_hal::i2c::I2c;
use tofscan_core::traits::{DistanceReading, SensorSampler, SensorService};

/// VL53L1X register indices
pub mod reg {
    /// VHV timeout macro loop bound
    pub const VHV_CONFIG_TIMEOUT_MACROP_LOOP_BOUND: u16 = 0x0008;
    /// VHV init (temperature compensation start)
    pub const VHV_CONFIG_INIT: u16 = 0x000B;
    /// First register of the default configuration block
    pub const DEFAULT_CONFIG_START: u16 = 0x002D;
    /// GPIO interrupt polarity (bit 4)
    pub const GPIO_HV_MUX_CTRL: u16 = 0x0030;
    /// GPIO interrupt status (bit 0)
    pub const GPIO_TIO_HV_STATUS: u16 = 0x0031;
    /// Interrupt clear
    pub const SYSTEM_INTERRUPT_CLEAR: u16 = 0x0086;
    /// Ranging mode start/stop
    pub const SYSTEM_MODE_START: u16 = 0x0087;
    /// Range status of the last measurement (bits 4:0)
    pub const RESULT_RANGE_STATUS: u16 = 0x0089;
    /// Final crosstalk-corrected range (mm)
    pub const RESULT_FINAL_RANGE_MM: u16 = 0x0096;
    /// Firmware boot state (bit 0)
    pub const FIRMWARE_SYSTEM_STATUS: u16 = 0x00E5;
    /// Model identification
    pub const IDENTIFICATION_MODEL_ID: u16 = 0x010F;
}

/// Default 7-bit I2C address
pub const DEFAULT_ADDRESS: u8 = 0x29;

/// Expected value of [`reg::IDENTIFICATION_MODEL_ID`]
pub const MODEL_ID: u16 = 0xEACC;

/// [`reg::SYSTEM_MODE_START`] value for continuous ranging
const MODE_START_CONTINUOUS: u8 = 0x40;

/// [`reg::SYSTEM_MODE_START`] value to stop ranging
const MODE_STOP: u8 = 0x00;

/// Data-ready polls allowed for the calibration ranging in `init`
pub const INIT_READY_POLL_LIMIT: u32 = 10_000;

/// Default configuration written to `0x2D..=0x87` by `init`
pub const DEFAULT_CONFIGURATION: [u8; 91] = [
    0x00, 0x00, 0x00, 0x01, 0x02, 0x00, 0x02, 0x08, // 0x2D
    0x00, 0x08, 0x10, 0x01, 0x01, 0x00, 0x00, 0x00, // 0x35
    0x00, 0xFF, 0x00, 0x0F, 0x00, 0x00, 0x00, 0x00, // 0x3D
    0x00, 0x20, 0x0B, 0x00, 0x00, 0x02, 0x0A, 0x21, // 0x45
    0x00, 0x00, 0x05, 0x00, 0x00, 0x00, 0x00, 0xC8, // 0x4D
    0x00, 0x00, 0x38, 0xFF, 0x01, 0x00, 0x08, 0x00, // 0x55
    0x00, 0x01, 0xCC, 0x0F, 0x01, 0xF1, 0x0D, 0x01, // 0x5D
    0x68, 0x00, 0x80, 0x08, 0xB8, 0x00, 0x00, 0x00, // 0x65
    0x00, 0x0F, 0x89, 0x00, 0x00, 0x00, 0x00, 0x00, // 0x6D
    0x00, 0x00, 0x01, 0x0F, 0x0D, 0x0E, 0x0E, 0x00, // 0x75
    0x00, 0x02, 0xC7, 0xFF, 0x9B, 0x00, 0x00, 0x00, // 0x7D
    0x01, 0x01, 0x00, // 0x85
];

/// Longest register write payload, the default configuration block
pub const MAX_WRITE_PAYLOAD: usize = DEFAULT_CONFIGURATION.len();

/// Raw range status to reported status
///
/// 0 is a valid range; 255 marks a raw code without a mapping.
const RANGE_STATUS_MAP: [u8; 24] = [
    255, 255, 255, 5, 2, 4, 1, 7, 3, 0, 255, 255, 9, 13, 255, 255, 255, 255, 10, 6, 255, 255,
    11, 12,
];

/// Status for raw codes outside [`RANGE_STATUS_MAP`]
pub const RANGE_STATUS_UNKNOWN: u8 = 255;

/// Map a raw `RESULT_RANGE_STATUS` value to the reported status
pub fn map_range_status(raw: u8) -> u8 {
    RANGE_STATUS_MAP
        .get((raw & 0x1F) as usize)
        .copied()
        .unwrap_or(RANGE_STATUS_UNKNOWN)
}

/// VL53L1X errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Vl53l1xError<E> {
    /// Bus transaction failed
    I2c(E),
    /// Calibration ranging during `init` never became ready
    InitTimeout,
}

impl<E> From<E> for Vl53l1xError<E> {
    fn from(e: E) -> Self {
        Vl53l1xError::I2c(e)
    }
}

/// VL53L1X driver
pub struct Vl53l1x<I> {
    i2c: I,
    address: u8,
    /// Level of the GPIO status bit that signals data ready
    ready_level: Option<bool>,
}

impl<I: I2c> Vl53l1x<I> {
    /// Create a driver at the default address
    pub fn new(i2c: I) -> Self {
        Self::with_address(i2c, DEFAULT_ADDRESS)
    }

    /// Create a driver at `address`
    pub fn with_address(i2c: I, address: u8) -> Self {
        Self {
            i2c,
            address,
            ready_level: None,
        }
    }

    /// Get the 7-bit I2C address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Release the bus
    pub fn release(self) -> I {
        self.i2c
    }

    fn write_bytes<const N: usize>(
        &mut self,
        index: u16,
        data: &[u8; N],
    ) -> Result<(), Vl53l1xError<I::Error>> {
        const { assert!(N <= MAX_WRITE_PAYLOAD, "register write payload too long") };

        // Index plus payload; N + 2 is not expressible as a const array length
        let mut buf = [0u8; MAX_WRITE_PAYLOAD + 2];
        let len = N + 2;
        buf[..2].copy_from_slice(&index.to_be_bytes());
        buf[2..len].copy_from_slice(data);
        self.i2c.write(self.address, &buf[..len])?;
        Ok(())
    }

    fn write_u8(&mut self, index: u16, value: u8) -> Result<(), Vl53l1xError<I::Error>> {
        self.write_bytes(index, &[value])
    }

    fn read_u8(&mut self, index: u16) -> Result<u8, Vl53l1xError<I::Error>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &index.to_be_bytes(), &mut buf)?;
        Ok(buf[0])
    }

    fn read_u16(&mut self, index: u16) -> Result<u16, Vl53l1xError<I::Error>> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &index.to_be_bytes(), &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Level of the status bit that means "data ready"
    ///
    /// Polarity bit set means active low.
    fn ready_level(&mut self) -> Result<bool, Vl53l1xError<I::Error>> {
        if let Some(level) = self.ready_level {
            return Ok(level);
        }
        let level = self.read_u8(reg::GPIO_HV_MUX_CTRL)? & 0x10 == 0;
        self.ready_level = Some(level);
        Ok(level)
    }

    /// Check the data-ready status
    pub fn data_ready(&mut self) -> Result<bool, Vl53l1xError<I::Error>> {
        let level = self.ready_level()?;
        let status = self.read_u8(reg::GPIO_TIO_HV_STATUS)? & 0x01 != 0;
        Ok(status == level)
    }

    /// Read the model id
    pub fn model_id(&mut self) -> Result<u16, Vl53l1xError<I::Error>> {
        self.read_u16(reg::IDENTIFICATION_MODEL_ID)
    }

    /// Check the firmware boot state
    pub fn is_booted(&mut self) -> Result<bool, Vl53l1xError<I::Error>> {
        Ok(self.read_u8(reg::FIRMWARE_SYSTEM_STATUS)? & 0x01 != 0)
    }

    /// Read the mapped range status of the last measurement
    pub fn range_status(&mut self) -> Result<u8, Vl53l1xError<I::Error>> {
        Ok(map_range_status(self.read_u8(reg::RESULT_RANGE_STATUS)?))
    }

    /// Read the last measured distance (mm)
    pub fn distance_mm(&mut self) -> Result<u16, Vl53l1xError<I::Error>> {
        self.read_u16(reg::RESULT_FINAL_RANGE_MM)
    }

    /// Load the default configuration and run the first calibration ranging
    pub fn configure(&mut self) -> Result<(), Vl53l1xError<I::Error>> {
        self.write_bytes(reg::DEFAULT_CONFIG_START, &DEFAULT_CONFIGURATION)?;
        self.ready_level = None;

        self.write_u8(reg::SYSTEM_MODE_START, MODE_START_CONTINUOUS)?;
        let mut polls = 0;
        while !self.data_ready()? {
            polls += 1;
            if polls >= INIT_READY_POLL_LIMIT {
                return Err(Vl53l1xError::InitTimeout);
            }
        }
        self.write_u8(reg::SYSTEM_INTERRUPT_CLEAR, 0x01)?;
        self.write_u8(reg::SYSTEM_MODE_START, MODE_STOP)?;

        // Two bounds for VHV, then start VHV from the previous temperature
        self.write_u8(reg::VHV_CONFIG_TIMEOUT_MACROP_LOOP_BOUND, 0x09)?;
        self.write_u8(reg::VHV_CONFIG_INIT, 0x00)?;
        Ok(())
    }
}

impl<I: I2c> SensorSampler for Vl53l1x<I> {
    type Error = Vl53l1xError<I::Error>;

    fn poll_ready(&mut self) -> Result<bool, Self::Error> {
        self.data_ready()
    }

    fn read_distance(&mut self) -> Result<DistanceReading, Self::Error> {
        let status = self.range_status()?;
        let distance_mm = self.distance_mm()?;
        Ok(DistanceReading::new(status, distance_mm))
    }

    fn clear_interrupt(&mut self) -> Result<(), Self::Error> {
        self.write_u8(reg::SYSTEM_INTERRUPT_CLEAR, 0x01)
    }
}

impl<I: I2c> SensorService for Vl53l1x<I> {
    fn sensor_id(&mut self) -> Result<u16, Self::Error> {
        self.model_id()
    }

    fn boot_state(&mut self) -> Result<bool, Self::Error> {
        self.is_booted()
    }

    fn init(&mut self) -> Result<(), Self::Error> {
        self.configure()
    }

    fn start_ranging(&mut self) -> Result<(), Self::Error> {
        self.write_u8(reg::SYSTEM_MODE_START, MODE_START_CONTINUOUS)
    }

    fn stop_ranging(&mut self) -> Result<(), Self::Error> {
        self.write_u8(reg::SYSTEM_MODE_START, MODE_STOP)
    }
}
