//! Pin, delay and serial fakes shared by the driver tests

use core::convert::Infallible;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

/// Output/input pin that remembers its level and every write
#[derive(Debug, Default)]
pub struct FakePin {
    pub high: bool,
    pub writes: u32,
}

impl FakePin {
    pub fn high() -> Self {
        Self {
            high: true,
            writes: 0,
        }
    }
}

impl ErrorType for FakePin {
    type Error = Infallible;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        self.writes += 1;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        self.writes += 1;
        Ok(())
    }
}

impl InputPin for FakePin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.high)
    }
}

/// Delay that records requested durations instead of sleeping
#[derive(Debug, Default)]
pub struct FakeDelay {
    pub calls: Vec<u32>,
    pub total_ns: u64,
}

impl FakeDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.calls.push(ns);
        self.total_ns += ns as u64;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay_ns(ms * 1_000_000);
    }
}

/// Serial sink capturing written bytes
#[derive(Debug, Default)]
pub struct FakeSerial {
    pub bytes: Vec<u8>,
    pub fail: bool,
}

impl FakeSerial {
    pub fn text(&self) -> &str {
        core::str::from_utf8(&self.bytes).unwrap()
    }
}

impl embedded_io::ErrorType for FakeSerial {
    type Error = embedded_io::ErrorKind;
}

impl embedded_io::Write for FakeSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.fail {
            return Err(embedded_io::ErrorKind::Other);
        }
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
