//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in tofscan-core, built on `embedded-hal` 1.0 and `embedded-io`:
//!
//! - Stepper driver (ULN2003 4-coil unipolar)
//! - Distance sensor (VL53L1X over I2C) and its XSHUT reset line
//! - Indicator LEDs and the serial line reporter
//! - Start button

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod indicator;
pub mod input;
pub mod report;
pub mod sensor;
pub mod stepper;

#[cfg(test)]
mod fakes;
