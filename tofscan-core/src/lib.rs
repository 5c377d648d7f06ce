//! Board-agnostic core logic for the rotary ToF scanner firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (motor, sensor, reporter, button)
//! - Scan state machine and controller
//! - Sensor boot sequence
//! - Report line formatting
//! - Configuration type definitions
//! - In-memory doubles for host testing (`mock` feature)

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod boot;
pub mod config;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod report;
pub mod scan;
pub mod state;
pub mod traits;
