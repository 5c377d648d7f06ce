//! In-memory doubles for host testing
//!
//! Deterministic implementations of the hardware traits that record every
//! call, so the scan and boot state machines can be exercised without
//! hardware.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled

mod button;
mod motor;
mod reporter;
mod sensor;

pub use button::MockButton;
pub use motor::MockMotor;
pub use reporter::{MockReporter, ReportEvent};
pub use sensor::{MockSensor, MockSensorError};
