//! Scan execution
//!
//! [`ScanController`] drives one sweep cycle: a sampling forward arc
//! followed by a non-sampling return arc. [`ScanSession`] is the state it
//! threads through every operation.

pub mod controller;
pub mod session;

pub use controller::{ScanController, TickOutcome};
pub use session::{ScanSession, SessionStats};
