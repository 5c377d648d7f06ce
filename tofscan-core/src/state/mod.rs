//! State machine for scan execution
//!
//! Defines the authoritative runtime behavior of the scanner.
//! The state machine is explicit, finite, and deterministic.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::State;
