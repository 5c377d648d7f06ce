//! Stepper driver implementations

pub mod uln2003;

pub use uln2003::{StepperConfig, Uln2003Stepper};
