//! Reporter implementations

pub mod serial;

pub use serial::SerialReporter;
