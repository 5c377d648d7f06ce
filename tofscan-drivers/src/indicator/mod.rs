//! Indicator LED implementations

pub mod led;

pub use led::{Led, LedBank, LedMask};
