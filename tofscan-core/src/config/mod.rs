//! Configuration types
//!
//! Fixed configuration for the scanner. Values are compile-time constants
//! lifted into structs so tests can construct small configurations.

pub mod types;

pub use types::*;
