//! Distance sensor implementations

pub mod reset;
pub mod vl53l1x;

pub use reset::XshutLine;
pub use vl53l1x::{Vl53l1x, Vl53l1xError};
