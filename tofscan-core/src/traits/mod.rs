//! Hardware abstraction traits
//!
//! These traits define the interface between the scan logic and
//! hardware-specific implementations.

pub mod input;
pub mod motor;
pub mod reporter;
pub mod sensor;

pub use input::Button;
pub use motor::{CoilSequence, Direction, MotorActuator, MotorPhase};
pub use reporter::{PulseKind, Reporter};
pub use sensor::{DistanceReading, SensorSampler, SensorService};
