//! Text report formatting
//!
//! Lines on the text channel are plain ASCII terminated by CR LF. The
//! terminator is appended by the [`Reporter`](crate::traits::Reporter)
//! implementation, not stored in the line.

use core::fmt::Write;

use heapless::String;

/// Maximum line length, excluding the terminator
pub const MAX_LINE_LEN: usize = 32;

/// Line terminator for the text channel
pub const LINE_TERMINATOR: &str = "\r\n";

/// First line after reset
pub const BOOT_BANNER: &str = "Program Begins";

/// Emitted after the sensor model id was read
pub const SENSOR_ID_READ: &str = "Sensor ID read";

/// Emitted once the sensor has booted
pub const SENSOR_READY: &str = "ToF Ready";

/// A single report line
pub type Line = String<MAX_LINE_LEN>;

/// Format a distance as its decimal value alone
pub fn distance_line(mm: u16) -> Line {
    let mut line = Line::new();
    // u16 needs at most 5 digits, well within MAX_LINE_LEN
    let _ = write!(line, "{}", mm);
    line
}
