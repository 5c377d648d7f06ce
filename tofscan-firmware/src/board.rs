//! Board definition
//!
//! Pin map for a Raspberry Pi Pico wired to the scanner head:
//!
//! | Function | GPIO |
//! |----------|------|
//! | UART0 TX (report lines) | 0 |
//! | I2C0 SDA / SCL (VL53L1X) | 4 / 5 |
//! | VL53L1X XSHUT (open drain) | 6 |
//! | ULN2003 IN1..IN4 | 10..13 |
//! | Start button (to GND) | 15 |
//! | LED1..LED4 | 18..21 |

use embassy_rp::gpio::{Input, Output, OutputOpenDrain};
use embassy_rp::i2c::{Blocking as I2cBlocking, I2c};
use embassy_rp::peripherals::{I2C0, UART0};
use embassy_rp::uart::{Blocking as UartBlocking, UartTx};
use embassy_time::Delay;

use tofscan_core::config::SensorConfig;
use tofscan_drivers::input::GpioButton;
use tofscan_drivers::report::SerialReporter;
use tofscan_drivers::sensor::{Vl53l1x, XshutLine};
use tofscan_drivers::stepper::Uln2003Stepper;

/// Report UART baud rate (8N1)
pub const UART_BAUD: u32 = 115_200;

/// Sensor I2C bus frequency
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// Button poll interval while idle (ms)
pub const BUTTON_POLL_MS: u64 = 1;

pub type ScanMotor = Uln2003Stepper<Output<'static>, Delay>;
pub type ScanSensor = Vl53l1x<I2c<'static, I2C0, I2cBlocking>>;
pub type ScanReporter = SerialReporter<UartTx<'static, UART0, UartBlocking>, Output<'static>, Delay>;
pub type StartButton = GpioButton<Input<'static>>;
pub type SensorShutdown = XshutLine<OutputOpenDrain<'static>>;

/// Everything the scan task owns
pub struct ScanHardware {
    pub motor: ScanMotor,
    pub sensor: ScanSensor,
    pub reporter: ScanReporter,
    pub button: StartButton,
    pub xshut: SensorShutdown,
    pub sensor_config: SensorConfig,
}
