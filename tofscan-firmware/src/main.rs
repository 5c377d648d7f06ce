//! tofscan - Rotary ToF Scanner Firmware
//!
//! Main firmware binary for RP2040-based scanner heads. A button press
//! sweeps a stepper-mounted VL53L1X through one revolution, reporting a
//! distance every 16 steps over UART, then returns to the start angle.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, OutputOpenDrain, Pull};
use embassy_rp::i2c::{Config as I2cConfig, I2c};
use embassy_rp::uart::{Config as UartConfig, UartTx};
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use tofscan_core::config::{IndicatorConfig, ScanConfig, SensorConfig};
use tofscan_drivers::indicator::LedBank;
use tofscan_drivers::input::GpioButton;
use tofscan_drivers::report::SerialReporter;
use tofscan_drivers::sensor::{Vl53l1x, XshutLine};
use tofscan_drivers::stepper::{StepperConfig, Uln2003Stepper};

use crate::board::ScanHardware;

mod board;
mod tasks;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("tofscan firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let scan_config = ScanConfig::DEFAULT;
    let sensor_config = SensorConfig::default();
    let indicator_config = IndicatorConfig::default();

    // Report UART, TX only (GPIO0)
    let uart_config = {
        let mut cfg = UartConfig::default();
        cfg.baudrate = board::UART_BAUD;
        cfg
    };
    let uart_tx = UartTx::new_blocking(p.UART0, p.PIN_0, uart_config);

    // Status LEDs (GPIO18..21)
    let leds = LedBank::new([
        Output::new(p.PIN_18, Level::Low),
        Output::new(p.PIN_19, Level::Low),
        Output::new(p.PIN_20, Level::Low),
        Output::new(p.PIN_21, Level::Low),
    ]);
    let reporter = SerialReporter::new(uart_tx, leds, Delay, indicator_config);
    info!("UART and LEDs initialized");

    // VL53L1X on I2C0 (SDA=GPIO4, SCL=GPIO5), XSHUT on GPIO6
    let i2c_config = {
        let mut cfg = I2cConfig::default();
        cfg.frequency = board::I2C_FREQUENCY_HZ;
        cfg
    };
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);
    let sensor = Vl53l1x::with_address(i2c, sensor_config.address);
    let xshut = XshutLine::new(OutputOpenDrain::new(p.PIN_6, Level::High));
    info!("I2C initialized, sensor at {=u8:#x}", sensor_config.address);

    // ULN2003 coil inputs IN1..IN4 (GPIO10..13)
    let stepper_config = StepperConfig::from_scan(&scan_config);
    let motor = Uln2003Stepper::new(
        [
            Output::new(p.PIN_10, Level::Low),
            Output::new(p.PIN_11, Level::Low),
            Output::new(p.PIN_12, Level::Low),
            Output::new(p.PIN_13, Level::Low),
        ],
        Delay,
        stepper_config,
    );
    info!(
        "Stepper initialized: {} patterns/step, {} ms dwell, {} ms/step",
        stepper_config.phases_per_step,
        stepper_config.dwell_ms,
        stepper_config.step_duration_ms()
    );

    // Start button to ground (GPIO15)
    let button = GpioButton::new_active_low(Input::new(p.PIN_15, Pull::Up));

    let hardware = ScanHardware {
        motor,
        sensor,
        reporter,
        button,
        xshut,
        sensor_config,
    };

    spawner.spawn(tasks::scan_task(hardware, scan_config)).unwrap();

    info!("Scan task spawned, firmware running");

    // Main task has nothing else to do
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
