//! Scan task
//!
//! Owns all scanner hardware. Resets and boots the distance sensor, then
//! drives the scan controller forever. Stepping blocks for the coil dwell;
//! the task only yields to the executor while waiting on the button or
//! the sensor.

use defmt::*;
use embassy_time::{Delay, Timer};

use tofscan_core::boot::{BootSequence, BootStep};
use tofscan_core::config::ScanConfig;
use tofscan_core::scan::{ScanController, TickOutcome};
use tofscan_drivers::sensor::vl53l1x::MODEL_ID;

use crate::board::{ScanHardware, BUTTON_POLL_MS};

/// Scan task entry point
#[embassy_executor::task]
pub async fn scan_task(hw: ScanHardware, config: ScanConfig) {
    info!("Scan task started");

    let ScanHardware {
        motor,
        mut sensor,
        mut reporter,
        button,
        mut xshut,
        sensor_config,
    } = hw;

    // Power-cycle the sensor through XSHUT, all LEDs flash while it is held
    let reset = xshut.reset(&mut Delay, sensor_config.reset_pulse_ms, |_| {
        reporter.flash_all()
    });
    if reset.is_err() {
        warn!("XSHUT reset failed");
    }
    debug!("Sensor reset released");

    let mut boot = BootSequence::new();
    loop {
        let step = boot.tick(&mut sensor, &mut reporter);
        match &step {
            BootStep::Announced => info!("Boot: banner sent"),
            BootStep::Identified(Ok(id)) if *id == MODEL_ID => {
                info!("Boot: sensor model id {=u16:#x}", *id)
            }
            BootStep::Identified(Ok(id)) => {
                warn!("Boot: unexpected sensor model id {=u16:#x}", *id)
            }
            BootStep::Identified(Err(e)) => warn!("Boot: model id read failed: {:?}", e),
            BootStep::AwaitingBoot { polls } => trace!("Boot: waiting for sensor ({})", polls),
            BootStep::BootPollFailed { polls, error } => {
                warn!("Boot: boot state poll {} failed: {:?}", polls, error)
            }
            BootStep::Ready {
                failures,
                last_error,
            } => {
                if *failures == 0 {
                    info!("Boot: sensor ranging");
                } else {
                    warn!(
                        "Boot: sensor armed with {} failed writes, last: {:?}",
                        failures, last_error
                    );
                }
            }
            BootStep::Done => {}
        }

        if boot.is_done() {
            break;
        }
        if step.is_waiting() {
            Timer::after_millis(sensor_config.boot_poll_ms.into()).await;
        }
    }

    info!(
        "Scanning: {} steps of {}.{=u32:02}°, sample every {} ({} per arc)",
        config.total_steps(),
        config.degrees_per_step_x100() / 100,
        config.degrees_per_step_x100() % 100,
        config.sample_interval(),
        config.samples_per_arc()
    );

    let mut controller = ScanController::new(config, motor, sensor, reporter, button);
    loop {
        let outcome = controller.tick();
        match &outcome {
            TickOutcome::Idle => {}
            TickOutcome::ScanStarted => info!("Button pressed, scan started"),
            TickOutcome::Stepped { direction, step } => {
                trace!("Step {} {:?}", step, direction)
            }
            TickOutcome::AwaitingSample { step } => trace!("Waiting for sample at step {}", step),
            TickOutcome::PollFailed { step, error } => {
                warn!("Ready poll failed at step {}: {:?}", step, error)
            }
            TickOutcome::Sampled { step, reading } => {
                let angle = config.step_angle_x100(*step);
                if reading.is_anomaly() {
                    warn!(
                        "Sample at {}.{=u32:02}°: {} mm, status {}",
                        angle / 100,
                        angle % 100,
                        reading.distance_mm,
                        reading.status
                    );
                } else {
                    debug!(
                        "Sample at {}.{=u32:02}°: {} mm",
                        angle / 100,
                        angle % 100,
                        reading.distance_mm
                    );
                }
            }
            TickOutcome::SampleFailed { step, error } => {
                warn!("Distance read failed at step {}: {:?}", step, error)
            }
            TickOutcome::ForwardArcComplete => info!("Forward arc complete, returning"),
            TickOutcome::ScanComplete => {
                info!("Scan complete: {}", controller.session().stats());
                let dropped = controller.reporter().dropped_lines();
                if dropped > 0 {
                    warn!("{} report lines lost on the serial port", dropped);
                }
            }
        }

        match outcome {
            TickOutcome::Idle => Timer::after_millis(BUTTON_POLL_MS).await,
            TickOutcome::AwaitingSample { .. } | TickOutcome::PollFailed { .. } => {
                Timer::after_millis(sensor_config.data_ready_poll_ms.into()).await
            }
            _ => {}
        }
    }
}
