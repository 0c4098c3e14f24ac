//! Drive controller firmware entry point
//!
//! Initializes the system, checks why we booted and spawns the capture,
//! control and indicator tasks.

#![no_std]
#![no_main]

#[cfg(all(feature = "pwm-software", feature = "pwm-hardware"))]
compile_error!("features `pwm-software` and `pwm-hardware` are mutually exclusive");

#[cfg(not(any(feature = "pwm-software", feature = "pwm-hardware")))]
compile_error!("enable exactly one of the `pwm-software` or `pwm-hardware` features");

use crate::task::{
    control_loop::control_loop,
    edge_capture::{capture_steering, capture_throttle},
    resources::{
        AssignedResources, MotorOutputResources, StatusLedResources, SteeringInputResources,
        SupervisorResources, ThrottleInputResources,
    },
    status_led::status_led,
};
use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::config::Config;
use embassy_rp::watchdog::{ResetReason, Watchdog};
use {defmt_rtt as _, panic_probe as _};

/// Firmware image type for bootloader
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

/// Task implementations
mod task;

/// Firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Config::default());

    // Split the resources into separate groups for each task
    let r = split_resources!(p);

    let watchdog = Watchdog::new(r.supervisor.watchdog);
    let watchdog_reset = matches!(watchdog.reset_reason(), Some(ResetReason::TimedOut));
    if watchdog_reset {
        warn!("Restarted by watchdog");
    } else {
        info!("Power-on start");
    }

    // Inputs first so no pulse is missed once the loop starts
    spawner.spawn(capture_throttle(r.throttle_input)).unwrap();
    spawner.spawn(capture_steering(r.steering_input)).unwrap();
    spawner.spawn(status_led(r.status_led, watchdog_reset)).unwrap();
    spawner.spawn(control_loop(r.motor_outputs, watchdog)).unwrap();
}
