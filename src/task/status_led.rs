//! Status LED Module
//!
//! Drives the RGB LED: a red, green, blue blink at power-on to show the
//! board started, then the radio link state reported by the control loop.
//!
//! - green: both channels healthy
//! - red + green: a channel lost its signal
//!
//! The blink is skipped after a watchdog reset so a restart does not stall
//! the motors for the length of the animation.
use crate::task::resources::StatusLedResources;
use defmt::info;
use embassy_rp::gpio::{Level, Output};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};
use ppm_drive::system::indicator;

/// On time of each colour in the startup blink
const STARTUP_BLINK_INTERVAL: Duration = Duration::from_millis(250);

/// Fired once the startup blink is done (or skipped)
static STARTUP_COMPLETE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Waits until the status LED has finished its startup sequence
pub async fn wait_startup_complete() {
    STARTUP_COMPLETE.wait().await
}

#[embassy_executor::task]
pub async fn status_led(r: StatusLedResources, watchdog_reset: bool) {
    // Common cathode: high is on
    let mut red = Output::new(r.red_pin, Level::Low);
    let mut green = Output::new(r.green_pin, Level::Low);
    let mut blue = Output::new(r.blue_pin, Level::Low);

    if !watchdog_reset {
        for led in [&mut red, &mut green, &mut blue] {
            led.set_high();
            Timer::after(STARTUP_BLINK_INTERVAL).await;
            led.set_low();
        }
        Timer::after(STARTUP_BLINK_INTERVAL).await;
    }
    STARTUP_COMPLETE.signal(());

    loop {
        let link_ok = indicator::wait().await;
        info!("Link {}", if link_ok { "ok" } else { "lost" });

        blue.set_low();
        green.set_high();
        red.set_level(if link_ok { Level::Low } else { Level::High });
    }
}
