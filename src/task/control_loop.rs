//! Control Loop Task
//!
//! Runs the drive controller at a fixed period: pull captured edges out of
//! the queues, then tick. Each tick feeds the hardware watchdog, so a stalled
//! loop restarts the board with the motors released.
//!
//! The motor output strategy is chosen at build time:
//! - `pwm-software`: plain GPIO outputs toggled against a counter advanced
//!   every period (~390 Hz at a 100 kHz loop)
//! - `pwm-hardware`: one PWM slice per motor, forward on output A and reverse
//!   on output B, in phase-correct mode at `HARDWARE_PWM_FREQ_HZ`

use crate::task::resources::MotorOutputResources;
use crate::task::status_led;
use defmt::{error, info};
use embassy_rp::watchdog;
use embassy_time::{Duration, Instant, Ticker};
use ppm_drive::config::{DriveConfig, Ticks, LOOP_LENGTH, WATCHDOG_PERIOD_MS};
use ppm_drive::system::{BuiltinCalibration, DriveController, SignalingIndicator, Watchdog};
use ppm_drive::Error;

#[cfg(feature = "pwm-software")]
type Backend = ppm_drive::drive::SoftwarePwm<embassy_rp::gpio::Output<'static>>;

#[cfg(feature = "pwm-hardware")]
type Backend = ppm_drive::drive::HardwarePwm<
    ppm_drive::drive::DutyCycleLines<embassy_rp::pwm::PwmOutput<'static>>,
>;

/// RP2350 watchdog as the controller's [`Watchdog`]
struct HardwareWatchdog(watchdog::Watchdog);

impl Watchdog for HardwareWatchdog {
    fn feed(&mut self) {
        self.0.feed();
    }
}

fn now() -> Ticks {
    Instant::now().as_micros() as Ticks
}

#[embassy_executor::task]
pub async fn control_loop(r: MotorOutputResources, mut watchdog: watchdog::Watchdog) {
    let backend = match build_backend(r) {
        Ok(backend) => backend,
        Err(e) => {
            error!("Motor outputs unavailable: {}", e);
            return;
        }
    };

    // Motors stay released until the operator has seen the startup blink
    status_led::wait_startup_complete().await;

    let config = DriveConfig::load(&mut BuiltinCalibration);
    info!("Drive config: {:?}", config);

    watchdog.pause_on_debug(true);
    watchdog.start(Duration::from_millis(WATCHDOG_PERIOD_MS));

    let mut controller = DriveController::new(
        config,
        now(),
        backend,
        HardwareWatchdog(watchdog),
        SignalingIndicator::new(),
    );
    // The capture tasks have been queueing since boot
    controller.discard_pending_edges();

    let mut last_fault: Option<Error> = None;
    let mut ticker = Ticker::every(Duration::from_micros(LOOP_LENGTH as u64));
    loop {
        ticker.next().await;

        controller.pump_edges();
        let fault = controller.tick(now()).err();

        // Report output faults once, not every period
        if fault != last_fault {
            match fault {
                Some(e) => error!("Drive output fault: {}", e),
                None => info!("Drive outputs recovered"),
            }
            last_fault = fault;
        }
    }
}

#[cfg(feature = "pwm-software")]
fn build_backend(r: MotorOutputResources) -> Result<Backend, Error> {
    use embassy_rp::gpio::{Level, Output};

    ppm_drive::drive::SoftwarePwm::new(
        Output::new(r.left_forward_pin, Level::Low),
        Output::new(r.left_reverse_pin, Level::Low),
        Output::new(r.right_forward_pin, Level::Low),
        Output::new(r.right_reverse_pin, Level::Low),
    )
}

#[cfg(feature = "pwm-hardware")]
fn build_backend(r: MotorOutputResources) -> Result<Backend, Error> {
    use embassy_rp::pwm::{self, Pwm};
    use ppm_drive::config::HARDWARE_PWM_FREQ_HZ;
    use ppm_drive::drive::{Direction, DutyCycleLines, HardwarePwm, Motor};

    let clock_freq_hz = embassy_rp::clocks::clk_sys_freq(); // 150MHz

    // Phase-correct mode counts up then down, halving the carrier frequency
    let counts = clock_freq_hz / (2 * HARDWARE_PWM_FREQ_HZ);

    // Calculate minimum divider needed to keep period under 16-bit limit (65535)
    let divider = (counts / 65535 + 1) as u8;
    let period = (counts / divider as u32) as u16 - 1;

    let mut pwm_config = pwm::Config::default();
    pwm_config.divider = divider.into();
    pwm_config.top = period;
    pwm_config.phase_correct = true;
    pwm_config.compare_a = 0;
    pwm_config.compare_b = 0;

    let left = Pwm::new_output_ab(
        r.left_slice,
        r.left_forward_pin,
        r.left_reverse_pin,
        pwm_config.clone(),
    );
    let right = Pwm::new_output_ab(
        r.right_slice,
        r.right_forward_pin,
        r.right_reverse_pin,
        pwm_config,
    );

    let (Some(left_forward), Some(left_reverse)) = left.split() else {
        return Err(Error::Output {
            motor: Motor::Left,
            direction: Direction::Forward,
        });
    };
    let (Some(right_forward), Some(right_reverse)) = right.split() else {
        return Err(Error::Output {
            motor: Motor::Right,
            direction: Direction::Forward,
        });
    };

    HardwarePwm::new(DutyCycleLines::new(
        left_forward,
        left_reverse,
        right_forward,
        right_reverse,
    ))
}
