//! End-to-end drive scenarios: receiver edges in, H-bridge line states out.

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, OutputPin};
use ppm_drive::config::{DriveConfig, FailsafePolicy, Ticks, MAX_COMM_DELAY};
use ppm_drive::drive::{
    Direction, HardwarePwm, Level, Motor, MotorModes, OutputMode, PinModeAdapter, SoftwarePwm,
};
use ppm_drive::error::Result;
use ppm_drive::rc::{edge, ChannelCalibration, ChannelId, ChannelStatus, Edge};
use ppm_drive::system::{DriveController, LinkIndicator, Watchdog};

/// Output line whose level stays observable after the backend takes it
#[derive(Clone, Default)]
struct Line(Rc<Cell<bool>>);

impl Line {
    fn is_high(&self) -> bool {
        self.0.get()
    }
}

impl ErrorType for Line {
    type Error = Infallible;
}

impl OutputPin for Line {
    fn set_low(&mut self) -> core::result::Result<(), Infallible> {
        self.0.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Infallible> {
        self.0.set(true);
        Ok(())
    }
}

#[derive(Clone, Default)]
struct Feeds(Rc<Cell<u32>>);

impl Watchdog for Feeds {
    fn feed(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

/// Last link state plus the number of changes seen
#[derive(Clone, Default)]
struct Link(Rc<Cell<(Option<bool>, u32)>>);

impl LinkIndicator for Link {
    fn report_link_status(&mut self, ok: bool) {
        let (last, changes) = self.0.get();
        if last != Some(ok) {
            self.0.set((Some(ok), changes + 1));
        }
    }
}

#[derive(Default)]
struct ModeLog {
    writes: Vec<(Motor, Direction, OutputMode)>,
}

impl PinModeAdapter for ModeLog {
    fn set_mode(&mut self, motor: Motor, direction: Direction, mode: OutputMode) -> Result<()> {
        self.writes.push((motor, direction, mode));
        Ok(())
    }
}

/// Bounds of a receiver measured against a ~1.053 MHz capture clock
fn measured_config() -> DriveConfig {
    let calibration = ChannelCalibration::new(1053, 2107, 526).unwrap();
    DriveConfig {
        throttle: calibration,
        steering: calibration,
        ..DriveConfig::default()
    }
}

struct Bench {
    lines: [Line; 4],
    feeds: Feeds,
    link: Link,
    controller: DriveController<SoftwarePwm<Line>, Feeds, Link>,
}

impl Bench {
    fn new(config: DriveConfig) -> Self {
        let lines: [Line; 4] = Default::default();
        let backend = SoftwarePwm::new(
            lines[0].clone(),
            lines[1].clone(),
            lines[2].clone(),
            lines[3].clone(),
        )
        .unwrap();
        let feeds = Feeds::default();
        let link = Link::default();
        let controller = DriveController::new(config, 0, backend, feeds.clone(), link.clone());
        Self {
            lines,
            feeds,
            link,
            controller,
        }
    }

    fn pulse(&mut self, channel: ChannelId, start: Ticks, width: Ticks) {
        self.controller.on_edge(channel, Edge::rising(start));
        self.controller.on_edge(channel, Edge::falling(start + width));
    }

    /// Line levels: left forward, left reverse, right forward, right reverse
    fn levels(&self) -> [bool; 4] {
        [
            self.lines[0].is_high(),
            self.lines[1].is_high(),
            self.lines[2].is_high(),
            self.lines[3].is_high(),
        ]
    }
}

#[test]
fn test_neutral_sticks_keep_motors_stopped() {
    let mut bench = Bench::new(measured_config());
    bench.pulse(ChannelId::Throttle, 1_000, 1579);
    bench.pulse(ChannelId::Steering, 1_500, 1579);
    bench.controller.tick(4_000).unwrap();

    assert_eq!(bench.controller.axis(ChannelId::Throttle), 0);
    assert_eq!(bench.controller.axis(ChannelId::Steering), 0);
    let commands = bench.controller.commands();
    assert_eq!((commands.left, commands.right), (0, 0));

    // Zero duty never raises a line, whatever the counter
    for period in 0..300 {
        bench.controller.tick(4_010 + period * 10).unwrap();
        assert_eq!(bench.levels(), [false; 4]);
    }
}

#[test]
fn test_full_throttle_drives_both_motors_forward() {
    let backend = HardwarePwm::new(ModeLog::default()).unwrap();
    let mut controller =
        DriveController::new(measured_config(), 0, backend, Feeds::default(), Link::default());

    controller.on_edge(ChannelId::Throttle, Edge::rising(1_000));
    controller.on_edge(ChannelId::Throttle, Edge::falling(1_000 + 2107));
    controller.on_edge(ChannelId::Steering, Edge::rising(1_200));
    controller.on_edge(ChannelId::Steering, Edge::falling(1_200 + 1579));
    controller.tick(4_000).unwrap();

    assert_eq!(controller.axis(ChannelId::Throttle), 256);
    assert_eq!(controller.axis(ChannelId::Steering), 0);
    let commands = controller.commands();
    assert_eq!((commands.left, commands.right), (256, 256));

    let full_forward = MotorModes {
        forward: OutputMode::TimerCompare(255),
        reverse: OutputMode::Io(Level::Low),
    };
    assert_eq!(controller.backend().modes(Motor::Left), Some(full_forward));
    assert_eq!(controller.backend().modes(Motor::Right), Some(full_forward));

    // Reverse line released before the forward line is timer driven
    let writes = &controller.backend().adapter().writes;
    assert_eq!(
        writes[writes.len() - 2..],
        [
            (Motor::Right, Direction::Reverse, OutputMode::Io(Level::Low)),
            (Motor::Right, Direction::Forward, OutputMode::TimerCompare(255)),
        ]
    );
}

#[test]
fn test_full_throttle_software_duty() {
    let mut bench = Bench::new(measured_config());
    bench.pulse(ChannelId::Throttle, 1_000, 2107);
    bench.pulse(ChannelId::Steering, 1_200, 1579);

    // Count high periods of each line over one full counter cycle
    let mut high = [0u32; 4];
    for period in 0..256 {
        bench.controller.tick(4_000 + period * 10).unwrap();
        for (count, level) in high.iter_mut().zip(bench.levels()) {
            *count += u32::from(level);
        }
    }
    assert_eq!(high, [255, 0, 255, 0]);
}

#[test]
fn test_steering_silence_stops_motors() {
    let mut bench = Bench::new(measured_config());

    // Throttle keeps arriving every 20 ms at full forward, steering never does
    for start in [1_000, 21_000] {
        bench.pulse(ChannelId::Throttle, start, 2107);
        bench.controller.tick(start + 2_200).unwrap();
        assert!(!bench.controller.failsafe_engaged());
        assert_eq!(bench.levels(), [true, false, true, false]);
    }

    bench.pulse(ChannelId::Throttle, 41_000, 2107);
    bench.controller.tick(41_000 + 2_200).unwrap();

    assert_eq!(
        bench.controller.status(ChannelId::Steering),
        ChannelStatus::SignalLost
    );
    assert!(bench.controller.failsafe_engaged());
    // The mix still asks for full forward, the outputs ignore it
    assert_eq!(bench.controller.axis(ChannelId::Throttle), 256);
    assert_eq!(bench.controller.commands().left, 256);
    assert_eq!(bench.levels(), [false; 4]);
    assert_eq!(bench.link.0.get(), (Some(false), 2));
}

#[test]
fn test_steering_only_policy_ignores_throttle_silence() {
    let mut bench = Bench::new(DriveConfig {
        failsafe: FailsafePolicy::SteeringOnly,
        ..measured_config()
    });

    // Steering full right, throttle silent
    for start in [1_000, 21_000, 41_000] {
        bench.pulse(ChannelId::Steering, start, 2107);
        bench.controller.tick(start + 2_200).unwrap();
    }

    assert!(bench.controller.is_lost(ChannelId::Throttle));
    assert!(!bench.controller.failsafe_engaged());
    // Spin in place: left forward, right reverse
    assert_eq!(bench.levels(), [true, false, false, true]);
    assert_eq!(bench.link.0.get().0, Some(false));
}

#[test]
fn test_watchdog_fed_every_period() {
    let mut bench = Bench::new(measured_config());
    for period in 1..=MAX_COMM_DELAY / 10 {
        bench.controller.tick(period * 10).unwrap();
    }
    assert_eq!(bench.feeds.0.get(), MAX_COMM_DELAY / 10);
    // Exactly at the timeout the link still counts as up
    assert_eq!(bench.link.0.get(), (Some(true), 1));
}

// The only test in this binary that touches the capture queues
#[test]
fn test_captured_edges_reach_the_decoders() {
    let mut bench = Bench::new(measured_config());

    assert!(edge::record(ChannelId::Throttle, Edge::rising(1_000)));
    assert!(edge::record(ChannelId::Throttle, Edge::falling(1_000 + 1316)));
    assert!(edge::record(ChannelId::Steering, Edge::rising(1_100)));
    assert!(edge::record(ChannelId::Steering, Edge::falling(1_100 + 2107)));

    bench.controller.pump_edges();
    bench.controller.tick(4_000).unwrap();

    assert_eq!(bench.controller.axis(ChannelId::Throttle), -128);
    assert_eq!(bench.controller.axis(ChannelId::Steering), 256);
    let commands = bench.controller.commands();
    assert_eq!((commands.left, commands.right), (128, -384));

    // Queues are empty afterwards
    assert_eq!(edge::drain(ChannelId::Throttle, |_| {}), 0);
    assert_eq!(edge::drain(ChannelId::Steering, |_| {}), 0);
}
