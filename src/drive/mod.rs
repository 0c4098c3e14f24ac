//! Motor drive
//!
//! Mixes the two axes into per-motor commands and turns those into
//! sign-magnitude PWM on the H-bridge lines. Two output strategies are
//! available behind [`PwmBackend`]; the firmware picks one at build time.

pub mod hardware_pwm;
pub mod mixer;
pub mod pwm;
pub mod software_pwm;

pub use hardware_pwm::{DutyCycleLines, HardwarePwm, Level, MotorModes, OutputMode, PinModeAdapter};
pub use mixer::{mix, MotorCommands};
pub use pwm::{DriveDuty, PwmBackend, PWM_MAX};
pub use software_pwm::SoftwarePwm;

/// Motor selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub enum Motor {
    Left,
    Right,
}

/// One of the two H-bridge inputs of a motor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub enum Direction {
    Forward,
    Reverse,
}
