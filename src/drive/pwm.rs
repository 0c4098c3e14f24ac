//! Sign-magnitude duty and the output backend interface
//!
//! Each motor is driven through two H-bridge inputs:
//!
//! | forward | reverse | Motor state                  |
//! |---------|---------|------------------------------|
//! | 0       | 0       | Coast                        |
//! | PWM     | 0       | Forward (speed = duty)       |
//! | 0       | PWM     | Reverse (speed = duty)       |
//!
//! Both inputs are never energized at the same time.

use super::Motor;
use crate::error::Result;

/// Full-scale duty
pub const PWM_MAX: u8 = u8::MAX;

/// Duty pair for one motor. At most one side is nonzero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub struct DriveDuty {
    forward: u8,
    reverse: u8,
}

impl DriveDuty {
    /// Both lines off
    pub const STOP: Self = Self {
        forward: 0,
        reverse: 0,
    };

    /// Converts a signed motor command, saturating at `±PWM_MAX`
    pub fn from_command(command: i32) -> Self {
        let magnitude = command.unsigned_abs().min(u32::from(PWM_MAX)) as u8;
        if command > 0 {
            Self {
                forward: magnitude,
                reverse: 0,
            }
        } else {
            Self {
                forward: 0,
                reverse: magnitude,
            }
        }
    }

    /// Forward line duty
    pub fn forward(&self) -> u8 {
        self.forward
    }

    /// Reverse line duty
    pub fn reverse(&self) -> u8 {
        self.reverse
    }

    /// Signed duty, `forward - reverse`
    pub fn signed(&self) -> i16 {
        i16::from(self.forward) - i16::from(self.reverse)
    }
}

/// Physical PWM output strategy
///
/// The control loop calls [`PwmBackend::begin_period`] once per loop period
/// and then [`PwmBackend::apply`] for each motor.
pub trait PwmBackend {
    /// Marks the start of a loop period
    fn begin_period(&mut self) {}

    /// Drives one motor's lines for the current period
    fn apply(&mut self, motor: Motor, duty: DriveDuty) -> Result<()>;
}
