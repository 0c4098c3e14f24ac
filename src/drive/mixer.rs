//! Differential drive mixing
//!
//! Skid-steer mix of a forward/back axis and a left/right axis:
//! `left = fwd_back + left_right`, `right = fwd_back - left_right`.
//! The result is not normalized; saturation happens when it is converted to
//! PWM duty, so full throttle plus full steering pins one side at full power
//! and stops the other.

/// Signed per-motor commands, nominally `[-255, 255]` after clamping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub struct MotorCommands {
    pub left: i32,
    pub right: i32,
}

/// Mixes the two axes into left and right motor commands
pub fn mix(fwd_back: i16, left_right: i16) -> MotorCommands {
    let fwd_back = i32::from(fwd_back);
    let left_right = i32::from(left_right);
    MotorCommands {
        left: fwd_back + left_right,
        right: fwd_back - left_right,
    }
}
