//! Software-compared PWM
//!
//! An 8-bit counter advances once per loop period. Every line is high while
//! its duty exceeds the counter, so a line with duty `d` is high for `d` of
//! every 256 periods and the PWM frequency is the loop rate divided by 256.
//! Needs nothing but four push-pull outputs.

use embedded_hal::digital::{OutputPin, PinState};

use super::{Direction, DriveDuty, Motor, PwmBackend};
use crate::error::{Error, Result};

/// Four GPIO lines compared against a free-running counter
pub struct SoftwarePwm<P> {
    left_forward: P,
    left_reverse: P,
    right_forward: P,
    right_reverse: P,
    counter: u8,
}

impl<P: OutputPin> SoftwarePwm<P> {
    /// Takes ownership of the lines and drives them all low
    pub fn new(left_forward: P, left_reverse: P, right_forward: P, right_reverse: P) -> Result<Self> {
        let mut pwm = Self {
            left_forward,
            left_reverse,
            right_forward,
            right_reverse,
            counter: 0,
        };
        pwm.apply(Motor::Left, DriveDuty::STOP)?;
        pwm.apply(Motor::Right, DriveDuty::STOP)?;
        Ok(pwm)
    }

    /// Current compare counter
    pub fn counter(&self) -> u8 {
        self.counter
    }

    fn lines(&mut self, motor: Motor) -> (&mut P, &mut P) {
        match motor {
            Motor::Left => (&mut self.left_forward, &mut self.left_reverse),
            Motor::Right => (&mut self.right_forward, &mut self.right_reverse),
        }
    }
}

fn write<P: OutputPin>(pin: &mut P, high: bool, motor: Motor, direction: Direction) -> Result<()> {
    pin.set_state(PinState::from(high))
        .map_err(|_| Error::Output { motor, direction })
}

impl<P: OutputPin> PwmBackend for SoftwarePwm<P> {
    fn begin_period(&mut self) {
        self.counter = self.counter.wrapping_add(1);
    }

    fn apply(&mut self, motor: Motor, duty: DriveDuty) -> Result<()> {
        let counter = self.counter;
        let forward_on = duty.forward() > counter;
        let reverse_on = duty.reverse() > counter;
        let (forward, reverse) = self.lines(motor);

        // Release the idle line before energizing the active one
        if forward_on {
            write(reverse, false, motor, Direction::Reverse)?;
            write(forward, true, motor, Direction::Forward)
        } else {
            write(forward, false, motor, Direction::Forward)?;
            write(reverse, reverse_on, motor, Direction::Reverse)
        }
    }
}
