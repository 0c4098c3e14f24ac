//! Hardware-timer PWM
//!
//! Duty generation is left to timer compare channels, so the carrier
//! frequency no longer depends on the loop rate. For each motor only the
//! active direction's line is timer driven; the other line is held as a
//! plain low output:
//!
//! | command | forward line          | reverse line          |
//! |---------|-----------------------|-----------------------|
//! | v > 0   | `TimerCompare(v)`     | `Io(Low)`             |
//! | v <= 0  | `Io(Low)`             | `TimerCompare(-v)`    |
//!
//! How a mode maps onto registers is up to a [`PinModeAdapter`].
//! [`DutyCycleLines`] covers any embedded-hal `SetDutyCycle` channel.

use embedded_hal::pwm::SetDutyCycle;

use super::{Direction, DriveDuty, Motor, PwmBackend, PWM_MAX};
use crate::error::{Error, Result};

/// Static output level
///
/// [`MotorModes::resolve`] only ever holds an idle line `Low`. `High` is for
/// driving an adapter directly, such as a bench check of one H-bridge input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

/// How one physical line is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub enum OutputMode {
    /// Plain digital output at a fixed level
    Io(Level),
    /// Driven by a timer compare output with the given duty out of `PWM_MAX`
    TimerCompare(u8),
}

/// Modes of both lines of one motor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub struct MotorModes {
    pub forward: OutputMode,
    pub reverse: OutputMode,
}

impl MotorModes {
    /// Resolves line modes for a duty pair
    pub fn resolve(duty: DriveDuty) -> Self {
        if duty.forward() > 0 {
            Self {
                forward: OutputMode::TimerCompare(duty.forward()),
                reverse: OutputMode::Io(Level::Low),
            }
        } else {
            Self {
                forward: OutputMode::Io(Level::Low),
                reverse: OutputMode::TimerCompare(duty.reverse()),
            }
        }
    }
}

/// Platform binding from line modes to peripheral configuration
pub trait PinModeAdapter {
    /// Puts one line into `mode`
    fn set_mode(&mut self, motor: Motor, direction: Direction, mode: OutputMode) -> Result<()>;
}

/// Timer-driven backend
///
/// Line modes are only pushed to the adapter when they change.
pub struct HardwarePwm<A> {
    adapter: A,
    applied: [Option<MotorModes>; 2],
}

impl<A: PinModeAdapter> HardwarePwm<A> {
    /// Takes the adapter and stops both motors
    pub fn new(adapter: A) -> Result<Self> {
        let mut pwm = Self {
            adapter,
            applied: [None, None],
        };
        pwm.apply(Motor::Left, DriveDuty::STOP)?;
        pwm.apply(Motor::Right, DriveDuty::STOP)?;
        Ok(pwm)
    }

    /// Modes last applied to `motor`
    pub fn modes(&self, motor: Motor) -> Option<MotorModes> {
        self.applied[index(motor)]
    }

    /// Platform adapter
    pub fn adapter(&self) -> &A {
        &self.adapter
    }
}

fn index(motor: Motor) -> usize {
    match motor {
        Motor::Left => 0,
        Motor::Right => 1,
    }
}

impl<A: PinModeAdapter> PwmBackend for HardwarePwm<A> {
    fn apply(&mut self, motor: Motor, duty: DriveDuty) -> Result<()> {
        let modes = MotorModes::resolve(duty);
        let slot = index(motor);
        if self.applied[slot] == Some(modes) {
            return Ok(());
        }

        // Forget the cached state until both writes succeed so a failed
        // write is retried on the next period
        self.applied[slot] = None;
        let lines = if duty.forward() > 0 {
            [
                (Direction::Reverse, modes.reverse),
                (Direction::Forward, modes.forward),
            ]
        } else {
            [
                (Direction::Forward, modes.forward),
                (Direction::Reverse, modes.reverse),
            ]
        };
        for (direction, mode) in lines {
            self.adapter.set_mode(motor, direction, mode)?;
        }
        self.applied[slot] = Some(modes);
        Ok(())
    }
}

/// Adapter over four embedded-hal duty-cycle channels
///
/// A static low level is a fully-off channel, which on a timer output is
/// electrically the same as a GPIO held low.
pub struct DutyCycleLines<C> {
    left_forward: C,
    left_reverse: C,
    right_forward: C,
    right_reverse: C,
}

impl<C: SetDutyCycle> DutyCycleLines<C> {
    pub fn new(left_forward: C, left_reverse: C, right_forward: C, right_reverse: C) -> Self {
        Self {
            left_forward,
            left_reverse,
            right_forward,
            right_reverse,
        }
    }

    fn line(&mut self, motor: Motor, direction: Direction) -> &mut C {
        match (motor, direction) {
            (Motor::Left, Direction::Forward) => &mut self.left_forward,
            (Motor::Left, Direction::Reverse) => &mut self.left_reverse,
            (Motor::Right, Direction::Forward) => &mut self.right_forward,
            (Motor::Right, Direction::Reverse) => &mut self.right_reverse,
        }
    }
}

impl<C: SetDutyCycle> PinModeAdapter for DutyCycleLines<C> {
    fn set_mode(&mut self, motor: Motor, direction: Direction, mode: OutputMode) -> Result<()> {
        let line = self.line(motor, direction);
        let written = match mode {
            OutputMode::Io(Level::Low) => line.set_duty_cycle_fully_off(),
            OutputMode::Io(Level::High) => line.set_duty_cycle_fully_on(),
            OutputMode::TimerCompare(duty) => {
                line.set_duty_cycle_fraction(u16::from(duty), u16::from(PWM_MAX))
            }
        };
        written.map_err(|_| Error::Output { motor, direction })
    }
}
