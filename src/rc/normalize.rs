//! Pulse-width normalization
//!
//! Maps a measured pulse width onto a signed axis value of nominal range
//! `[-256, 256]`. The map is piecewise linear with its breakpoint at the
//! neutral width `min + deadband`, which maps to exactly zero:
//!
//! ```text
//!   min ............ min+deadband ............ max
//!  -256                   0                    +256
//!   slope 256/deadband    |   slope 256/(max-min-deadband)
//! ```
//!
//! The two slopes differ unless neutral sits exactly mid-range. Division
//! truncates toward zero.

use crate::config::Ticks;
use crate::error::{Error, Result};

/// Fixed-point shift applied before dividing by the segment span
pub const SCALE_BITS: u32 = 8;

/// Axis magnitude at either end of the valid range
pub const AXIS_FULL_SCALE: i16 = 1 << SCALE_BITS;

/// Normalizes `pulse` against the given bounds
///
/// `pulse` must already lie in `[min, max]` and the bounds must have passed
/// [`ChannelCalibration::new`], which rules out a zero-width segment.
pub(crate) fn normalize(pulse: Ticks, min: Ticks, max: Ticks, deadband: Ticks) -> i16 {
    let offset = i64::from(pulse) - i64::from(min);
    let deadband = i64::from(deadband);
    let denominator = if offset < deadband {
        deadband
    } else {
        i64::from(max) - (i64::from(min) + deadband)
    };
    let scaled = ((offset - deadband) << SCALE_BITS) / denominator;
    scaled.clamp(-i64::from(AXIS_FULL_SCALE), i64::from(AXIS_FULL_SCALE)) as i16
}

/// Valid pulse-width bounds of one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub struct ChannelCalibration {
    min: Ticks,
    max: Ticks,
    deadband: Ticks,
}

impl ChannelCalibration {
    /// Standard RC servo timing: 1000-2000 µs with neutral at 1500 µs
    pub const DEFAULT: Self = Self {
        min: 1_000,
        max: 2_000,
        deadband: 500,
    };

    /// Validated bounds. Neutral (`min + deadband`) must lie strictly
    /// between `min` and `max`.
    pub fn new(min: Ticks, max: Ticks, deadband: Ticks) -> Result<Self> {
        let neutral = min.checked_add(deadband).ok_or(Error::InvalidCalibration)?;
        if deadband == 0 || neutral >= max {
            return Err(Error::InvalidCalibration);
        }
        Ok(Self { min, max, deadband })
    }

    /// Shortest valid pulse
    pub fn min(&self) -> Ticks {
        self.min
    }

    /// Longest valid pulse
    pub fn max(&self) -> Ticks {
        self.max
    }

    /// Span from `min` to neutral
    pub fn deadband(&self) -> Ticks {
        self.deadband
    }

    /// Pulse width that maps to zero
    pub fn neutral(&self) -> Ticks {
        self.min + self.deadband
    }

    /// Whether `pulse` lies within `[min, max]`
    pub fn contains(&self, pulse: Ticks) -> bool {
        (self.min..=self.max).contains(&pulse)
    }

    /// Normalized axis value, or `None` if `pulse` is out of range
    pub fn normalize(&self, pulse: Ticks) -> Option<i16> {
        self.contains(pulse)
            .then(|| normalize(pulse, self.min, self.max, self.deadband))
    }
}

impl Default for ChannelCalibration {
    fn default() -> Self {
        Self::DEFAULT
    }
}
