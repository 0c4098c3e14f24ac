//! Error types
//!
//! None of these are fatal. The control loop logs them and keeps running,
//! and a lost radio link is not an error at all: it is a channel state
//! handled by the failsafe.

use crate::drive::{Direction, Motor};

/// Crate-wide error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub enum Error {
    /// Calibration bounds leave no span on one side of neutral
    InvalidCalibration,
    /// A motor output line rejected a write
    Output {
        /// Motor whose line failed
        motor: Motor,
        /// Which of the motor's two lines failed
        direction: Direction,
    },
    /// No persistent calibration storage is available
    StorageUnavailable,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidCalibration => write!(f, "invalid channel calibration"),
            Error::Output { motor, direction } => {
                write!(f, "{:?} motor {:?} output write failed", motor, direction)
            }
            Error::StorageUnavailable => write!(f, "calibration storage unavailable"),
        }
    }
}

/// Result type for drive operations
pub type Result<T> = core::result::Result<T, Error>;
