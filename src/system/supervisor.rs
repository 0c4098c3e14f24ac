//! Collaborator interfaces
//!
//! Side effects the control loop needs from the platform but does not
//! implement itself: watchdog servicing, the link status light and
//! persistent calibration.

use crate::error::{Error, Result};
use crate::rc::ChannelCalibration;

/// Supervisory timer that restarts the system unless fed every period
pub trait Watchdog {
    fn feed(&mut self);
}

/// Receives the aggregate radio link state once per loop period
pub trait LinkIndicator {
    fn report_link_status(&mut self, ok: bool);
}

/// Persistent per-channel calibration, ordered throttle then steering
pub trait CalibrationStore {
    /// Stored calibration, if any
    fn load(&mut self) -> Option<[ChannelCalibration; 2]>;

    /// Persists a calibration
    fn save(&mut self, calibration: &[ChannelCalibration; 2]) -> Result<()>;
}

/// Store with no backing memory: channels always use the built-in bounds
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCalibration;

impl CalibrationStore for BuiltinCalibration {
    fn load(&mut self) -> Option<[ChannelCalibration; 2]> {
        None
    }

    fn save(&mut self, _calibration: &[ChannelCalibration; 2]) -> Result<()> {
        Err(Error::StorageUnavailable)
    }
}

impl<W: Watchdog + ?Sized> Watchdog for &mut W {
    fn feed(&mut self) {
        (**self).feed();
    }
}

impl<L: LinkIndicator + ?Sized> LinkIndicator for &mut L {
    fn report_link_status(&mut self, ok: bool) {
        (**self).report_link_status(ok);
    }
}
