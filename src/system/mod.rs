//! Control loop and its collaborators
pub mod control;
pub mod indicator;
pub mod supervisor;

pub use control::DriveController;
pub use indicator::SignalingIndicator;
pub use supervisor::{BuiltinCalibration, CalibrationStore, LinkIndicator, Watchdog};
