//! Build-time configuration
//!
//! Timing constants are expressed in capture-clock ticks. The firmware
//! timestamps edges with the embassy time driver, which ticks at 1 MHz, so
//! one tick is one microsecond.

use crate::rc::ChannelCalibration;
use crate::system::CalibrationStore;

/// Free-running capture-clock count. Always compared with wrapping arithmetic.
pub type Ticks = u32;

/// Capture clock rate (Hz)
pub const CAPTURE_TICK_HZ: u32 = 1_000_000;

/// Silence on a channel longer than this means the link is lost (30 ms)
pub const MAX_COMM_DELAY: Ticks = 30 * (CAPTURE_TICK_HZ / 1_000);

/// Control loop period (100 kHz, giving ~390 Hz software PWM)
pub const LOOP_LENGTH: Ticks = 10;

/// Carrier frequency of the hardware PWM backend
pub const HARDWARE_PWM_FREQ_HZ: u32 = 10_000;

/// Hardware watchdog period. Far longer than a loop period, so only a stalled
/// loop trips it.
pub const WATCHDOG_PERIOD_MS: u64 = 100;

/// Which channels trigger the motor failsafe when their signal is lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub enum FailsafePolicy {
    /// Losing either channel stops the motors
    #[default]
    AnyChannel,
    /// Only the steering (left/right) channel stops the motors
    SteeringOnly,
}

impl FailsafePolicy {
    /// Whether the motors must be stopped given each channel's link state
    pub fn engaged(self, throttle_lost: bool, steering_lost: bool) -> bool {
        match self {
            FailsafePolicy::AnyChannel => throttle_lost || steering_lost,
            FailsafePolicy::SteeringOnly => steering_lost,
        }
    }
}

/// Complete controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub struct DriveConfig {
    /// Forward/back channel bounds
    pub throttle: ChannelCalibration,
    /// Left/right channel bounds
    pub steering: ChannelCalibration,
    /// Signal-loss timeout in ticks
    pub max_comm_delay: Ticks,
    /// Failsafe trigger policy
    pub failsafe: FailsafePolicy,
}

impl DriveConfig {
    /// Built-in configuration
    pub const fn new() -> Self {
        Self {
            throttle: ChannelCalibration::DEFAULT,
            steering: ChannelCalibration::DEFAULT,
            max_comm_delay: MAX_COMM_DELAY,
            failsafe: FailsafePolicy::AnyChannel,
        }
    }

    /// Built-in configuration with calibrations taken from `store` when it
    /// has any
    pub fn load(store: &mut impl CalibrationStore) -> Self {
        let mut config = Self::new();
        match store.load() {
            Some([throttle, steering]) => {
                crate::log_info!("Using stored channel calibration");
                config.throttle = throttle;
                config.steering = steering;
            }
            None => {
                crate::log_info!("No stored calibration, using built-in channel bounds");
            }
        }
        config
    }
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::BuiltinCalibration;
    use crate::Error;

    struct FixedStore([ChannelCalibration; 2]);

    impl CalibrationStore for FixedStore {
        fn load(&mut self) -> Option<[ChannelCalibration; 2]> {
            Some(self.0)
        }

        fn save(&mut self, calibration: &[ChannelCalibration; 2]) -> Result<(), Error> {
            self.0 = *calibration;
            Ok(())
        }
    }

    #[test]
    fn test_timeout_is_thirty_milliseconds() {
        assert_eq!(MAX_COMM_DELAY, 30_000);
    }

    #[test]
    fn test_any_channel_policy() {
        let policy = FailsafePolicy::AnyChannel;
        assert!(!policy.engaged(false, false));
        assert!(policy.engaged(true, false));
        assert!(policy.engaged(false, true));
    }

    #[test]
    fn test_steering_only_policy_ignores_throttle() {
        let policy = FailsafePolicy::SteeringOnly;
        assert!(!policy.engaged(true, false));
        assert!(policy.engaged(false, true));
    }

    #[test]
    fn test_load_falls_back_to_builtin() {
        let config = DriveConfig::load(&mut BuiltinCalibration);
        assert_eq!(config, DriveConfig::default());
    }

    #[test]
    fn test_load_uses_stored_calibration() {
        let throttle = ChannelCalibration::new(1053, 2107, 526).unwrap();
        let steering = ChannelCalibration::new(1100, 1900, 400).unwrap();
        let config = DriveConfig::load(&mut FixedStore([throttle, steering]));
        assert_eq!(config.throttle, throttle);
        assert_eq!(config.steering, steering);
        assert_eq!(config.max_comm_delay, MAX_COMM_DELAY);
    }
}
