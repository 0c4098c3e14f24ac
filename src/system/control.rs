//! Drive Controller
//!
//! The fixed-period control loop body. Each [`DriveController::tick`]
//! performs, in order:
//!
//! 1. feed the watchdog
//! 2. check both channels for signal loss and report the link state
//! 3. consume fresh readings: normalize when in range, then re-mix
//! 4. apply the failsafe override and drive both motors
//!
//! Edges reach the decoders through [`DriveController::on_edge`] (or
//! [`DriveController::pump_edges`] from the capture queues) before the tick.
//! Nothing here blocks; a tick is a bounded amount of integer work.
//!
//! # Failsafe
//! A channel that times out is latched as lost. The latch is released only
//! when that channel delivers a reading inside its calibrated range, so the
//! motors stay stopped through the resynchronisation edges. While the
//! [`FailsafePolicy`] considers the link lost, both motors get zero duty
//! regardless of the last mix; the mix itself is kept and takes effect again
//! on recovery.

use crate::config::{DriveConfig, FailsafePolicy, Ticks};
use crate::drive::{mix, DriveDuty, Motor, MotorCommands, PwmBackend};
use crate::error::Result;
use crate::rc::{edge, ChannelCalibration, ChannelDecoder, ChannelId, ChannelStatus, Edge};

use super::{LinkIndicator, Watchdog};

/// Decoder plus derived state of one receiver channel
#[derive(Debug, Clone)]
struct InputChannel {
    decoder: ChannelDecoder,
    calibration: ChannelCalibration,
    /// Last in-range normalized value, held while readings are stale or invalid
    axis: i16,
    /// Latched on timeout, cleared by the next in-range reading
    lost: bool,
}

impl InputChannel {
    const fn new(calibration: ChannelCalibration, now: Ticks) -> Self {
        Self {
            decoder: ChannelDecoder::new(now),
            calibration,
            axis: 0,
            lost: false,
        }
    }
}

/// Two-channel PPM to differential-drive controller
pub struct DriveController<B, W, L> {
    channels: [InputChannel; 2],
    commands: MotorCommands,
    max_comm_delay: Ticks,
    failsafe: FailsafePolicy,
    failsafe_engaged: bool,
    backend: B,
    watchdog: W,
    indicator: L,
}

impl<B, W, L> DriveController<B, W, L>
where
    B: PwmBackend,
    W: Watchdog,
    L: LinkIndicator,
{
    /// Creates a controller with both axes at neutral. `now` seeds the
    /// signal-loss timeout of both channels.
    pub fn new(config: DriveConfig, now: Ticks, backend: B, watchdog: W, indicator: L) -> Self {
        Self {
            channels: [
                InputChannel::new(config.throttle, now),
                InputChannel::new(config.steering, now),
            ],
            commands: MotorCommands::default(),
            max_comm_delay: config.max_comm_delay,
            failsafe: config.failsafe,
            failsafe_engaged: false,
            backend,
            watchdog,
            indicator,
        }
    }

    /// Feeds one captured edge to a channel's decoder
    pub fn on_edge(&mut self, channel: ChannelId, edge: Edge) {
        self.channels[channel.index()].decoder.on_edge(edge);
    }

    /// Moves every queued edge from the capture queues into the decoders
    pub fn pump_edges(&mut self) {
        for id in ChannelId::ALL {
            let decoder = &mut self.channels[id.index()].decoder;
            edge::drain(id, |edge| {
                decoder.on_edge(edge);
            });
        }
    }

    /// Throws away every queued edge without decoding it
    ///
    /// Call once before the first tick. Edges captured before the loop was
    /// live carry timestamps older than the decoders' timeout window and
    /// would otherwise be measured as a pulse that started long ago.
    pub fn discard_pending_edges(&mut self) {
        for id in ChannelId::ALL {
            let stale = edge::drain(id, |_| {});
            if stale > 0 {
                crate::log_debug!("{:?} discarded {} stale edges", id, stale);
            }
        }
    }

    /// Runs one loop period at time `now`
    ///
    /// An output error is returned after both motors were attempted; the
    /// decoding state is already up to date, so the caller can log it and
    /// keep ticking.
    pub fn tick(&mut self, now: Ticks) -> Result<()> {
        self.watchdog.feed();

        for id in ChannelId::ALL {
            let channel = &mut self.channels[id.index()];
            if channel.decoder.check_timeout(now, self.max_comm_delay) {
                channel.lost = true;
                crate::log_warn!("{:?} channel signal lost", id);
            }
        }
        let link_ok = !self.channels.iter().any(|channel| channel.lost);
        self.indicator.report_link_status(link_ok);

        for id in ChannelId::ALL {
            self.consume(id);
        }

        self.drive_outputs()
    }

    fn consume(&mut self, id: ChannelId) {
        let channel = &mut self.channels[id.index()];
        let Some(pulse) = channel.decoder.consume() else {
            return;
        };

        match channel.calibration.normalize(pulse) {
            Some(axis) => {
                channel.axis = axis;
                if channel.lost {
                    channel.lost = false;
                    crate::log_info!("{:?} channel signal recovered", id);
                }
            }
            None => {
                crate::log_debug!("{:?} channel pulse {} out of range", id, pulse);
            }
        }

        self.commands = mix(self.axis(ChannelId::Throttle), self.axis(ChannelId::Steering));
    }

    fn drive_outputs(&mut self) -> Result<()> {
        let engaged = self.failsafe.engaged(
            self.channels[ChannelId::Throttle.index()].lost,
            self.channels[ChannelId::Steering.index()].lost,
        );
        if engaged != self.failsafe_engaged {
            self.failsafe_engaged = engaged;
            if engaged {
                crate::log_warn!("Failsafe engaged, motors stopped");
            } else {
                crate::log_info!("Failsafe released");
            }
        }

        let (left, right) = if engaged {
            (DriveDuty::STOP, DriveDuty::STOP)
        } else {
            (
                DriveDuty::from_command(self.commands.left),
                DriveDuty::from_command(self.commands.right),
            )
        };

        self.backend.begin_period();
        let left_result = self.backend.apply(Motor::Left, left);
        let right_result = self.backend.apply(Motor::Right, right);
        left_result.and(right_result)
    }

    /// Decoder state of a channel
    pub fn status(&self, channel: ChannelId) -> ChannelStatus {
        self.channels[channel.index()].decoder.status()
    }

    /// Current normalized value of a channel
    pub fn axis(&self, channel: ChannelId) -> i16 {
        self.channels[channel.index()].axis
    }

    /// Whether a channel is latched as lost
    pub fn is_lost(&self, channel: ChannelId) -> bool {
        self.channels[channel.index()].lost
    }

    /// Latest mixer output, before the failsafe override
    pub fn commands(&self) -> MotorCommands {
        self.commands
    }

    /// Whether the last tick forced the motors to stop
    pub fn failsafe_engaged(&self) -> bool {
        self.failsafe_engaged
    }

    /// Output backend
    pub fn backend(&self) -> &B {
        &self.backend
    }
}
