//! Per-channel pulse decoder
//!
//! Measures the high time of the receiver pulse on one line and detects
//! prolonged silence.
//!
//! # State machine
//! ```text
//!            rising edge             falling edge
//! AwaitingRise ---------> AwaitingFall ---------> ValueReady
//!      ^                                              |
//!      +------------------ consume() -----------------+
//!
//! AwaitingRise / AwaitingFall --timeout--> SignalLost --edge--> AwaitingRise
//! ```
//!
//! The decoder is armed for one polarity at a time, like a capture unit:
//! edges of the other polarity are ignored. Leaving `SignalLost` only
//! re-arms for a rising edge and restarts the timeout window; that edge is
//! not used as a measurement.
//!
//! All tick arithmetic wraps, which is exact for the power-of-two width of
//! the capture clock as long as intervals stay shorter than one wrap.

use super::edge::{Edge, Polarity};
use crate::config::Ticks;

/// Decoder state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub enum ChannelStatus {
    /// Waiting for the start of a pulse
    AwaitingRise,
    /// Inside a pulse, waiting for its end
    AwaitingFall,
    /// No pulse started within the timeout
    SignalLost,
    /// A complete pulse was measured and not yet consumed
    ValueReady,
}

/// Pulse-width decoder for one receiver line
#[derive(Debug, Clone)]
pub struct ChannelDecoder {
    status: ChannelStatus,
    armed: Polarity,
    pulse_start: Ticks,
    pulse_value: Ticks,
}

impl ChannelDecoder {
    /// Creates a decoder waiting for a rising edge. `now` seeds the timeout.
    pub const fn new(now: Ticks) -> Self {
        Self {
            status: ChannelStatus::AwaitingRise,
            armed: Polarity::Rising,
            pulse_start: now,
            pulse_value: 0,
        }
    }

    /// Current state
    pub fn status(&self) -> ChannelStatus {
        self.status
    }

    /// Polarity the decoder is waiting for
    pub fn armed(&self) -> Polarity {
        self.armed
    }

    /// Last measured pulse width
    pub fn pulse_value(&self) -> Ticks {
        self.pulse_value
    }

    /// Processes one edge. Returns `false` if the edge was ignored.
    pub fn on_edge(&mut self, edge: Edge) -> bool {
        if edge.polarity != self.armed {
            return false;
        }

        match self.status {
            ChannelStatus::AwaitingRise => {
                self.pulse_start = edge.at;
                self.armed = Polarity::Falling;
                self.status = ChannelStatus::AwaitingFall;
            }
            ChannelStatus::AwaitingFall => {
                self.pulse_value = edge.at.wrapping_sub(self.pulse_start);
                self.armed = Polarity::Rising;
                self.status = ChannelStatus::ValueReady;
            }
            ChannelStatus::SignalLost => {
                // Restart the timeout window, otherwise the next check would
                // declare the channel lost again before its first pulse
                self.pulse_start = edge.at;
                self.armed = Polarity::Rising;
                self.status = ChannelStatus::AwaitingRise;
            }
            // Held until the control loop consumes it
            ChannelStatus::ValueReady => return false,
        }
        true
    }

    /// Marks the signal lost if no pulse started within `max_delay` of `now`
    ///
    /// Returns `true` on the transition into `SignalLost`. A channel holding
    /// an unconsumed reading is left alone; its pulse is by definition recent.
    pub fn check_timeout(&mut self, now: Ticks, max_delay: Ticks) -> bool {
        match self.status {
            ChannelStatus::SignalLost | ChannelStatus::ValueReady => false,
            ChannelStatus::AwaitingRise | ChannelStatus::AwaitingFall => {
                if now.wrapping_sub(self.pulse_start) > max_delay {
                    self.status = ChannelStatus::SignalLost;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Takes the pending reading, re-arming for the next pulse
    ///
    /// Returns `None` and changes nothing unless a reading is ready.
    pub fn consume(&mut self) -> Option<Ticks> {
        if self.status != ChannelStatus::ValueReady {
            return None;
        }
        self.status = ChannelStatus::AwaitingRise;
        Some(self.pulse_value)
    }
}
