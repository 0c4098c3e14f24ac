//! Radio-control input
//!
//! Turns raw edge timestamps from the two receiver lines into normalized
//! axis values.

pub mod decoder;
pub mod edge;
pub mod normalize;

pub use decoder::{ChannelDecoder, ChannelStatus};
pub use edge::{Edge, Polarity};
pub use normalize::{ChannelCalibration, AXIS_FULL_SCALE, SCALE_BITS};

/// Receiver channel identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub enum ChannelId {
    /// Forward/back axis
    Throttle,
    /// Left/right axis, the canonical failsafe channel
    Steering,
}

impl ChannelId {
    /// Both channels, in processing order
    pub const ALL: [ChannelId; 2] = [ChannelId::Throttle, ChannelId::Steering];

    /// Array index for per-channel storage
    pub const fn index(self) -> usize {
        match self {
            ChannelId::Throttle => 0,
            ChannelId::Steering => 1,
        }
    }
}
