//! Edge hand-off between capture and control contexts
//!
//! The capture side (GPIO interrupt wakeups on the target) only timestamps
//! edges and pushes them into a small per-channel queue. The control loop
//! drains the queues and runs the decoder, so all decoder state has a single
//! writer and the loop never races an edge while consuming a reading.
//!
//! Queues are bounded. If the loop falls behind, new edges are dropped and
//! the decoder resynchronises on its own (see [`super::decoder`]).

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use super::ChannelId;
use crate::config::Ticks;

/// Edges buffered per channel between two loop iterations
const EDGE_QUEUE_SIZE: usize = 8;

/// Signal transition direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub enum Polarity {
    /// Low to high
    Rising,
    /// High to low
    Falling,
}

impl Polarity {
    /// The other polarity
    pub const fn opposite(self) -> Self {
        match self {
            Polarity::Rising => Polarity::Falling,
            Polarity::Falling => Polarity::Rising,
        }
    }
}

/// A timestamped transition on one receiver line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "rp2350", derive(defmt::Format))]
pub struct Edge {
    /// Capture-clock count at the transition
    pub at: Ticks,
    /// Transition direction
    pub polarity: Polarity,
}

impl Edge {
    /// Rising edge at `at`
    pub const fn rising(at: Ticks) -> Self {
        Self {
            at,
            polarity: Polarity::Rising,
        }
    }

    /// Falling edge at `at`
    pub const fn falling(at: Ticks) -> Self {
        Self {
            at,
            polarity: Polarity::Falling,
        }
    }
}

/// Pending edges on the throttle line
static THROTTLE_EDGES: Channel<CriticalSectionRawMutex, Edge, EDGE_QUEUE_SIZE> = Channel::new();

/// Pending edges on the steering line
static STEERING_EDGES: Channel<CriticalSectionRawMutex, Edge, EDGE_QUEUE_SIZE> = Channel::new();

fn queue(channel: ChannelId) -> &'static Channel<CriticalSectionRawMutex, Edge, EDGE_QUEUE_SIZE> {
    match channel {
        ChannelId::Throttle => &THROTTLE_EDGES,
        ChannelId::Steering => &STEERING_EDGES,
    }
}

/// Records an edge from the capture context
///
/// Never blocks. Returns `false` if the queue was full and the edge was dropped.
pub fn record(channel: ChannelId, edge: Edge) -> bool {
    queue(channel).try_send(edge).is_ok()
}

/// Feeds every pending edge of `channel`, oldest first, to `handle`
///
/// Returns the number of edges drained.
pub fn drain(channel: ChannelId, mut handle: impl FnMut(Edge)) -> usize {
    let queue = queue(channel);
    let mut drained = 0;
    while let Ok(edge) = queue.try_receive() {
        handle(edge);
        drained += 1;
    }
    drained
}

#[cfg(test)]
mod tests {
    use super::*;

    // The queues are process-wide statics and tests run in parallel, so each
    // test below owns one channel exclusively.

    #[test]
    fn test_drain_preserves_order() {
        let channel = ChannelId::Throttle;
        drain(channel, |_| {});

        assert!(record(channel, Edge::rising(100)));
        assert!(record(channel, Edge::falling(1600)));

        let mut seen = Vec::new();
        let drained = drain(channel, |edge| seen.push(edge));
        assert_eq!(drained, 2);
        assert_eq!(seen, vec![Edge::rising(100), Edge::falling(1600)]);
        assert_eq!(drain(channel, |_| {}), 0);
    }

    #[test]
    fn test_full_queue_drops_newest() {
        let channel = ChannelId::Steering;
        drain(channel, |_| {});

        for i in 0..EDGE_QUEUE_SIZE as u32 {
            assert!(record(channel, Edge::rising(i)));
        }
        assert!(!record(channel, Edge::rising(999)));

        let mut last = None;
        assert_eq!(drain(channel, |edge| last = Some(edge)), EDGE_QUEUE_SIZE);
        assert_eq!(last, Some(Edge::rising(EDGE_QUEUE_SIZE as u32 - 1)));
    }

    #[test]
    fn test_opposite_polarity() {
        assert_eq!(Polarity::Rising.opposite(), Polarity::Falling);
        assert_eq!(Polarity::Falling.opposite(), Polarity::Rising);
    }
}
