//! Receiver edge capture
//!
//! One task per receiver line. Each edge is timestamped as soon as the task
//! wakes and handed to the control loop through the channel's edge queue;
//! the decoders themselves only ever run in the control loop.

use crate::task::resources::{SteeringInputResources, ThrottleInputResources};
use defmt::warn;
use embassy_rp::gpio::{Input, Pull};
use embassy_time::Instant;
use ppm_drive::config::Ticks;
use ppm_drive::rc::{edge, ChannelId, Edge};

/// Throttle line capture
#[embassy_executor::task]
pub async fn capture_throttle(r: ThrottleInputResources) {
    let mut line = Input::new(r.pin, Pull::Down);
    capture(&mut line, ChannelId::Throttle).await;
}

/// Steering line capture
#[embassy_executor::task]
pub async fn capture_steering(r: SteeringInputResources) {
    let mut line = Input::new(r.pin, Pull::Down);
    capture(&mut line, ChannelId::Steering).await;
}

/// Forwards every edge of `line` to the queue of `channel`
async fn capture(line: &mut Input<'static>, channel: ChannelId) -> ! {
    // Set while the queue is full, so one overflow episode warns once
    let mut dropping = false;
    loop {
        line.wait_for_any_edge().await;
        let at = Instant::now().as_micros() as Ticks;

        // Level after the edge tells its direction
        let edge = if line.is_high() {
            Edge::rising(at)
        } else {
            Edge::falling(at)
        };

        if edge::record(channel, edge) {
            dropping = false;
        } else if !dropping {
            dropping = true;
            warn!("{:?} edge queue full, dropping edges from {:?}", channel, edge);
        }
    }
}
