//! Link Status Indicator Module
//!
//! Carries the radio link state from the control loop to the status LED
//! task. The loop reports every period; only changes are signalled, so the
//! LED task wakes once per transition.
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use super::LinkIndicator;

/// Signal for link state changes (`true` = both channels healthy)
pub static LINK_STATUS_CHANGED: Signal<CriticalSectionRawMutex, bool> = Signal::new();

/// Signals a new link state
pub fn send(ok: bool) {
    LINK_STATUS_CHANGED.signal(ok);
}

/// Waits for the next link state change
pub async fn wait() -> bool {
    LINK_STATUS_CHANGED.wait().await
}

/// [`LinkIndicator`] that forwards state changes to [`LINK_STATUS_CHANGED`]
#[derive(Debug, Default)]
pub struct SignalingIndicator {
    last: Option<bool>,
}

impl SignalingIndicator {
    pub const fn new() -> Self {
        Self { last: None }
    }
}

impl LinkIndicator for SignalingIndicator {
    fn report_link_status(&mut self, ok: bool) {
        if self.last != Some(ok) {
            self.last = Some(ok);
            send(ok);
        }
    }
}
