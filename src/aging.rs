//! The aging task: a single cooperative loop that periodically sweeps
//! expired CAM entries and empty multicast groups.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::cam::Cam;
use crate::multicast::MulticastStack;

/// Sleeps in short slices rather than one long `thread::sleep` so
/// `cancel` is observed promptly instead of only between full periods.
const POLL_SLICE: Duration = Duration::from_millis(100);

pub struct AgingTask {
    cam: Arc<Cam>,
    multicast: Arc<MulticastStack>,
    period: Duration,
}

impl AgingTask {
    pub fn new(cam: Arc<Cam>, multicast: Arc<MulticastStack>, period_secs: u64) -> Self {
        Self {
            cam,
            multicast,
            period: Duration::from_secs(period_secs.max(1)),
        }
    }

    /// Sleep `self.period`, then sweep, repeating until `cancel` is
    /// set. Checked at every sleep slice, so cancellation during a
    /// long period is still prompt.
    pub fn run(&self, cancel: &AtomicBool) {
        while !cancel.load(Ordering::Relaxed) {
            if !self.sleep_cancellable(cancel) {
                return;
            }
            self.cam.cleanup();
            self.multicast.cleanup();
        }
    }

    /// Returns `false` if cancellation fired during the sleep.
    fn sleep_cancellable(&self, cancel: &AtomicBool) -> bool {
        let mut remaining = self.period;
        while !remaining.is_zero() {
            if cancel.load(Ordering::Relaxed) {
                return false;
            }
            let slice = remaining.min(POLL_SLICE);
            std::thread::sleep(slice);
            remaining -= slice;
        }
        !cancel.load(Ordering::Relaxed)
    }
}
