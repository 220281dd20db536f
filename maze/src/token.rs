use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Longest uninterrupted nap taken by [`RunToken::sleep`]
const SLEEP_SLICE: Duration = Duration::from_millis(10);

/// Shared liveness flag. Starts out running; any clone may stop it, after
/// which it never runs again.
#[derive(Clone, Debug)]
pub struct RunToken {
    running: Arc<AtomicBool>,
}

impl RunToken {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Sleep for `duration`, waking early when the token is stopped.
    /// Returns whether the token is still running afterwards. A duration too
    /// long to put a deadline on sleeps until the token is stopped.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now().checked_add(duration);
        while self.is_running() {
            let nap = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return true;
                    }
                    SLEEP_SLICE.min(deadline - now)
                }
                None => SLEEP_SLICE,
            };
            std::thread::sleep(nap);
        }
        false
    }
}

impl Default for RunToken {
    fn default() -> Self {
        Self::new()
    }
}
