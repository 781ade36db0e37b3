//! Time source for recency scores

use std::sync::atomic::{AtomicI64, Ordering};

pub trait VisitClock: Send + Sync {
    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl VisitClock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Clock that advances by a fixed step on every read
#[derive(Debug)]
pub struct SteppingClock {
    next: AtomicI64,
    step: i64,
}

impl SteppingClock {
    pub fn new(start: i64, step: i64) -> Self {
        Self {
            next: AtomicI64::new(start),
            step,
        }
    }
}

impl VisitClock for SteppingClock {
    fn now_millis(&self) -> i64 {
        self.next.fetch_add(self.step, Ordering::SeqCst)
    }
}
