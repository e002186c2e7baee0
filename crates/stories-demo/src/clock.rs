//! A `Clock` that follows tokio's clock.

use chrono::{DateTime, Utc};
use stories_core::clock::Clock;
use tokio::time::Instant;

/// Wall-clock time anchored at construction and advanced by
/// [`tokio::time::Instant`], so paused test time moves it too.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: DateTime<Utc>,
    started: Instant,
}

impl TokioClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Utc::now(),
            started: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = chrono::TimeDelta::from_std(self.started.elapsed()).unwrap_or_default();
        self.origin + elapsed
    }
}
