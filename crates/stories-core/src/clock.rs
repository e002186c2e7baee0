//! Time source read by the event loop.

use chrono::{DateTime, Utc};

/// Wall-clock reading behind every timer deadline.
///
/// The event loop only reads the clock when it is idle; while it fires due
/// timers it keeps its own cursor, so a clock may jump forward arbitrarily
/// far between reads. Implementations live with the host: the demo follows
/// tokio's clock and tests drive a manual one. Everything in the engine is
/// single-threaded, so a clock is shared as `Rc<dyn Clock>`.
pub trait Clock {
    /// Returns the current time. Must never go backwards.
    fn now(&self) -> DateTime<Utc>;
}
