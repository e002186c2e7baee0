//! Cooperative, single-threaded timer queue driven by a [`Clock`].
//!
//! Nothing here sleeps. The host (or a test) moves the clock and then calls
//! [`EventLoop::fire_next_due`] until it returns `false`. While a timer is
//! firing, [`EventLoop::now`] reports that timer's deadline, so work scheduled
//! from inside a callback is anchored to virtual time even when the clock has
//! jumped far ahead.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use chrono::{DateTime, TimeDelta, Utc};
use tracing::trace;

use crate::clock::Clock;

/// Smallest accepted repeat period.
pub const MIN_PERIOD: TimeDelta = TimeDelta::milliseconds(1);

type TimerCallback = Rc<dyn Fn()>;

struct Timer {
    deadline: DateTime<Utc>,
    period: Option<TimeDelta>,
    callback: TimerCallback,
}

struct Queue {
    next_id: u64,
    timers: BTreeMap<u64, Timer>,
    cursor: Option<DateTime<Utc>>,
}

impl Queue {
    fn earliest(&self) -> Option<(u64, DateTime<Utc>)> {
        self.timers
            .iter()
            .min_by_key(|(id, timer)| (timer.deadline, **id))
            .map(|(id, timer)| (*id, timer.deadline))
    }
}

/// Handle to a shared timer queue.
#[derive(Clone)]
pub struct EventLoop {
    clock: Rc<dyn Clock>,
    queue: Rc<RefCell<Queue>>,
}

impl EventLoop {
    /// Creates an empty event loop reading time from `clock`.
    #[must_use]
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            queue: Rc::new(RefCell::new(Queue {
                next_id: 0,
                timers: BTreeMap::new(),
                cursor: None,
            })),
        }
    }

    /// Current virtual time: the deadline being fired, or the clock's time.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.queue
            .borrow()
            .cursor
            .unwrap_or_else(|| self.clock.now())
    }

    /// Schedules `callback` every `period`, first firing one period from now.
    pub fn schedule_interval<F>(&self, period: TimeDelta, callback: F) -> TimerHandle
    where
        F: Fn() + 'static,
    {
        let period = period.max(MIN_PERIOD);
        self.insert(self.now() + period, Some(period), Rc::new(callback))
    }

    /// Schedules `callback` once, `delay` from now.
    pub fn schedule_once<F>(&self, delay: TimeDelta, callback: F) -> TimerHandle
    where
        F: Fn() + 'static,
    {
        let delay = delay.max(TimeDelta::zero());
        self.insert(self.now() + delay, None, Rc::new(callback))
    }

    fn insert(
        &self,
        deadline: DateTime<Utc>,
        period: Option<TimeDelta>,
        callback: TimerCallback,
    ) -> TimerHandle {
        let mut queue = self.queue.borrow_mut();
        let id = queue.next_id;
        queue.next_id += 1;
        queue.timers.insert(
            id,
            Timer {
                deadline,
                period,
                callback,
            },
        );
        TimerHandle {
            id,
            queue: Rc::downgrade(&self.queue),
        }
    }

    /// Fires the earliest timer whose deadline has passed.
    ///
    /// Ties are broken by scheduling order. Returns `false`, and leaves
    /// virtual time, once nothing is due.
    pub fn fire_next_due(&self) -> bool {
        let now = self.clock.now();
        let callback = {
            let mut queue = self.queue.borrow_mut();
            let due = queue.earliest().filter(|&(_, deadline)| deadline <= now);
            let Some((id, deadline)) = due else {
                queue.cursor = None;
                return false;
            };
            queue.cursor = Some(deadline);
            trace!(timer = id, %deadline, "timer fired");

            let period = queue.timers.get(&id).and_then(|timer| timer.period);
            match period {
                Some(period) => queue.timers.get_mut(&id).map(|timer| {
                    timer.deadline = deadline + period;
                    Rc::clone(&timer.callback)
                }),
                None => queue.timers.remove(&id).map(|timer| timer.callback),
            }
        };

        if let Some(callback) = callback {
            callback();
        }
        true
    }

    /// Fires every due timer and returns how many fired.
    pub fn run_due(&self) -> usize {
        let mut fired = 0;
        while self.fire_next_due() {
            fired += 1;
        }
        fired
    }

    /// Deadline of the next timer, due or not.
    #[must_use]
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.queue.borrow().earliest().map(|(_, deadline)| deadline)
    }

    /// Number of scheduled timers.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().timers.len()
    }
}

impl fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let queue = self.queue.borrow();
        f.debug_struct("EventLoop")
            .field("pending", &queue.timers.len())
            .field("cursor", &queue.cursor)
            .finish_non_exhaustive()
    }
}

/// Owns a scheduled timer; dropping it cancels the timer.
#[must_use = "dropping a timer handle cancels the timer"]
pub struct TimerHandle {
    id: u64,
    queue: Weak<RefCell<Queue>>,
}

impl TimerHandle {
    /// Cancels the timer now.
    pub fn cancel(self) {}

    /// Whether the timer is still queued. One-shot timers leave the queue as
    /// they fire.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.queue
            .upgrade()
            .is_some_and(|queue| queue.borrow().timers.contains_key(&self.id))
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if let Some(queue) = self.queue.upgrade() {
            let removed = queue.borrow_mut().timers.remove(&self.id);
            drop(removed);
        }
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    use super::*;

    struct StepClock(Cell<DateTime<Utc>>);

    impl StepClock {
        fn advance(&self, by: TimeDelta) {
            self.0.set(self.0.get() + by);
        }
    }

    impl Clock for StepClock {
        fn now(&self) -> DateTime<Utc> {
            self.0.get()
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
    }

    fn setup() -> (Rc<StepClock>, EventLoop) {
        let clock = Rc::new(StepClock(Cell::new(start())));
        let event_loop = EventLoop::new(clock.clone());
        (clock, event_loop)
    }

    #[test]
    fn test_interval_fires_once_per_elapsed_period() {
        // Arrange
        let (clock, event_loop) = setup();
        let ticks = Rc::new(Cell::new(0));
        let _handle = {
            let ticks = Rc::clone(&ticks);
            event_loop.schedule_interval(TimeDelta::milliseconds(300), move || {
                ticks.set(ticks.get() + 1);
            })
        };

        // Act
        clock.advance(TimeDelta::milliseconds(299));
        let before = event_loop.run_due();
        clock.advance(TimeDelta::milliseconds(1_000));
        let after = event_loop.run_due();

        // Assert
        assert_eq!(before, 0);
        assert_eq!(after, 4);
        assert_eq!(ticks.get(), 4);
    }

    #[test]
    fn test_dropping_handle_cancels_timer() {
        // Arrange
        let (clock, event_loop) = setup();
        let fired = Rc::new(Cell::new(false));
        let handle = {
            let fired = Rc::clone(&fired);
            event_loop.schedule_once(TimeDelta::milliseconds(10), move || fired.set(true))
        };

        // Act
        handle.cancel();
        clock.advance(TimeDelta::seconds(1));
        event_loop.run_due();

        // Assert
        assert!(!fired.get());
        assert_eq!(event_loop.pending(), 0);
    }

    #[test]
    fn test_timers_fire_in_deadline_order_with_virtual_now() {
        // Arrange
        let (clock, event_loop) = setup();
        let order = Rc::new(RefCell::new(Vec::new()));
        let late = {
            let order = Rc::clone(&order);
            let inner = event_loop.clone();
            event_loop.schedule_once(TimeDelta::milliseconds(200), move || {
                order.borrow_mut().push(("late", inner.now()));
            })
        };
        let early = {
            let order = Rc::clone(&order);
            let inner = event_loop.clone();
            event_loop.schedule_once(TimeDelta::milliseconds(100), move || {
                order.borrow_mut().push(("early", inner.now()));
            })
        };

        // Act
        clock.advance(TimeDelta::seconds(5));
        event_loop.run_due();

        // Assert
        let order = order.borrow();
        assert_eq!(order[0], ("early", start() + TimeDelta::milliseconds(100)));
        assert_eq!(order[1], ("late", start() + TimeDelta::milliseconds(200)));
        assert!(!early.is_scheduled());
        assert!(!late.is_scheduled());
        assert_eq!(event_loop.now(), start() + TimeDelta::seconds(5));
    }

    #[test]
    fn test_callback_may_schedule_followup_anchored_to_its_deadline() {
        // Arrange
        let (clock, event_loop) = setup();
        let followup: Rc<RefCell<Option<TimerHandle>>> = Rc::new(RefCell::new(None));
        let fired_at = Rc::new(Cell::new(None));
        let _first = {
            let followup = Rc::clone(&followup);
            let fired_at = Rc::clone(&fired_at);
            let inner = event_loop.clone();
            event_loop.schedule_once(TimeDelta::milliseconds(100), move || {
                let fired_at = Rc::clone(&fired_at);
                let probe = inner.clone();
                let handle = inner.schedule_once(TimeDelta::milliseconds(50), move || {
                    fired_at.set(Some(probe.now()));
                });
                *followup.borrow_mut() = Some(handle);
            })
        };

        // Act
        clock.advance(TimeDelta::seconds(1));
        event_loop.run_due();

        // Assert
        assert_eq!(fired_at.get(), Some(start() + TimeDelta::milliseconds(150)));
    }

    #[test]
    fn test_zero_period_is_raised_to_minimum() {
        let (clock, event_loop) = setup();
        let _handle = event_loop.schedule_interval(TimeDelta::zero(), || {});
        clock.advance(TimeDelta::milliseconds(3));
        assert_eq!(event_loop.run_due(), 3);
        assert_eq!(
            event_loop.next_deadline(),
            Some(start() + TimeDelta::milliseconds(4))
        );
    }
}
