//! Pausing playback while the carousel is mid-transition.
//!
//! The carousel announces the start and end of a drag-driven group switch.
//! The viewer republishes both on one [`TransitionChannel`] scoped to that
//! viewer, and every live story reacts:
//!
//! - video stories pause on `Started` no matter what, and on `Ended` resume
//!   only if their [`ActiveFlag`] reads true at that moment;
//! - image stories stop accumulating ticks until `Ended`.

use std::cell::Cell;
use std::rc::Rc;

use stories_core::channel::BroadcastChannel;
use tracing::debug;

/// Carousel transition lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEvent {
    /// The user started dragging between groups.
    Started,
    /// The drag settled.
    Ended,
}

/// Channel carrying [`TransitionEvent`]s to live stories.
pub type TransitionChannel = BroadcastChannel<TransitionEvent>;

/// Shared "this story is in the foreground" flag.
///
/// A callback must observe the value at invocation time, not at subscription
/// time, so callbacks hold a clone of the flag and never a copy of its value.
#[derive(Debug, Clone, Default)]
pub struct ActiveFlag(Rc<Cell<bool>>);

impl ActiveFlag {
    /// A new, inactive flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the current value.
    #[must_use]
    pub fn get(&self) -> bool {
        self.0.get()
    }

    /// Updates the value seen by every clone.
    pub fn set(&self, active: bool) {
        self.0.set(active);
    }
}

/// Publishes carousel transitions to every subscribed story.
#[derive(Debug, Clone, Default)]
pub struct PauseCoordinator {
    channel: TransitionChannel,
}

impl PauseCoordinator {
    /// A coordinator with its own channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The channel stories subscribe to.
    #[must_use]
    pub fn channel(&self) -> &TransitionChannel {
        &self.channel
    }

    /// Announces that a transition started.
    pub fn transition_started(&self) {
        let delivered = self.channel.publish(&TransitionEvent::Started);
        debug!(delivered, "transition started");
    }

    /// Announces that a transition ended.
    pub fn transition_ended(&self) {
        let delivered = self.channel.publish(&TransitionEvent::Ended);
        debug!(delivered, "transition ended");
    }
}
