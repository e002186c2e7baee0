//! Queue between driver callbacks and the viewer.
//!
//! Timer and channel callbacks never touch a player directly; they post here
//! and the viewer applies the signals once the callback has returned.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use stories_playback::progress::Progress;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum PlayerSignal {
    /// A driver reported progress for a story.
    Progress {
        group: usize,
        story: usize,
        progress: Progress,
    },
    /// The completion debounce for a story elapsed.
    AdvanceDue { group: usize, story: usize },
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Mailbox(Rc<RefCell<VecDeque<PlayerSignal>>>);

impl Mailbox {
    pub(crate) fn post(&self, signal: PlayerSignal) {
        self.0.borrow_mut().push_back(signal);
    }

    pub(crate) fn pop(&self) -> Option<PlayerSignal> {
        self.0.borrow_mut().pop_front()
    }

    pub(crate) fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}
