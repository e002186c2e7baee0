//! Per-group story state machine.
//!
//! A [`StoryPlayer`] owns one group's current story, its accumulated progress
//! and the progress driver mounted for it. Only the open group's player is
//! active; every other player holds story 0 at zero progress with its driver
//! stopped.
//!
//! Progress arrives through the viewer's mailbox tagged with the story it
//! was produced for, so a reading from a story that has since been left is
//! recognisably stale and dropped.

use std::rc::Rc;
use std::sync::Arc;

use serde::Serialize;
use stories_catalog::domain::model::{Story, StoryGroup};
use stories_core::media::MediaSignal;
use stories_core::timer::TimerHandle;
use stories_playback::coordinator::ActiveFlag;
use stories_playback::driver::{self, DriverContext, ProgressDriver, ProgressSink};
use stories_playback::progress::Progress;
use tracing::{debug, trace};

use super::mailbox::{Mailbox, PlayerSignal};

/// Snapshot of a group's playback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaybackState {
    /// Current story within the group.
    pub story_index: usize,
    /// Progress of the current story.
    pub progress: Progress,
    /// Whether the group is the open one.
    pub active: bool,
}

/// Result of a tap or an automatic advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The group moved to this story.
    Moved {
        /// The new current story.
        story_index: usize,
    },
    /// The group is on its first story; nothing changed.
    NoPreviousStory,
    /// The group is on its last story; nothing changed.
    NoNextStory,
}

/// Result of applying a progress reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressOutcome {
    /// Stale, inactive or non-increasing reading; dropped.
    Ignored,
    /// Progress moved forward.
    Updated,
    /// Progress reached 100 for the first time this run. The advance is
    /// scheduled after the debounce.
    Completed,
}

/// Story state machine for one group.
pub struct StoryPlayer {
    group_index: usize,
    group: Arc<StoryGroup>,
    story_index: usize,
    progress: Progress,
    completed: bool,
    active: ActiveFlag,
    driver: Box<dyn ProgressDriver>,
    pending_advance: Option<TimerHandle>,
    ctx: DriverContext,
    mailbox: Mailbox,
}

impl StoryPlayer {
    /// Mounts story 0 of `group` in the inactive state.
    pub(crate) fn mount(
        group_index: usize,
        group: Arc<StoryGroup>,
        ctx: DriverContext,
        mailbox: Mailbox,
    ) -> Self {
        let active = ActiveFlag::new();
        let first = &group.stories()[0];
        let driver = driver::mount(first, &active, &ctx);
        Self {
            group_index,
            group,
            story_index: 0,
            progress: Progress::ZERO,
            completed: false,
            active,
            driver,
            pending_advance: None,
            ctx,
            mailbox,
        }
    }

    /// Position of the group in the catalog.
    #[must_use]
    pub fn group_index(&self) -> usize {
        self.group_index
    }

    /// The group played by this player.
    #[must_use]
    pub fn group(&self) -> &Arc<StoryGroup> {
        &self.group
    }

    /// Current story index.
    #[must_use]
    pub fn story_index(&self) -> usize {
        self.story_index
    }

    /// Current story.
    #[must_use]
    pub fn story(&self) -> &Story {
        &self.group.stories()[self.story_index]
    }

    /// Progress of the current story.
    #[must_use]
    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// Whether this group is the open one.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Whether the current story's media is stalled.
    #[must_use]
    pub fn is_buffering(&self) -> bool {
        self.driver.is_buffering()
    }

    /// Whether the mounted driver is producing progress.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.driver.is_running()
    }

    /// Whether an automatic advance is waiting on the debounce.
    #[must_use]
    pub fn has_pending_advance(&self) -> bool {
        self.pending_advance.is_some()
    }

    #[must_use]
    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            story_index: self.story_index,
            progress: self.progress,
            active: self.active.get(),
        }
    }

    /// Progress of every story for the segmented bar: completed stories read
    /// 100, upcoming ones 0.
    #[must_use]
    pub fn segments(&self) -> Vec<Progress> {
        (0..self.group.len())
            .map(|index| match index.cmp(&self.story_index) {
                std::cmp::Ordering::Less => Progress::COMPLETE,
                std::cmp::Ordering::Equal => self.progress,
                std::cmp::Ordering::Greater => Progress::ZERO,
            })
            .collect()
    }

    /// Brings the group to the foreground, restarting from its first story.
    pub(crate) fn activate(&mut self) {
        self.active.set(true);
        self.go_to(0);
    }

    /// Sends the group to the background, parked on its first story with
    /// the driver stopped.
    pub(crate) fn deactivate(&mut self) {
        self.active.set(false);
        self.go_to(0);
    }

    pub(crate) fn tap_previous(&mut self) -> StepOutcome {
        match self.story_index.checked_sub(1) {
            Some(previous) => {
                self.go_to(previous);
                StepOutcome::Moved {
                    story_index: previous,
                }
            }
            None => StepOutcome::NoPreviousStory,
        }
    }

    pub(crate) fn tap_next(&mut self) -> StepOutcome {
        let next = self.story_index + 1;
        if next < self.group.len() {
            self.go_to(next);
            StepOutcome::Moved { story_index: next }
        } else {
            StepOutcome::NoNextStory
        }
    }

    /// Applies a progress reading produced for `story_index`.
    pub(crate) fn apply_progress(
        &mut self,
        story_index: usize,
        progress: Progress,
    ) -> ProgressOutcome {
        if story_index != self.story_index || !self.active.get() || progress <= self.progress {
            return ProgressOutcome::Ignored;
        }
        self.progress = progress;
        trace!(group = self.group_index, story = story_index, %progress, "progress");

        if !progress.is_complete() || self.completed {
            return ProgressOutcome::Updated;
        }
        self.completed = true;
        let mailbox = self.mailbox.clone();
        let group = self.group_index;
        self.pending_advance = Some(self.ctx.event_loop.schedule_once(
            self.ctx.config.advance_debounce,
            move || {
                mailbox.post(PlayerSignal::AdvanceDue {
                    group,
                    story: story_index,
                });
            },
        ));
        debug!(group, story = story_index, "story complete, advance scheduled");
        ProgressOutcome::Completed
    }

    /// Handles the elapsed completion debounce for `story_index`. Returns
    /// `None` when the advance no longer applies.
    pub(crate) fn advance_due(&mut self, story_index: usize) -> Option<StepOutcome> {
        if story_index != self.story_index || !self.completed || !self.active.get() {
            return None;
        }
        self.pending_advance = None;
        Some(self.tap_next())
    }

    pub(crate) fn handle_media(&mut self, signal: MediaSignal) {
        self.driver.handle(signal);
    }

    fn go_to(&mut self, index: usize) {
        let Some(story) = self.group.story(index) else {
            return;
        };
        self.pending_advance = None;
        self.driver.cancel();
        if index != self.story_index {
            let next = driver::mount(story, &self.active, &self.ctx);
            drop(std::mem::replace(&mut self.driver, next));
            self.story_index = index;
        }
        self.progress = Progress::ZERO;
        self.completed = false;
        if self.active.get() {
            let sink = self.sink();
            self.driver.start(sink);
        }
    }

    fn sink(&self) -> ProgressSink {
        let mailbox = self.mailbox.clone();
        let group = self.group_index;
        let story = self.story_index;
        Rc::new(move |progress| {
            mailbox.post(PlayerSignal::Progress {
                group,
                story,
                progress,
            });
        })
    }
}

impl std::fmt::Debug for StoryPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryPlayer")
            .field("group_index", &self.group_index)
            .field("story_index", &self.story_index)
            .field("progress", &self.progress)
            .field("active", &self.active.get())
            .field("pending_advance", &self.pending_advance.is_some())
            .finish_non_exhaustive()
    }
}
