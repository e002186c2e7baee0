//! The viewer: one open-or-closed stories session over a catalog.
//!
//! Hosts drive a [`Viewer`] with three kinds of input: user intent (open,
//! close, taps), carousel transitions, and media signals from mounted
//! surfaces. Time only moves when the host calls [`Viewer::run_due`], which
//! fires due timers one at a time and applies whatever they produced before
//! firing the next.
//!
//! Each input records [`ViewerEvent`]s sharing one correlation id. Hosts
//! read them with [`Viewer::uncommitted_events`] or drain them with
//! [`Viewer::take_events`].

use std::rc::Rc;
use std::sync::Arc;

use stories_catalog::domain::model::Catalog;
use stories_core::error::DomainError;
use stories_core::event::EventMetadata;
use stories_core::media::{MediaHost, MediaSignal};
use stories_core::timer::EventLoop;
use stories_playback::config::PlaybackConfig;
use stories_playback::coordinator::PauseCoordinator;
use stories_playback::driver::DriverContext;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::events::{
    BoundaryReached, GroupOpened, StoryCompleted, StoryStarted, ViewerClosed, ViewerEvent,
    ViewerEventKind,
};
use crate::domain::group_navigator::{GroupNavigator, GroupStep};
use crate::domain::mailbox::{Mailbox, PlayerSignal};
use crate::domain::story_player::{PlaybackState, ProgressOutcome, StepOutcome, StoryPlayer};

/// A stories viewer.
#[derive(Debug)]
pub struct Viewer {
    id: Uuid,
    catalog: Catalog,
    navigator: GroupNavigator,
    players: Vec<StoryPlayer>,
    coordinator: PauseCoordinator,
    ctx: DriverContext,
    mailbox: Mailbox,
    next_sequence: u64,
    uncommitted_events: Vec<ViewerEvent>,
}

impl Viewer {
    /// Creates a closed viewer.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` if `config` is unusable.
    pub fn new(
        catalog: Catalog,
        event_loop: EventLoop,
        host: Rc<dyn MediaHost>,
        config: PlaybackConfig,
    ) -> Result<Self, DomainError> {
        config.validate()?;
        let coordinator = PauseCoordinator::new();
        let ctx = DriverContext {
            event_loop,
            transitions: coordinator.channel().clone(),
            host,
            config,
        };
        Ok(Self {
            id: Uuid::new_v4(),
            navigator: GroupNavigator::new(catalog.len()),
            catalog,
            players: Vec::new(),
            coordinator,
            ctx,
            mailbox: Mailbox::default(),
            next_sequence: 1,
            uncommitted_events: Vec::new(),
        })
    }

    /// Viewer instance identifier, stamped on every event.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn navigator(&self) -> &GroupNavigator {
        &self.navigator
    }

    /// The pause coordinator whose channel live stories listen on.
    #[must_use]
    pub fn coordinator(&self) -> &PauseCoordinator {
        &self.coordinator
    }

    /// The timer queue the viewer schedules on.
    #[must_use]
    pub fn event_loop(&self) -> &EventLoop {
        &self.ctx.event_loop
    }

    /// Index of the open group.
    #[must_use]
    pub fn current_group(&self) -> Option<usize> {
        self.navigator.current()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.navigator.is_open()
    }

    /// Player for the group at `index`. Players only exist while the viewer
    /// is open.
    #[must_use]
    pub fn player(&self, index: usize) -> Option<&StoryPlayer> {
        self.players.get(index)
    }

    /// Playback snapshot for the group at `index`.
    #[must_use]
    pub fn playback_state(&self, index: usize) -> Option<PlaybackState> {
        self.player(index).map(StoryPlayer::state)
    }

    /// Events recorded since the last [`take_events`](Self::take_events).
    #[must_use]
    pub fn uncommitted_events(&self) -> &[ViewerEvent] {
        &self.uncommitted_events
    }

    /// Drains the recorded events.
    pub fn take_events(&mut self) -> Vec<ViewerEvent> {
        std::mem::take(&mut self.uncommitted_events)
    }

    /// Opens the group at `group_index`, mounting every group if the viewer
    /// was closed. The opened group always restarts from its first story;
    /// opening the group that is already open changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `group_index` is out of range.
    /// The viewer is left as it was.
    #[instrument(skip(self), fields(viewer_id = %self.id))]
    pub fn open(&mut self, group_index: usize) -> Result<(), DomainError> {
        let correlation_id = Uuid::new_v4();
        self.open_group(group_index, correlation_id)?;
        self.drain(correlation_id);
        Ok(())
    }

    /// Closes the viewer, stopping and unmounting every group.
    #[instrument(skip(self), fields(viewer_id = %self.id))]
    pub fn close(&mut self) {
        let correlation_id = Uuid::new_v4();
        self.close_viewer(correlation_id);
    }

    /// Steps the open group back one story, or to the previous group's first
    /// story from its first story.
    #[instrument(skip(self), fields(viewer_id = %self.id))]
    pub fn tap_previous(&mut self) {
        let Some(current) = self.navigator.current() else {
            debug!("tap ignored while closed");
            return;
        };
        let correlation_id = Uuid::new_v4();
        let outcome = self.players[current].tap_previous();
        self.after_step(current, outcome, correlation_id);
        self.drain(correlation_id);
    }

    /// Steps the open group forward one story, or on to the next group (or
    /// closed) from its last story.
    #[instrument(skip(self), fields(viewer_id = %self.id))]
    pub fn tap_next(&mut self) {
        let Some(current) = self.navigator.current() else {
            debug!("tap ignored while closed");
            return;
        };
        let correlation_id = Uuid::new_v4();
        let outcome = self.players[current].tap_next();
        self.after_step(current, outcome, correlation_id);
        self.drain(correlation_id);
    }

    /// Carousel drag began: every live story pauses.
    pub fn transition_started(&mut self) {
        let correlation_id = Uuid::new_v4();
        self.coordinator.transition_started();
        if self.is_open() {
            self.record(correlation_id, ViewerEventKind::TransitionStarted);
        }
        self.drain(correlation_id);
    }

    /// Carousel drag settled: the active story resumes.
    pub fn transition_ended(&mut self) {
        let correlation_id = Uuid::new_v4();
        self.coordinator.transition_ended();
        if self.is_open() {
            self.record(correlation_id, ViewerEventKind::TransitionEnded);
        }
        self.drain(correlation_id);
    }

    /// Forwards a signal from the media surface of the group at
    /// `group_index`'s current story.
    pub fn media_event(&mut self, group_index: usize, signal: MediaSignal) {
        let Some(player) = self.players.get_mut(group_index) else {
            debug!(group_index, ?signal, "media signal for unmounted group dropped");
            return;
        };
        player.handle_media(signal);
        self.drain(Uuid::new_v4());
    }

    /// Fires every timer that is due, applying each timer's effects before
    /// the next one fires. Returns the number of timers fired.
    pub fn run_due(&mut self) -> usize {
        let mut fired = 0;
        while self.ctx.event_loop.fire_next_due() {
            fired += 1;
            self.drain(Uuid::new_v4());
        }
        fired
    }

    fn open_group(
        &mut self,
        group_index: usize,
        correlation_id: Uuid,
    ) -> Result<(), DomainError> {
        if self.navigator.current() == Some(group_index) {
            debug!(group_index, "group already open");
            return Ok(());
        }
        let was_open = self.navigator.is_open();
        let previous = self.navigator.open(group_index).inspect_err(|error| {
            warn!(%error, "open request rejected");
        })?;
        if !was_open {
            self.mount_all();
        }
        if let Some(previous) = previous {
            self.players[previous].deactivate();
        }

        let player = &mut self.players[group_index];
        player.activate();
        let group_id = player.group().id().to_owned();
        let started = story_started(player);
        info!(group_index, group_id = %group_id, previous = ?previous, "group opened");

        self.record(
            correlation_id,
            ViewerEventKind::GroupOpened(GroupOpened {
                group_index,
                group_id,
            }),
        );
        self.record(correlation_id, ViewerEventKind::StoryStarted(started));
        Ok(())
    }

    fn close_viewer(&mut self, correlation_id: Uuid) {
        let Some(last_group_index) = self.navigator.close() else {
            debug!("close ignored, viewer already closed");
            return;
        };
        for player in &mut self.players {
            player.deactivate();
        }
        self.players.clear();
        self.mailbox.clear();
        info!(last_group_index, "viewer closed");
        self.record(
            correlation_id,
            ViewerEventKind::ViewerClosed(ViewerClosed {
                last_group_index: Some(last_group_index),
            }),
        );
    }

    fn mount_all(&mut self) {
        self.players = self
            .catalog
            .groups()
            .enumerate()
            .map(|(index, group)| {
                StoryPlayer::mount(
                    index,
                    Arc::clone(group),
                    self.ctx.clone(),
                    self.mailbox.clone(),
                )
            })
            .collect();
        debug!(groups = self.players.len(), "groups mounted");
    }

    fn after_step(&mut self, group_index: usize, outcome: StepOutcome, correlation_id: Uuid) {
        match outcome {
            StepOutcome::Moved { .. } => {
                let started = story_started(&self.players[group_index]);
                debug!(group_index, story_index = started.story_index, "story started");
                self.record(correlation_id, ViewerEventKind::StoryStarted(started));
            }
            StepOutcome::NoPreviousStory => {
                self.record(
                    correlation_id,
                    ViewerEventKind::NoPreviousStory(BoundaryReached { group_index }),
                );
                self.apply_group_step(self.navigator.on_no_previous_story(), correlation_id);
            }
            StepOutcome::NoNextStory => {
                self.record(
                    correlation_id,
                    ViewerEventKind::NoNextStory(BoundaryReached { group_index }),
                );
                self.apply_group_step(self.navigator.on_no_next_story(), correlation_id);
            }
        }
    }

    fn apply_group_step(&mut self, step: GroupStep, correlation_id: Uuid) {
        match step {
            GroupStep::Open(index) => {
                if let Err(error) = self.open_group(index, correlation_id) {
                    warn!(%error, "group step dropped");
                }
            }
            GroupStep::Close => self.close_viewer(correlation_id),
            GroupStep::Stay => {}
        }
    }

    fn drain(&mut self, correlation_id: Uuid) {
        while let Some(signal) = self.mailbox.pop() {
            match signal {
                PlayerSignal::Progress {
                    group,
                    story,
                    progress,
                } => {
                    let Some(player) = self.players.get_mut(group) else {
                        continue;
                    };
                    if player.apply_progress(story, progress) == ProgressOutcome::Completed {
                        self.record(
                            correlation_id,
                            ViewerEventKind::StoryCompleted(StoryCompleted {
                                group_index: group,
                                story_index: story,
                            }),
                        );
                    }
                }
                PlayerSignal::AdvanceDue { group, story } => {
                    if self.navigator.current() != Some(group) {
                        continue;
                    }
                    let Some(outcome) = self.players[group].advance_due(story) else {
                        continue;
                    };
                    debug!(group, story, "advancing after completion");
                    self.after_step(group, outcome, correlation_id);
                }
            }
        }
    }

    fn record(&mut self, correlation_id: Uuid, kind: ViewerEventKind) {
        let sequence_number = self.next_sequence;
        self.next_sequence += 1;
        self.uncommitted_events.push(ViewerEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                viewer_id: self.id,
                sequence_number,
                correlation_id,
                occurred_at: self.ctx.event_loop.now(),
            },
            kind,
        });
    }
}

fn story_started(player: &StoryPlayer) -> StoryStarted {
    let story = player.story();
    StoryStarted {
        group_index: player.group_index(),
        story_index: player.story_index(),
        story_id: story.id().to_owned(),
        kind: story.kind(),
    }
}
