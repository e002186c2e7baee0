//! Events recorded by a viewer as it navigates.

use serde::{Deserialize, Serialize};
use stories_catalog::domain::model::MediaKind;
use stories_core::event::{DomainEvent, EventMetadata};

/// Emitted when a group becomes the open one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupOpened {
    /// Position of the group in the catalog.
    pub group_index: usize,
    /// The group identifier.
    pub group_id: String,
}

/// Emitted when the viewer closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerClosed {
    /// The group that was open, if any.
    pub last_group_index: Option<usize>,
}

/// Emitted when a story of the open group starts playing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryStarted {
    /// Position of the group in the catalog.
    pub group_index: usize,
    /// Position of the story in its group.
    pub story_index: usize,
    /// The story identifier.
    pub story_id: String,
    /// Media kind of the story.
    pub kind: MediaKind,
}

/// Emitted once per run when a story's progress reaches 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryCompleted {
    /// Position of the group in the catalog.
    pub group_index: usize,
    /// Position of the story in its group.
    pub story_index: usize,
}

/// Emitted when a group runs out of stories in one direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryReached {
    /// The group whose boundary was reached.
    pub group_index: usize,
}

/// Event payload variants for a viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewerEventKind {
    /// A group was opened.
    GroupOpened(GroupOpened),
    /// The viewer was closed.
    ViewerClosed(ViewerClosed),
    /// A story started.
    StoryStarted(StoryStarted),
    /// A story completed.
    StoryCompleted(StoryCompleted),
    /// "Previous" was requested on a group's first story.
    NoPreviousStory(BoundaryReached),
    /// "Next" was requested, or fired, on a group's last story.
    NoNextStory(BoundaryReached),
    /// A carousel transition started.
    TransitionStarted,
    /// A carousel transition ended.
    TransitionEnded,
}

impl ViewerEventKind {
    /// Routing name of the event.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::GroupOpened(_) => "viewer.group_opened",
            Self::ViewerClosed(_) => "viewer.closed",
            Self::StoryStarted(_) => "viewer.story_started",
            Self::StoryCompleted(_) => "viewer.story_completed",
            Self::NoPreviousStory(_) => "viewer.no_previous_story",
            Self::NoNextStory(_) => "viewer.no_next_story",
            Self::TransitionStarted => "viewer.transition_started",
            Self::TransitionEnded => "viewer.transition_ended",
        }
    }
}

/// Domain event envelope for a viewer.
#[derive(Debug, Clone)]
pub struct ViewerEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: ViewerEventKind,
}

impl DomainEvent for ViewerEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(&self.kind).unwrap_or_default()
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
