//! Contract between a viewer and the carousel that lays groups out
//! side by side.
//!
//! The carousel owns gestures and animation only. It asks the viewer which
//! group is current, reports index changes and drag lifecycle, and renders
//! each group from the [`GroupView`] the viewer hands back.

use serde::Serialize;
use stories_catalog::domain::model::Story;
use stories_playback::progress::Progress;
use tracing::warn;

use super::viewer::Viewer;

/// Everything needed to draw one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupView {
    /// Position of the group in the catalog.
    pub group_index: usize,
    /// The group identifier.
    pub group_id: String,
    /// Display title.
    pub title: String,
    /// Cover image.
    pub cover_src: String,
    /// Index of the story on screen.
    pub story_index: usize,
    /// The story on screen.
    pub story: Story,
    /// One progress value per story for the segmented bar.
    pub segments: Vec<Progress>,
    /// Whether the current segment should animate its fill.
    pub animate: bool,
    /// Whether this is the open group.
    pub active: bool,
    /// Whether the current media is stalled.
    pub buffering: bool,
}

/// What a carousel needs from its owner.
pub trait CarouselDelegate {
    /// Index of the group the carousel should show, if any.
    fn current_index(&self) -> Option<usize>;

    /// The user settled on another group.
    fn on_index_change(&mut self, index: usize);

    /// Whether a group follows `index`.
    fn has_next(&self, index: usize) -> bool;

    /// Content for the group at `index`; `None` when out of range or closed.
    fn render_item(&self, index: usize) -> Option<GroupView>;

    /// A drag between groups began.
    fn on_transition_start(&mut self);

    /// The drag settled.
    fn on_transition_end(&mut self);
}

impl CarouselDelegate for Viewer {
    fn current_index(&self) -> Option<usize> {
        self.current_group()
    }

    fn on_index_change(&mut self, index: usize) {
        if let Err(error) = self.open(index) {
            warn!(%error, "carousel index change ignored");
        }
    }

    fn has_next(&self, index: usize) -> bool {
        self.navigator().has_next(index)
    }

    fn render_item(&self, index: usize) -> Option<GroupView> {
        let player = self.player(index)?;
        let group = player.group();
        let progress = player.progress();
        Some(GroupView {
            group_index: index,
            group_id: group.id().to_owned(),
            title: group.title().to_owned(),
            cover_src: group.cover_src().to_owned(),
            story_index: player.story_index(),
            story: player.story().clone(),
            segments: player.segments(),
            animate: progress != Progress::ZERO,
            active: player.is_active(),
            buffering: player.is_buffering(),
        })
    }

    fn on_transition_start(&mut self) {
        self.transition_started();
    }

    fn on_transition_end(&mut self) {
        self.transition_ended();
    }
}
