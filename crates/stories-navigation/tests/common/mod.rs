//! Shared helpers for viewer integration tests.
#![allow(dead_code)]

use std::rc::Rc;

use stories_catalog::domain::model::{Catalog, StoryGroup};
use stories_core::clock::Clock;
use stories_core::timer::EventLoop;
use stories_navigation::application::viewer::Viewer;
use stories_navigation::domain::events::ViewerEventKind;
use stories_navigation::domain::story_player::PlaybackState;
use stories_playback::config::PlaybackConfig;
use stories_playback::progress::Progress;
use stories_test_support::{ManualClock, RecordingMediaHost};

/// A viewer over a manual clock and a recording media host.
pub struct TestViewer {
    pub clock: Rc<ManualClock>,
    pub host: Rc<RecordingMediaHost>,
    pub viewer: Viewer,
}

impl TestViewer {
    /// Viewer with default timing whose images load instantly.
    pub fn new(groups: Vec<StoryGroup>) -> Self {
        Self::with_host(groups, RecordingMediaHost::new())
    }

    pub fn with_host(groups: Vec<StoryGroup>, host: RecordingMediaHost) -> Self {
        let clock = Rc::new(ManualClock::at_epoch());
        let host = Rc::new(host);
        let shared_clock: Rc<dyn Clock> = clock.clone();
        let viewer = Viewer::new(
            Catalog::new(groups).unwrap(),
            EventLoop::new(shared_clock),
            host.clone(),
            PlaybackConfig::default(),
        )
        .unwrap();
        Self {
            clock,
            host,
            viewer,
        }
    }

    /// Moves the clock forward and lets the viewer catch up.
    pub fn advance_ms(&mut self, ms: i64) {
        self.clock.advance_ms(ms);
        self.viewer.run_due();
    }

    pub fn state(&self, group: usize) -> PlaybackState {
        self.viewer.playback_state(group).unwrap()
    }

    /// Event kinds recorded since the last call.
    pub fn drain_kinds(&mut self) -> Vec<ViewerEventKind> {
        self.viewer
            .take_events()
            .into_iter()
            .map(|event| event.kind)
            .collect()
    }
}

pub fn percent(value: f64) -> Progress {
    Progress::from_percent(value).unwrap()
}

pub fn state(story_index: usize, progress: Progress, active: bool) -> PlaybackState {
    PlaybackState {
        story_index,
        progress,
        active,
    }
}
