//! The progress driver capability and its per-media-kind selection.

use std::fmt;
use std::rc::Rc;

use stories_catalog::domain::model::{MediaKind, Story};
use stories_core::media::{MediaHost, MediaSignal};
use stories_core::timer::EventLoop;

use crate::config::PlaybackConfig;
use crate::coordinator::{ActiveFlag, TransitionChannel};
use crate::image::ImageProgress;
use crate::progress::Progress;
use crate::video::VideoProgress;

/// Receives progress readings from a running driver.
pub type ProgressSink = Rc<dyn Fn(Progress)>;

/// Produces a `0..=100` progress stream for one mounted story.
///
/// While started, readings passed to the sink never decrease. After
/// [`cancel`](ProgressDriver::cancel) nothing more is delivered, apart from
/// the reset to zero an image driver reports as part of cancelling.
pub trait ProgressDriver {
    /// Media kind this driver was built for.
    fn kind(&self) -> MediaKind;

    /// Starts producing progress into `on_progress`. Starting a running
    /// driver does nothing.
    fn start(&mut self, on_progress: ProgressSink);

    /// Stops producing progress and releases every timer and subscription
    /// taken by [`start`](ProgressDriver::start). Idempotent.
    fn cancel(&mut self);

    /// Feeds a signal reported by the story's media surface.
    fn handle(&mut self, signal: MediaSignal);

    /// Whether the driver is started.
    fn is_running(&self) -> bool;

    /// Whether the media is stalled waiting for data.
    fn is_buffering(&self) -> bool {
        false
    }
}

/// Everything a driver needs from its surroundings.
#[derive(Clone)]
pub struct DriverContext {
    /// Timer queue for tick-driven drivers.
    pub event_loop: EventLoop,
    /// Transition channel of the owning viewer.
    pub transitions: TransitionChannel,
    /// Host that mounts media surfaces.
    pub host: Rc<dyn MediaHost>,
    /// Timing configuration.
    pub config: PlaybackConfig,
}

impl fmt::Debug for DriverContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverContext")
            .field("event_loop", &self.event_loop)
            .field("transitions", &self.transitions)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Mounts `story` on the host and returns the matching, not yet started,
/// driver. The media kind is read once here and never changes afterwards.
#[must_use]
pub fn mount(story: &Story, active: &ActiveFlag, ctx: &DriverContext) -> Box<dyn ProgressDriver> {
    match story.kind() {
        MediaKind::Image => Box::new(ImageProgress::mount(ctx.host.image(story.src()), ctx)),
        MediaKind::Video => Box::new(VideoProgress::mount(
            ctx.host.video(story.src()),
            active.clone(),
            ctx,
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use stories_core::clock::Clock;
    use stories_test_support::{ManualClock, RecordingMediaHost};

    use super::*;

    #[test]
    fn test_mount_selects_driver_by_media_kind() {
        // Arrange
        let clock: Rc<dyn Clock> = Rc::new(ManualClock::at_epoch());
        let host = Rc::new(RecordingMediaHost::new());
        let ctx = DriverContext {
            event_loop: EventLoop::new(clock),
            transitions: TransitionChannel::new(),
            host: host.clone(),
            config: PlaybackConfig::default(),
        };
        let active = ActiveFlag::new();

        // Act
        let image = mount(&Story::new("a", MediaKind::Image, "a.jpg"), &active, &ctx);
        let video = mount(&Story::new("b", MediaKind::Video, "b.mp4"), &active, &ctx);

        // Assert
        assert_eq!(image.kind(), MediaKind::Image);
        assert_eq!(video.kind(), MediaKind::Video);
        assert!(!image.is_running());
        assert!(!video.is_running());
        assert_eq!(host.image_mounts(), 1);
        assert_eq!(host.video_mounts(), 1);
    }
}
