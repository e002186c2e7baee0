//! Position-driven progress for video stories.

use std::fmt;
use std::rc::Rc;

use stories_catalog::domain::model::MediaKind;
use stories_core::channel::Subscription;
use stories_core::media::{MediaSignal, VideoSurface};
use tracing::debug;

use crate::coordinator::{ActiveFlag, TransitionEvent};
use crate::driver::{DriverContext, ProgressDriver, ProgressSink};
use crate::progress::Progress;

/// Converts a playback position into progress.
///
/// The tail cut-off is taken off the duration so the last position update,
/// which arrives slightly before the real end, still reads 100. Unknown or
/// non-finite durations, and durations no longer than the cut-off, give
/// `None`; a non-finite position counts as 0.
#[must_use]
pub fn video_progress(
    current_time: f64,
    duration: Option<f64>,
    tail_cutoff: f64,
) -> Option<Progress> {
    let effective = duration
        .filter(|d| d.is_finite())
        .map(|d| d - tail_cutoff)
        .filter(|d| *d > 0.0)?;
    let current = if current_time.is_finite() {
        current_time
    } else {
        0.0
    };
    Progress::from_percent(current / effective * 100.0)
}

/// Follows the video's own playback position.
///
/// The surface subscribes to transitions as soon as it is mounted and stays
/// subscribed until the driver is dropped: a transition start always pauses,
/// a transition end resumes only while the story's [`ActiveFlag`] is set.
pub struct VideoProgress {
    surface: Rc<dyn VideoSurface>,
    tail_cutoff: f64,
    sink: Option<ProgressSink>,
    last: Option<Progress>,
    buffering: bool,
    _transitions: Subscription,
}

impl VideoProgress {
    /// Creates a stopped driver for `surface` and subscribes it to
    /// transitions.
    #[must_use]
    pub fn mount(surface: Rc<dyn VideoSurface>, active: ActiveFlag, ctx: &DriverContext) -> Self {
        let transitions = {
            let surface = Rc::clone(&surface);
            ctx.transitions.subscribe(move |event| match event {
                TransitionEvent::Started => surface.pause(),
                TransitionEvent::Ended => {
                    if active.get() {
                        surface.play();
                    }
                }
            })
        };

        Self {
            surface,
            tail_cutoff: ctx.config.tail_cutoff_seconds(),
            sink: None,
            last: None,
            buffering: false,
            _transitions: transitions,
        }
    }
}

impl ProgressDriver for VideoProgress {
    fn kind(&self) -> MediaKind {
        MediaKind::Video
    }

    fn start(&mut self, on_progress: ProgressSink) {
        if self.sink.is_some() {
            return;
        }
        self.sink = Some(on_progress);
        self.last = None;
        self.surface.play();
        debug!("video playback started");
    }

    fn cancel(&mut self) {
        if self.sink.take().is_none() {
            return;
        }
        self.surface.pause();
        self.surface.rewind();
        self.last = None;
        debug!("video playback cancelled");
    }

    fn handle(&mut self, signal: MediaSignal) {
        match signal {
            MediaSignal::TimeUpdate {
                current_time,
                duration,
            } => {
                let Some(sink) = self.sink.as_ref() else {
                    return;
                };
                let Some(progress) = video_progress(current_time, duration, self.tail_cutoff)
                else {
                    debug!(current_time, ?duration, "indeterminate video progress ignored");
                    return;
                };
                if self.last.is_some_and(|last| progress < last) {
                    return;
                }
                self.last = Some(progress);
                sink(progress);
            }
            MediaSignal::Waiting => {
                self.buffering = true;
                debug!("video buffering");
            }
            MediaSignal::CanPlay => {
                self.buffering = false;
                debug!("video can play");
            }
            MediaSignal::ImageLoaded => {}
        }
    }

    fn is_running(&self) -> bool {
        self.sink.is_some()
    }

    fn is_buffering(&self) -> bool {
        self.buffering
    }
}

impl Drop for VideoProgress {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for VideoProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoProgress")
            .field("running", &self.sink.is_some())
            .field("last", &self.last)
            .field("buffering", &self.buffering)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use stories_core::clock::Clock;
    use stories_core::media::MediaHost;
    use stories_core::timer::EventLoop;
    use stories_test_support::{ManualClock, RecordingMediaHost, RecordingVideo, VideoCall};

    use super::*;
    use crate::config::PlaybackConfig;
    use crate::coordinator::PauseCoordinator;

    fn update(current_time: f64, duration: f64) -> MediaSignal {
        MediaSignal::TimeUpdate {
            current_time,
            duration: Some(duration),
        }
    }

    struct Harness {
        host: Rc<RecordingMediaHost>,
        coordinator: PauseCoordinator,
        ctx: DriverContext,
        seen: Rc<RefCell<Vec<Progress>>>,
    }

    impl Harness {
        fn new() -> Self {
            let clock: Rc<dyn Clock> = Rc::new(ManualClock::at_epoch());
            let host = Rc::new(RecordingMediaHost::new());
            let coordinator = PauseCoordinator::new();
            let ctx = DriverContext {
                event_loop: EventLoop::new(clock),
                transitions: coordinator.channel().clone(),
                host: host.clone(),
                config: PlaybackConfig::default(),
            };
            Self {
                host,
                coordinator,
                ctx,
                seen: Rc::new(RefCell::new(Vec::new())),
            }
        }

        fn mount(&self, src: &str, active: &ActiveFlag) -> (VideoProgress, Rc<RecordingVideo>) {
            let driver = VideoProgress::mount(self.host.video(src), active.clone(), &self.ctx);
            let surface = self.host.last_video(src).unwrap();
            (driver, surface)
        }

        fn sink(&self) -> ProgressSink {
            let seen = Rc::clone(&self.seen);
            Rc::new(move |p| seen.borrow_mut().push(p))
        }
    }

    #[test]
    fn test_video_progress_trims_one_second_tail() {
        assert_eq!(video_progress(4.5, Some(10.0), 1.0), Progress::from_percent(50.0));
        assert_eq!(video_progress(9.0, Some(10.0), 1.0), Some(Progress::COMPLETE));
        assert_eq!(video_progress(9.8, Some(10.0), 1.0), Some(Progress::COMPLETE));
    }

    #[test]
    fn test_video_progress_suppresses_unknown_duration() {
        assert_eq!(video_progress(1.0, None, 1.0), None);
        assert_eq!(video_progress(1.0, Some(0.0), 1.0), None);
        assert_eq!(video_progress(1.0, Some(f64::NAN), 1.0), None);
        assert_eq!(video_progress(1.0, Some(f64::INFINITY), 1.0), None);
    }

    #[test]
    fn test_video_progress_suppresses_clip_within_tail_cutoff() {
        assert_eq!(video_progress(0.25, Some(0.5), 1.0), None);
        assert_eq!(video_progress(0.5, Some(1.0), 1.0), None);
        assert_eq!(video_progress(0.5, Some(1.5), 1.0), Some(Progress::COMPLETE));
    }

    #[test]
    fn test_short_clip_reports_nothing_while_running() {
        // Arrange
        let harness = Harness::new();
        let (mut driver, _surface) = harness.mount("short.mp4", &ActiveFlag::new());
        driver.start(harness.sink());

        // Act
        driver.handle(update(0.4, 0.8));
        driver.handle(update(0.8, 0.8));

        // Assert
        assert!(harness.seen.borrow().is_empty());
    }

    #[test]
    fn test_video_progress_treats_nan_position_as_start() {
        assert_eq!(video_progress(f64::NAN, Some(5.0), 1.0), Some(Progress::ZERO));
    }

    #[test]
    fn test_start_plays_and_reports_position() {
        // Arrange
        let harness = Harness::new();
        let active = ActiveFlag::new();
        active.set(true);
        let (mut driver, surface) = harness.mount("a.mp4", &active);

        // Act
        driver.start(harness.sink());
        driver.handle(update(2.25, 10.0));
        driver.handle(MediaSignal::TimeUpdate {
            current_time: 3.0,
            duration: None,
        });

        // Assert
        assert!(surface.is_playing());
        assert_eq!(*harness.seen.borrow(), vec![Progress::from_percent(25.0).unwrap()]);
    }

    #[test]
    fn test_position_ignored_until_started() {
        let harness = Harness::new();
        let (mut driver, surface) = harness.mount("a.mp4", &ActiveFlag::new());
        driver.handle(update(5.0, 10.0));
        assert!(harness.seen.borrow().is_empty());
        assert!(!surface.is_playing());
    }

    #[test]
    fn test_backwards_position_is_not_reported() {
        let harness = Harness::new();
        let (mut driver, _surface) = harness.mount("a.mp4", &ActiveFlag::new());
        driver.start(harness.sink());
        driver.handle(update(4.5, 10.0));
        driver.handle(update(1.0, 10.0));
        assert_eq!(harness.seen.borrow().len(), 1);
    }

    #[test]
    fn test_transition_end_resumes_only_active_story() {
        // Arrange
        let harness = Harness::new();
        let foreground = ActiveFlag::new();
        foreground.set(true);
        let background = ActiveFlag::new();
        let (mut front, front_surface) = harness.mount("front.mp4", &foreground);
        let (_back, back_surface) = harness.mount("back.mp4", &background);
        front.start(harness.sink());

        // Act
        harness.coordinator.transition_started();
        let paused_mid_drag = !front_surface.is_playing();
        harness.coordinator.transition_ended();

        // Assert
        assert!(paused_mid_drag);
        assert!(front_surface.is_playing());
        assert!(!back_surface.is_playing());
        assert_eq!(back_surface.calls(), vec![VideoCall::Pause]);
    }

    #[test]
    fn test_transition_end_reads_flag_at_delivery_time() {
        // Arrange
        let harness = Harness::new();
        let active = ActiveFlag::new();
        active.set(true);
        let (mut driver, surface) = harness.mount("a.mp4", &active);
        driver.start(harness.sink());
        harness.coordinator.transition_started();

        // Act
        active.set(false);
        harness.coordinator.transition_ended();

        // Assert
        assert!(!surface.is_playing());
    }

    #[test]
    fn test_cancel_pauses_and_rewinds() {
        // Arrange
        let harness = Harness::new();
        let (mut driver, surface) = harness.mount("a.mp4", &ActiveFlag::new());
        driver.start(harness.sink());
        surface.clear_calls();

        // Act
        driver.cancel();
        driver.cancel();
        driver.handle(update(5.0, 10.0));

        // Assert
        assert_eq!(surface.calls(), vec![VideoCall::Pause, VideoCall::Rewind]);
        assert!(harness.seen.borrow().is_empty());
    }

    #[test]
    fn test_drop_releases_transition_subscription() {
        let harness = Harness::new();
        let (driver, _surface) = harness.mount("a.mp4", &ActiveFlag::new());
        assert_eq!(harness.coordinator.channel().subscriber_count(), 1);
        drop(driver);
        assert_eq!(harness.coordinator.channel().subscriber_count(), 0);
    }

    #[test]
    fn test_buffering_follows_waiting_and_can_play() {
        let harness = Harness::new();
        let (mut driver, _surface) = harness.mount("a.mp4", &ActiveFlag::new());
        driver.handle(MediaSignal::Waiting);
        assert!(driver.is_buffering());
        driver.handle(MediaSignal::CanPlay);
        assert!(!driver.is_buffering());
    }
}
