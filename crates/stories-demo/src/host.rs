//! A media host with no real media behind it.
//!
//! Images report loaded as soon as they are mounted. Videos are a playhead
//! over a fixed-length clip that moves only while playing and only when the
//! runner calls [`SimulatedHost::advance`].

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use stories_core::media::{ImageSurface, MediaHost, MediaSignal, VideoSurface};
use tracing::debug;

/// Clip length given to every simulated video, in seconds.
pub const DEFAULT_VIDEO_SECONDS: f64 = 6.0;

#[derive(Debug)]
struct LoadedImage;

impl ImageSurface for LoadedImage {
    fn is_loaded(&self) -> bool {
        true
    }
}

#[derive(Debug)]
struct SimulatedVideo {
    src: String,
    duration: f64,
    playing: Cell<bool>,
    position: Cell<f64>,
}

impl VideoSurface for SimulatedVideo {
    fn play(&self) {
        self.playing.set(true);
        debug!(src = %self.src, "video play");
    }

    fn pause(&self) {
        self.playing.set(false);
        debug!(src = %self.src, "video pause");
    }

    fn rewind(&self) {
        self.position.set(0.0);
    }
}

/// Hands out simulated surfaces and moves their playheads.
#[derive(Debug)]
pub struct SimulatedHost {
    video_seconds: f64,
    videos: RefCell<Vec<Weak<SimulatedVideo>>>,
}

impl SimulatedHost {
    /// A host whose videos all last `video_seconds`.
    #[must_use]
    pub fn new(video_seconds: f64) -> Self {
        Self {
            video_seconds,
            videos: RefCell::new(Vec::new()),
        }
    }

    /// Moves every playing video forward by `elapsed_seconds` and returns a
    /// position update for each of them. Videos that were unmounted are
    /// forgotten.
    pub fn advance(&self, elapsed_seconds: f64) -> Vec<MediaSignal> {
        let mut videos = self.videos.borrow_mut();
        videos.retain(|video| video.strong_count() > 0);
        videos
            .iter()
            .filter_map(Weak::upgrade)
            .filter(|video| video.playing.get())
            .map(|video| {
                let position = (video.position.get() + elapsed_seconds).min(video.duration);
                video.position.set(position);
                MediaSignal::TimeUpdate {
                    current_time: position,
                    duration: Some(video.duration),
                }
            })
            .collect()
    }

    /// Number of videos currently playing.
    #[must_use]
    pub fn playing_videos(&self) -> usize {
        self.videos
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .filter(|video| video.playing.get())
            .count()
    }
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new(DEFAULT_VIDEO_SECONDS)
    }
}

impl MediaHost for SimulatedHost {
    fn image(&self, _src: &str) -> Rc<dyn ImageSurface> {
        Rc::new(LoadedImage)
    }

    fn video(&self, src: &str) -> Rc<dyn VideoSurface> {
        let video = Rc::new(SimulatedVideo {
            src: src.to_owned(),
            duration: self.video_seconds,
            playing: Cell::new(false),
            position: Cell::new(0.0),
        });
        self.videos.borrow_mut().push(Rc::downgrade(&video));
        video
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time_of(signal: &MediaSignal) -> f64 {
        match signal {
            MediaSignal::TimeUpdate { current_time, .. } => *current_time,
            other => panic!("expected TimeUpdate, got {other:?}"),
        }
    }

    #[test]
    fn test_only_playing_videos_advance() {
        // Arrange
        let host = SimulatedHost::new(4.0);
        let playing = host.video("a.mp4");
        let _idle = host.video("b.mp4");
        playing.play();

        // Act
        let signals = host.advance(1.5);

        // Assert
        assert_eq!(signals.len(), 1);
        assert!((time_of(&signals[0]) - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_playhead_stops_at_clip_end_and_rewinds() {
        // Arrange
        let host = SimulatedHost::new(2.0);
        let video = host.video("a.mp4");
        video.play();

        // Act
        host.advance(5.0);
        video.rewind();
        let after_rewind = host.advance(0.5);

        // Assert
        assert!((time_of(&after_rewind[0]) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unmounted_videos_are_forgotten() {
        let host = SimulatedHost::default();
        let video = host.video("a.mp4");
        video.play();
        drop(video);
        assert!(host.advance(1.0).is_empty());
        assert_eq!(host.playing_videos(), 0);
    }

    #[test]
    fn test_images_are_loaded_on_mount() {
        let host = SimulatedHost::default();
        assert!(host.image("a.jpg").is_loaded());
    }
}
