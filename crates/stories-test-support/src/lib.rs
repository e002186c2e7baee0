//! Shared test doubles and fixtures for the stories engine.

mod clock;
mod fixtures;
mod media;

pub use clock::ManualClock;
pub use fixtures::{image_group, mixed_group, video_group};
pub use media::{RecordingImage, RecordingMediaHost, RecordingVideo, VideoCall};
