//! Media surface contracts implemented by the host.
//!
//! The engine never decodes or renders media. It asks the host for a surface
//! per mounted story and receives [`MediaSignal`]s back for everything the
//! surface reports (load completion, playback position, buffering).

use std::rc::Rc;

/// An image element as seen by the engine.
pub trait ImageSurface {
    /// Whether the underlying resource has finished loading.
    fn is_loaded(&self) -> bool;
}

/// A video element as seen by the engine.
pub trait VideoSurface {
    /// Starts or resumes playback.
    fn play(&self);

    /// Pauses playback, keeping the current position.
    fn pause(&self);

    /// Seeks back to the first frame.
    fn rewind(&self);
}

/// Factory for media surfaces, one per mounted story.
pub trait MediaHost {
    /// Mounts an image surface for `src`.
    fn image(&self, src: &str) -> Rc<dyn ImageSurface>;

    /// Mounts a video surface for `src`.
    fn video(&self, src: &str) -> Rc<dyn VideoSurface>;
}

/// Events a host forwards from a mounted surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaSignal {
    /// The image resource finished loading.
    ImageLoaded,
    /// The video playback position changed.
    TimeUpdate {
        /// Current playback position in seconds.
        current_time: f64,
        /// Total duration in seconds, `None` while unknown.
        duration: Option<f64>,
    },
    /// Playback stalled waiting for data.
    Waiting,
    /// Enough data is buffered to continue playing.
    CanPlay,
}
