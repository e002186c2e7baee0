//! Test media host: records every surface it mounts and every call made on it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use stories_core::media::{ImageSurface, MediaHost, VideoSurface};

/// An image surface whose load state is set by the test.
#[derive(Debug)]
pub struct RecordingImage {
    src: String,
    loaded: Cell<bool>,
}

impl RecordingImage {
    /// Source this surface was mounted for.
    #[must_use]
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Marks the image as loaded or not.
    pub fn set_loaded(&self, loaded: bool) {
        self.loaded.set(loaded);
    }
}

impl ImageSurface for RecordingImage {
    fn is_loaded(&self) -> bool {
        self.loaded.get()
    }
}

/// A call made on a [`RecordingVideo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoCall {
    /// `play()`
    Play,
    /// `pause()`
    Pause,
    /// `rewind()`
    Rewind,
}

/// A video surface that records calls and tracks a playing flag.
#[derive(Debug)]
pub struct RecordingVideo {
    src: String,
    playing: Cell<bool>,
    calls: RefCell<Vec<VideoCall>>,
}

impl RecordingVideo {
    /// Source this surface was mounted for.
    #[must_use]
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Whether the last play/pause call left the video playing.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing.get()
    }

    /// Every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<VideoCall> {
        self.calls.borrow().clone()
    }

    /// Forgets recorded calls, keeping the playing flag.
    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl VideoSurface for RecordingVideo {
    fn play(&self) {
        self.playing.set(true);
        self.calls.borrow_mut().push(VideoCall::Play);
    }

    fn pause(&self) {
        self.playing.set(false);
        self.calls.borrow_mut().push(VideoCall::Pause);
    }

    fn rewind(&self) {
        self.calls.borrow_mut().push(VideoCall::Rewind);
    }
}

/// A media host that hands out recording surfaces and remembers them.
#[derive(Debug)]
pub struct RecordingMediaHost {
    images_start_loaded: bool,
    images: RefCell<Vec<Rc<RecordingImage>>>,
    videos: RefCell<Vec<Rc<RecordingVideo>>>,
}

impl RecordingMediaHost {
    /// A host whose images are already loaded when mounted.
    #[must_use]
    pub fn new() -> Self {
        Self {
            images_start_loaded: true,
            images: RefCell::new(Vec::new()),
            videos: RefCell::new(Vec::new()),
        }
    }

    /// A host whose images start unloaded; tests call
    /// [`RecordingImage::set_loaded`] and forward the load signal themselves.
    #[must_use]
    pub fn with_unloaded_images() -> Self {
        Self {
            images_start_loaded: false,
            ..Self::new()
        }
    }

    /// Number of image surfaces mounted so far.
    #[must_use]
    pub fn image_mounts(&self) -> usize {
        self.images.borrow().len()
    }

    /// Number of video surfaces mounted so far.
    #[must_use]
    pub fn video_mounts(&self) -> usize {
        self.videos.borrow().len()
    }

    /// Most recently mounted image surface for `src`.
    #[must_use]
    pub fn last_image(&self, src: &str) -> Option<Rc<RecordingImage>> {
        self.images
            .borrow()
            .iter()
            .rev()
            .find(|image| image.src == src)
            .cloned()
    }

    /// Most recently mounted video surface for `src`.
    #[must_use]
    pub fn last_video(&self, src: &str) -> Option<Rc<RecordingVideo>> {
        self.videos
            .borrow()
            .iter()
            .rev()
            .find(|video| video.src == src)
            .cloned()
    }
}

impl Default for RecordingMediaHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaHost for RecordingMediaHost {
    fn image(&self, src: &str) -> Rc<dyn ImageSurface> {
        let image = Rc::new(RecordingImage {
            src: src.to_owned(),
            loaded: Cell::new(self.images_start_loaded),
        });
        self.images.borrow_mut().push(Rc::clone(&image));
        image
    }

    fn video(&self, src: &str) -> Rc<dyn VideoSurface> {
        let video = Rc::new(RecordingVideo {
            src: src.to_owned(),
            playing: Cell::new(false),
            calls: RefCell::new(Vec::new()),
        });
        self.videos.borrow_mut().push(Rc::clone(&video));
        video
    }
}
