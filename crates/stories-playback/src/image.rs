//! Timer-driven progress for image stories.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use chrono::TimeDelta;
use stories_catalog::domain::model::MediaKind;
use stories_core::channel::Subscription;
use stories_core::media::{ImageSurface, MediaSignal};
use stories_core::timer::{EventLoop, TimerHandle};
use tracing::{debug, trace};

use crate::coordinator::{TransitionChannel, TransitionEvent};
use crate::driver::{DriverContext, ProgressDriver, ProgressSink};
use crate::progress::Progress;

struct ImageRun {
    sink: ProgressSink,
    ticker: Option<TimerHandle>,
    _transitions: Subscription,
}

/// Advances a fixed step per tick until the image has been shown for the
/// configured duration.
///
/// Ticking waits for the image to load. A transition pause skips ticks but
/// keeps the timer, so progress resumes exactly where it stopped.
pub struct ImageProgress {
    surface: Rc<dyn ImageSurface>,
    event_loop: EventLoop,
    transitions: TransitionChannel,
    tick_period: TimeDelta,
    step: f64,
    progress: Rc<Cell<Progress>>,
    paused: Rc<Cell<bool>>,
    run: Option<ImageRun>,
}

impl ImageProgress {
    /// Creates a stopped driver for `surface`.
    #[must_use]
    pub fn mount(surface: Rc<dyn ImageSurface>, ctx: &DriverContext) -> Self {
        Self {
            surface,
            event_loop: ctx.event_loop.clone(),
            transitions: ctx.transitions.clone(),
            tick_period: ctx.config.tick_period,
            step: ctx.config.image_step(),
            progress: Rc::new(Cell::new(Progress::ZERO)),
            paused: Rc::new(Cell::new(false)),
            run: None,
        }
    }

    /// Progress accumulated by the current run.
    #[must_use]
    pub fn progress(&self) -> Progress {
        self.progress.get()
    }

    /// Whether ticks are being skipped for a transition.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused.get()
    }

    fn start_ticker(&mut self) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        if run.ticker.is_some() {
            return;
        }

        let progress = Rc::clone(&self.progress);
        let paused = Rc::clone(&self.paused);
        let sink = Rc::clone(&run.sink);
        let step = self.step;
        run.ticker = Some(self.event_loop.schedule_interval(self.tick_period, move || {
            if paused.get() {
                return;
            }
            let current = progress.get();
            if current.is_complete() {
                return;
            }
            let next = current.advanced_by(step);
            progress.set(next);
            trace!(progress = next.percent(), "image tick");
            sink(next);
        }));
        debug!("image progress ticking");
    }
}

impl ProgressDriver for ImageProgress {
    fn kind(&self) -> MediaKind {
        MediaKind::Image
    }

    fn start(&mut self, on_progress: ProgressSink) {
        if self.run.is_some() {
            return;
        }
        self.progress.set(Progress::ZERO);
        self.paused.set(false);

        let paused = Rc::clone(&self.paused);
        let subscription = self.transitions.subscribe(move |event| match event {
            TransitionEvent::Started => paused.set(true),
            TransitionEvent::Ended => paused.set(false),
        });
        self.run = Some(ImageRun {
            sink: on_progress,
            ticker: None,
            _transitions: subscription,
        });

        if self.surface.is_loaded() {
            self.start_ticker();
        } else {
            debug!("image not loaded yet, deferring progress");
        }
    }

    fn cancel(&mut self) {
        let Some(run) = self.run.take() else {
            return;
        };
        let ImageRun {
            sink,
            ticker,
            _transitions: subscription,
        } = run;
        drop(ticker);
        drop(subscription);

        self.progress.set(Progress::ZERO);
        self.paused.set(false);
        sink(Progress::ZERO);
        debug!("image progress cancelled");
    }

    fn handle(&mut self, signal: MediaSignal) {
        if signal == MediaSignal::ImageLoaded && self.run.is_some() {
            self.start_ticker();
        }
    }

    fn is_running(&self) -> bool {
        self.run.is_some()
    }
}

impl Drop for ImageProgress {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for ImageProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageProgress")
            .field("progress", &self.progress.get())
            .field("paused", &self.paused.get())
            .field("running", &self.run.is_some())
            .finish_non_exhaustive()
    }
}
