//! Playback timing configuration.

use chrono::TimeDelta;
use stories_core::error::DomainError;

/// How long image stories last, how often progress ticks, and the timing
/// fudge factors applied to video and to the completion advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackConfig {
    /// Total time an image story stays on screen.
    pub image_duration: TimeDelta,
    /// Period of the image progress tick.
    pub tick_period: TimeDelta,
    /// Trimmed off a video's duration because the final position update
    /// arrives slightly before playback really ends.
    pub video_tail_cutoff: TimeDelta,
    /// Delay between reaching 100% and advancing, letting the progress bar
    /// finish animating.
    pub advance_debounce: TimeDelta,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            image_duration: TimeDelta::milliseconds(10_000),
            tick_period: TimeDelta::milliseconds(300),
            video_tail_cutoff: TimeDelta::seconds(1),
            advance_debounce: TimeDelta::milliseconds(300),
        }
    }
}

impl PlaybackConfig {
    /// Default timings with a different image duration and tick; the
    /// completion debounce follows the tick.
    #[must_use]
    pub fn with_image_timing(image_duration: TimeDelta, tick_period: TimeDelta) -> Self {
        Self {
            image_duration,
            tick_period,
            advance_debounce: tick_period,
            ..Self::default()
        }
    }

    /// Checks that every period is usable.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` if the image duration or tick is
    /// not positive, the tick exceeds the image duration, or an offset is
    /// negative.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.image_duration <= TimeDelta::zero() {
            return Err(DomainError::Configuration(
                "image duration must be positive".to_owned(),
            ));
        }
        if self.tick_period <= TimeDelta::zero() {
            return Err(DomainError::Configuration(
                "tick period must be positive".to_owned(),
            ));
        }
        if self.tick_period > self.image_duration {
            return Err(DomainError::Configuration(format!(
                "tick period {}ms exceeds image duration {}ms",
                self.tick_period.num_milliseconds(),
                self.image_duration.num_milliseconds()
            )));
        }
        if self.video_tail_cutoff < TimeDelta::zero() || self.advance_debounce < TimeDelta::zero()
        {
            return Err(DomainError::Configuration(
                "video cut-off and advance debounce must not be negative".to_owned(),
            ));
        }
        Ok(())
    }

    /// Percentage points added per image tick: `100 / (duration / tick)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn image_step(&self) -> f64 {
        let ticks = self.image_duration.num_milliseconds() as f64
            / self.tick_period.num_milliseconds() as f64;
        100.0 / ticks
    }

    /// The video tail cut-off in seconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn tail_cutoff_seconds(&self) -> f64 {
        self.video_tail_cutoff.num_milliseconds() as f64 / 1_000.0
    }
}
