//! Stories engine: playback.
//!
//! Responsible for turning time into story progress: the [`Progress`] value,
//! the per-media-kind progress drivers, and the coordinator that pauses and
//! resumes live drivers while the carousel is mid-transition.
//!
//! [`Progress`]: progress::Progress

pub mod config;
pub mod coordinator;
pub mod driver;
pub mod image;
pub mod progress;
pub mod video;
