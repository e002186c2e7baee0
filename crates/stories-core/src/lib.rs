//! Stories Core: shared abstractions for the playback engine.
//!
//! This crate defines the building blocks every other crate leans on: the
//! clock, the single-threaded timer queue, the broadcast channel, the media
//! surface contracts a host implements, and the event metadata envelope. It
//! contains no playback policy.

pub mod channel;
pub mod clock;
pub mod error;
pub mod event;
pub mod media;
pub mod timer;
