//! Stories engine: headless demo.
//!
//! Plays a catalog end to end against a simulated media host, logging every
//! viewer event as JSON. Timers are driven from the tokio clock so the same
//! loop runs in real time from `main` and in paused time under test.

pub mod clock;
pub mod config;
pub mod error;
pub mod host;
pub mod runner;
