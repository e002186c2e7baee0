//! Stories engine: navigation.
//!
//! Responsible for which story of which group is on screen: the per-group
//! story state machine, the group controller that turns "ran off the end"
//! into cross-group moves or closing, and the [`Viewer`] facade a host and
//! its carousel talk to.
//!
//! [`Viewer`]: application::viewer::Viewer

pub mod application;
pub mod domain;
