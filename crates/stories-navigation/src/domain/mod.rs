//! Navigation domain: state machines, signals and events.

pub mod events;
pub mod group_navigator;
pub(crate) mod mailbox;
pub mod story_player;
