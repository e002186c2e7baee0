//! Host-facing viewer and carousel contract.

pub mod carousel;
pub mod viewer;
