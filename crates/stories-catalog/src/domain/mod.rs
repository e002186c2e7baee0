//! Catalog domain model.

pub mod model;
