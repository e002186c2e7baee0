//! Stories engine: story group catalog.
//!
//! Owns the immutable data model (stories, story groups, the catalog handed
//! to a viewer at mount) and its ingestion from YAML or JSON documents.

pub mod application;
pub mod domain;
