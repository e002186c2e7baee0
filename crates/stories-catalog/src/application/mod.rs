//! Catalog ingestion.

pub mod loader;
