//! Demo configuration, read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `STORIES_CATALOG` | built-in sample catalog |
//! | `STORIES_IMAGE_DURATION_MS` | 10000 |
//! | `STORIES_TICK_MS` | 300 |
//! | `STORIES_START_GROUP` | 0 |
//!
//! A catalog path ending in `.json` is parsed as JSON, anything else as YAML.

use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use stories_catalog::application::loader;
use stories_catalog::domain::model::Catalog;
use stories_playback::config::PlaybackConfig;
use tracing::info;

use crate::error::AppError;

/// Settings for one demo run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Catalog document to play; the bundled sample when `None`.
    pub catalog_path: Option<PathBuf>,
    /// Playback timing.
    pub playback: PlaybackConfig,
    /// Group opened at start.
    pub start_group: usize,
}

impl DemoConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable does not parse and
    /// `AppError::Domain` if the resulting timings are unusable.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`DemoConfig::from_env`].
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let catalog_path = lookup("STORIES_CATALOG").map(PathBuf::from);
        let image_ms = parse_or(lookup, "STORIES_IMAGE_DURATION_MS", 10_000_i64)?;
        let tick_ms = parse_or(lookup, "STORIES_TICK_MS", 300_i64)?;
        let start_group = parse_or(lookup, "STORIES_START_GROUP", 0_usize)?;

        let playback = PlaybackConfig::with_image_timing(
            TimeDelta::milliseconds(image_ms),
            TimeDelta::milliseconds(tick_ms),
        );
        playback.validate()?;

        Ok(Self {
            catalog_path,
            playback,
            start_group,
        })
    }

    /// Loads the configured catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the file cannot be read and
    /// `AppError::Domain` if it does not hold a valid catalog.
    pub async fn load_catalog(&self) -> Result<Catalog, AppError> {
        let Some(path) = &self.catalog_path else {
            info!("using built-in sample catalog");
            return Ok(loader::sample()?);
        };
        let source = tokio::fs::read_to_string(path).await?;
        info!(path = %path.display(), "catalog loaded");
        if is_json(path) {
            Ok(loader::from_json_str(&source)?)
        } else {
            Ok(loader::from_yaml_str(&source)?)
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} must be a number: {e}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use stories_core::error::DomainError;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        // Act
        let config = DemoConfig::from_lookup(&lookup(&[])).unwrap();

        // Assert
        assert_eq!(config.catalog_path, None);
        assert_eq!(config.playback, PlaybackConfig::default());
        assert_eq!(config.start_group, 0);
    }

    #[test]
    fn test_reads_timing_and_start_group() {
        // Arrange
        let vars = lookup(&[
            ("STORIES_IMAGE_DURATION_MS", "2000"),
            ("STORIES_TICK_MS", "100"),
            ("STORIES_START_GROUP", "3"),
            ("STORIES_CATALOG", "stories.json"),
        ]);

        // Act
        let config = DemoConfig::from_lookup(&vars).unwrap();

        // Assert
        assert_eq!(config.playback.image_duration, TimeDelta::milliseconds(2_000));
        assert_eq!(config.playback.tick_period, TimeDelta::milliseconds(100));
        assert_eq!(config.playback.advance_debounce, TimeDelta::milliseconds(100));
        assert_eq!(config.start_group, 3);
        assert_eq!(config.catalog_path, Some(PathBuf::from("stories.json")));
    }

    #[test]
    fn test_non_numeric_value_is_config_error() {
        let result = DemoConfig::from_lookup(&lookup(&[("STORIES_TICK_MS", "fast")]));
        match result {
            Err(AppError::Config(message)) => assert!(message.contains("STORIES_TICK_MS")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_tick_is_rejected_by_validation() {
        let result = DemoConfig::from_lookup(&lookup(&[("STORIES_TICK_MS", "0")]));
        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::Configuration(_)))
        ));
    }

    #[tokio::test]
    async fn test_load_catalog_falls_back_to_sample() {
        let config = DemoConfig::from_lookup(&lookup(&[])).unwrap();
        let catalog = config.load_catalog().await.unwrap();
        assert_eq!(catalog.len(), 5);
    }

    #[tokio::test]
    async fn test_load_catalog_reports_missing_file() {
        let config =
            DemoConfig::from_lookup(&lookup(&[("STORIES_CATALOG", "/nonexistent/stories.yaml")]))
                .unwrap();
        assert!(matches!(config.load_catalog().await, Err(AppError::Io(_))));
    }

    #[test]
    fn test_json_detection_is_case_insensitive() {
        assert!(is_json(Path::new("a/B.JSON")));
        assert!(!is_json(Path::new("a/b.yaml")));
    }
}
