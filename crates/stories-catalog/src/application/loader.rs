//! Catalog ingestion from YAML and JSON documents.
//!
//! The document is a list of groups:
//!
//! ```yaml
//! - id: "1"
//!   title: "Story group #1"
//!   src: story-1.jpg
//!   stories:
//!     - { id: "1", type: image, src: story-1.jpg }
//! ```

use serde::Deserialize;
use stories_core::error::DomainError;
use tracing::{debug, instrument};

use crate::domain::model::{Catalog, Story, StoryGroup};

const SAMPLE_CATALOG: &str = include_str!("../../data/sample.yaml");

#[derive(Debug, Deserialize)]
struct GroupDocument {
    id: String,
    title: String,
    src: String,
    stories: Vec<Story>,
}

fn build(documents: Vec<GroupDocument>) -> Result<Catalog, DomainError> {
    let groups = documents
        .into_iter()
        .map(|doc| StoryGroup::new(doc.id, doc.title, doc.src, doc.stories))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(groups = groups.len(), "catalog parsed");
    Catalog::new(groups)
}

/// Parses a catalog from a YAML document.
///
/// # Errors
///
/// Returns `DomainError::CatalogParse` if the document is malformed and
/// `DomainError::Validation` if a group breaks a structural rule.
#[instrument(skip(source), fields(bytes = source.len()))]
pub fn from_yaml_str(source: &str) -> Result<Catalog, DomainError> {
    let documents: Vec<GroupDocument> = serde_yaml::from_str(source)
        .map_err(|e| DomainError::CatalogParse(format!("invalid YAML catalog: {e}")))?;
    build(documents)
}

/// Parses a catalog from a JSON document.
///
/// # Errors
///
/// Returns `DomainError::CatalogParse` if the document is malformed and
/// `DomainError::Validation` if a group breaks a structural rule.
#[instrument(skip(source), fields(bytes = source.len()))]
pub fn from_json_str(source: &str) -> Result<Catalog, DomainError> {
    let documents: Vec<GroupDocument> = serde_json::from_str(source)
        .map_err(|e| DomainError::CatalogParse(format!("invalid JSON catalog: {e}")))?;
    build(documents)
}

/// The built-in five-group catalog used when no document is supplied.
///
/// # Errors
///
/// Only fails if the bundled document is broken.
pub fn sample() -> Result<Catalog, DomainError> {
    from_yaml_str(SAMPLE_CATALOG)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::MediaKind;

    #[test]
    fn test_from_yaml_str_builds_groups_in_order() {
        // Arrange
        let source = r#"
- id: a
  title: First
  src: a.jpg
  stories:
    - { id: "1", type: image, src: one.jpg }
    - { id: "2", type: video, src: two.mp4 }
- id: b
  title: Second
  src: b.jpg
  stories:
    - { id: "3", type: image, src: three.jpg }
"#;

        // Act
        let catalog = from_yaml_str(source).unwrap();

        // Assert
        assert_eq!(catalog.len(), 2);
        let first = catalog.group(0).unwrap();
        assert_eq!(first.title(), "First");
        assert_eq!(first.story(1).unwrap().kind(), MediaKind::Video);
        assert_eq!(catalog.group(1).unwrap().id(), "b");
    }

    #[test]
    fn test_from_json_str_accepts_original_shape() {
        let source = r#"[{"id":"1","title":"T","src":"c.jpg",
            "stories":[{"id":"1","type":"video","src":"v.mp4"}]}]"#;
        let catalog = from_json_str(source).unwrap();
        assert_eq!(catalog.group(0).unwrap().story(0).unwrap().src(), "v.mp4");
    }

    #[test]
    fn test_unknown_media_type_is_a_parse_error() {
        // Arrange
        let source = r#"[{"id":"1","title":"T","src":"c.jpg",
            "stories":[{"id":"1","type":"audio","src":"a.mp3"}]}]"#;

        // Act
        let result = from_json_str(source);

        // Assert
        match result {
            Err(DomainError::CatalogParse(message)) => assert!(message.contains("JSON")),
            other => panic!("expected CatalogParse, got {other:?}"),
        }
    }

    #[test]
    fn test_group_without_stories_fails_validation() {
        let source = "- { id: a, title: A, src: a.jpg, stories: [] }";
        assert!(matches!(
            from_yaml_str(source),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_document_fails_validation() {
        assert!(matches!(from_json_str("[]"), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_sample_catalog_mixes_media_kinds() {
        // Act
        let catalog = sample().unwrap();

        // Assert
        assert_eq!(catalog.len(), 5);
        let mixed = catalog.group(4).unwrap();
        let kinds: Vec<MediaKind> = mixed.stories().iter().map(Story::kind).collect();
        assert_eq!(
            kinds,
            vec![
                MediaKind::Video,
                MediaKind::Image,
                MediaKind::Video,
                MediaKind::Image,
                MediaKind::Video,
            ]
        );
    }
}
