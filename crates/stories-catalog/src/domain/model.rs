//! Stories, story groups and the catalog.
//!
//! Everything here is immutable once constructed. A viewer only ever changes
//! which group and which story is current, never the sequences themselves.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stories_core::error::DomainError;

/// The kind of media a story displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// A still image shown for a fixed duration.
    Image,
    /// A video whose own playback position drives progress.
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => f.write_str("image"),
            Self::Video => f.write_str("video"),
        }
    }
}

/// A single story: one image or one video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    id: String,
    #[serde(rename = "type")]
    kind: MediaKind,
    src: String,
}

impl Story {
    /// Creates a story.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: MediaKind, src: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            src: src.into(),
        }
    }

    /// Opaque story identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Media kind, fixed for the story's lifetime.
    #[must_use]
    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Source locator handed to the media host.
    #[must_use]
    pub fn src(&self) -> &str {
        &self.src
    }
}

/// An ordered, non-empty sequence of stories shown as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryGroup {
    id: String,
    title: String,
    cover_src: String,
    stories: Vec<Story>,
}

impl StoryGroup {
    /// Creates a story group.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `stories` is empty or two stories
    /// share an id.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        cover_src: impl Into<String>,
        stories: Vec<Story>,
    ) -> Result<Self, DomainError> {
        let id = id.into();
        if stories.is_empty() {
            return Err(DomainError::Validation(format!(
                "story group {id} has no stories"
            )));
        }

        let mut seen = HashSet::new();
        for story in &stories {
            if !seen.insert(story.id()) {
                return Err(DomainError::Validation(format!(
                    "story group {id} repeats story id {}",
                    story.id()
                )));
            }
        }

        Ok(Self {
            id,
            title: title.into(),
            cover_src: cover_src.into(),
            stories,
        })
    }

    /// Opaque group identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Cover image shown in the group strip.
    #[must_use]
    pub fn cover_src(&self) -> &str {
        &self.cover_src
    }

    /// Stories in playback order.
    #[must_use]
    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    /// Story at `index`, if in range.
    #[must_use]
    pub fn story(&self, index: usize) -> Option<&Story> {
        self.stories.get(index)
    }

    /// Number of stories; never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stories.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }
}

/// The ordered set of story groups a viewer is mounted with.
#[derive(Debug, Clone)]
pub struct Catalog {
    groups: Vec<Arc<StoryGroup>>,
}

impl Catalog {
    /// Creates a catalog.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `groups` is empty.
    pub fn new(groups: Vec<StoryGroup>) -> Result<Self, DomainError> {
        if groups.is_empty() {
            return Err(DomainError::Validation(
                "catalog has no story groups".to_owned(),
            ));
        }
        Ok(Self {
            groups: groups.into_iter().map(Arc::new).collect(),
        })
    }

    /// Group at `index`, if in range.
    #[must_use]
    pub fn group(&self, index: usize) -> Option<&Arc<StoryGroup>> {
        self.groups.get(index)
    }

    /// All groups in display order.
    pub fn groups(&self) -> impl Iterator<Item = &Arc<StoryGroup>> {
        self.groups.iter()
    }

    /// Number of groups; never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
