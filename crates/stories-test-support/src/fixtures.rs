//! Catalog fixtures.

use stories_catalog::domain::model::{MediaKind, Story, StoryGroup};

fn group(id: &str, stories: Vec<Story>) -> StoryGroup {
    StoryGroup::new(id, format!("Group {id}"), format!("{id}.jpg"), stories)
        .expect("fixture groups are valid")
}

/// A group of `count` image stories with ids `"{id}-0"`, `"{id}-1"`, ...
///
/// # Panics
///
/// Panics if `count` is zero.
#[must_use]
pub fn image_group(id: &str, count: usize) -> StoryGroup {
    let stories = (0..count)
        .map(|i| Story::new(format!("{id}-{i}"), MediaKind::Image, format!("{id}-{i}.jpg")))
        .collect();
    group(id, stories)
}

/// A group of `count` video stories with ids `"{id}-0"`, `"{id}-1"`, ...
///
/// # Panics
///
/// Panics if `count` is zero.
#[must_use]
pub fn video_group(id: &str, count: usize) -> StoryGroup {
    let stories = (0..count)
        .map(|i| Story::new(format!("{id}-{i}"), MediaKind::Video, format!("{id}-{i}.mp4")))
        .collect();
    group(id, stories)
}

/// A group following `kinds`, one story per entry.
///
/// # Panics
///
/// Panics if `kinds` is empty.
#[must_use]
pub fn mixed_group(id: &str, kinds: &[MediaKind]) -> StoryGroup {
    let stories = kinds
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            let ext = match kind {
                MediaKind::Image => "jpg",
                MediaKind::Video => "mp4",
            };
            Story::new(format!("{id}-{i}"), *kind, format!("{id}-{i}.{ext}"))
        })
        .collect();
    group(id, stories)
}
