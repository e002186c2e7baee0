//! Which group is open, and what happens when a group runs out of stories.

use stories_core::error::DomainError;

/// What the viewer should do after a group reported a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStep {
    /// Open the group at this index.
    Open(usize),
    /// Leave everything as it is.
    Stay,
    /// Close the viewer.
    Close,
}

/// Tracks the open group of a viewer.
///
/// At most one group is open. Moving past the last group closes the viewer;
/// moving before the first group does nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupNavigator {
    group_count: usize,
    current: Option<usize>,
}

impl GroupNavigator {
    /// Creates a closed navigator over `group_count` groups.
    #[must_use]
    pub fn new(group_count: usize) -> Self {
        Self {
            group_count,
            current: None,
        }
    }

    /// Index of the open group.
    #[must_use]
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Whether any group is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Number of groups navigated over.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// Whether a group follows `index`.
    #[must_use]
    pub fn has_next(&self, index: usize) -> bool {
        index + 1 < self.group_count
    }

    /// Makes `index` the open group and returns the previously open one.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `index` is out of range; the
    /// open group is left unchanged.
    pub fn open(&mut self, index: usize) -> Result<Option<usize>, DomainError> {
        if index >= self.group_count {
            return Err(DomainError::Validation(format!(
                "group index {index} out of range for {} groups",
                self.group_count
            )));
        }
        Ok(self.current.replace(index))
    }

    /// Closes the navigator and returns the group that was open.
    pub fn close(&mut self) -> Option<usize> {
        self.current.take()
    }

    /// Decision after the open group ran out of stories backwards.
    #[must_use]
    pub fn on_no_previous_story(&self) -> GroupStep {
        match self.current {
            Some(index) if index > 0 => GroupStep::Open(index - 1),
            _ => GroupStep::Stay,
        }
    }

    /// Decision after the open group ran out of stories forwards.
    #[must_use]
    pub fn on_no_next_story(&self) -> GroupStep {
        match self.current {
            Some(index) if self.has_next(index) => GroupStep::Open(index + 1),
            Some(_) => GroupStep::Close,
            None => GroupStep::Stay,
        }
    }
}
