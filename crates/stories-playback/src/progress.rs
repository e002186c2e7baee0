//! Story progress, a percentage in `[0, 100]`.

use std::fmt;

use serde::Serialize;

/// Completion percentage of the story currently on screen.
///
/// Always within `[0, 100]`; constructing from NaN yields `None` so that an
/// indeterminate reading never replaces the last good value.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
pub struct Progress(f64);

impl Progress {
    /// Nothing shown yet.
    pub const ZERO: Self = Self(0.0);
    /// Fully shown; triggers the advance.
    pub const COMPLETE: Self = Self(100.0);

    /// Clamps `value` into range, or `None` if it is NaN.
    #[must_use]
    pub fn from_percent(value: f64) -> Option<Self> {
        if value.is_nan() {
            None
        } else {
            Some(Self(value.clamp(0.0, 100.0)))
        }
    }

    /// The percentage.
    #[must_use]
    pub fn percent(self) -> f64 {
        self.0
    }

    /// Whether the story has been fully shown.
    #[must_use]
    pub fn is_complete(self) -> bool {
        self.0 >= 100.0
    }

    /// Adds `step` percentage points, saturating at 100.
    #[must_use]
    pub fn advanced_by(self, step: f64) -> Self {
        let next = self.0 + step;
        if next <= 100.0 {
            Self(next)
        } else {
            Self::COMPLETE
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_percent_clamps_and_rejects_nan() {
        assert_eq!(Progress::from_percent(-3.0), Some(Progress::ZERO));
        assert_eq!(Progress::from_percent(250.0), Some(Progress::COMPLETE));
        assert_eq!(Progress::from_percent(f64::INFINITY), Some(Progress::COMPLETE));
        assert_eq!(Progress::from_percent(f64::NAN), None);
    }

    #[test]
    fn test_advanced_by_saturates_at_complete() {
        let almost = Progress::from_percent(99.0).unwrap();
        assert_eq!(almost.advanced_by(3.0), Progress::COMPLETE);
        assert!(almost.advanced_by(3.0).is_complete());
        assert!(!almost.advanced_by(0.5).is_complete());
    }
}
