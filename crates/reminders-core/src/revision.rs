//! Stream revisions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Zero-based position of an event within its aggregate stream.
///
/// A blank stream sits at revision 0; the first event carries revision 1 and
/// every following event carries the successor of its predecessor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamRevision(u64);

impl StreamRevision {
    /// The revision of a stream with no events.
    pub const INITIAL: Self = Self(0);

    /// Wraps a raw revision number.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw revision number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns the revision immediately following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns `true` when `self` is the direct successor of `previous`.
    #[must_use]
    pub fn is_next(self, previous: Self) -> bool {
        self == previous.next()
    }
}

impl fmt::Display for StreamRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_revision_is_zero() {
        assert_eq!(StreamRevision::default().value(), 0);
        assert_eq!(StreamRevision::default(), StreamRevision::INITIAL);
    }

    #[test]
    fn test_display_prefixes_value_with_v() {
        assert_eq!(StreamRevision::new(7).to_string(), "V7");
    }

    #[test]
    fn test_is_next_rejects_gap() {
        let current = StreamRevision::new(3);

        assert!(!StreamRevision::new(5).is_next(current));
        assert!(!StreamRevision::new(2).is_next(current));
    }

    proptest! {
        #[test]
        fn prop_next_increments_value(value in 0u64..u64::MAX) {
            let revision = StreamRevision::new(value);

            prop_assert_eq!(revision.next().value(), value + 1);
        }

        #[test]
        fn prop_next_is_next_of_self(value in 0u64..u64::MAX) {
            let revision = StreamRevision::new(value);

            prop_assert!(revision.next().is_next(revision));
        }

        #[test]
        fn prop_revision_is_not_next_of_itself(value in 0u64..u64::MAX) {
            let revision = StreamRevision::new(value);

            prop_assert!(!revision.is_next(revision));
        }
    }
}
