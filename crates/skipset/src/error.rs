use thiserror::Error;

/// Errors reported by [`SkipListSet`](crate::SkipListSet).
///
/// Duplicate insertion and removal of an absent value are not errors; those
/// calls return `false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipSetError {
    /// An element was requested from an empty set.
    #[error("skip list set is empty")]
    Empty,
    /// The operation is permanently unsupported (range views).
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
    /// A cursor was asked to remove without a freshly returned element.
    #[error("cursor has no current element to remove")]
    NoCurrentElement,
    /// A structural invariant does not hold.
    #[error("skip list invariant violated: {0}")]
    Corrupted(String),
}

/// Result type alias for skip list set operations
pub type Result<T> = std::result::Result<T, SkipSetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(SkipSetError::Empty.to_string(), "skip list set is empty");
        assert_eq!(
            SkipSetError::Unsupported("sub_set").to_string(),
            "unsupported operation: sub_set"
        );
        assert!(
            SkipSetError::Corrupted("level 2 not ascending".into())
                .to_string()
                .contains("level 2 not ascending")
        );
    }
}
