use meridian_core::TaskError;

/// Largest identifier a tracker can index.
const MAX_ID: u64 = u32::MAX as u64;

const WORD_BITS: usize = 64;

/// Growable bit-index over entity identifiers.
///
/// Identifiers are restricted to the 32-bit range. This bounds the
/// worst-case bit storage and is a documented scaling constraint of the
/// bounding-box filter; identifiers beyond the range raise
/// [`TaskError::IdentifierRange`] instead of being truncated or skipped.
#[derive(Debug, Default)]
pub(crate) struct IdTracker {
    words: Vec<u64>,
}

impl IdTracker {
    pub(crate) const fn new() -> Self {
        Self { words: Vec::new() }
    }

    /// Validate that `id` fits the indexable range.
    pub(crate) fn ensure_indexable(id: u64) -> Result<usize, TaskError> {
        if id > MAX_ID {
            return Err(TaskError::IdentifierRange { id, max: MAX_ID });
        }
        usize::try_from(id).map_err(|_| TaskError::IdentifierRange { id, max: MAX_ID })
    }

    /// Record `id` in the set.
    pub(crate) fn mark(&mut self, id: u64) -> Result<(), TaskError> {
        let index = Self::ensure_indexable(id)?;
        let word = index / WORD_BITS;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1_u64 << (index % WORD_BITS);
        Ok(())
    }

    /// Whether `id` has been recorded.
    pub(crate) fn contains(&self, id: u64) -> Result<bool, TaskError> {
        let index = Self::ensure_indexable(id)?;
        let word = index / WORD_BITS;
        Ok(self
            .words
            .get(word)
            .is_some_and(|bits| bits & (1_u64 << (index % WORD_BITS)) != 0))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn marked_identifiers_are_found() {
        let mut tracker = IdTracker::new();
        tracker.mark(0).expect("identifier is in range");
        tracker.mark(63).expect("identifier is in range");
        tracker.mark(64).expect("identifier is in range");
        tracker.mark(1_000_000).expect("identifier is in range");

        for id in [0, 63, 64, 1_000_000] {
            assert!(tracker.contains(id).expect("identifier is in range"));
        }
        assert!(!tracker.contains(1).expect("identifier is in range"));
        assert!(!tracker.contains(999_999).expect("identifier is in range"));
    }

    #[rstest]
    fn unmarked_identifier_beyond_storage_is_absent() {
        let tracker = IdTracker::new();
        assert!(!tracker.contains(10_000).expect("identifier is in range"));
    }

    #[rstest]
    fn accepts_the_largest_indexable_identifier() {
        let tracker = IdTracker::new();
        assert!(!tracker.contains(MAX_ID).expect("identifier is in range"));
    }

    #[rstest]
    fn rejects_identifiers_beyond_the_range() {
        let mut tracker = IdTracker::new();
        let id = MAX_ID + 1;
        assert!(matches!(
            tracker.mark(id),
            Err(TaskError::IdentifierRange { id: found, .. }) if found == id
        ));
        assert!(matches!(
            tracker.contains(id),
            Err(TaskError::IdentifierRange { .. })
        ));
    }
}
