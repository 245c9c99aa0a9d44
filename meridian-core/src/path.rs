use crate::Tags;

/// An ordered sequence of connector references forming a composite route.
///
/// The reference order defines the path geometry; reordering references
/// produces a different path even when the set of connectors is unchanged.
///
/// # Examples
/// ```
/// use meridian_core::{Path, Tags};
///
/// let path = Path::new(10, 1_700_000_000, vec![5, 6, 7], Tags::new());
/// assert_eq!(path.connectors, vec![5, 6, 7]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    /// Unique identifier within the path variant.
    pub id: u64,
    /// Seconds since the Unix epoch at which the path was last edited.
    pub timestamp: i64,
    /// Ordered connector identifiers making up the path.
    pub connectors: Vec<u64>,
    /// OpenStreetMap-style tags.
    pub tags: Tags,
}

impl Path {
    /// Construct a `Path` from an ordered connector reference list.
    #[must_use]
    pub fn new(id: u64, timestamp: i64, connectors: Vec<u64>, tags: Tags) -> Self {
        Self {
            id,
            timestamp,
            connectors,
            tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_order_is_significant() {
        let forward = Path::new(1, 0, vec![1, 2], Tags::new());
        let reversed = Path::new(1, 0, vec![2, 1], Tags::new());
        assert_ne!(forward, reversed);
    }
}
