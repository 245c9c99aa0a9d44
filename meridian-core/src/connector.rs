use crate::Tags;

/// A link between two points, referenced by identifier.
///
/// Endpoint references are weak: a connector does not own its points, and
/// referential integrity is the concern of filtering stages downstream.
///
/// # Examples
/// ```
/// use meridian_core::{Connector, Tags};
///
/// let connector = Connector::new(5, 1, 2, Tags::new());
/// assert_eq!((connector.from, connector.to), (1, 2));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Connector {
    /// Unique identifier within the connector variant.
    pub id: u64,
    /// Identifier of the point this connector starts at.
    pub from: u64,
    /// Identifier of the point this connector ends at.
    pub to: u64,
    /// OpenStreetMap-style tags.
    pub tags: Tags,
}

impl Connector {
    /// Construct a `Connector` with the provided tags.
    #[must_use]
    pub fn new(id: u64, from: u64, to: u64, tags: Tags) -> Self {
        Self { id, from, to, tags }
    }

    /// Construct a `Connector` without tags.
    #[must_use]
    pub fn with_empty_tags(id: u64, from: u64, to: u64) -> Self {
        Self::new(id, from, to, Tags::new())
    }
}
