use crate::EntityContainer;

/// Action tag attached to a derived change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChangeAction {
    /// The entity exists only in the updated stream.
    Create,
    /// The entity exists in both streams with differing values.
    Modify,
    /// The entity exists only in the baseline stream.
    Delete,
}

/// Pairs an entity with the action transforming baseline into updated.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use meridian_core::{ChangeAction, ChangeContainer, EntityContainer, Point};
///
/// let change = ChangeContainer::new(
///     EntityContainer::Point(Point::with_empty_tags(1, Coord { x: 0.0, y: 0.0 }, 0)),
///     ChangeAction::Create,
/// );
/// assert_eq!(change.action, ChangeAction::Create);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChangeContainer {
    /// Action to apply.
    pub action: ChangeAction,
    /// Entity the action applies to.
    pub entity: EntityContainer,
}

impl ChangeContainer {
    /// Pair an entity with an action.
    #[must_use]
    pub fn new(entity: EntityContainer, action: ChangeAction) -> Self {
        Self { action, entity }
    }
}
