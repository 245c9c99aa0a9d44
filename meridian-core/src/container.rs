use crate::{Connector, Path, Point, TaskError};

/// Discriminant for the entity variants.
///
/// The derived ordering (`Point < Connector < Path`) is the variant half of
/// the type-then-identifier comparator used to order entity streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityType {
    /// A [`Point`] entity.
    Point,
    /// A [`Connector`] entity.
    Connector,
    /// A [`Path`] entity.
    Path,
}

/// Wraps exactly one entity value together with its variant.
///
/// Containers are immutable once constructed. Stages that need
/// variant-specific behaviour dispatch through [`EntityContainer::process`]
/// rather than matching on the container themselves, so the set of variants
/// a stage handles is visible in its [`EntityProcessor`] implementation.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use meridian_core::{EntityContainer, EntityType, Point};
///
/// let container = EntityContainer::Point(Point::with_empty_tags(
///     1,
///     Coord { x: 0.0, y: 0.0 },
///     0,
/// ));
/// assert_eq!(container.entity_type(), EntityType::Point);
/// assert_eq!(container.id(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityContainer {
    /// A point entity.
    Point(Point),
    /// A connector entity.
    Connector(Connector),
    /// A path entity.
    Path(Path),
}

impl EntityContainer {
    /// Variant discriminant of the wrapped entity.
    #[must_use]
    pub const fn entity_type(&self) -> EntityType {
        match self {
            Self::Point(_) => EntityType::Point,
            Self::Connector(_) => EntityType::Connector,
            Self::Path(_) => EntityType::Path,
        }
    }

    /// Identifier of the wrapped entity.
    #[must_use]
    pub const fn id(&self) -> u64 {
        match self {
            Self::Point(point) => point.id,
            Self::Connector(connector) => connector.id,
            Self::Path(path) => path.id,
        }
    }

    /// Comparator key ordering entities by variant, then identifier.
    ///
    /// Streams fed into the change-derivation engine must be sorted by this
    /// key; the engine assumes the invariant rather than enforcing it.
    #[must_use]
    pub const fn sort_key(&self) -> (EntityType, u64) {
        (self.entity_type(), self.id())
    }

    /// Invoke the handler method matching this container's variant.
    ///
    /// Consumes the container: entities flow through a pipeline exactly
    /// once, and handlers receive the entity by value.
    ///
    /// # Errors
    /// Whatever the selected handler returns.
    pub fn process<P>(self, processor: &mut P) -> Result<(), TaskError>
    where
        P: EntityProcessor + ?Sized,
    {
        match self {
            Self::Point(point) => processor.process_point(point),
            Self::Connector(connector) => processor.process_connector(connector),
            Self::Path(path) => processor.process_path(path),
        }
    }
}

/// Variant-specific entity handlers.
///
/// Every method defaults to discarding its entity, so a stage implements
/// only the variants it cares about; pass-through stages override all
/// three.
pub trait EntityProcessor {
    /// Handle a point entity.
    ///
    /// # Errors
    /// Implementation-defined; the default discards the entity and
    /// succeeds.
    fn process_point(&mut self, point: Point) -> Result<(), TaskError> {
        let _ = point;
        Ok(())
    }

    /// Handle a connector entity.
    ///
    /// # Errors
    /// Implementation-defined; the default discards the entity and
    /// succeeds.
    fn process_connector(&mut self, connector: Connector) -> Result<(), TaskError> {
        let _ = connector;
        Ok(())
    }

    /// Handle a path entity.
    ///
    /// # Errors
    /// Implementation-defined; the default discards the entity and
    /// succeeds.
    fn process_path(&mut self, path: Path) -> Result<(), TaskError> {
        let _ = path;
        Ok(())
    }
}
