use geo::Coord;

use crate::Tags;

/// A single geographic position in the entity graph.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. Tags
/// mirror OpenStreetMap's free-form key/value structure.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use meridian_core::{Point, Tags};
///
/// let point = Point::new(
///     1,
///     Coord { x: 13.4, y: 52.5 },
///     1_700_000_000,
///     Tags::from([("name".into(), "Brandenburg Gate".into())]),
/// );
///
/// assert_eq!(point.id, 1);
/// assert_eq!(point.tags.get("name"), Some(&"Brandenburg Gate".to_owned()));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Unique identifier within the point variant.
    pub id: u64,
    /// Geospatial position.
    pub location: Coord<f64>,
    /// Seconds since the Unix epoch at which the point was last edited.
    pub timestamp: i64,
    /// OpenStreetMap-style tags.
    pub tags: Tags,
}

impl Point {
    /// Construct a `Point` with the provided tags.
    #[must_use]
    pub fn new(id: u64, location: Coord<f64>, timestamp: i64, tags: Tags) -> Self {
        Self {
            id,
            location,
            timestamp,
            tags,
        }
    }

    /// Construct a `Point` without tags.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use meridian_core::Point;
    ///
    /// let point = Point::with_empty_tags(1, Coord { x: 0.0, y: 0.0 }, 0);
    /// assert!(point.tags.is_empty());
    /// ```
    #[must_use]
    pub fn with_empty_tags(id: u64, location: Coord<f64>, timestamp: i64) -> Self {
        Self::new(id, location, timestamp, Tags::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_stores_tags() {
        let point = Point::new(
            1,
            Coord { x: 0.0, y: 0.0 },
            0,
            Tags::from([("key".into(), "value".into())]),
        );
        assert_eq!(point.tags.get("key"), Some(&"value".to_owned()));
    }

    #[test]
    fn equality_covers_location_and_timestamp() {
        let a = Point::with_empty_tags(1, Coord { x: 1.0, y: 2.0 }, 10);
        let mut b = a.clone();
        assert_eq!(a, b);
        b.timestamp = 11;
        assert_ne!(a, b);
    }
}
