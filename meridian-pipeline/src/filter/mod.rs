//! Referential bounding-box filtering of entity streams.

mod ids;

use ids::IdTracker;
use meridian_core::{
    Connector, EntityContainer, EntityProcessor, Path, Point, Sink, TaskError,
};

/// Retains only entities inside, or referentially dependent on entities
/// inside, a rectangular geographic box.
///
/// Boundaries are inclusive: a point survives when
/// `left ≤ longitude ≤ right` and `bottom ≤ latitude ≤ top`, in WGS84
/// degrees. The caller supplies `left ≤ right` and `bottom ≤ top`; the
/// filter stores the raw values without validating orientation, so an
/// inverted box excludes everything.
///
/// Exclusion cascades through the reference graph: a connector survives
/// only when both endpoint points survived, and a path survives only when
/// at least one referenced connector survived. A surviving path is
/// forwarded as its original unmodified container, full tag set and
/// reference list included; the surviving-reference test decides inclusion
/// of the path as a whole.
///
/// The input stream must deliver all points first, then all connectors,
/// then all paths: connector retention consults the point index built
/// earlier in the same pass, and path retention consults the connector
/// index. The filter does not verify this ordering; streams violating it
/// silently produce incomplete output.
///
/// Identifiers must fit the 32-bit range used by the availability indices;
/// larger identifiers abort the run with [`TaskError::IdentifierRange`].
///
/// # Examples
/// ```
/// use geo::Coord;
/// use meridian_core::test_support::RecordingSink;
/// use meridian_core::{EntityContainer, Point, Sink};
/// use meridian_pipeline::BoundingBoxFilter;
///
/// # fn main() -> Result<(), meridian_core::TaskError> {
/// let sink = RecordingSink::new();
/// let mut filter = BoundingBoxFilter::new(sink.clone(), -1.0, 1.0, 1.0, -1.0);
///
/// filter.process(EntityContainer::Point(Point::with_empty_tags(
///     1,
///     Coord { x: 0.0, y: 0.0 },
///     0,
/// )))?;
/// filter.process(EntityContainer::Point(Point::with_empty_tags(
///     2,
///     Coord { x: 5.0, y: 0.0 },
///     0,
/// )))?;
/// filter.complete()?;
///
/// assert_eq!(sink.entities().len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BoundingBoxFilter<S> {
    sink: S,
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    available_points: IdTracker,
    available_connectors: IdTracker,
}

impl<S: Sink> BoundingBoxFilter<S> {
    /// Create a filter forwarding retained entities to `sink`.
    ///
    /// `left` and `right` are longitudes and `top` and `bottom` latitudes,
    /// all in WGS84 degrees.
    #[must_use]
    pub fn new(sink: S, left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            sink,
            left,
            right,
            top,
            bottom,
            available_points: IdTracker::new(),
            available_connectors: IdTracker::new(),
        }
    }

    fn contains(&self, longitude: f64, latitude: f64) -> bool {
        self.left <= longitude
            && longitude <= self.right
            && self.bottom <= latitude
            && latitude <= self.top
    }
}

impl<S: Sink> EntityProcessor for BoundingBoxFilter<S> {
    fn process_point(&mut self, point: Point) -> Result<(), TaskError> {
        if self.contains(point.location.x, point.location.y) {
            self.available_points.mark(point.id)?;
            self.sink.process(EntityContainer::Point(point))?;
        }
        Ok(())
    }

    fn process_connector(&mut self, connector: Connector) -> Result<(), TaskError> {
        IdTracker::ensure_indexable(connector.id)?;
        let from_available = self.available_points.contains(connector.from)?;
        let to_available = self.available_points.contains(connector.to)?;
        if from_available && to_available {
            self.available_connectors.mark(connector.id)?;
            self.sink.process(EntityContainer::Connector(connector))?;
        }
        Ok(())
    }

    fn process_path(&mut self, path: Path) -> Result<(), TaskError> {
        // Every reference is range-checked, even once a survivor is known.
        let mut survives = false;
        for connector_id in &path.connectors {
            if self.available_connectors.contains(*connector_id)? {
                survives = true;
            }
        }
        if survives {
            self.sink.process(EntityContainer::Path(path))?;
        }
        Ok(())
    }
}

impl<S: Sink> Sink for BoundingBoxFilter<S> {
    fn process(&mut self, entity: EntityContainer) -> Result<(), TaskError> {
        entity.process(self)
    }

    fn complete(&mut self) -> Result<(), TaskError> {
        self.sink.complete()
    }

    fn release(&mut self) {
        self.sink.release();
    }
}

#[cfg(test)]
mod tests {
    use geo::Coord;
    use meridian_core::test_support::RecordingSink;
    use meridian_core::Tags;
    use rstest::{fixture, rstest};

    use super::*;

    const LEFT: f64 = -1.0;
    const RIGHT: f64 = 1.0;
    const TOP: f64 = 1.0;
    const BOTTOM: f64 = -1.0;

    fn point_at(id: u64, x: f64, y: f64) -> EntityContainer {
        EntityContainer::Point(Point::with_empty_tags(id, Coord { x, y }, 0))
    }

    fn connector(id: u64, from: u64, to: u64) -> EntityContainer {
        EntityContainer::Connector(Connector::with_empty_tags(id, from, to))
    }

    #[fixture]
    fn filter() -> BoundingBoxFilter<RecordingSink> {
        BoundingBoxFilter::new(RecordingSink::new(), LEFT, RIGHT, TOP, BOTTOM)
    }

    fn forwarded_ids(sink: &RecordingSink) -> Vec<u64> {
        sink.entities().iter().map(EntityContainer::id).collect()
    }

    #[rstest]
    fn keeps_points_inside_the_box(mut filter: BoundingBoxFilter<RecordingSink>) {
        let sink = filter.sink.clone();
        filter
            .process(point_at(1, 0.0, 0.0))
            .expect("filtering succeeds");
        filter
            .process(point_at(2, 3.0, 0.0))
            .expect("filtering succeeds");
        filter
            .process(point_at(3, 0.0, -3.0))
            .expect("filtering succeeds");

        assert_eq!(forwarded_ids(&sink), vec![1]);
    }

    #[rstest]
    #[case::left_edge(LEFT, 0.0)]
    #[case::right_edge(RIGHT, 0.0)]
    #[case::bottom_edge(0.0, BOTTOM)]
    #[case::top_edge(0.0, TOP)]
    #[case::corner(RIGHT, TOP)]
    fn includes_points_exactly_on_the_boundary(
        mut filter: BoundingBoxFilter<RecordingSink>,
        #[case] x: f64,
        #[case] y: f64,
    ) {
        let sink = filter.sink.clone();
        filter.process(point_at(42, x, y)).expect("filtering succeeds");
        assert_eq!(forwarded_ids(&sink), vec![42]);
    }

    #[rstest]
    #[case::past_right(RIGHT + 1e-7, 0.0)]
    #[case::past_top(0.0, TOP + 1e-7)]
    #[case::past_left(LEFT - 1e-7, 0.0)]
    #[case::past_bottom(0.0, BOTTOM - 1e-7)]
    fn excludes_points_just_outside_the_boundary(
        mut filter: BoundingBoxFilter<RecordingSink>,
        #[case] x: f64,
        #[case] y: f64,
    ) {
        let sink = filter.sink.clone();
        filter.process(point_at(42, x, y)).expect("filtering succeeds");
        assert!(forwarded_ids(&sink).is_empty());
    }

    #[rstest]
    fn an_inverted_box_excludes_everything() {
        let sink = RecordingSink::new();
        // left > right: the caller inverted the box and nothing survives.
        let mut filter = BoundingBoxFilter::new(sink.clone(), 1.0, -1.0, 1.0, -1.0);
        filter
            .process(point_at(1, 0.0, 0.0))
            .expect("filtering succeeds");
        assert!(sink.entities().is_empty());
    }

    #[rstest]
    fn keeps_connectors_with_both_endpoints_inside(
        mut filter: BoundingBoxFilter<RecordingSink>,
    ) {
        let sink = filter.sink.clone();
        filter
            .process(point_at(1, 0.0, 0.0))
            .expect("filtering succeeds");
        filter
            .process(point_at(2, 0.5, 0.5))
            .expect("filtering succeeds");
        filter
            .process(connector(10, 1, 2))
            .expect("filtering succeeds");

        assert_eq!(forwarded_ids(&sink), vec![1, 2, 10]);
    }

    #[rstest]
    fn drops_connectors_with_one_endpoint_outside(
        mut filter: BoundingBoxFilter<RecordingSink>,
    ) {
        let sink = filter.sink.clone();
        filter
            .process(point_at(1, 0.0, 0.0))
            .expect("filtering succeeds");
        filter
            .process(point_at(2, 5.0, 0.0))
            .expect("filtering succeeds");
        filter
            .process(connector(10, 1, 2))
            .expect("filtering succeeds");

        assert_eq!(forwarded_ids(&sink), vec![1]);
    }

    #[rstest]
    fn drops_paths_whose_connectors_are_all_excluded(
        mut filter: BoundingBoxFilter<RecordingSink>,
    ) {
        let sink = filter.sink.clone();
        filter
            .process(point_at(1, 9.0, 9.0))
            .expect("filtering succeeds");
        filter
            .process(connector(10, 1, 1))
            .expect("filtering succeeds");
        // Tags alone never save a path.
        filter
            .process(EntityContainer::Path(Path::new(
                20,
                0,
                vec![10],
                Tags::from([(String::from("name"), String::from("ring road"))]),
            )))
            .expect("filtering succeeds");

        assert!(forwarded_ids(&sink).is_empty());
    }

    #[rstest]
    fn forwards_surviving_paths_unmodified(mut filter: BoundingBoxFilter<RecordingSink>) {
        let sink = filter.sink.clone();
        filter
            .process(point_at(1, 0.0, 0.0))
            .expect("filtering succeeds");
        filter
            .process(point_at(2, 0.5, 0.5))
            .expect("filtering succeeds");
        filter
            .process(connector(10, 1, 2))
            .expect("filtering succeeds");

        let original = Path::new(
            20,
            7,
            vec![99, 10, 98],
            Tags::from([(String::from("name"), String::from("high street"))]),
        );
        filter
            .process(EntityContainer::Path(original.clone()))
            .expect("filtering succeeds");

        // One surviving reference keeps the whole path, original
        // references and tags intact.
        let forwarded = sink.entities();
        assert_eq!(forwarded.last(), Some(&EntityContainer::Path(original)));
    }

    #[rstest]
    fn oversized_identifiers_abort_filtering(mut filter: BoundingBoxFilter<RecordingSink>) {
        let id = u64::from(u32::MAX) + 1;
        let result = filter.process(point_at(id, 0.0, 0.0));
        assert!(matches!(
            result,
            Err(TaskError::IdentifierRange { id: found, .. }) if found == id
        ));
    }

    #[rstest]
    fn oversized_connector_identifiers_abort_even_when_dropped(
        mut filter: BoundingBoxFilter<RecordingSink>,
    ) {
        // Both endpoints are unknown, so the connector would be dropped;
        // the identifier is still validated.
        let id = u64::from(u32::MAX) + 1;
        let result = filter.process(connector(id, 1, 2));
        assert!(matches!(result, Err(TaskError::IdentifierRange { .. })));
    }

    #[rstest]
    fn completion_and_release_forward_to_the_sink(
        mut filter: BoundingBoxFilter<RecordingSink>,
    ) {
        let sink = filter.sink.clone();
        filter.complete().expect("downstream completes");
        filter.release();
        assert_eq!(sink.completions(), 1);
        assert_eq!(sink.releases(), 1);
    }
}
