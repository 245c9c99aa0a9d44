//! Buffering sorter establishing the type-then-identifier stream order.

use log::debug;
use meridian_core::{EntityContainer, Sink, TaskError};

/// Buffers an entire entity stream and flushes it downstream in
/// type-then-identifier order on completion.
///
/// The change deriver requires input sorted by
/// [`EntityContainer::sort_key`] but does not sort; placing a sorter in
/// front of an unsorted producer establishes the invariant at the cost of
/// buffering the full stream in memory. The sort is stable, so entities
/// sharing a key keep their arrival order.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use meridian_core::test_support::RecordingSink;
/// use meridian_core::{EntityContainer, Point, Sink};
/// use meridian_pipeline::EntitySorter;
///
/// # fn main() -> Result<(), meridian_core::TaskError> {
/// let sink = RecordingSink::new();
/// let mut sorter = EntitySorter::new(sink.clone());
///
/// for id in [3, 1, 2] {
///     sorter.process(EntityContainer::Point(Point::with_empty_tags(
///         id,
///         Coord { x: 0.0, y: 0.0 },
///         0,
///     )))?;
/// }
/// sorter.complete()?;
///
/// let ids: Vec<u64> = sink.entities().iter().map(EntityContainer::id).collect();
/// assert_eq!(ids, vec![1, 2, 3]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct EntitySorter<S> {
    sink: S,
    buffer: Vec<EntityContainer>,
}

impl<S: Sink> EntitySorter<S> {
    /// Create a sorter flushing into `sink` on completion.
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            buffer: Vec::new(),
        }
    }
}

impl<S: Sink> Sink for EntitySorter<S> {
    fn process(&mut self, entity: EntityContainer) -> Result<(), TaskError> {
        self.buffer.push(entity);
        Ok(())
    }

    fn complete(&mut self) -> Result<(), TaskError> {
        let mut buffered = std::mem::take(&mut self.buffer);
        buffered.sort_by_key(EntityContainer::sort_key);
        debug!("flushing {} entities in type-then-identifier order", buffered.len());
        for entity in buffered {
            self.sink.process(entity)?;
        }
        self.sink.complete()
    }

    fn release(&mut self) {
        self.buffer.clear();
        self.sink.release();
    }
}
