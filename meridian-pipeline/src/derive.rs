//! Merge-based change derivation between two ordered entity streams.

use std::cmp::Ordering;
use std::sync::Arc;

use log::debug;
use meridian_core::{
    ChangeAction, ChangeContainer, ChangeSink, EntityContainer, RunnableChangeSource, Sink,
    TaskError,
};

use crate::postbox::{DataPostbox, PostboxSink};

/// Number of producer-facing endpoints a deriver exposes.
const SINK_COUNT: usize = 2;

/// Compares a baseline and an updated entity stream and emits the minimal
/// set of changes transforming one into the other.
///
/// The deriver exposes two producer-facing endpoints: index 0 accepts the
/// baseline ("from") stream and index 1 the updated ("to") stream, each
/// backed by its own bounded postbox. Both streams must already be sorted
/// by [`EntityContainer::sort_key`]; the deriver merges, it does not sort.
///
/// [`RunnableChangeSource::run`] drives the merge on the calling thread,
/// holding one pull-ahead entity per side: a baseline-only entity emits
/// `Delete`, an updated-only entity emits `Create`, and an entity present
/// on both sides emits `Modify` exactly when full value equality fails.
/// Output order and content depend only on the two sorted inputs, never on
/// producer scheduling.
///
/// The attached change sink is released exactly once, whether the run
/// succeeds or fails; on failure both input queues are flagged first so
/// blocked producers terminate instead of hanging. A deriver is
/// single-shot: `run` consumes the attached sink.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use meridian_core::test_support::RecordingChangeSink;
/// use meridian_core::{ChangeAction, EntityContainer, Point, RunnableChangeSource, Sink};
/// use meridian_pipeline::ChangeDeriver;
///
/// # fn main() -> Result<(), meridian_core::TaskError> {
/// let mut deriver = ChangeDeriver::new(8)?;
/// let changes = RecordingChangeSink::new();
/// deriver.set_change_sink(Box::new(changes.clone()));
///
/// let mut baseline = deriver.sink(0)?;
/// baseline.complete()?;
///
/// let mut updated = deriver.sink(1)?;
/// updated.process(EntityContainer::Point(Point::with_empty_tags(
///     7,
///     Coord { x: 0.0, y: 0.0 },
///     0,
/// )))?;
/// updated.complete()?;
///
/// deriver.run()?;
/// assert_eq!(changes.changes()[0].action, ChangeAction::Create);
/// # Ok(())
/// # }
/// ```
pub struct ChangeDeriver {
    from: Arc<DataPostbox<EntityContainer>>,
    to: Arc<DataPostbox<EntityContainer>>,
    change_sink: Option<Box<dyn ChangeSink + Send>>,
}

impl ChangeDeriver {
    /// Create a deriver whose two input queues buffer `capacity` entities
    /// each.
    ///
    /// # Errors
    /// [`TaskError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, TaskError> {
        Ok(Self {
            from: Arc::new(DataPostbox::new(capacity)?),
            to: Arc::new(DataPostbox::new(capacity)?),
            change_sink: None,
        })
    }

    fn derive<C>(&self, sink: &mut C) -> Result<(), TaskError>
    where
        C: ChangeSink + ?Sized,
    {
        let mut created: u64 = 0;
        let mut modified: u64 = 0;
        let mut deleted: u64 = 0;

        let mut from = self.from.next()?;
        let mut to = self.to.next()?;

        loop {
            match (from, to) {
                (Some(baseline), Some(updated)) => {
                    match baseline.sort_key().cmp(&updated.sort_key()) {
                        Ordering::Less => {
                            // Baseline entity has no counterpart: deleted.
                            sink.process(ChangeContainer::new(baseline, ChangeAction::Delete))?;
                            deleted += 1;
                            from = self.from.next()?;
                            to = Some(updated);
                        }
                        Ordering::Greater => {
                            // Updated entity has no counterpart: created.
                            sink.process(ChangeContainer::new(updated, ChangeAction::Create))?;
                            created += 1;
                            from = Some(baseline);
                            to = self.to.next()?;
                        }
                        Ordering::Equal => {
                            if baseline != updated {
                                sink.process(ChangeContainer::new(updated, ChangeAction::Modify))?;
                                modified += 1;
                            }
                            from = self.from.next()?;
                            to = self.to.next()?;
                        }
                    }
                }
                (Some(baseline), None) => {
                    sink.process(ChangeContainer::new(baseline, ChangeAction::Delete))?;
                    deleted += 1;
                    from = self.from.next()?;
                    to = None;
                }
                (None, Some(updated)) => {
                    sink.process(ChangeContainer::new(updated, ChangeAction::Create))?;
                    created += 1;
                    from = None;
                    to = self.to.next()?;
                }
                (None, None) => break,
            }
        }

        sink.complete()?;
        debug!("change derivation complete: {created} created, {modified} modified, {deleted} deleted");
        Ok(())
    }
}

impl RunnableChangeSource for ChangeDeriver {
    fn sink_count(&self) -> usize {
        SINK_COUNT
    }

    fn sink(&self, index: usize) -> Result<Box<dyn Sink + Send>, TaskError> {
        let postbox = match index {
            0 => &self.from,
            1 => &self.to,
            _ => {
                return Err(TaskError::InvalidSinkIndex {
                    index,
                    count: SINK_COUNT,
                });
            }
        };
        Ok(Box::new(PostboxSink::new(Arc::clone(postbox))))
    }

    fn set_change_sink(&mut self, sink: Box<dyn ChangeSink + Send>) {
        self.change_sink = Some(sink);
    }

    fn run(&mut self) -> Result<(), TaskError> {
        let mut sink = self.change_sink.take().ok_or(TaskError::ChangeSinkMissing)?;
        let result = self.derive(sink.as_mut());
        if result.is_err() {
            // Mark both inputs before releasing the sink so producers
            // blocked in put observe the failure and terminate.
            self.from.set_output_error();
            self.to.set_output_error();
        }
        sink.release();
        result
    }
}
