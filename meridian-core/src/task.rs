//! Contracts connecting pipeline stages.
//!
//! Stages compose by implementing [`Sink`] or [`ChangeSink`] and forwarding
//! to the next stage they own; concurrency-bearing stages additionally
//! implement [`RunnableChangeSource`] and are driven by their own thread.

use thiserror::Error;

use crate::{ChangeContainer, EntityContainer};

/// Errors crossing stage boundaries in a pipeline.
///
/// Configuration errors (`InvalidCapacity`, `InvalidSinkIndex`,
/// `ChangeSinkMissing`) surface immediately at wiring time. `Released` and
/// `StageFailed` carry handoff lifecycle failures between threads instead
/// of unwinding across them. `IdentifierRange` aborts a run whose input
/// exceeds a documented scaling bound.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TaskError {
    /// A handoff queue was configured without any buffer capacity.
    #[error("handoff queue capacity must be greater than zero")]
    InvalidCapacity,
    /// An endpoint index outside the range a source exposes was requested.
    #[error("sink index {index} is not valid; this source exposes {count} sinks")]
    InvalidSinkIndex {
        /// Requested endpoint index.
        index: usize,
        /// Number of endpoints the source exposes.
        count: usize,
    },
    /// `run` was invoked before a change sink was attached.
    #[error("a change sink must be attached before the source runs")]
    ChangeSinkMissing,
    /// The far side of a handoff released the stage before completion.
    #[error("stage was released by its downstream before completion")]
    Released,
    /// The far side of a handoff reported an unrecoverable failure.
    #[error("an attached stage reported an unrecoverable failure")]
    StageFailed,
    /// An entity identifier exceeded the indexable range of a filter.
    #[error("entity identifier {id} exceeds the supported maximum {max}")]
    IdentifierRange {
        /// Offending identifier.
        id: u64,
        /// Largest identifier the stage can index.
        max: u64,
    },
}

/// Consumer of an entity stream.
///
/// The caller invokes `process` zero or more times, then exactly one of
/// `complete` (normal end of stream) before `release`, or `release` alone
/// (abort). `release` must be the final call and must always happen.
pub trait Sink {
    /// Consume one entity.
    ///
    /// # Errors
    /// Propagates downstream failures so the producer can stop early.
    fn process(&mut self, entity: EntityContainer) -> Result<(), TaskError>;

    /// Observe the end of the stream; no further `process` calls occur.
    ///
    /// # Errors
    /// Propagates downstream failures raised while flushing.
    fn complete(&mut self) -> Result<(), TaskError>;

    /// Unconditionally reclaim resources; called exactly once, last.
    fn release(&mut self);
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn process(&mut self, entity: EntityContainer) -> Result<(), TaskError> {
        (**self).process(entity)
    }

    fn complete(&mut self) -> Result<(), TaskError> {
        (**self).complete()
    }

    fn release(&mut self) {
        (**self).release();
    }
}

/// Consumer of a change stream.
///
/// Lifecycle contract is identical to [`Sink`], over [`ChangeContainer`]
/// values.
pub trait ChangeSink {
    /// Consume one change.
    ///
    /// # Errors
    /// Propagates downstream failures so the producer can stop early.
    fn process(&mut self, change: ChangeContainer) -> Result<(), TaskError>;

    /// Observe the end of the stream; no further `process` calls occur.
    ///
    /// # Errors
    /// Propagates downstream failures raised while flushing.
    fn complete(&mut self) -> Result<(), TaskError>;

    /// Unconditionally reclaim resources; called exactly once, last.
    fn release(&mut self);
}

impl<S: ChangeSink + ?Sized> ChangeSink for Box<S> {
    fn process(&mut self, change: ChangeContainer) -> Result<(), TaskError> {
        (**self).process(change)
    }

    fn complete(&mut self) -> Result<(), TaskError> {
        (**self).complete()
    }

    fn release(&mut self) {
        (**self).release();
    }
}

/// A runnable stage exposing multiple entity endpoints and emitting
/// changes.
///
/// Implementations own one handoff queue per endpoint and are driven to
/// completion by a dedicated thread calling [`RunnableChangeSource::run`].
pub trait RunnableChangeSource {
    /// Number of entity endpoints this source exposes.
    fn sink_count(&self) -> usize;

    /// Entity endpoint for `index`.
    ///
    /// # Errors
    /// [`TaskError::InvalidSinkIndex`] when `index` is not in
    /// `[0, sink_count)`.
    fn sink(&self, index: usize) -> Result<Box<dyn Sink + Send>, TaskError>;

    /// Attach the downstream change sink consumed by the next `run`.
    fn set_change_sink(&mut self, sink: Box<dyn ChangeSink + Send>);

    /// Drive the stage to completion on the calling thread.
    ///
    /// Must call `release` on the attached change sink exactly once,
    /// whether the run succeeds or fails.
    ///
    /// # Errors
    /// Implementation-defined; a failed run must leave every attached
    /// endpoint unblocked.
    fn run(&mut self) -> Result<(), TaskError>;
}
