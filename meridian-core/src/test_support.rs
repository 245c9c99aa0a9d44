//! Test-only recording endpoints used by unit and behaviour tests.

use std::sync::{Arc, Mutex, PoisonError};

use crate::{ChangeContainer, ChangeSink, EntityContainer, Sink, TaskError};

/// Observations shared between a recording endpoint and the test body.
#[derive(Debug)]
struct Recorded<T> {
    items: Vec<T>,
    completions: usize,
    releases: usize,
}

impl<T> Default for Recorded<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            completions: 0,
            releases: 0,
        }
    }
}

#[derive(Debug)]
struct Recorder<T> {
    state: Arc<Mutex<Recorded<T>>>,
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self {
            state: Arc::default(),
        }
    }
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Clone> Recorder<T> {
    fn with<R>(&self, f: impl FnOnce(&mut Recorded<T>) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    fn items(&self) -> Vec<T> {
        self.with(|state| state.items.clone())
    }

    fn completions(&self) -> usize {
        self.with(|state| state.completions)
    }

    fn releases(&self) -> usize {
        self.with(|state| state.releases)
    }
}

/// [`Sink`] implementation recording everything it observes.
///
/// Clones share state, so a test can keep one handle while the pipeline
/// owns another.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    recorder: Recorder<EntityContainer>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entities processed so far, in arrival order.
    #[must_use]
    pub fn entities(&self) -> Vec<EntityContainer> {
        self.recorder.items()
    }

    /// Number of `complete` calls observed.
    #[must_use]
    pub fn completions(&self) -> usize {
        self.recorder.completions()
    }

    /// Number of `release` calls observed.
    #[must_use]
    pub fn releases(&self) -> usize {
        self.recorder.releases()
    }
}

impl Sink for RecordingSink {
    fn process(&mut self, entity: EntityContainer) -> Result<(), TaskError> {
        self.recorder.with(|state| state.items.push(entity));
        Ok(())
    }

    fn complete(&mut self) -> Result<(), TaskError> {
        self.recorder.with(|state| state.completions += 1);
        Ok(())
    }

    fn release(&mut self) {
        self.recorder.with(|state| state.releases += 1);
    }
}

/// [`ChangeSink`] implementation recording everything it observes.
#[derive(Debug, Default, Clone)]
pub struct RecordingChangeSink {
    recorder: Recorder<ChangeContainer>,
}

impl RecordingChangeSink {
    /// Create an empty recording change sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes processed so far, in arrival order.
    #[must_use]
    pub fn changes(&self) -> Vec<ChangeContainer> {
        self.recorder.items()
    }

    /// Number of `complete` calls observed.
    #[must_use]
    pub fn completions(&self) -> usize {
        self.recorder.completions()
    }

    /// Number of `release` calls observed.
    #[must_use]
    pub fn releases(&self) -> usize {
        self.recorder.releases()
    }
}

impl ChangeSink for RecordingChangeSink {
    fn process(&mut self, change: ChangeContainer) -> Result<(), TaskError> {
        self.recorder.with(|state| state.items.push(change));
        Ok(())
    }

    fn complete(&mut self) -> Result<(), TaskError> {
        self.recorder.with(|state| state.completions += 1);
        Ok(())
    }

    fn release(&mut self) {
        self.recorder.with(|state| state.releases += 1);
    }
}

/// [`ChangeSink`] that fails every `process` call with
/// [`TaskError::StageFailed`], for exercising failure paths.
#[derive(Debug, Default, Clone)]
pub struct FailingChangeSink {
    recorder: Recorder<ChangeContainer>,
}

impl FailingChangeSink {
    /// Create a failing change sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `complete` calls observed.
    #[must_use]
    pub fn completions(&self) -> usize {
        self.recorder.completions()
    }

    /// Number of `release` calls observed.
    #[must_use]
    pub fn releases(&self) -> usize {
        self.recorder.releases()
    }
}

impl ChangeSink for FailingChangeSink {
    fn process(&mut self, _change: ChangeContainer) -> Result<(), TaskError> {
        Err(TaskError::StageFailed)
    }

    fn complete(&mut self) -> Result<(), TaskError> {
        self.recorder.with(|state| state.completions += 1);
        Ok(())
    }

    fn release(&mut self) {
        self.recorder.with(|state| state.releases += 1);
    }
}
