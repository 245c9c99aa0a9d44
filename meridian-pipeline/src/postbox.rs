//! Bounded handoff queues bridging producer and consumer stages.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use meridian_core::{EntityContainer, Sink, TaskError};

/// Queue state guarded by the postbox mutex.
#[derive(Debug)]
struct PostboxState<T> {
    buffer: VecDeque<T>,
    completed: bool,
    released: bool,
    failed: bool,
}

impl<T> PostboxState<T> {
    fn check_failure(&self) -> Result<(), TaskError> {
        if self.failed {
            return Err(TaskError::StageFailed);
        }
        if self.released {
            return Err(TaskError::Released);
        }
        Ok(())
    }
}

/// Single-producer/single-consumer bounded buffer with blocking transfer
/// and explicit completion, error and release signalling.
///
/// A postbox decouples a producer stage's emission rate from a consumer
/// stage's processing rate within a fixed memory bound. [`DataPostbox::put`]
/// blocks while the buffer is full (backpressure on the producer) and
/// [`DataPostbox::next`] blocks while it is empty and not yet complete
/// (backpressure on the consumer). Exactly one of normal drain to
/// completion, error, or release terminates the queue, and no operation
/// blocks indefinitely after termination.
///
/// The queue is shared as `Arc<DataPostbox<T>>` between one producer and
/// one consumer; items transfer in FIFO order.
///
/// # Examples
/// ```
/// use meridian_pipeline::DataPostbox;
///
/// # fn main() -> Result<(), meridian_core::TaskError> {
/// let postbox = DataPostbox::new(4)?;
/// postbox.put(1)?;
/// postbox.put(2)?;
/// postbox.complete();
///
/// assert_eq!(postbox.next()?, Some(1));
/// assert_eq!(postbox.next()?, Some(2));
/// assert_eq!(postbox.next()?, None);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DataPostbox<T> {
    state: Mutex<PostboxState<T>>,
    item_available: Condvar,
    space_available: Condvar,
    capacity: usize,
}

impl<T> DataPostbox<T> {
    /// Create a postbox buffering at most `capacity` items.
    ///
    /// There is no default capacity; the caller chooses its own
    /// backpressure threshold.
    ///
    /// # Errors
    /// [`TaskError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, TaskError> {
        if capacity == 0 {
            return Err(TaskError::InvalidCapacity);
        }
        Ok(Self {
            state: Mutex::new(PostboxState {
                buffer: VecDeque::with_capacity(capacity),
                completed: false,
                released: false,
                failed: false,
            }),
            item_available: Condvar::new(),
            space_available: Condvar::new(),
            capacity,
        })
    }

    // State mutation never panics, so a poisoned lock still holds a
    // consistent queue and can be recovered.
    fn lock(&self) -> MutexGuard<'_, PostboxState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an item, blocking while the buffer is full.
    ///
    /// # Errors
    /// [`TaskError::Released`] once the consumer has released the queue,
    /// [`TaskError::StageFailed`] once either side has flagged an
    /// unrecoverable failure. In both cases the item is not enqueued and
    /// the producer must stop.
    pub fn put(&self, item: T) -> Result<(), TaskError> {
        let mut state = self.lock();
        loop {
            state.check_failure()?;
            if state.buffer.len() < self.capacity {
                state.buffer.push_back(item);
                self.item_available.notify_one();
                return Ok(());
            }
            state = self
                .space_available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Remove and return the next item in FIFO order.
    ///
    /// Blocks until an item is buffered, the producer completes, or a
    /// failure is observed. `Ok(None)` means the producer completed and
    /// the buffer has drained; no further items will ever arrive.
    ///
    /// # Errors
    /// [`TaskError::StageFailed`] after a failure has been flagged,
    /// [`TaskError::Released`] after the queue has been released.
    pub fn next(&self) -> Result<Option<T>, TaskError> {
        let mut state = self.lock();
        loop {
            state.check_failure()?;
            if let Some(item) = state.buffer.pop_front() {
                self.space_available.notify_one();
                return Ok(Some(item));
            }
            if state.completed {
                return Ok(None);
            }
            state = self
                .item_available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Whether a subsequent [`DataPostbox::next`] call will yield an item.
    ///
    /// Blocks until the answer is known: an item is buffered, or the
    /// producer has completed and the buffer has drained.
    ///
    /// # Errors
    /// [`TaskError::StageFailed`] after a failure has been flagged,
    /// [`TaskError::Released`] after the queue has been released.
    pub fn has_next(&self) -> Result<bool, TaskError> {
        let mut state = self.lock();
        loop {
            state.check_failure()?;
            if !state.buffer.is_empty() {
                return Ok(true);
            }
            if state.completed {
                return Ok(false);
            }
            state = self
                .item_available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Producer signals that no further `put` calls will occur.
    ///
    /// Buffered items drain naturally before consumers observe completion.
    pub fn complete(&self) {
        let mut state = self.lock();
        state.completed = true;
        self.item_available.notify_all();
    }

    /// Flag an unrecoverable failure observed by either side.
    ///
    /// Wakes every blocked thread; all subsequent operations fail with
    /// [`TaskError::StageFailed`] instead of blocking.
    pub fn set_output_error(&self) {
        let mut state = self.lock();
        state.failed = true;
        self.item_available.notify_all();
        self.space_available.notify_all();
    }

    /// Cancel the queue from downstream, discarding buffered production.
    ///
    /// Unblocks a producer currently waiting in [`DataPostbox::put`]; its
    /// call fails with [`TaskError::Released`] rather than dropping the
    /// item silently.
    pub fn release(&self) {
        let mut state = self.lock();
        state.released = true;
        state.buffer.clear();
        self.item_available.notify_all();
        self.space_available.notify_all();
    }

    /// Maximum number of buffered items.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of items currently buffered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().buffer.len()
    }

    /// Whether the buffer currently holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().buffer.is_empty()
    }
}

/// Adapts a shared postbox into the entity [`Sink`] contract.
///
/// `process` forwards to [`DataPostbox::put`]; completion and release
/// cross the thread boundary through the queue's lifecycle flags. Each
/// sink is the exclusive producer handle for its queue.
#[derive(Debug)]
pub struct PostboxSink {
    postbox: Arc<DataPostbox<EntityContainer>>,
}

impl PostboxSink {
    /// Wrap a postbox endpoint.
    #[must_use]
    pub fn new(postbox: Arc<DataPostbox<EntityContainer>>) -> Self {
        Self { postbox }
    }
}

impl Sink for PostboxSink {
    fn process(&mut self, entity: EntityContainer) -> Result<(), TaskError> {
        self.postbox.put(entity)
    }

    fn complete(&mut self) -> Result<(), TaskError> {
        self.postbox.complete();
        Ok(())
    }

    fn release(&mut self) {
        self.postbox.release();
    }
}
