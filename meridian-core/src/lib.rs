//! Core domain types and task contracts for the Meridian ETL engine.
//!
//! Responsibilities:
//! - Define the entity data model (points, connectors, paths) and the
//!   container used to dispatch entities to variant-specific handlers.
//! - Define the change model emitted by derivation stages.
//! - Define the task contracts ([`Sink`], [`ChangeSink`],
//!   [`RunnableChangeSource`]) that let stages compose into pipelines.
//!
//! Boundaries:
//! - No concurrency lives here; handoff queues and runnable stages are the
//!   concern of `meridian-pipeline`.
//! - No serialization formats; the optional `serde` feature only derives
//!   traits so collaborator crates can persist or transport entities.

#![forbid(unsafe_code)]

mod change;
mod connector;
mod container;
mod path;
mod point;
mod task;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use change::{ChangeAction, ChangeContainer};
pub use connector::Connector;
pub use container::{EntityContainer, EntityProcessor, EntityType};
pub use path::Path;
pub use point::Point;
pub use task::{ChangeSink, RunnableChangeSource, Sink, TaskError};

use std::collections::HashMap;

/// OpenStreetMap-style free-form tags. Insertion order carries no meaning.
pub type Tags = HashMap<String, String>;
