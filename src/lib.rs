//! Facade crate for the Meridian streaming ETL engine.
//!
//! Re-exports the entity model and task contracts from `meridian-core` and
//! the streaming stages from `meridian-pipeline`, so most callers depend on
//! this crate alone.

#![forbid(unsafe_code)]

pub use meridian_core::{
    ChangeAction, ChangeContainer, ChangeSink, Connector, EntityContainer, EntityProcessor,
    EntityType, Path, Point, RunnableChangeSource, Sink, Tags, TaskError,
};
pub use meridian_pipeline::{
    BoundingBoxFilter, ChangeDeriver, DataPostbox, EntitySorter, PostboxSink,
};
