//! Streaming pipeline stages for the Meridian ETL engine.
//!
//! Responsibilities:
//! - Bridge independently-running producer and consumer stages through
//!   bounded handoff queues with completion and error signalling.
//! - Derive change streams by merge-joining two ordered entity streams.
//! - Filter entity streams to a geographic bounding box while preserving
//!   referential integrity between points, connectors and paths.
//! - Re-establish the stream ordering the deriver depends on.
//!
//! Boundaries:
//! - Entity and change types, plus the task contracts stages implement,
//!   live in `meridian-core`.
//! - Pipeline wiring, serialization formats and CLI surface are caller
//!   concerns; stages only see sinks and sequences.

#![forbid(unsafe_code)]

mod derive;
mod filter;
mod postbox;
mod sort;

pub use derive::ChangeDeriver;
pub use filter::BoundingBoxFilter;
pub use postbox::{DataPostbox, PostboxSink};
pub use sort::EntitySorter;
