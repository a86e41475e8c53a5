//! Integration module for connecting annotation stores with the tracker.
//!
//! This module provides the store trait, a run driver with cooperative
//! cancellation and progress events, and a registry that keeps one run per
//! video.

mod builder;
mod pipeline;
mod registry;
mod store;

pub use builder::DetectionBuilder;
pub use pipeline::{RunEvent, RunOutcome, StopHandle, TrackingRun};
pub use registry::{RunGuard, RunRegistry};
pub use store::{AnnotationStore, MemoryStore, MemoryStoreError};
