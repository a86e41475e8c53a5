//! Identity assignment and spatial hit-testing for video annotation.
//!
//! Two independent subsystems share the [`Detection`] data model:
//!
//! - [`tracker`] turns per-frame, unlabelled detections into temporally
//!   consistent track ids using a two-pass Hungarian assignment with an
//!   occlusion buffer, and [`postprocess`] cleans the resulting trajectories.
//! - [`spatial`] builds quadtrees over the displayed frame so a pointer
//!   position resolves to a box anchor, box body or keypoint without a
//!   linear scan.
//!
//! [`integration`] drives a tracking run against an external annotation store.
//!
//! # Example
//!
//! ```ignore
//! use annotrack::{Bbox, Detection, TrackerConfig, track};
//!
//! let mut frames = vec![
//!     vec![Detection::from_bbox(0, Bbox::new(0.0, 0.0, 10.0, 10.0))],
//!     vec![Detection::from_bbox(0, Bbox::new(2.0, 2.0, 10.0, 10.0))],
//! ];
//! track(&mut frames, &TrackerConfig::default())?;
//! assert_eq!(frames[1][0].track_id, 0);
//! ```

pub mod detection;
pub mod error;
pub mod geometry;
pub mod integration;
pub mod postprocess;
pub mod spatial;
pub mod tracker;

pub use detection::{Centroid, Detection, FrameSequence};
pub use error::{Error, Result};
pub use geometry::{AnchorKey, Bbox, Keypoints, Point2, Polygon};
pub use integration::{
    AnnotationStore, DetectionBuilder, MemoryStore, RunEvent, RunGuard, RunOutcome, RunRegistry,
    StopHandle, TrackingRun,
};
pub use spatial::{AnnotationIndex, Hit, HitKind, QuadTree};
pub use tracker::{HungarianTracker, TrackerConfig, track};
