//! Spatial indexing for interactive hit-testing of annotations.

mod annotation_index;
mod quadtree;

pub use annotation_index::{ANCHOR_FACTOR, AnnotationIndex, Hit, HitKind};
pub use quadtree::{MAX_DEPTH, MAX_PER_NODE, QuadTree};
