//! Geometry value types for annotations: boxes, polygons and keypoints.

mod anchor;
mod bbox;
mod keypoints;
mod polygon;

pub use anchor::{AnchorKey, Side};
pub use bbox::{Bbox, THICKNESS};
pub use keypoints::Keypoints;
pub use polygon::Polygon;

/// 2-D point in image pixel coordinates.
pub type Point2 = nalgebra::Point2<f64>;
