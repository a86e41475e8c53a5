//! Annotation record shared by the tracker and the spatial index.

use serde::{Deserialize, Serialize};

use crate::geometry::{Bbox, Keypoints, Point2, Polygon};

/// Ordered per-frame detection lists; the index is the frame number.
pub type FrameSequence = Vec<Vec<Detection>>;

/// Anything the tracker can follow must expose a 2-D position.
pub trait Centroid {
    /// Position used for distance computation, or `None` when the entity has
    /// no usable geometry.
    fn centroid(&self) -> Option<Point2>;

    /// Whether every coordinate the entity carries is finite, including
    /// geometry the centroid does not use.
    fn is_geometry_finite(&self) -> bool {
        true
    }
}

/// One annotated object in one frame.
///
/// Detections are plain values: interactive edits work on a clone and write
/// it back, so an aborted edit leaves the stored frame untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class_id: u32,
    pub track_id: u64,
    #[serde(default)]
    pub bbox: Bbox,
    #[serde(default)]
    pub polygon: Polygon,
    #[serde(default)]
    pub keypoints: Keypoints,
    /// Synthesized by gap interpolation rather than annotated or detected.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub inferred: bool,
}

impl Detection {
    /// Box-only detection with track id 0.
    pub fn from_bbox(class_id: u32, bbox: Bbox) -> Self {
        Self {
            class_id,
            bbox,
            ..Self::default()
        }
    }

    pub fn has_bbox(&self) -> bool {
        !self.bbox.is_empty()
    }

    pub fn has_keypoints(&self) -> bool {
        !self.keypoints.is_empty()
    }
}

impl Centroid for Detection {
    /// Box centre; falls back to the visible keypoints, then the polygon.
    fn centroid(&self) -> Option<Point2> {
        if self.has_bbox() {
            Some(self.bbox.center())
        } else if let Some(p) = self.keypoints.centroid() {
            Some(p)
        } else {
            self.polygon.centroid()
        }
    }

    fn is_geometry_finite(&self) -> bool {
        self.bbox.is_finite() && self.keypoints.is_finite() && self.polygon.is_finite()
    }
}

impl Centroid for Bbox {
    fn centroid(&self) -> Option<Point2> {
        Some(self.center())
    }

    fn is_geometry_finite(&self) -> bool {
        self.is_finite()
    }
}

impl Centroid for Point2 {
    fn centroid(&self) -> Option<Point2> {
        Some(*self)
    }
}
