//! Builder for creating Detection objects from various input formats.

use crate::detection::Detection;
use crate::error::Result;
use crate::geometry::{Bbox, Keypoints, Polygon};

/// Builder for creating `Detection` objects from detector or store output.
#[derive(Debug, Clone, Default)]
pub struct DetectionBuilder {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    class_id: u32,
    track_id: u64,
    keypoints: Vec<f64>,
    outline: bool,
}

impl DetectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        self.x1 = x1;
        self.y1 = y1;
        self.x2 = x2;
        self.y2 = y2;
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f64, cy: f64, w: f64, h: f64) -> Self {
        self.x1 = cx - w / 2.0;
        self.y1 = cy - h / 2.0;
        self.x2 = cx + w / 2.0;
        self.y2 = cy + h / 2.0;
        self
    }

    /// Set bounding box in TLWH format (left, top, width, height).
    pub fn tlwh(mut self, l: f64, t: f64, w: f64, h: f64) -> Self {
        self.x1 = l;
        self.y1 = t;
        self.x2 = l + w;
        self.y2 = t + h;
        self
    }

    pub fn class_id(mut self, class_id: u32) -> Self {
        self.class_id = class_id;
        self
    }

    pub fn track_id(mut self, track_id: u64) -> Self {
        self.track_id = track_id;
        self
    }

    /// Flat `x, y, visibility` triplets.
    pub fn keypoints(mut self, coords: Vec<f64>) -> Self {
        self.keypoints = coords;
        self
    }

    /// Also store the box outline as the detection's polygon.
    pub fn polygon_from_bbox(mut self) -> Self {
        self.outline = true;
        self
    }

    /// Build the final `Detection`. Fails if the keypoint list is not made
    /// of whole triplets.
    pub fn build(self) -> Result<Detection> {
        let bbox = Bbox::from_x1y1x2y2(self.x1, self.y1, self.x2, self.y2);
        let polygon = if self.outline {
            Polygon::from_bbox(&bbox)
        } else {
            Polygon::default()
        };
        Ok(Detection {
            class_id: self.class_id,
            track_id: self.track_id,
            bbox,
            polygon,
            keypoints: Keypoints::new(self.keypoints)?,
            inferred: false,
        })
    }
}
