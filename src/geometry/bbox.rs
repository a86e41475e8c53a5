use serde::{Deserialize, Serialize};

use crate::geometry::{AnchorKey, Point2, Side};

/// Line thickness used to draw boxes; anchor size derives from it.
pub const THICKNESS: f64 = 2.0;

/// Axis-aligned bounding box in TLWH format (top-left x, top-left y, width, height).
///
/// Width and height may be negative while a box is being dragged; call
/// [`Bbox::correct_negative_size`] before committing it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Bbox {
    /// Top-left x coordinate
    pub x: f64,
    /// Top-left y coordinate
    pub y: f64,
    /// Width of the bounding box
    pub width: f64,
    /// Height of the bounding box
    pub height: f64,
}

impl Bbox {
    /// Create a new Bbox from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a Bbox from corner coordinates (x1, y1, x2, y2).
    #[inline]
    pub fn from_x1y1x2y2(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// Create a Bbox centred on `center`.
    #[inline]
    pub fn from_center_size(center: Point2, width: f64, height: f64) -> Self {
        Self {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
            width,
            height,
        }
    }

    #[inline]
    pub fn to_xywh(&self) -> [f64; 4] {
        [self.x, self.y, self.width, self.height]
    }

    #[inline]
    pub fn x1y1x2y2(&self) -> [f64; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    #[inline]
    pub fn center(&self) -> Point2 {
        Point2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// A box with every component at zero stands for "no box".
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.width == 0.0 && self.height == 0.0
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.to_xywh().iter().all(|v| v.is_finite())
    }

    /// Multiply position and size by `factor`.
    pub fn scale(&mut self, factor: f64) -> &mut Self {
        self.x *= factor;
        self.y *= factor;
        self.width *= factor;
        self.height *= factor;
        self
    }

    /// Move the left edge, keeping the right edge in place.
    pub fn set_x1(&mut self, x1: f64) {
        self.width += self.x - x1;
        self.x = x1;
    }

    /// Move the top edge, keeping the bottom edge in place.
    pub fn set_y1(&mut self, y1: f64) {
        self.height += self.y - y1;
        self.y = y1;
    }

    pub fn set_x2(&mut self, x2: f64) {
        self.width = x2 - self.x;
    }

    pub fn set_y2(&mut self, y2: f64) {
        self.height = y2 - self.y;
    }

    /// Resize the box by dragging one of its anchors to `p`.
    ///
    /// Edge-midpoint anchors only move along their own axis. The result may
    /// have a negative size when an edge is dragged past its opposite.
    pub fn drag_anchor(&mut self, key: AnchorKey, p: Point2) {
        match key.horizontal() {
            Side::Start => self.set_x1(p.x),
            Side::End => self.set_x2(p.x),
            Side::Middle => {}
        }
        match key.vertical() {
            Side::Start => self.set_y1(p.y),
            Side::End => self.set_y2(p.y),
            Side::Middle => {}
        }
    }

    /// Flip negative width/height to positive, moving the origin so the
    /// covered region is unchanged.
    pub fn correct_negative_size(&mut self) {
        if self.width < 0.0 {
            self.width = -self.width;
            self.x -= self.width;
        }
        if self.height < 0.0 {
            self.height = -self.height;
            self.y -= self.height;
        }
    }

    /// The eight resize anchors, each a square of half-side `THICKNESS * factor`
    /// centred on a corner or an edge midpoint.
    pub fn anchors(&self, factor: f64) -> [(AnchorKey, Bbox); 8] {
        let [xmin, ymin, xmax, ymax] = self.x1y1x2y2();
        let mid_x = (xmin + xmax) / 2.0;
        let mid_y = (ymin + ymax) / 2.0;
        let half = THICKNESS * factor;

        AnchorKey::ALL.map(|key| {
            let cx = match key.horizontal() {
                Side::Start => xmin,
                Side::Middle => mid_x,
                Side::End => xmax,
            };
            let cy = match key.vertical() {
                Side::Start => ymin,
                Side::Middle => mid_y,
                Side::End => ymax,
            };
            (
                key,
                Bbox::from_x1y1x2y2(cx - half, cy - half, cx + half, cy + half),
            )
        })
    }

    /// Inclusive point containment.
    #[inline]
    pub fn contains(&self, p: Point2) -> bool {
        let [xmin, ymin, xmax, ymax] = self.x1y1x2y2();
        xmin <= p.x && p.x <= xmax && ymin <= p.y && p.y <= ymax
    }

    /// Pixel-inclusive overlap test: boxes sharing an edge, or closer than
    /// one pixel, intersect.
    pub fn intersects(&self, other: &Bbox) -> bool {
        let [xmin, ymin, xmax, ymax] = self.x1y1x2y2();
        let [oxmin, oymin, oxmax, oymax] = other.x1y1x2y2();
        let xa = xmin.max(oxmin);
        let ya = ymin.max(oymin);
        let xb = xmax.min(oxmax);
        let yb = ymax.min(oymax);

        (xb - xa + 1.0).max(0.0) * (yb - ya + 1.0).max(0.0) > 0.0
    }

    /// Split into four equal quadrants: NW, NE, SW, SE.
    pub fn subdivide(&self) -> [Bbox; 4] {
        let w = self.width / 2.0;
        let h = self.height / 2.0;
        [
            Bbox::new(self.x, self.y, w, h),
            Bbox::new(self.x + w, self.y, w, h),
            Bbox::new(self.x, self.y + h, w, h),
            Bbox::new(self.x + w, self.y + h, w, h),
        ]
    }
}

impl From<[f64; 4]> for Bbox {
    fn from(xywh: [f64; 4]) -> Self {
        Bbox::new(xywh[0], xywh[1], xywh[2], xywh[3])
    }
}

impl From<Bbox> for [f64; 4] {
    fn from(bbox: Bbox) -> Self {
        bbox.to_xywh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale() {
        let mut bbox = Bbox::new(10.0, 20.0, 30.0, 40.0);
        bbox.scale(0.5);
        assert_eq!(bbox, Bbox::new(5.0, 10.0, 15.0, 20.0));
        assert_eq!(bbox.scale(2.0).center(), Point2::new(25.0, 40.0));
    }

    #[test]
    fn test_bbox_conversions() {
        let bbox = Bbox::new(-5.0, -5.0, 10.0, 10.0);
        assert_eq!(bbox.to_xywh(), [-5.0, -5.0, 10.0, 10.0]);
        assert_eq!(bbox.x1y1x2y2(), [-5.0, -5.0, 5.0, 5.0]);
        assert_eq!(bbox.center(), Point2::new(0.0, 0.0));
    }

    #[test]
    fn test_from_center_size() {
        let bbox = Bbox::from_center_size(Point2::new(25.0, 40.0), 30.0, 40.0);
        assert_eq!(bbox.to_xywh(), [10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let bbox = Bbox::new(-5.0, -5.0, 1.0, 1.0);
        assert!(bbox.contains(Point2::new(-4.5, -4.5)));
        assert!(bbox.contains(Point2::new(-5.0, -4.0)));
        assert!(!bbox.contains(Point2::new(-3.9, -4.5)));
    }

    #[test]
    fn test_intersects_touching_edges() {
        let a = Bbox::new(0.0, 0.0, 10.0, 10.0);
        let touching = Bbox::new(10.0, 0.0, 5.0, 5.0);
        let near = Bbox::new(10.5, 0.0, 5.0, 5.0);
        let far = Bbox::new(20.0, 20.0, 5.0, 5.0);
        assert!(a.intersects(&touching));
        assert!(a.intersects(&near));
        assert!(!a.intersects(&far));
    }

    #[test]
    fn test_correct_negative_size() {
        let mut bbox = Bbox::new(10.0, 10.0, -4.0, -6.0);
        bbox.correct_negative_size();
        assert_eq!(bbox.to_xywh(), [6.0, 4.0, 4.0, 6.0]);

        let mut ok = Bbox::new(1.0, 2.0, 3.0, 4.0);
        ok.correct_negative_size();
        assert_eq!(ok.to_xywh(), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_drag_anchor_past_opposite_edge() {
        let mut bbox = Bbox::new(10.0, 10.0, 20.0, 20.0);
        bbox.drag_anchor(AnchorKey::LeftTop, Point2::new(40.0, 5.0));
        assert_eq!(bbox.to_xywh(), [40.0, 5.0, -10.0, 25.0]);

        bbox.correct_negative_size();
        assert_eq!(bbox.x1y1x2y2(), [30.0, 5.0, 40.0, 30.0]);
    }

    #[test]
    fn test_drag_mid_anchor_keeps_other_axis() {
        let mut bbox = Bbox::new(0.0, 0.0, 10.0, 10.0);
        bbox.drag_anchor(AnchorKey::MidBottom, Point2::new(100.0, 15.0));
        assert_eq!(bbox.to_xywh(), [0.0, 0.0, 10.0, 15.0]);

        bbox.drag_anchor(AnchorKey::RightMid, Point2::new(12.0, -50.0));
        assert_eq!(bbox.to_xywh(), [0.0, 0.0, 12.0, 15.0]);
    }

    #[test]
    fn test_anchors() {
        let bbox = Bbox::new(0.0, 0.0, 20.0, 10.0);
        let anchors = bbox.anchors(2.0);
        let (key, rect) = anchors[0];
        assert_eq!(key, AnchorKey::LeftTop);
        assert_eq!(rect.x1y1x2y2(), [-4.0, -4.0, 4.0, 4.0]);

        let (key, rect) = anchors[4];
        assert_eq!(key, AnchorKey::RightMid);
        assert_eq!(rect.center(), Point2::new(20.0, 5.0));
    }

    #[test]
    fn test_subdivide() {
        let quads = Bbox::new(0.0, 0.0, 100.0, 50.0).subdivide();
        assert_eq!(quads[0].to_xywh(), [0.0, 0.0, 50.0, 25.0]);
        assert_eq!(quads[1].to_xywh(), [50.0, 0.0, 50.0, 25.0]);
        assert_eq!(quads[2].to_xywh(), [0.0, 25.0, 50.0, 25.0]);
        assert_eq!(quads[3].to_xywh(), [50.0, 25.0, 50.0, 25.0]);
    }

    #[test]
    fn test_is_empty() {
        assert!(Bbox::default().is_empty());
        assert!(!Bbox::new(0.0, 0.0, 1.0, 0.0).is_empty());
    }
}
