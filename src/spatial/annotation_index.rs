//! Per-frame hit-testing over box anchors, box bodies and keypoints.

use crate::detection::Detection;
use crate::geometry::{AnchorKey, Bbox, Point2};
use crate::spatial::quadtree::QuadTree;

/// Scale applied to anchor sizes when indexing.
pub const ANCHOR_FACTOR: f64 = 2.0;

/// What part of an annotation a point landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    /// A resize handle of the detection's box.
    Anchor(AnchorKey),
    /// The inside of the detection's box.
    Body,
    /// The keypoint with this index.
    Keypoint(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub kind: HitKind,
    /// Index of the detection in the frame's detection list.
    pub detection_index: usize,
}

/// Three quadtrees over one frame's detections.
///
/// Box anchors and box bodies are indexed only for detections that have a
/// box and no keypoints; keypoint anchors for every visible keypoint.
/// Rebuild after every frame change or edit; the index keeps no reference
/// to the detections.
#[derive(Debug, Clone)]
pub struct AnnotationIndex {
    anchors: QuadTree<Hit>,
    bodies: QuadTree<Hit>,
    keypoints: QuadTree<Hit>,
}

impl AnnotationIndex {
    pub fn build(frame_bounds: Bbox, detections: &[Detection]) -> Self {
        let boxed = || {
            detections
                .iter()
                .enumerate()
                .filter(|(_, det)| det.has_bbox() && !det.has_keypoints())
        };

        let anchors = QuadTree::build(frame_bounds, boxed(), |(i, det)| {
            normalized(&det.bbox)
                .anchors(ANCHOR_FACTOR)
                .map(|(key, rect)| {
                    (
                        rect,
                        Hit {
                            kind: HitKind::Anchor(key),
                            detection_index: i,
                        },
                    )
                })
        });

        let bodies = QuadTree::build(frame_bounds, boxed(), |(i, det)| {
            [(
                normalized(&det.bbox),
                Hit {
                    kind: HitKind::Body,
                    detection_index: i,
                },
            )]
        });

        let keypoints = QuadTree::build(frame_bounds, detections.iter().enumerate(), |(i, det)| {
            det.keypoints
                .anchors(ANCHOR_FACTOR)
                .into_iter()
                .map(move |(k, rect)| {
                    (
                        rect,
                        Hit {
                            kind: HitKind::Keypoint(k),
                            detection_index: i,
                        },
                    )
                })
        });

        Self {
            anchors,
            bodies,
            keypoints,
        }
    }

    /// Resolve `p` with the editor's precedence: box anchor, then box body,
    /// then keypoint.
    pub fn find(&self, p: Point2) -> Option<Hit> {
        self.find_anchor(p)
            .or_else(|| self.find_body(p))
            .or_else(|| self.find_keypoint(p))
    }

    pub fn find_anchor(&self, p: Point2) -> Option<Hit> {
        self.anchors.find(p).copied()
    }

    pub fn find_body(&self, p: Point2) -> Option<Hit> {
        self.bodies.find(p).copied()
    }

    pub fn find_keypoint(&self, p: Point2) -> Option<Hit> {
        self.keypoints.find(p).copied()
    }

    pub fn anchors(&self) -> &QuadTree<Hit> {
        &self.anchors
    }

    pub fn bodies(&self) -> &QuadTree<Hit> {
        &self.bodies
    }

    pub fn keypoints(&self) -> &QuadTree<Hit> {
        &self.keypoints
    }
}

fn normalized(bbox: &Bbox) -> Bbox {
    let mut bbox = *bbox;
    bbox.correct_negative_size();
    bbox
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Keypoints;

    fn frame_bounds() -> Bbox {
        Bbox::new(0.0, 0.0, 640.0, 480.0)
    }

    #[test]
    fn test_anchor_beats_body() {
        let dets = vec![Detection::from_bbox(0, Bbox::new(100.0, 100.0, 50.0, 50.0))];
        let index = AnnotationIndex::build(frame_bounds(), &dets);

        assert_eq!(
            index.find(Point2::new(101.0, 101.0)),
            Some(Hit {
                kind: HitKind::Anchor(AnchorKey::LeftTop),
                detection_index: 0
            })
        );
        assert_eq!(
            index.find(Point2::new(125.0, 150.0)).map(|h| h.kind),
            Some(HitKind::Anchor(AnchorKey::MidBottom))
        );
        assert_eq!(
            index.find(Point2::new(120.0, 120.0)).map(|h| h.kind),
            Some(HitKind::Body)
        );
        assert_eq!(index.find(Point2::new(300.0, 300.0)), None);
    }

    #[test]
    fn test_keypoint_detections_skip_box_trees() {
        let pose = Detection {
            bbox: Bbox::new(10.0, 10.0, 100.0, 100.0),
            keypoints: Keypoints::new(vec![50.0, 50.0, 1.0, 70.0, 70.0, 0.0]).unwrap(),
            ..Detection::default()
        };
        let boxed = Detection::from_bbox(0, Bbox::new(300.0, 300.0, 20.0, 20.0));
        let index = AnnotationIndex::build(frame_bounds(), &[pose, boxed]);

        assert_eq!(index.anchors().len(), 8);
        assert_eq!(index.bodies().len(), 1);
        assert_eq!(index.keypoints().len(), 1);

        assert_eq!(
            index.find(Point2::new(51.0, 49.0)),
            Some(Hit {
                kind: HitKind::Keypoint(0),
                detection_index: 0
            })
        );
        // Invisible keypoint and the pose box itself are not hit targets.
        assert_eq!(index.find(Point2::new(70.0, 70.0)), None);
        assert_eq!(index.find(Point2::new(30.0, 90.0)), None);
        assert_eq!(
            index.find(Point2::new(310.0, 310.0)),
            Some(Hit {
                kind: HitKind::Body,
                detection_index: 1
            })
        );
    }

    #[test]
    fn test_negative_size_box_is_indexed_normalized() {
        let dets = vec![Detection::from_bbox(0, Bbox::new(200.0, 200.0, -50.0, -50.0))];
        let index = AnnotationIndex::build(frame_bounds(), &dets);
        assert_eq!(
            index.find_body(Point2::new(175.0, 175.0)).map(|h| h.detection_index),
            Some(0)
        );
    }

    #[test]
    fn test_many_boxes() {
        let dets: Vec<Detection> = (0..40)
            .map(|i| {
                let x = (i % 8) as f64 * 80.0 + 10.0;
                let y = (i / 8) as f64 * 90.0 + 10.0;
                Detection::from_bbox(0, Bbox::new(x, y, 40.0, 40.0))
            })
            .collect();
        let index = AnnotationIndex::build(frame_bounds(), &dets);
        assert!(index.anchors().node_count() > 1);
        for (i, det) in dets.iter().enumerate() {
            let hit = index.find(det.bbox.center()).unwrap();
            assert_eq!(hit.kind, HitKind::Body);
            assert_eq!(hit.detection_index, i);
        }
    }
}
