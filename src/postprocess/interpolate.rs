use log::trace;

use crate::detection::{Detection, FrameSequence};
use crate::error::Result;
use crate::geometry::{Bbox, Point2};
use crate::postprocess::{position, trajectories};
use crate::tracker::TrackerConfig;

/// Gaps closing after this many real detections are skipped when the box
/// before the gap touches the image border: the object left the frame.
const BORDER_CHECK_AFTER: usize = 10;

/// Fill missing frames inside each trajectory by linear interpolation of the
/// centre position.
///
/// Offsets are truncated to whole pixels. Synthesized detections are marked
/// `inferred`, keep the size of the detection before the gap and copy class
/// and identity from the nearer real detection. Returns the number inserted.
pub fn linear_interpolation(frames: &mut FrameSequence, config: &TrackerConfig) -> Result<usize> {
    let mut inserted: Vec<(usize, Detection)> = Vec::new();
    let view: &[Vec<Detection>] = frames;

    for traj in trajectories(view) {
        let span = traj.last_frame() - traj.first_frame() + 1;
        let present = traj.per_frame();
        if present.len() == span {
            continue;
        }

        for (k, pair) in present.windows(2).enumerate() {
            let (pre, next) = (pair[0], pair[1]);
            let (pre_frame, next_frame) = (pre.0, next.0);
            if next_frame == pre_frame + 1 {
                continue;
            }

            let pre_det = &view[pre_frame][pre.1];
            let next_det = &view[next_frame][next.1];
            let start = position(view, pre)?;
            let end = position(view, next)?;

            // Detections without a box are tested by their centroid.
            let extent = if pre_det.has_bbox() {
                pre_det.bbox
            } else {
                Bbox::new(start.x, start.y, 0.0, 0.0)
            };
            // k + 1 is the position of `next` within the trajectory.
            if k + 1 > BORDER_CHECK_AFTER && near_border(&extent, config) {
                trace!(
                    "track {}: gap {pre_frame}..{next_frame} starts at the border, not filled",
                    traj.track_id
                );
                continue;
            }

            let dx = end.x - start.x;
            let dy = end.y - start.y;
            let gap = (next_frame - pre_frame) as f64;

            for p in pre_frame + 1..next_frame {
                let ratio = (p - pre_frame) as f64 / gap;
                let center = Point2::new(
                    start.x + (dx * ratio).trunc(),
                    start.y + (dy * ratio).trunc(),
                );
                let nearer = if p - pre_frame <= next_frame - p {
                    pre_det
                } else {
                    next_det
                };
                inserted.push((
                    p,
                    Detection {
                        class_id: nearer.class_id,
                        track_id: nearer.track_id,
                        bbox: Bbox::from_center_size(center, pre_det.bbox.width, pre_det.bbox.height),
                        inferred: true,
                        ..Detection::default()
                    },
                ));
            }
        }
    }

    let count = inserted.len();
    for (frame, det) in inserted {
        frames[frame].push(det);
    }
    Ok(count)
}

/// Whether any edge of `bbox` lies within `border_offset` of the image border.
fn near_border(bbox: &Bbox, config: &TrackerConfig) -> bool {
    let mut bbox = *bbox;
    bbox.correct_negative_size();
    let [x1, y1, x2, y2] = bbox.x1y1x2y2();
    let offset = config.border_offset;
    x1 <= offset
        || y1 <= offset
        || x2 >= config.frame_width - offset
        || y2 >= config.frame_height - offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Keypoints;
    use crate::postprocess::test_support::det;

    #[test]
    fn test_fills_gap_with_truncated_positions() {
        let mut frames = vec![
            vec![det(0, 1, 100.0, 100.0)],
            vec![],
            vec![],
            vec![det(0, 1, 110.0, 90.0)],
        ];
        let inserted = linear_interpolation(&mut frames, &TrackerConfig::default()).unwrap();
        assert_eq!(inserted, 2);

        let a = &frames[1][0];
        assert!(a.inferred);
        assert_eq!(a.track_id, 0);
        assert_eq!(a.bbox.center(), Point2::new(103.0, 97.0));
        assert_eq!((a.bbox.width, a.bbox.height), (10.0, 10.0));

        let b = &frames[2][0];
        assert_eq!(b.bbox.center(), Point2::new(106.0, 94.0));
    }

    #[test]
    fn test_class_from_nearer_detection() {
        let mut frames = vec![
            vec![det(0, 1, 100.0, 100.0)],
            vec![],
            vec![],
            vec![],
            vec![det(0, 2, 140.0, 100.0)],
        ];
        linear_interpolation(&mut frames, &TrackerConfig::default()).unwrap();
        assert_eq!(frames[1][0].class_id, 1);
        assert_eq!(frames[2][0].class_id, 1);
        assert_eq!(frames[3][0].class_id, 2);
    }

    #[test]
    fn test_complete_trajectory_untouched() {
        let mut frames = vec![vec![det(0, 0, 100.0, 100.0)], vec![det(0, 0, 101.0, 100.0)]];
        assert_eq!(linear_interpolation(&mut frames, &TrackerConfig::default()).unwrap(), 0);
        assert_eq!(frames[0].len() + frames[1].len(), 2);
    }

    #[test]
    fn test_border_gap_skipped_for_established_track() {
        // Twelve frames hugging the left border, then a gap.
        let mut frames: FrameSequence = (0..12).map(|i| vec![det(0, 0, 10.0, 100.0 + i as f64)]).collect();
        frames.push(vec![]);
        frames.push(vec![det(0, 0, 10.0, 120.0)]);
        assert_eq!(linear_interpolation(&mut frames, &TrackerConfig::default()).unwrap(), 0);
        assert!(frames[12].is_empty());

        // The same gap early in a young track is filled.
        let mut frames = vec![
            vec![det(0, 0, 10.0, 100.0)],
            vec![],
            vec![det(0, 0, 10.0, 104.0)],
        ];
        assert_eq!(linear_interpolation(&mut frames, &TrackerConfig::default()).unwrap(), 1);
    }

    #[test]
    fn test_boxless_trajectory_uses_centroid_for_border() {
        let pose = |x: f64, y: f64| Detection {
            keypoints: Keypoints::new(vec![x, y, 1.0]).unwrap(),
            ..Detection::default()
        };

        // Twelve frames in the middle of the image, then a gap.
        let mut frames: FrameSequence = (0..12).map(|i| vec![pose(1000.0, 800.0 + i as f64)]).collect();
        frames.push(vec![]);
        frames.push(vec![pose(1000.0, 820.0)]);
        assert_eq!(linear_interpolation(&mut frames, &TrackerConfig::default()).unwrap(), 1);
        assert_eq!(frames[12][0].bbox.center(), Point2::new(1000.0, 815.0));

        // The same trajectory hugging the left border is not filled.
        let mut frames: FrameSequence = (0..12).map(|i| vec![pose(10.0, 800.0 + i as f64)]).collect();
        frames.push(vec![]);
        frames.push(vec![pose(10.0, 820.0)]);
        assert_eq!(linear_interpolation(&mut frames, &TrackerConfig::default()).unwrap(), 0);
    }
}
