//! Batch passes over a tracked sequence: trajectory splicing, class voting
//! and gap interpolation.

mod interpolate;
mod splice;
mod vote;

pub use interpolate::linear_interpolation;
pub use splice::merge_trajectories;
pub use vote::majority_vote_class;

use std::collections::HashMap;

use log::debug;

use crate::detection::{Centroid, Detection, FrameSequence};
use crate::error::{Error, Result};
use crate::geometry::Point2;
use crate::tracker::TrackerConfig;

/// Run the passes enabled in `config`. Splicing always runs; voting and
/// interpolation follow `class_infer` and `linear_infer`.
pub fn apply(frames: &mut FrameSequence, config: &TrackerConfig) -> Result<()> {
    config.validate()?;

    let merged = merge_trajectories(frames, config.joint_distance)?;
    debug!("spliced {merged} trajectories");

    if config.class_infer {
        let changed = majority_vote_class(frames);
        debug!("class vote changed {changed} detections");
    }

    if config.linear_infer {
        let inserted = linear_interpolation(frames, config)?;
        debug!("interpolated {inserted} detections");
    }

    Ok(())
}

/// Detections sharing one track id, as `(frame, index)` pairs in frame order.
#[derive(Debug, Clone)]
pub(crate) struct Trajectory {
    pub track_id: u64,
    pub members: Vec<(usize, usize)>,
}

impl Trajectory {
    pub fn first_frame(&self) -> usize {
        self.members[0].0
    }

    pub fn last_frame(&self) -> usize {
        self.members[self.members.len() - 1].0
    }

    /// First member in each frame, for identities that appear twice in a frame.
    pub fn per_frame(&self) -> Vec<(usize, usize)> {
        let mut out: Vec<(usize, usize)> = Vec::with_capacity(self.members.len());
        for &(frame, index) in &self.members {
            if out.last().is_none_or(|&(f, _)| f != frame) {
                out.push((frame, index));
            }
        }
        out
    }
}

/// Group detections by track id, ordered by first appearance.
pub(crate) fn trajectories(frames: &[Vec<Detection>]) -> Vec<Trajectory> {
    let mut slots: HashMap<u64, usize> = HashMap::new();
    let mut out: Vec<Trajectory> = Vec::new();
    for (frame, detections) in frames.iter().enumerate() {
        for (index, det) in detections.iter().enumerate() {
            let slot = *slots.entry(det.track_id).or_insert_with(|| {
                out.push(Trajectory {
                    track_id: det.track_id,
                    members: Vec::new(),
                });
                out.len() - 1
            });
            out[slot].members.push((frame, index));
        }
    }
    out
}

pub(crate) fn position(frames: &[Vec<Detection>], (frame, index): (usize, usize)) -> Result<Point2> {
    match frames[frame][index].centroid() {
        Some(p) if p.x.is_finite() && p.y.is_finite() => Ok(p),
        _ => Err(Error::data(frame, index, "missing centroid")),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::detection::Detection;
    use crate::geometry::{Bbox, Point2};

    /// 10x10 box centred on `(x, y)`.
    pub fn det(track_id: u64, class_id: u32, x: f64, y: f64) -> Detection {
        Detection {
            track_id,
            ..Detection::from_bbox(class_id, Bbox::from_center_size(Point2::new(x, y), 10.0, 10.0))
        }
    }

    pub fn ids(frames: &[Vec<Detection>]) -> Vec<Vec<u64>> {
        frames
            .iter()
            .map(|f| f.iter().map(|d| d.track_id).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::det;
    use super::*;

    #[test]
    fn test_trajectories_in_first_appearance_order() {
        let frames = vec![
            vec![det(4, 0, 0.0, 0.0)],
            vec![det(1, 0, 0.0, 0.0), det(4, 0, 1.0, 0.0)],
            vec![det(4, 0, 2.0, 0.0)],
        ];
        let trajs = trajectories(&frames);
        assert_eq!(trajs.len(), 2);
        assert_eq!(trajs[0].track_id, 4);
        assert_eq!(trajs[0].members, vec![(0, 0), (1, 1), (2, 0)]);
        assert_eq!(trajs[0].last_frame(), 2);
        assert_eq!(trajs[1].track_id, 1);
        assert_eq!(trajs[1].first_frame(), 1);
    }

    #[test]
    fn test_apply_respects_flags() {
        let mut frames = vec![
            vec![det(0, 1, 500.0, 500.0)],
            vec![det(0, 2, 505.0, 500.0)],
            vec![det(0, 2, 510.0, 500.0)],
            vec![],
            vec![det(0, 2, 520.0, 500.0)],
        ];
        let config = TrackerConfig {
            class_infer: false,
            linear_infer: false,
            ..TrackerConfig::default()
        };
        apply(&mut frames, &config).unwrap();
        assert!(frames[3].is_empty());
        assert_eq!(frames[0][0].class_id, 1);

        apply(&mut frames, &TrackerConfig::default()).unwrap();
        assert_eq!(frames[3].len(), 1);
        assert!(frames[3][0].inferred);
        assert!(frames.iter().flatten().all(|d| d.class_id == 2));
    }
}
