use std::collections::HashMap;

use log::trace;

use crate::detection::FrameSequence;
use crate::error::Result;
use crate::postprocess::{position, trajectories};

/// Merge trajectories that were wrongly split across consecutive frames.
///
/// When an identity ends at frame `e` and another starts at `e + 1` closer
/// than `joint_distance`, the newer one is linked to the older one. Links are
/// followed transitively (A <- B, B <- C puts C on A), each newer identity is
/// absorbed at most once, and surviving identities are renumbered from 0 in
/// order of first appearance.
///
/// Returns the number of identities absorbed.
pub fn merge_trajectories(frames: &mut FrameSequence, joint_distance: f64) -> Result<usize> {
    let trajs = trajectories(frames);

    let mut starts = Vec::with_capacity(trajs.len());
    let mut ends = Vec::with_capacity(trajs.len());
    for traj in &trajs {
        let last = traj.last_frame();
        let end_member = traj
            .members
            .iter()
            .copied()
            .find(|&(frame, _)| frame == last)
            .unwrap_or(traj.members[0]);
        starts.push(position(frames, traj.members[0])?);
        ends.push(position(frames, end_member)?);
    }

    // (older, newer)
    let mut links: Vec<(u64, u64)> = Vec::new();
    for (a, traj) in trajs.iter().enumerate() {
        let next_frame = traj.last_frame() + 1;
        for (b, other) in trajs.iter().enumerate() {
            if a == b || other.first_frame() != next_frame {
                continue;
            }
            if nalgebra::distance(&ends[a], &starts[b]) < joint_distance {
                links.push((traj.track_id, other.track_id));
            }
        }
    }

    let mut heads: Vec<u64> = links.iter().map(|&(older, _)| older).collect();
    heads.sort_unstable();
    heads.dedup();

    let mut parent: HashMap<u64, u64> = HashMap::new();
    for head in heads {
        if parent.contains_key(&head) {
            continue;
        }
        let mut current = head;
        while let Some(&(_, newer)) = links
            .iter()
            .find(|&&(older, newer)| older == current && !parent.contains_key(&newer))
        {
            trace!("splicing track {newer} onto track {head}");
            parent.insert(newer, head);
            current = newer;
        }
    }

    // Parents always start earlier than their children, so this terminates.
    let root = |mut id: u64| {
        while let Some(&p) = parent.get(&id) {
            id = p;
        }
        id
    };

    let mut renumbered: HashMap<u64, u64> = HashMap::new();
    for det in frames.iter_mut().flatten() {
        let merged = root(det.track_id);
        let next = renumbered.len() as u64;
        det.track_id = *renumbered.entry(merged).or_insert(next);
    }

    Ok(parent.len())
}
