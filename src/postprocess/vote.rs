use crate::detection::FrameSequence;
use crate::postprocess::trajectories;

/// Give every detection of an identity that identity's most frequent class.
/// Ties go to the class encountered first in frame order.
///
/// Returns the number of detections whose class changed.
pub fn majority_vote_class(frames: &mut FrameSequence) -> usize {
    let mut changed = 0;
    for traj in trajectories(frames) {
        // (class, votes) in first-encountered order
        let mut tally: Vec<(u32, usize)> = Vec::new();
        for &(frame, index) in &traj.members {
            let class_id = frames[frame][index].class_id;
            match tally.iter_mut().find(|(c, _)| *c == class_id) {
                Some((_, votes)) => *votes += 1,
                None => tally.push((class_id, 1)),
            }
        }

        let mut winner = tally[0];
        for &candidate in &tally[1..] {
            if candidate.1 > winner.1 {
                winner = candidate;
            }
        }

        for &(frame, index) in &traj.members {
            let det = &mut frames[frame][index];
            if det.class_id != winner.0 {
                det.class_id = winner.0;
                changed += 1;
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::postprocess::test_support::det;

    fn classes(frames: &FrameSequence) -> Vec<Vec<u32>> {
        frames
            .iter()
            .map(|f| f.iter().map(|d| d.class_id).collect())
            .collect()
    }

    #[test]
    fn test_majority_wins() {
        let mut frames = vec![
            vec![det(0, 3, 0.0, 0.0), det(1, 5, 100.0, 0.0)],
            vec![det(0, 1, 0.0, 0.0), det(1, 5, 100.0, 0.0)],
            vec![det(0, 1, 0.0, 0.0)],
        ];
        let changed = majority_vote_class(&mut frames);
        assert_eq!(changed, 1);
        assert_eq!(classes(&frames), vec![vec![1, 5], vec![1, 5], vec![1]]);
    }

    #[test]
    fn test_tie_goes_to_first_encountered() {
        let mut frames = vec![
            vec![det(0, 7, 0.0, 0.0)],
            vec![det(0, 2, 0.0, 0.0)],
            vec![det(0, 2, 0.0, 0.0)],
            vec![det(0, 7, 0.0, 0.0)],
        ];
        majority_vote_class(&mut frames);
        assert_eq!(classes(&frames), vec![vec![7], vec![7], vec![7], vec![7]]);
    }
}
