//! Two-pass Hungarian identity assignment with an occlusion buffer.

use log::{debug, trace};

use crate::detection::{Centroid, FrameSequence};
use crate::error::{Error, Result};
use crate::geometry::Point2;
use crate::postprocess;
use crate::tracker::config::TrackerConfig;
use crate::tracker::lost_buffer::{LostBuffer, LostEntry};
use crate::tracker::matching::{self, AssignmentResult};

/// Row of the recovery cost matrix.
#[derive(Debug, Clone, Copy)]
enum Candidate {
    /// Detection of the previous frame left unmatched by the priority pass.
    Live(usize),
    /// Entry of the occlusion buffer.
    Lost(usize),
}

/// Online identity assigner: feed it one frame at a time, in order.
///
/// Each call to [`HungarianTracker::update`] matches the new frame against
/// the previous one, then against the occlusion buffer, and returns one
/// track id per detection. The first frame's detections get ids `0..N`.
#[derive(Debug, Clone)]
pub struct HungarianTracker {
    config: TrackerConfig,
    frame_id: usize,
    previous_positions: Vec<Point2>,
    previous_ids: Vec<u64>,
    lost: LostBuffer,
    max_track_id: Option<u64>,
}

impl HungarianTracker {
    pub fn new(config: TrackerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            frame_id: 0,
            previous_positions: Vec::new(),
            previous_ids: Vec::new(),
            lost: LostBuffer::new(),
            max_track_id: None,
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Number of frames consumed so far; also the index of the next frame.
    pub fn frame_id(&self) -> usize {
        self.frame_id
    }

    pub fn lost(&self) -> &LostBuffer {
        &self.lost
    }

    /// Largest track id handed out so far.
    pub fn max_track_id(&self) -> Option<u64> {
        self.max_track_id
    }

    /// Assign track ids to the detections of the next frame.
    ///
    /// Fails with [`Error::Data`] if a detection has no finite centroid; the
    /// tracker state is left untouched in that case.
    pub fn update<T: Centroid>(&mut self, detections: &[T]) -> Result<Vec<u64>> {
        let frame = self.frame_id;
        let positions = centroids(frame, detections)?;

        let mut ids: Vec<Option<u64>> = vec![None; positions.len()];
        let mut committed = vec![false; self.previous_positions.len()];
        let mut num_matched = 0;
        let mut num_recovered = 0;

        if !positions.is_empty() {
            // Priority pass: previous frame against current frame.
            if !self.previous_positions.is_empty() {
                let dists = matching::euclidean_distance(&self.previous_positions, &positions);
                let AssignmentResult { matches, .. } =
                    matching::linear_assignment(&dists, self.config.max_distance);
                for (row, col) in matches {
                    ids[col] = Some(self.previous_ids[row]);
                    committed[row] = true;
                    num_matched += 1;
                }
            }

            // Recovery pass: committed pairs are excluded, the remaining
            // previous detections compete with the buffer for the rest.
            if !self.lost.is_empty() {
                let recovered = self.recover(frame, &positions, &committed, &mut ids);
                num_recovered = recovered.len();
                self.lost.remove_indices(&recovered);
            }
        }

        for (i, &is_committed) in committed.iter().enumerate() {
            if !is_committed {
                self.lost.push(LostEntry::new(
                    frame.saturating_sub(1),
                    i,
                    self.previous_ids[i],
                    self.previous_positions[i],
                ));
            }
        }

        let num_new = ids.iter().filter(|id| id.is_none()).count();
        let ids: Vec<u64> = ids
            .into_iter()
            .map(|id| id.unwrap_or_else(|| self.next_track_id()))
            .collect();

        for evicted in self.lost.age(self.config.max_frame) {
            trace!(
                "frame {frame}: track {} expired (last seen in frame {})",
                evicted.track_id, evicted.frame
            );
        }

        debug!(
            "frame {frame}: {num_matched} matched, {num_recovered} recovered, {num_new} new, {} buffered",
            self.lost.len()
        );

        self.previous_positions = positions;
        self.previous_ids = ids.clone();
        self.frame_id += 1;

        Ok(ids)
    }

    /// Solve the restricted assignment and write recovered ids into `ids`.
    /// Returns the buffer indices that were recovered.
    fn recover(
        &self,
        frame: usize,
        positions: &[Point2],
        committed: &[bool],
        ids: &mut [Option<u64>],
    ) -> Vec<usize> {
        let rows: Vec<Candidate> = committed
            .iter()
            .enumerate()
            .filter(|(_, c)| !**c)
            .map(|(i, _)| Candidate::Live(i))
            .chain((0..self.lost.len()).map(Candidate::Lost))
            .collect();
        let cols: Vec<usize> = ids
            .iter()
            .enumerate()
            .filter(|(_, id)| id.is_none())
            .map(|(j, _)| j)
            .collect();

        if cols.is_empty() {
            return Vec::new();
        }

        let row_positions: Vec<Point2> = rows
            .iter()
            .map(|row| match *row {
                Candidate::Live(i) => self.previous_positions[i],
                Candidate::Lost(k) => self.lost.entries()[k].position,
            })
            .collect();
        let col_positions: Vec<Point2> = cols.iter().map(|&j| positions[j]).collect();

        let dists = matching::euclidean_distance(&row_positions, &col_positions);
        let AssignmentResult { matches, .. } =
            matching::linear_assignment(&dists, self.config.max_distance);

        let mut recovered = Vec::new();
        for (row, col) in matches {
            if let Candidate::Lost(k) = rows[row] {
                let entry = &self.lost.entries()[k];
                trace!(
                    "frame {frame}: recovered track {} after {} frames",
                    entry.track_id,
                    frame - entry.frame
                );
                ids[cols[col]] = Some(entry.track_id);
                recovered.push(k);
            }
        }
        recovered
    }

    fn next_track_id(&mut self) -> u64 {
        let id = self.max_track_id.map_or(0, |max| max + 1);
        self.max_track_id = Some(id);
        id
    }
}

fn centroids<T: Centroid>(frame: usize, detections: &[T]) -> Result<Vec<Point2>> {
    detections
        .iter()
        .enumerate()
        .map(|(index, det)| {
            if !det.is_geometry_finite() {
                return Err(Error::data(frame, index, "non-finite geometry"));
            }
            match det.centroid() {
                Some(p) if p.x.is_finite() && p.y.is_finite() => Ok(p),
                Some(_) => Err(Error::data(frame, index, "non-finite centroid")),
                None => Err(Error::data(frame, index, "missing centroid")),
            }
        })
        .collect()
}

/// Assign track ids over a whole sequence, then run the trajectory passes
/// enabled in `config`.
///
/// Existing `track_id` values are overwritten. On a malformed detection the
/// error names its frame; frames before it already carry their new ids.
pub fn track(frames: &mut FrameSequence, config: &TrackerConfig) -> Result<()> {
    let mut tracker = HungarianTracker::new(config.clone())?;
    for detections in frames.iter_mut() {
        let ids = tracker.update(detections)?;
        for (det, id) in detections.iter_mut().zip(ids) {
            det.track_id = id;
        }
    }
    postprocess::apply(frames, config)
}
