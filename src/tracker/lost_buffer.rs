//! Occlusion buffer: identities unmatched in their last frame, kept as
//! candidates for re-identification.

use crate::geometry::Point2;

/// Age given to an entry when it is buffered; the same step ages it once more.
const INITIAL_AGE: i32 = -2;

#[derive(Debug, Clone, PartialEq)]
pub struct LostEntry {
    /// Always `<= -1`; decremented once per frame step.
    pub age: i32,
    /// Frame the identity was last seen in.
    pub frame: usize,
    /// Index of the detection within that frame.
    pub index: usize,
    pub track_id: u64,
    pub position: Point2,
}

impl LostEntry {
    pub fn new(frame: usize, index: usize, track_id: u64, position: Point2) -> Self {
        Self {
            age: INITIAL_AGE,
            frame,
            index,
            track_id,
            position,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LostBuffer {
    entries: Vec<LostEntry>,
}

impl LostBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LostEntry] {
        &self.entries
    }

    pub fn get(&self, i: usize) -> Option<&LostEntry> {
        self.entries.get(i)
    }

    pub fn contains_track(&self, track_id: u64) -> bool {
        self.entries.iter().any(|e| e.track_id == track_id)
    }

    pub fn push(&mut self, entry: LostEntry) {
        self.entries.push(entry);
    }

    /// Drop the entries at `indices`, preserving the order of the rest.
    pub fn remove_indices(&mut self, indices: &[usize]) {
        if indices.is_empty() {
            return;
        }
        let mut i = 0;
        self.entries.retain(|_| {
            let keep = !indices.contains(&i);
            i += 1;
            keep
        });
    }

    /// Age every entry by one frame and evict those older than `max_frame`.
    /// Returns the evicted entries.
    pub fn age(&mut self, max_frame: u32) -> Vec<LostEntry> {
        let limit = -(max_frame.min(i32::MAX as u32) as i32);
        for entry in &mut self.entries {
            entry.age -= 1;
        }
        let (kept, evicted): (Vec<_>, Vec<_>) = self
            .entries
            .drain(..)
            .partition(|entry| entry.age >= limit);
        self.entries = kept;
        evicted
    }
}
