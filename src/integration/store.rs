//! Trait for the external annotation store a tracking run reads and writes.

use thiserror::Error;

use crate::detection::{Detection, FrameSequence};

/// Per-frame detection storage backing a video.
///
/// Implement this trait to connect a database, a file format or an editor
/// model to [`TrackingRun`](super::TrackingRun).
///
/// # Example
///
/// ```ignore
/// use annotrack::{AnnotationStore, Detection};
///
/// struct SqlStore { /* connection */ }
///
/// impl AnnotationStore for SqlStore {
///     type Error = std::io::Error;
///
///     fn frame_count(&self) -> usize { 0 }
///
///     fn detections(&self, frame: usize) -> Result<Vec<Detection>, Self::Error> {
///         Ok(vec![])
///     }
///
///     fn write_detections(&mut self, frame: usize, detections: Vec<Detection>) -> Result<(), Self::Error> {
///         Ok(())
///     }
/// }
/// ```
pub trait AnnotationStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn frame_count(&self) -> usize;

    /// Detections of `frame`, in stored order.
    fn detections(&self, frame: usize) -> Result<Vec<Detection>, Self::Error>;

    /// Replace every detection of `frame`.
    fn write_detections(&mut self, frame: usize, detections: Vec<Detection>) -> Result<(), Self::Error>;
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryStoreError {
    #[error("Frame {frame} out of range (store holds {len} frames)")]
    FrameOutOfRange { frame: usize, len: usize },
}

/// In-memory store over a [`FrameSequence`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    frames: FrameSequence,
}

impl MemoryStore {
    pub fn new(frames: FrameSequence) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &FrameSequence {
        &self.frames
    }

    pub fn into_frames(self) -> FrameSequence {
        self.frames
    }

    fn check(&self, frame: usize) -> Result<(), MemoryStoreError> {
        if frame < self.frames.len() {
            Ok(())
        } else {
            Err(MemoryStoreError::FrameOutOfRange {
                frame,
                len: self.frames.len(),
            })
        }
    }
}

impl From<FrameSequence> for MemoryStore {
    fn from(frames: FrameSequence) -> Self {
        Self::new(frames)
    }
}

impl AnnotationStore for MemoryStore {
    type Error = MemoryStoreError;

    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn detections(&self, frame: usize) -> Result<Vec<Detection>, Self::Error> {
        self.check(frame)?;
        Ok(self.frames[frame].clone())
    }

    fn write_detections(&mut self, frame: usize, detections: Vec<Detection>) -> Result<(), Self::Error> {
        self.check(frame)?;
        self.frames[frame] = detections;
        Ok(())
    }
}
