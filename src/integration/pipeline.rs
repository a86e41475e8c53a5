//! TrackingRun for driving the tracker over an annotation store.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;

use log::{info, warn};

use crate::detection::FrameSequence;
use crate::error::{Error, Result};
use crate::postprocess;
use crate::tracker::{HungarianTracker, TrackerConfig};

use super::{AnnotationStore, RunGuard};

/// Progress notifications of a [`TrackingRun`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEvent {
    /// Ids of this frame were written to the store.
    FrameTracked(usize),
    /// Trajectory passes finished and every frame was written back.
    PostProcessed,
    Finished,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed {
        frames: usize,
        /// Distinct track ids after post-processing.
        identities: usize,
    },
    /// Stopped before frame `frames_done`; earlier frames keep their ids and
    /// the trajectory passes did not run.
    Cancelled { frames_done: usize },
}

/// Cooperative cancellation flag shared with a running [`TrackingRun`].
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A whole-video tracking pass against an [`AnnotationStore`].
///
/// Frames are read, assigned ids and written back one at a time, then the
/// trajectory passes enabled in the config run over the whole sequence and
/// every frame is written again. The store is borrowed mutably for the
/// duration of [`TrackingRun::run`], so nothing else can edit it meanwhile.
///
/// A run owns the [`RunGuard`] of its video: no second run can start for
/// that video until this one is dropped.
pub struct TrackingRun {
    config: TrackerConfig,
    stop: StopHandle,
    events: Option<Sender<RunEvent>>,
    guard: RunGuard,
}

impl TrackingRun {
    /// Create a run for the video claimed by `guard`. Fails on an invalid
    /// config before any frame is touched, releasing the claim.
    ///
    /// [`RunRegistry::start`](super::RunRegistry::start) claims and creates
    /// in one step.
    pub fn new(config: TrackerConfig, guard: RunGuard) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            stop: StopHandle::new(),
            events: None,
            guard,
        })
    }

    pub fn video(&self) -> &str {
        self.guard.video()
    }

    /// Send progress events to `events`. A disconnected receiver is ignored.
    pub fn with_events(mut self, events: Sender<RunEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Track every frame of `store`.
    ///
    /// The stop flag is checked before each frame and once more before the
    /// trajectory passes. A malformed detection aborts the run with
    /// [`Error::Data`]; frames before it stay written.
    pub fn run<S: AnnotationStore>(&self, store: &mut S) -> Result<RunOutcome> {
        let total = store.frame_count();
        info!("tracking run for {:?} started over {total} frames", self.video());

        let mut tracker = HungarianTracker::new(self.config.clone())?;
        let mut frames: FrameSequence = Vec::with_capacity(total);

        for frame in 0..total {
            if self.stop.is_stopped() {
                return Ok(self.cancelled(frame));
            }
            let mut detections = store.detections(frame).map_err(store_error)?;
            let ids = tracker.update(&detections).inspect_err(|e| {
                warn!("tracking run aborted: {e}");
            })?;
            for (det, id) in detections.iter_mut().zip(ids) {
                det.track_id = id;
            }
            store
                .write_detections(frame, detections.clone())
                .map_err(store_error)?;
            frames.push(detections);
            self.emit(RunEvent::FrameTracked(frame));
        }

        if self.stop.is_stopped() {
            return Ok(self.cancelled(total));
        }

        postprocess::apply(&mut frames, &self.config)?;
        let identities = frames
            .iter()
            .flatten()
            .map(|det| det.track_id)
            .collect::<HashSet<_>>()
            .len();
        for (frame, detections) in frames.into_iter().enumerate() {
            store.write_detections(frame, detections).map_err(store_error)?;
        }
        self.emit(RunEvent::PostProcessed);

        info!("tracking run finished: {total} frames, {identities} identities");
        self.emit(RunEvent::Finished);
        Ok(RunOutcome::Completed {
            frames: total,
            identities,
        })
    }

    fn cancelled(&self, frames_done: usize) -> RunOutcome {
        info!("tracking run cancelled after {frames_done} frames");
        self.emit(RunEvent::Cancelled);
        RunOutcome::Cancelled { frames_done }
    }

    fn emit(&self, event: RunEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }
}

fn store_error<E: std::error::Error + Send + Sync + 'static>(err: E) -> Error {
    Error::Store(Box::new(err))
}
