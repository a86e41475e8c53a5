use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;

use crate::error::{Error, Result};
use crate::tracker::TrackerConfig;

use super::TrackingRun;

type Active = Arc<Mutex<HashSet<String>>>;

/// Keeps at most one tracking run per video.
///
/// Cloning shares the underlying set, so one registry can be handed to
/// every thread that may start a run.
#[derive(Debug, Clone, Default)]
pub struct RunRegistry {
    active: Active,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `video` for a run. The claim lasts as long as the returned guard.
    pub fn try_begin(&self, video: impl Into<String>) -> Result<RunGuard> {
        let video = video.into();
        if !lock(&self.active).insert(video.clone()) {
            return Err(Error::RunInProgress(video));
        }
        debug!("run claimed for video {video:?}");
        Ok(RunGuard {
            video,
            active: Arc::clone(&self.active),
        })
    }

    /// Claim `video` and create a run that holds the claim until dropped.
    pub fn start(&self, video: impl Into<String>, config: TrackerConfig) -> Result<TrackingRun> {
        TrackingRun::new(config, self.try_begin(video)?)
    }

    pub fn is_running(&self, video: &str) -> bool {
        lock(&self.active).contains(video)
    }
}

/// Releases its video in the registry on drop.
#[derive(Debug)]
pub struct RunGuard {
    video: String,
    active: Active,
}

impl RunGuard {
    pub fn video(&self) -> &str {
        &self.video
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        lock(&self.active).remove(&self.video);
        debug!("run released for video {:?}", self.video);
    }
}

// Ignores poisoning.
fn lock(active: &Active) -> MutexGuard<'_, HashSet<String>> {
    active.lock().unwrap_or_else(PoisonError::into_inner)
}
