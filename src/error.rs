//! Error types shared by the tracker, the post-processor and the run driver.

use thiserror::Error;

/// Errors raised by annotrack operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A detection has missing or non-finite geometry.
    #[error("Malformed detection {index} in frame {frame}: {reason}")]
    Data {
        frame: usize,
        index: usize,
        reason: String,
    },

    /// A geometry value could not be built from its raw representation.
    #[error("Invalid geometry: {0}")]
    Geometry(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A tracking run is already active for this video.
    #[error("Tracking already running for video {0:?}")]
    RunInProgress(String),

    /// Error propagated from the external annotation store.
    #[error("Annotation store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub(crate) fn data(frame: usize, index: usize, reason: impl Into<String>) -> Self {
        Self::Data {
            frame,
            index,
            reason: reason.into(),
        }
    }
}

/// Result type for annotrack operations.
pub type Result<T> = std::result::Result<T, Error>;
