use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for a tracking run.
///
/// Missing fields take their default when deserialized, so the UI can send a
/// partial object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// A match is accepted only if the centroid distance is strictly below this (pixels).
    pub max_distance: f64,
    /// Frames an unmatched identity stays eligible for recovery.
    pub max_frame: u32,
    /// Trajectories ending and starting one frame apart closer than this are spliced.
    pub joint_distance: f64,
    /// Replace each identity's class with its most frequent class.
    pub class_infer: bool,
    /// Fill gaps in trajectories by linear interpolation.
    pub linear_infer: bool,
    pub frame_width: f64,
    pub frame_height: f64,
    /// Distance to the image border under which a box counts as leaving the frame.
    pub border_offset: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_distance: 100.0,
            max_frame: 20,
            joint_distance: 20.0,
            class_infer: true,
            linear_infer: true,
            frame_width: 3840.0,
            frame_height: 2160.0,
            border_offset: 25.0,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.max_distance > 0.0 && self.max_distance.is_finite()) {
            return Err(Error::Config(format!(
                "max_distance must be positive, got {}",
                self.max_distance
            )));
        }
        if self.max_frame == 0 {
            return Err(Error::Config("max_frame must be positive, got 0".into()));
        }
        if !(self.joint_distance > 0.0 && self.joint_distance.is_finite()) {
            return Err(Error::Config(format!(
                "joint_distance must be positive, got {}",
                self.joint_distance
            )));
        }
        if !(self.frame_width > 0.0 && self.frame_height > 0.0) {
            return Err(Error::Config(format!(
                "frame size must be positive, got {}x{}",
                self.frame_width, self.frame_height
            )));
        }
        if !(self.border_offset >= 0.0) {
            return Err(Error::Config(format!(
                "border_offset must not be negative, got {}",
                self.border_offset
            )));
        }
        Ok(())
    }
}
