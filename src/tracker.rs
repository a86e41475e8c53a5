mod config;
mod hungarian_tracker;
mod lost_buffer;
pub mod matching;

pub use config::TrackerConfig;
pub use hungarian_tracker::{HungarianTracker, track};
pub use lost_buffer::{LostBuffer, LostEntry};
