//! Slide playback state machine

mod engine;
mod pause;
mod state;

pub use engine::{PlayerSettings, SlidePlayer};
pub use state::{Phase, PlaybackState};
