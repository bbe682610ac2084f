//! Playback-related type definitions
//!
//! Supporting types shared by the player core and event consumers.

use serde::{Deserialize, Serialize};

/// Playback phase of the slide state machine
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Auto-advance running on a non-final slide
    Playing,
    /// Auto-advance suspended with elapsed time preserved
    Paused,
    /// Slide change animation in flight; navigation is rejected
    Transitioning,
    /// Resting on the final slide; no auto-advance
    Finished,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Playing => write!(f, "playing"),
            Phase::Paused => write!(f, "paused"),
            Phase::Transitioning => write!(f, "transitioning"),
            Phase::Finished => write!(f, "finished"),
        }
    }
}

/// Direction of a slide change
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Outgoing slide exits left, incoming enters from the right
    Forward,
    /// Mirror of `Forward`
    Backward,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Backward => write!(f, "backward"),
        }
    }
}

/// Visual state of one progress segment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SegmentMarker {
    /// Not yet reached
    #[default]
    Pending,
    /// Slide currently shown
    Active,
    /// Slide already viewed
    Done,
}

/// Slide animation applied by the renderer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlideAnimation {
    Exit { direction: Direction },
    Enter { direction: Direction },
    Cleared,
    Activated,
    Deactivated,
}

/// Background music indicator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SoundState {
    On,
    Muted,
}

impl std::fmt::Display for SoundState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoundState::On => write!(f, "on"),
            SoundState::Muted => write!(f, "muted"),
        }
    }
}

/// How a share request was finally satisfied
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "via", rename_all = "snake_case")]
pub enum ShareOutcome {
    /// Platform share sheet accepted the link
    Shared,
    /// Link copied to the clipboard
    Copied,
    /// Neither was available; the user was shown the link to copy by hand
    Prompted { message: String },
}
