//! Renderer collaborator
//!
//! Everything visual the state machine asks for goes through this trait.
//! Slides and progress segments are addressed by index.

use crate::effects::EntranceEffect;
use slidewrap_common::events::{Direction, SegmentMarker, SoundState};

pub trait Renderer {
    /// Start the exit animation on the outgoing slide
    fn apply_exit_animation(&mut self, slide: usize, direction: Direction);

    /// Start the enter animation on the incoming slide
    fn apply_enter_animation(&mut self, slide: usize, direction: Direction);

    /// Remove any exit/enter animation classes from a slide
    fn clear_animations(&mut self, slide: usize);

    /// Show or hide a slide
    fn set_active(&mut self, slide: usize, active: bool);

    /// Replay a slide's entrance animations plus its slide-specific effects
    fn trigger_entrance_effects(&mut self, slide: usize, effects: &[EntranceEffect]);

    /// Populate a slide's background with ambient particles
    fn create_ambient_particles(&mut self, slide: usize, count: usize);

    /// Set a progress segment's fill (0.0-1.0)
    fn set_segment_fill(&mut self, slide: usize, fraction: f64);

    /// Mark a progress segment pending, active or done
    fn set_segment_marker(&mut self, slide: usize, marker: SegmentMarker);

    /// Stop (or release) the fill animation of a segment
    fn freeze_segment_fill(&mut self, slide: usize, frozen: bool);

    /// Show or hide the previous/next controls
    fn update_nav_controls(&mut self, prev_visible: bool, next_visible: bool);

    /// Show or hide the pause glyph and overlay
    fn set_pause_indicator(&mut self, paused: bool);

    /// Update the sound control glyph
    fn set_sound_indicator(&mut self, state: SoundState);

    /// Temporarily relabel the share control; `None` restores it
    fn set_share_label(&mut self, label: Option<&str>);
}
