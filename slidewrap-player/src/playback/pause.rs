//! Pause/resume accounting for SlidePlayer
//!
//! A pause banks the running segment into `elapsed_ms` (capped at the slide
//! budget) and drops both playback timers. Resume re-arms them for whatever
//! budget is left, or advances straight away if nothing is left.

use super::engine::SlidePlayer;
use super::state::Phase;
use crate::render::Renderer;
use crate::timer::TimerService;
use tracing::{debug, info};

impl<T: TimerService, R: Renderer> SlidePlayer<T, R> {
    /// Suspend auto-advance on the current slide
    ///
    /// Only a playing slide can pause; in any other phase this is a no-op.
    pub fn pause(&mut self) -> bool {
        // Finished has no auto-advance to suspend, so it stays unpausable
        if self.state.phase != Phase::Playing {
            debug!("Pause ignored while {}", self.state.phase);
            return false;
        }

        let now = self.timers.now_ms();
        self.cancel_playback_timers();
        self.state.elapsed_ms = self.state.elapsed_at(now);
        self.state.segment_start_ms = None;
        self.set_phase(Phase::Paused);
        self.progress.freeze(&mut self.renderer);
        self.renderer.set_pause_indicator(true);

        info!(
            "Paused on slide {} after {}ms",
            self.state.current_index, self.state.elapsed_ms
        );
        true
    }

    /// Continue auto-advance with the remaining budget
    pub fn resume(&mut self) -> bool {
        if self.state.phase != Phase::Paused {
            debug!("Resume ignored while {}", self.state.phase);
            return false;
        }

        self.renderer.set_pause_indicator(false);
        let remaining = self
            .state
            .slide_duration_ms
            .saturating_sub(self.state.elapsed_ms);

        if remaining == 0 {
            info!(
                "Slide {} budget used up while paused, advancing",
                self.state.current_index
            );
            // The final slide never pauses, so a next slide always exists here
            return self.next();
        }

        self.set_phase(Phase::Playing);
        self.arm_auto_advance(self.state.elapsed_ms);
        info!(
            "Resumed slide {} with {}ms remaining",
            self.state.current_index, remaining
        );
        true
    }

    /// Pause when playing, resume when paused
    pub fn toggle_pause(&mut self) -> bool {
        if self.state.phase == Phase::Paused {
            self.resume()
        } else {
            self.pause()
        }
    }
}
