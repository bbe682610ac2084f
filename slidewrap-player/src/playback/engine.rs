//! Slide navigation and auto-advance
//!
//! **Responsibilities:**
//! - Startup and restart sequences
//! - `go_to` transitions (two-phase exit/enter animation, reentrancy guard)
//! - Auto-advance and progress-ramp timer ownership
//! - Dispatch of fired playback timers
//!
//! Pause/resume accounting lives in `pause.rs`.

use super::state::{Phase, PlaybackState};
use crate::effects::EntranceEffects;
use crate::progress::ProgressTracker;
use crate::render::Renderer;
use crate::timer::{Fired, ManualTimers, TimerEvent, TimerHandle, TimerService};
use slidewrap_common::events::{Direction, EventBus, PresentationEvent};
use slidewrap_common::TomlConfig;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Static playback parameters
#[derive(Debug, Clone)]
pub struct PlayerSettings {
    /// Number of slides (N)
    pub slide_count: usize,
    /// Auto-advance budget per slide
    pub slide_duration_ms: u64,
    /// Exit animation time before the active slide is swapped
    pub exit_ms: u64,
    /// Enter animation time after the swap
    pub enter_ms: u64,
    /// Progress fill update period
    pub tick_interval_ms: u64,
    pub particles_per_slide: usize,
    pub effects: EntranceEffects,
}

impl PlayerSettings {
    pub fn from_config(config: &TomlConfig) -> Self {
        Self {
            slide_count: config.deck.slide_count.max(1),
            slide_duration_ms: config.deck.slide_duration_ms,
            exit_ms: config.transition.exit_ms,
            enter_ms: config.transition.enter_ms,
            tick_interval_ms: config.progress.tick_interval_ms,
            particles_per_slide: config.deck.particles_per_slide,
            effects: EntranceEffects::from_config(&config.resolved_effects()),
        }
    }

    /// Index of the terminal slide
    pub fn last_index(&self) -> usize {
        self.slide_count.saturating_sub(1)
    }
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self::from_config(&TomlConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransitionStep {
    /// Exit animation running on the outgoing slide
    Exiting,
    /// Incoming slide active, enter animation running
    Entering,
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    from: usize,
    to: usize,
    direction: Direction,
    step: TransitionStep,
    timer: TimerHandle,
}

/// Slide playback state machine
///
/// Owns the playback state, the progress tracker, the timer service and the
/// renderer. Every mutation goes through the public operations below or
/// through [`on_timer`](Self::on_timer).
pub struct SlidePlayer<T: TimerService, R: Renderer> {
    pub(super) settings: PlayerSettings,
    pub(super) state: PlaybackState,
    pub(super) progress: ProgressTracker,
    pub(super) timers: T,
    pub(super) renderer: R,
    events: Arc<EventBus>,
    pub(super) auto_advance: Option<TimerHandle>,
    pub(super) progress_ramp: Option<TimerHandle>,
    transition: Option<Transition>,
    started: bool,
}

impl<T: TimerService, R: Renderer> SlidePlayer<T, R> {
    pub fn new(settings: PlayerSettings, timers: T, renderer: R, events: Arc<EventBus>) -> Self {
        let state = PlaybackState::new(settings.slide_duration_ms);
        let progress = ProgressTracker::new(settings.slide_count);
        Self {
            settings,
            state,
            progress,
            timers,
            renderer,
            events,
            auto_advance: None,
            progress_ramp: None,
            transition: None,
            started: false,
        }
    }

    /// Run the startup sequence: particles, first slide, auto-advance
    pub fn start(&mut self) {
        if self.started {
            debug!("Player already started");
            return;
        }
        self.started = true;
        info!(
            "Starting presentation: {} slides, {}ms per slide",
            self.settings.slide_count, self.settings.slide_duration_ms
        );

        for slide in 0..self.settings.slide_count {
            self.renderer
                .create_ambient_particles(slide, self.settings.particles_per_slide);
        }
        self.renderer.set_active(0, true);
        self.enter_first_slide();
    }

    /// Move to `target`, animating along `direction`
    ///
    /// Dropped (returns `false`) while a transition is in flight, when
    /// `target` is out of range, or when it is already the current slide.
    pub fn go_to(&mut self, target: usize, direction: Direction) -> bool {
        if self.state.phase == Phase::Transitioning {
            debug!("Transition in progress, dropping navigation to slide {}", target);
            return false;
        }
        if target >= self.settings.slide_count {
            debug!("Ignoring navigation to out-of-range slide {}", target);
            return false;
        }
        let from = self.state.current_index;
        if target == from {
            return false;
        }

        // Navigation always clears a pause
        let was_paused = self.state.phase == Phase::Paused;
        self.cancel_playback_timers();
        self.state.elapsed_ms = 0;
        self.state.segment_start_ms = None;
        self.set_phase(Phase::Transitioning);
        if was_paused {
            self.renderer.set_pause_indicator(false);
        }

        self.renderer.apply_exit_animation(from, direction);
        self.renderer.set_active(target, false);
        let timer = self
            .timers
            .after(self.settings.exit_ms, TimerEvent::TransitionSwap);
        self.transition = Some(Transition {
            from,
            to: target,
            direction,
            step: TransitionStep::Exiting,
            timer,
        });

        self.state.current_index = target;
        self.progress.reset(target, &mut self.renderer);
        self.update_nav_controls();
        self.trigger_entrance_effects(target);
        self.events.emit_lossy(PresentationEvent::SlideChanged {
            from,
            to: target,
            direction,
            timestamp: chrono::Utc::now(),
        });
        info!("Slide {} -> {} ({})", from, target, direction);

        if target < self.settings.last_index() {
            self.arm_auto_advance(0);
        }
        true
    }

    /// Advance one slide; no-op on the last slide
    pub fn next(&mut self) -> bool {
        let target = self.state.current_index + 1;
        if target >= self.settings.slide_count {
            debug!("Already on the last slide");
            return false;
        }
        self.go_to(target, Direction::Forward)
    }

    /// Go back one slide; no-op on the first slide
    pub fn prev(&mut self) -> bool {
        match self.state.current_index.checked_sub(1) {
            Some(target) => self.go_to(target, Direction::Backward),
            None => {
                debug!("Already on the first slide");
                false
            }
        }
    }

    /// Return to the first slide from any state and re-arm auto-advance
    pub fn restart(&mut self) {
        if !self.started {
            self.start();
            return;
        }
        let from = self.state.current_index;
        info!("Restarting presentation from slide {}", from);

        self.cancel_playback_timers();
        if let Some(transition) = self.transition.take() {
            self.timers.cancel(transition.timer);
        }
        if self.state.phase == Phase::Paused {
            self.renderer.set_pause_indicator(false);
        }

        for slide in 0..self.settings.slide_count {
            self.renderer.clear_animations(slide);
            self.renderer.set_active(slide, false);
        }
        self.renderer.set_active(0, true);
        self.enter_first_slide();

        if from != 0 {
            self.events.emit_lossy(PresentationEvent::SlideChanged {
                from,
                to: 0,
                direction: Direction::Backward,
                timestamp: chrono::Utc::now(),
            });
        }
    }

    /// Dispatch a fired timer
    ///
    /// Stale handles (cancelled or superseded timers) are ignored.
    pub fn on_timer(&mut self, fired: Fired) {
        match fired.event {
            TimerEvent::AutoAdvance => self.on_auto_advance(fired.handle),
            TimerEvent::ProgressTick => self.on_progress_tick(fired.handle),
            TimerEvent::TransitionSwap | TimerEvent::TransitionSettle => {
                self.on_transition_step(fired)
            }
            TimerEvent::LongPress | TimerEvent::ShareLabelRestore => {
                debug!("{:?} is not a playback timer", fired.event);
            }
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn settings(&self) -> &PlayerSettings {
        &self.settings
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Currently armed auto-advance timer
    pub fn auto_advance_timer(&self) -> Option<TimerHandle> {
        self.auto_advance
            .filter(|handle| self.timers.is_pending(*handle))
    }

    /// Currently armed progress-ramp timer
    pub fn progress_ramp_timer(&self) -> Option<TimerHandle> {
        self.progress_ramp
            .filter(|handle| self.timers.is_pending(*handle))
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Show slide 0 as at startup (shared by start and restart)
    fn enter_first_slide(&mut self) {
        self.state.current_index = 0;
        self.state.elapsed_ms = 0;
        self.state.segment_start_ms = None;
        self.progress.reset(0, &mut self.renderer);
        self.update_nav_controls();
        self.trigger_entrance_effects(0);

        if self.settings.last_index() == 0 {
            self.set_phase(Phase::Finished);
        } else {
            self.set_phase(Phase::Playing);
            self.arm_auto_advance(0);
        }
    }

    /// Start a play segment with `elapsed_ms` already used
    ///
    /// Replaces any armed auto-advance and ramp timers, so at most one of
    /// each exists afterwards.
    pub(super) fn arm_auto_advance(&mut self, elapsed_ms: u64) {
        self.cancel_playback_timers();

        let duration = self.settings.slide_duration_ms;
        let elapsed = elapsed_ms.min(duration);
        let now = self.timers.now_ms();
        self.state.elapsed_ms = elapsed;
        self.state.segment_start_ms = Some(now);

        self.progress.unfreeze(&mut self.renderer);
        if duration > 0 {
            self.progress
                .advance_to(elapsed as f64 / duration as f64, &mut self.renderer);
        }

        self.progress_ramp = Some(
            self.timers
                .every(self.settings.tick_interval_ms, TimerEvent::ProgressTick),
        );
        let remaining = duration - elapsed;
        self.auto_advance = Some(self.timers.after(remaining, TimerEvent::AutoAdvance));
        debug!(
            "Auto-advance armed for slide {} in {}ms",
            self.state.current_index, remaining
        );
    }

    pub(super) fn cancel_playback_timers(&mut self) {
        if let Some(handle) = self.auto_advance.take() {
            self.timers.cancel(handle);
        }
        if let Some(handle) = self.progress_ramp.take() {
            self.timers.cancel(handle);
        }
    }

    pub(super) fn set_phase(&mut self, new_phase: Phase) {
        let old_phase = self.state.phase;
        if old_phase == new_phase {
            return;
        }
        self.state.phase = new_phase;
        debug!("Phase {} -> {}", old_phase, new_phase);
        self.events.emit_lossy(PresentationEvent::PhaseChanged {
            old_phase,
            new_phase,
            timestamp: chrono::Utc::now(),
        });
    }

    fn update_nav_controls(&mut self) {
        let index = self.state.current_index;
        self.renderer
            .update_nav_controls(index > 0, index < self.settings.last_index());
    }

    fn trigger_entrance_effects(&mut self, slide: usize) {
        let effects = self.settings.effects.for_slide(slide);
        self.renderer.trigger_entrance_effects(slide, effects);
    }

    fn on_auto_advance(&mut self, handle: TimerHandle) {
        if self.auto_advance != Some(handle) {
            debug!("Ignoring stale auto-advance {}", handle);
            return;
        }
        self.auto_advance = None;

        if self.state.phase == Phase::Paused {
            debug!("Auto-advance fired while paused, ignoring");
            return;
        }
        let from = self.state.current_index;
        if !self.next() {
            warn!("Auto-advance from slide {} was rejected", from);
        }
    }

    fn on_progress_tick(&mut self, handle: TimerHandle) {
        if self.progress_ramp != Some(handle) {
            debug!("Ignoring stale progress tick {}", handle);
            return;
        }
        let fraction = self.state.fraction_at(self.timers.now_ms());
        self.progress.advance_to(fraction, &mut self.renderer);
        if fraction >= 1.0 {
            if let Some(handle) = self.progress_ramp.take() {
                self.timers.cancel(handle);
            }
        }
    }

    fn on_transition_step(&mut self, fired: Fired) {
        let Some(mut transition) = self.transition else {
            debug!("No transition in flight for {}", fired.handle);
            return;
        };
        if transition.timer != fired.handle {
            debug!("Ignoring stale transition timer {}", fired.handle);
            return;
        }

        match (transition.step, fired.event) {
            (TransitionStep::Exiting, TimerEvent::TransitionSwap) => {
                self.renderer.clear_animations(transition.from);
                self.renderer.set_active(transition.from, false);
                self.renderer
                    .apply_enter_animation(transition.to, transition.direction);
                self.renderer.set_active(transition.to, true);

                transition.step = TransitionStep::Entering;
                transition.timer = self
                    .timers
                    .after(self.settings.enter_ms, TimerEvent::TransitionSettle);
                self.transition = Some(transition);
            }
            (TransitionStep::Entering, TimerEvent::TransitionSettle) => {
                self.renderer.clear_animations(transition.to);
                self.transition = None;
                let phase = if self.state.current_index == self.settings.last_index() {
                    Phase::Finished
                } else {
                    Phase::Playing
                };
                self.set_phase(phase);
            }
            (step, event) => {
                warn!("Unexpected {:?} during {:?} step", event, step);
            }
        }
    }
}

impl<R: Renderer> SlidePlayer<ManualTimers, R> {
    /// Fire every timer due up to `until_ms`, then move the clock there
    pub fn advance_to(&mut self, until_ms: u64) {
        while let Some(fired) = self.timers.pop_due(until_ms) {
            self.on_timer(fired);
        }
        self.timers.set_now(until_ms);
    }

    /// Advance the virtual clock by `delta_ms`
    pub fn advance_by(&mut self, delta_ms: u64) {
        let until = self.timers.now_ms() + delta_ms;
        self.advance_to(until);
    }
}
