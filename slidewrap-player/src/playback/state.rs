//! Playback state
//!
//! The single source of truth for which slide is shown and how much of its
//! time budget has been used. Fields are crate-private: only the state
//! machine's operations mutate them.

pub use slidewrap_common::events::Phase;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    pub(crate) current_index: usize,
    pub(crate) phase: Phase,
    /// Time spent on `current_index` before the current segment began
    pub(crate) elapsed_ms: u64,
    /// Clock reading when the current segment began
    pub(crate) segment_start_ms: Option<u64>,
    pub(crate) slide_duration_ms: u64,
}

impl PlaybackState {
    /// Startup state: first slide, playing, nothing elapsed
    pub fn new(slide_duration_ms: u64) -> Self {
        Self {
            current_index: 0,
            phase: Phase::Playing,
            elapsed_ms: 0,
            segment_start_ms: None,
            slide_duration_ms,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Elapsed time banked before the current segment
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn segment_start_ms(&self) -> Option<u64> {
        self.segment_start_ms
    }

    pub fn slide_duration_ms(&self) -> u64 {
        self.slide_duration_ms
    }

    /// Total time on the current slide as of `now_ms`, capped at the budget
    pub fn elapsed_at(&self, now_ms: u64) -> u64 {
        let running = self
            .segment_start_ms
            .map(|start| now_ms.saturating_sub(start))
            .unwrap_or(0);
        (self.elapsed_ms + running).min(self.slide_duration_ms)
    }

    /// Fraction of the slide budget used as of `now_ms`
    pub fn fraction_at(&self, now_ms: u64) -> f64 {
        if self.slide_duration_ms == 0 {
            return 1.0;
        }
        self.elapsed_at(now_ms) as f64 / self.slide_duration_ms as f64
    }

    /// Budget left as of `now_ms`
    pub fn remaining_at(&self, now_ms: u64) -> u64 {
        self.slide_duration_ms - self.elapsed_at(now_ms)
    }
}
