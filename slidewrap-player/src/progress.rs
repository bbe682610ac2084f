//! Segmented progress indicator state
//!
//! One segment per slide, each with a fill fraction in [0, 1] and a marker.
//! The tracker has no timers of its own; the state machine drives it and the
//! tracker mirrors every change to the renderer.

use crate::render::Renderer;
use slidewrap_common::events::SegmentMarker;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Segment {
    fraction: f64,
    marker: SegmentMarker,
}

#[derive(Debug, Clone)]
pub struct ProgressTracker {
    segments: Vec<Segment>,
    active: usize,
    frozen: bool,
}

impl ProgressTracker {
    pub fn new(slide_count: usize) -> Self {
        Self {
            segments: vec![Segment::default(); slide_count],
            active: 0,
            frozen: false,
        }
    }

    /// Make `index` the active segment
    ///
    /// Earlier segments become done and full, later ones pending and empty,
    /// `index` itself active and empty. Also releases a freeze.
    pub fn reset<R: Renderer + ?Sized>(&mut self, index: usize, renderer: &mut R) {
        if index >= self.segments.len() {
            debug!("Ignoring progress reset to out-of-range segment {}", index);
            return;
        }

        if self.frozen {
            renderer.freeze_segment_fill(self.active, false);
        }
        self.active = index;
        self.frozen = false;

        for (i, segment) in self.segments.iter_mut().enumerate() {
            let (fraction, marker) = match i.cmp(&index) {
                std::cmp::Ordering::Less => (1.0, SegmentMarker::Done),
                std::cmp::Ordering::Equal => (0.0, SegmentMarker::Active),
                std::cmp::Ordering::Greater => (0.0, SegmentMarker::Pending),
            };
            segment.fraction = fraction;
            segment.marker = marker;
            renderer.set_segment_marker(i, marker);
            renderer.set_segment_fill(i, fraction);
        }
    }

    /// Move the active segment's fill forward to `fraction`
    ///
    /// Capped at 1.0. Backward moves and updates while frozen are ignored.
    /// Returns whether the fill changed.
    pub fn advance_to<R: Renderer + ?Sized>(&mut self, fraction: f64, renderer: &mut R) -> bool {
        if self.frozen || !fraction.is_finite() {
            return false;
        }
        let Some(segment) = self.segments.get_mut(self.active) else {
            return false;
        };

        let fraction = fraction.min(1.0);
        if fraction <= segment.fraction {
            return false;
        }
        segment.fraction = fraction;
        renderer.set_segment_fill(self.active, fraction);
        true
    }

    /// Hold the active fill at its current value
    pub fn freeze<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        if !self.frozen {
            self.frozen = true;
            renderer.freeze_segment_fill(self.active, true);
        }
    }

    /// Release a freeze so the fill can move again
    pub fn unfreeze<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        if self.frozen {
            self.frozen = false;
            renderer.freeze_segment_fill(self.active, false);
        }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn fraction(&self, index: usize) -> Option<f64> {
        self.segments.get(index).map(|segment| segment.fraction)
    }

    pub fn marker(&self, index: usize) -> Option<SegmentMarker> {
        self.segments.get(index).map(|segment| segment.marker)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EntranceEffect;
    use slidewrap_common::events::{Direction, SoundState};

    /// Renderer that only counts fill updates
    #[derive(Default)]
    struct FillLog {
        fills: Vec<(usize, f64)>,
        frozen: Vec<(usize, bool)>,
    }

    impl Renderer for FillLog {
        fn apply_exit_animation(&mut self, _: usize, _: Direction) {}
        fn apply_enter_animation(&mut self, _: usize, _: Direction) {}
        fn clear_animations(&mut self, _: usize) {}
        fn set_active(&mut self, _: usize, _: bool) {}
        fn trigger_entrance_effects(&mut self, _: usize, _: &[EntranceEffect]) {}
        fn create_ambient_particles(&mut self, _: usize, _: usize) {}
        fn set_segment_fill(&mut self, slide: usize, fraction: f64) {
            self.fills.push((slide, fraction));
        }
        fn set_segment_marker(&mut self, _: usize, _: SegmentMarker) {}
        fn freeze_segment_fill(&mut self, slide: usize, frozen: bool) {
            self.frozen.push((slide, frozen));
        }
        fn update_nav_controls(&mut self, _: bool, _: bool) {}
        fn set_pause_indicator(&mut self, _: bool) {}
        fn set_sound_indicator(&mut self, _: SoundState) {}
        fn set_share_label(&mut self, _: Option<&str>) {}
    }

    #[test]
    fn test_reset_marks_done_active_pending() {
        let mut renderer = FillLog::default();
        let mut tracker = ProgressTracker::new(5);
        tracker.reset(2, &mut renderer);

        assert_eq!(tracker.active(), 2);
        assert_eq!(tracker.marker(0), Some(SegmentMarker::Done));
        assert_eq!(tracker.marker(1), Some(SegmentMarker::Done));
        assert_eq!(tracker.marker(2), Some(SegmentMarker::Active));
        assert_eq!(tracker.marker(3), Some(SegmentMarker::Pending));
        assert_eq!(tracker.fraction(1), Some(1.0));
        assert_eq!(tracker.fraction(2), Some(0.0));
        assert_eq!(tracker.fraction(4), Some(0.0));
        assert_eq!(renderer.fills.len(), 5);
    }

    #[test]
    fn test_advance_never_regresses() {
        let mut renderer = FillLog::default();
        let mut tracker = ProgressTracker::new(3);
        tracker.reset(0, &mut renderer);
        renderer.fills.clear();

        assert!(tracker.advance_to(0.4, &mut renderer));
        assert!(!tracker.advance_to(0.3, &mut renderer));
        assert!(!tracker.advance_to(0.4, &mut renderer));
        assert!(tracker.advance_to(2.0, &mut renderer));
        assert_eq!(tracker.fraction(0), Some(1.0));
        assert_eq!(renderer.fills, vec![(0, 0.4), (0, 1.0)]);
    }

    #[test]
    fn test_reset_allows_lower_values_again() {
        let mut renderer = FillLog::default();
        let mut tracker = ProgressTracker::new(3);
        tracker.reset(1, &mut renderer);
        tracker.advance_to(0.9, &mut renderer);
        tracker.reset(1, &mut renderer);
        assert_eq!(tracker.fraction(1), Some(0.0));
        assert!(tracker.advance_to(0.1, &mut renderer));
    }

    #[test]
    fn test_freeze_blocks_updates_until_released() {
        let mut renderer = FillLog::default();
        let mut tracker = ProgressTracker::new(2);
        tracker.reset(0, &mut renderer);
        tracker.advance_to(0.25, &mut renderer);

        tracker.freeze(&mut renderer);
        tracker.freeze(&mut renderer);
        assert!(!tracker.advance_to(0.5, &mut renderer));
        assert_eq!(tracker.fraction(0), Some(0.25));

        tracker.unfreeze(&mut renderer);
        assert!(tracker.advance_to(0.5, &mut renderer));
        assert_eq!(renderer.frozen, vec![(0, true), (0, false)]);
    }

    #[test]
    fn test_out_of_range_reset_ignored() {
        let mut renderer = FillLog::default();
        let mut tracker = ProgressTracker::new(2);
        tracker.reset(5, &mut renderer);
        assert_eq!(tracker.active(), 0);
        assert!(renderer.fills.is_empty());
    }
}
