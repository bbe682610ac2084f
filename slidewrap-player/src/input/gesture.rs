//! Touch gesture classification

use slidewrap_common::config::InputConfig;

/// Thresholds separating taps, swipes and long-presses
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureThresholds {
    pub swipe_min_distance_px: f64,
    pub tap_max_distance_px: f64,
    pub tap_max_duration_ms: u64,
    pub long_press_ms: u64,
}

impl From<&InputConfig> for GestureThresholds {
    fn from(config: &InputConfig) -> Self {
        Self {
            swipe_min_distance_px: config.swipe_min_distance_px,
            tap_max_distance_px: config.tap_max_distance_px,
            tap_max_duration_ms: config.tap_max_duration_ms,
            long_press_ms: config.long_press_ms,
        }
    }
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self::from(&InputConfig::default())
    }
}

/// What a completed touch amounted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Short, nearly stationary touch; left to the tap-zone handlers
    Tap,
    /// Finger moved right-to-left
    SwipeLeft,
    /// Finger moved left-to-right
    SwipeRight,
    /// Anything else (vertical drags, short horizontal moves, slow holds)
    None,
}

/// Classify a touch from its displacement and duration
pub fn classify(dx: f64, dy: f64, dt_ms: u64, thresholds: &GestureThresholds) -> Gesture {
    let (adx, ady) = (dx.abs(), dy.abs());

    if adx < thresholds.tap_max_distance_px
        && ady < thresholds.tap_max_distance_px
        && dt_ms < thresholds.tap_max_duration_ms
    {
        return Gesture::Tap;
    }

    if adx > ady && adx > thresholds.swipe_min_distance_px {
        if dx < 0.0 {
            Gesture::SwipeLeft
        } else {
            Gesture::SwipeRight
        }
    } else {
        Gesture::None
    }
}
