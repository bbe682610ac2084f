//! Input router
//!
//! Normalizes taps, touch gestures, keys and on-screen controls into a small
//! set of [`Intent`]s. The router holds only gesture bookkeeping (touch start
//! and the long-press timer), never playback state.

mod gesture;

pub use gesture::{classify, Gesture, GestureThresholds};

use crate::timer::{Fired, TimerEvent, TimerHandle, TimerService};
use tracing::debug;

/// Tap zone on either half of the slide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapZone {
    Left,
    Right,
}

/// Keyboard keys the player reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Space,
}

/// On-screen control buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Prev,
    Next,
    Pause,
    Restart,
    Share,
    Sound,
    /// Opening slide button: starts the music and advances
    Start,
}

/// Raw input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Tap(TapZone),
    TouchStart { x: f64, y: f64, at_ms: u64 },
    TouchEnd { x: f64, y: f64, at_ms: u64 },
    Key(Key),
    Control(Control),
}

/// Normalized user intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Next,
    Prev,
    TogglePause,
    Restart,
    Share,
    ToggleSound,
    Start,
}

#[derive(Debug, Clone, Copy)]
struct TouchStart {
    x: f64,
    y: f64,
    at_ms: u64,
}

#[derive(Debug, Default)]
pub struct InputRouter {
    thresholds: GestureThresholds,
    touch: Option<TouchStart>,
    long_press: Option<TimerHandle>,
}

impl InputRouter {
    pub fn new(thresholds: GestureThresholds) -> Self {
        Self {
            thresholds,
            touch: None,
            long_press: None,
        }
    }

    /// Translate one input event, arming or cancelling the long-press timer
    pub fn handle<T: TimerService + ?Sized>(
        &mut self,
        event: InputEvent,
        timers: &mut T,
    ) -> Option<Intent> {
        match event {
            InputEvent::Tap(TapZone::Left) => Some(Intent::Prev),
            InputEvent::Tap(TapZone::Right) => Some(Intent::Next),
            InputEvent::Key(Key::ArrowLeft) => Some(Intent::Prev),
            InputEvent::Key(Key::ArrowRight) => Some(Intent::Next),
            InputEvent::Key(Key::Space) => Some(Intent::TogglePause),
            InputEvent::Control(control) => Some(match control {
                Control::Prev => Intent::Prev,
                Control::Next => Intent::Next,
                Control::Pause => Intent::TogglePause,
                Control::Restart => Intent::Restart,
                Control::Share => Intent::Share,
                Control::Sound => Intent::ToggleSound,
                Control::Start => Intent::Start,
            }),
            InputEvent::TouchStart { x, y, at_ms } => {
                self.cancel_long_press(timers);
                self.touch = Some(TouchStart { x, y, at_ms });
                self.long_press =
                    Some(timers.after(self.thresholds.long_press_ms, TimerEvent::LongPress));
                None
            }
            InputEvent::TouchEnd { x, y, at_ms } => {
                self.cancel_long_press(timers);
                let start = self.touch.take()?;
                let dt = at_ms.saturating_sub(start.at_ms);
                match classify(x - start.x, y - start.y, dt, &self.thresholds) {
                    Gesture::SwipeLeft => Some(Intent::Next),
                    Gesture::SwipeRight => Some(Intent::Prev),
                    Gesture::Tap => {
                        debug!("Tap left to tap-zone handlers");
                        None
                    }
                    Gesture::None => None,
                }
            }
        }
    }

    /// Handle a fired long-press timer
    pub fn on_long_press(&mut self, fired: &Fired) -> Option<Intent> {
        if fired.event != TimerEvent::LongPress || self.long_press != Some(fired.handle) {
            debug!("Ignoring stale long-press {}", fired.handle);
            return None;
        }
        self.long_press = None;
        debug!("Long-press recognized");
        Some(Intent::TogglePause)
    }

    /// Whether a long-press timer is armed
    pub fn long_press_pending(&self) -> bool {
        self.long_press.is_some()
    }

    fn cancel_long_press<T: TimerService + ?Sized>(&mut self, timers: &mut T) {
        if let Some(handle) = self.long_press.take() {
            timers.cancel(handle);
        }
    }
}
