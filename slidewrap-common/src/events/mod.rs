//! Event types for the slidewrap event system
//!
//! Provides the presentation event enum and the `EventBus` it travels on.

mod types;

pub use types::{Direction, Phase, SegmentMarker, ShareOutcome, SlideAnimation, SoundState};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Presentation events
///
/// Emitted by the playback state machine and by renderer implementations.
/// Serialized with a `type` tag for JSON-lines output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PresentationEvent {
    /// Current slide changed through a transition
    SlideChanged {
        from: usize,
        to: usize,
        direction: Direction,
        timestamp: DateTime<Utc>,
    },

    /// Playback phase changed
    PhaseChanged {
        old_phase: Phase,
        new_phase: Phase,
        timestamp: DateTime<Utc>,
    },

    /// Animation class applied to or removed from a slide
    SlideAnimated {
        slide: usize,
        animation: SlideAnimation,
        timestamp: DateTime<Utc>,
    },

    /// Progress segment fill changed
    ///
    /// Emitted on every ramp tick while playing, so consumers that only
    /// care about milestones should filter.
    ProgressUpdated {
        slide: usize,
        /// Fill in percent (0.0-100.0)
        percent: f64,
        timestamp: DateTime<Utc>,
    },

    /// Progress segment marker toggled
    SegmentMarkerChanged {
        slide: usize,
        marker: SegmentMarker,
        timestamp: DateTime<Utc>,
    },

    /// Progress fill frozen (paused) or released
    ProgressFrozen {
        slide: usize,
        frozen: bool,
        timestamp: DateTime<Utc>,
    },

    /// Previous/next controls shown or hidden
    NavControlsChanged {
        prev_visible: bool,
        next_visible: bool,
        timestamp: DateTime<Utc>,
    },

    /// Pause glyph and overlay shown or hidden
    PauseIndicatorChanged {
        paused: bool,
        timestamp: DateTime<Utc>,
    },

    /// Slide-specific entrance effect started
    EntranceEffectTriggered {
        slide: usize,
        /// Effect name (`count_up`, `stats`, `confetti`, `replay`)
        effect: String,
        /// Human-readable summary (final numbers, piece count)
        detail: String,
        timestamp: DateTime<Utc>,
    },

    /// Ambient particles created for a slide
    ParticlesCreated {
        slide: usize,
        count: usize,
        timestamp: DateTime<Utc>,
    },

    /// Background music indicator changed
    SoundStateChanged {
        state: SoundState,
        timestamp: DateTime<Utc>,
    },

    /// Share control label changed (None restores the default label)
    ShareLabelChanged {
        label: Option<String>,
        timestamp: DateTime<Utc>,
    },

    /// Share request completed
    ShareCompleted {
        outcome: ShareOutcome,
        timestamp: DateTime<Utc>,
    },
}

impl PresentationEvent {
    /// Event type name as used in the serialized `type` tag
    pub fn event_type(&self) -> &'static str {
        match self {
            PresentationEvent::SlideChanged { .. } => "SlideChanged",
            PresentationEvent::PhaseChanged { .. } => "PhaseChanged",
            PresentationEvent::SlideAnimated { .. } => "SlideAnimated",
            PresentationEvent::ProgressUpdated { .. } => "ProgressUpdated",
            PresentationEvent::SegmentMarkerChanged { .. } => "SegmentMarkerChanged",
            PresentationEvent::ProgressFrozen { .. } => "ProgressFrozen",
            PresentationEvent::NavControlsChanged { .. } => "NavControlsChanged",
            PresentationEvent::PauseIndicatorChanged { .. } => "PauseIndicatorChanged",
            PresentationEvent::EntranceEffectTriggered { .. } => "EntranceEffectTriggered",
            PresentationEvent::ParticlesCreated { .. } => "ParticlesCreated",
            PresentationEvent::SoundStateChanged { .. } => "SoundStateChanged",
            PresentationEvent::ShareLabelChanged { .. } => "ShareLabelChanged",
            PresentationEvent::ShareCompleted { .. } => "ShareCompleted",
        }
    }
}

/// Broadcast bus for presentation events
///
/// Wraps a tokio broadcast channel. Sending never blocks, so the bus can be
/// used from synchronous state machine code.
#[derive(Debug)]
pub struct EventBus {
    tx: broadcast::Sender<PresentationEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// Slow subscribers lose the oldest events once `capacity` is exceeded.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<PresentationEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: PresentationEvent,
    ) -> Result<usize, broadcast::error::SendError<PresentationEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: PresentationEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = PresentationEvent::PhaseChanged {
            old_phase: Phase::Playing,
            new_phase: Phase::Paused,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "PhaseChanged");
        assert_eq!(json["old_phase"], "playing");
        assert_eq!(json["new_phase"], "paused");
        assert_eq!(event.event_type(), "PhaseChanged");
    }

    #[test]
    fn test_share_outcome_serialization() {
        let outcome = ShareOutcome::Prompted {
            message: "Copy this link: http://x/".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["via"], "prompted");
        assert_eq!(json["message"], "Copy this link: http://x/");
    }

    #[test]
    fn test_emit_without_subscribers_fails() {
        let bus = EventBus::new(8);
        let result = bus.emit(PresentationEvent::PauseIndicatorChanged {
            paused: true,
            timestamp: Utc::now(),
        });
        assert!(result.is_err());
        assert_eq!(bus.capacity(), 8);
    }

    #[tokio::test]
    async fn test_subscriber_receives_events() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        bus.emit_lossy(PresentationEvent::SlideChanged {
            from: 0,
            to: 1,
            direction: Direction::Forward,
            timestamp: Utc::now(),
        });

        match rx.recv().await.unwrap() {
            PresentationEvent::SlideChanged { from, to, direction, .. } => {
                assert_eq!((from, to, direction), (0, 1, Direction::Forward));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
