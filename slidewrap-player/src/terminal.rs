//! Terminal front end
//!
//! - [`BusRenderer`]: renderer that publishes everything it is asked to draw
//!   as [`PresentationEvent`]s
//! - [`TerminalCommand`]: one-line commands read from stdin
//! - [`EventPrinter`]: formats bus events for stdout (text or JSON lines)

use crate::effects::{ambient_particles, confetti, format_grouped, EntranceEffect, PieceShape};
use crate::error::{Error, Result};
use crate::input::{Control, InputEvent, Key, TapZone};
use crate::render::Renderer;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use slidewrap_common::events::{
    Direction, EventBus, PresentationEvent, SegmentMarker, ShareOutcome, SlideAnimation,
    SoundState,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Renderer that turns draw calls into bus events
pub struct BusRenderer {
    events: Arc<EventBus>,
    rng: StdRng,
}

impl BusRenderer {
    pub fn new(events: Arc<EventBus>) -> Self {
        Self {
            events,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic confetti and particle layout
    pub fn with_seed(events: Arc<EventBus>, seed: u64) -> Self {
        Self {
            events,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn animate(&self, slide: usize, animation: SlideAnimation) {
        self.events.emit_lossy(PresentationEvent::SlideAnimated {
            slide,
            animation,
            timestamp: Utc::now(),
        });
    }

    fn effect_detail(&mut self, effect: &EntranceEffect) -> String {
        match effect {
            EntranceEffect::CountUp(count) => format!(
                "0 -> {} over {} frames",
                count.target,
                count.frame_count()
            ),
            EntranceEffect::Stats(values) => values
                .iter()
                .map(|count| format_grouped(count.target))
                .collect::<Vec<_>>()
                .join(" / "),
            EntranceEffect::Confetti { pieces } => {
                let burst = confetti(&mut self.rng, *pieces);
                let round = burst
                    .iter()
                    .filter(|piece| piece.shape == PieceShape::Round)
                    .count();
                format!("{} pieces ({} round, {} square)", burst.len(), round, burst.len() - round)
            }
        }
    }
}

impl Renderer for BusRenderer {
    fn apply_exit_animation(&mut self, slide: usize, direction: Direction) {
        self.animate(slide, SlideAnimation::Exit { direction });
    }

    fn apply_enter_animation(&mut self, slide: usize, direction: Direction) {
        self.animate(slide, SlideAnimation::Enter { direction });
    }

    fn clear_animations(&mut self, slide: usize) {
        self.animate(slide, SlideAnimation::Cleared);
    }

    fn set_active(&mut self, slide: usize, active: bool) {
        let animation = if active {
            SlideAnimation::Activated
        } else {
            SlideAnimation::Deactivated
        };
        self.animate(slide, animation);
    }

    fn trigger_entrance_effects(&mut self, slide: usize, effects: &[EntranceEffect]) {
        self.events
            .emit_lossy(PresentationEvent::EntranceEffectTriggered {
                slide,
                effect: "replay".to_string(),
                detail: String::new(),
                timestamp: Utc::now(),
            });
        for effect in effects {
            let detail = self.effect_detail(effect);
            self.events
                .emit_lossy(PresentationEvent::EntranceEffectTriggered {
                    slide,
                    effect: effect.name().to_string(),
                    detail,
                    timestamp: Utc::now(),
                });
        }
    }

    fn create_ambient_particles(&mut self, slide: usize, count: usize) {
        let particles = ambient_particles(&mut self.rng, count);
        self.events.emit_lossy(PresentationEvent::ParticlesCreated {
            slide,
            count: particles.len(),
            timestamp: Utc::now(),
        });
    }

    fn set_segment_fill(&mut self, slide: usize, fraction: f64) {
        self.events.emit_lossy(PresentationEvent::ProgressUpdated {
            slide,
            percent: fraction * 100.0,
            timestamp: Utc::now(),
        });
    }

    fn set_segment_marker(&mut self, slide: usize, marker: SegmentMarker) {
        self.events
            .emit_lossy(PresentationEvent::SegmentMarkerChanged {
                slide,
                marker,
                timestamp: Utc::now(),
            });
    }

    fn freeze_segment_fill(&mut self, slide: usize, frozen: bool) {
        self.events.emit_lossy(PresentationEvent::ProgressFrozen {
            slide,
            frozen,
            timestamp: Utc::now(),
        });
    }

    fn update_nav_controls(&mut self, prev_visible: bool, next_visible: bool) {
        self.events
            .emit_lossy(PresentationEvent::NavControlsChanged {
                prev_visible,
                next_visible,
                timestamp: Utc::now(),
            });
    }

    fn set_pause_indicator(&mut self, paused: bool) {
        self.events
            .emit_lossy(PresentationEvent::PauseIndicatorChanged {
                paused,
                timestamp: Utc::now(),
            });
    }

    fn set_sound_indicator(&mut self, state: SoundState) {
        self.events.emit_lossy(PresentationEvent::SoundStateChanged {
            state,
            timestamp: Utc::now(),
        });
    }

    fn set_share_label(&mut self, label: Option<&str>) {
        self.events
            .emit_lossy(PresentationEvent::ShareLabelChanged {
                label: label.map(str::to_string),
                timestamp: Utc::now(),
            });
    }
}

/// One line of terminal input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TerminalCommand {
    Key(Key),
    Control(Control),
    Tap(TapZone),
    /// Complete swipe gesture: touch down, move by (dx, dy), lift after dt
    Swipe { dx: f64, dy: f64, dt_ms: u64 },
    TouchDown { x: f64, y: f64 },
    TouchUp { x: f64, y: f64 },
    Quit,
}

impl TerminalCommand {
    /// Parse one input line; blank lines yield `None`
    ///
    /// A line made only of spaces counts as the space key.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return Ok(None);
        }
        if line.trim().is_empty() {
            return Ok(Some(TerminalCommand::Key(Key::Space)));
        }

        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match (head.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("n" | "next", []) => TerminalCommand::Control(Control::Next),
            ("p" | "prev", []) => TerminalCommand::Control(Control::Prev),
            ("right", []) => TerminalCommand::Key(Key::ArrowRight),
            ("left", []) => TerminalCommand::Key(Key::ArrowLeft),
            ("space", []) => TerminalCommand::Key(Key::Space),
            ("pause", []) => TerminalCommand::Control(Control::Pause),
            ("r" | "restart", []) => TerminalCommand::Control(Control::Restart),
            ("s" | "share", []) => TerminalCommand::Control(Control::Share),
            ("m" | "sound", []) => TerminalCommand::Control(Control::Sound),
            ("start", []) => TerminalCommand::Control(Control::Start),
            ("q" | "quit", []) => TerminalCommand::Quit,
            ("tap", ["left"]) => TerminalCommand::Tap(TapZone::Left),
            ("tap", ["right"]) => TerminalCommand::Tap(TapZone::Right),
            ("swipe", [dx, dy, dt]) => TerminalCommand::Swipe {
                dx: parse_number(dx)?,
                dy: parse_number(dy)?,
                dt_ms: parse_number(dt)?,
            },
            ("down", [x, y]) => TerminalCommand::TouchDown {
                x: parse_number(x)?,
                y: parse_number(y)?,
            },
            ("up", [x, y]) => TerminalCommand::TouchUp {
                x: parse_number(x)?,
                y: parse_number(y)?,
            },
            _ => return Err(Error::BadCommand(line.trim().to_string())),
        };
        Ok(Some(command))
    }

    /// Input events for this command, stamped at `now_ms`
    ///
    /// Empty for [`TerminalCommand::Quit`].
    pub fn to_input_events(self, now_ms: u64) -> Vec<InputEvent> {
        match self {
            TerminalCommand::Key(key) => vec![InputEvent::Key(key)],
            TerminalCommand::Control(control) => vec![InputEvent::Control(control)],
            TerminalCommand::Tap(zone) => vec![InputEvent::Tap(zone)],
            TerminalCommand::Swipe { dx, dy, dt_ms } => vec![
                InputEvent::TouchStart {
                    x: 0.0,
                    y: 0.0,
                    at_ms: now_ms,
                },
                InputEvent::TouchEnd {
                    x: dx,
                    y: dy,
                    at_ms: now_ms.saturating_add(dt_ms),
                },
            ],
            TerminalCommand::TouchDown { x, y } => vec![InputEvent::TouchStart { x, y, at_ms: now_ms }],
            TerminalCommand::TouchUp { x, y } => vec![InputEvent::TouchEnd { x, y, at_ms: now_ms }],
            TerminalCommand::Quit => Vec::new(),
        }
    }
}

fn parse_number<N: std::str::FromStr>(word: &str) -> Result<N> {
    word.parse()
        .map_err(|_| Error::BadCommand(format!("not a number: {}", word)))
}

/// Formats bus events for the terminal
///
/// Text mode prints one line per user-visible change and reports progress
/// only at quarter marks. JSON mode prints every event.
#[derive(Debug, Default)]
pub struct EventPrinter {
    json: bool,
    /// Last quarter mark printed per slide
    quarters: HashMap<usize, u8>,
}

impl EventPrinter {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            quarters: HashMap::new(),
        }
    }

    /// Line to print for `event`, if any
    pub fn format(&mut self, event: &PresentationEvent) -> Option<String> {
        if self.json {
            return serde_json::to_string(event).ok();
        }

        match event {
            PresentationEvent::SlideChanged {
                from, to, direction, ..
            } => Some(format!("slide {} -> {} ({})", from + 1, to + 1, direction)),
            PresentationEvent::PhaseChanged { new_phase, .. } => {
                Some(format!("[{}]", new_phase))
            }
            PresentationEvent::ProgressUpdated { slide, percent, .. } => {
                let quarter = (percent / 25.0).floor().clamp(0.0, 4.0) as u8;
                let last = self.quarters.entry(*slide).or_insert(0);
                if quarter < *last || *percent == 0.0 {
                    // segment was reset
                    *last = quarter;
                    return None;
                }
                if quarter == *last {
                    return None;
                }
                *last = quarter;
                Some(format!("slide {} progress {}%", slide + 1, u32::from(quarter) * 25))
            }
            PresentationEvent::PauseIndicatorChanged { paused, .. } => {
                Some(if *paused { "|| paused" } else { "> playing" }.to_string())
            }
            PresentationEvent::EntranceEffectTriggered {
                slide, effect, detail, ..
            } if effect != "replay" => Some(format!("slide {} {}: {}", slide + 1, effect, detail)),
            PresentationEvent::NavControlsChanged {
                prev_visible,
                next_visible,
                ..
            } => Some(format!(
                "controls: {}{}",
                if *prev_visible { "<prev " } else { "" },
                if *next_visible { "next>" } else { "" }
            )),
            PresentationEvent::SoundStateChanged { state, .. } => Some(format!("sound {}", state)),
            PresentationEvent::ShareLabelChanged { label, .. } => {
                label.as_ref().map(|label| format!("share: {}", label))
            }
            PresentationEvent::ShareCompleted { outcome, .. } => match outcome {
                ShareOutcome::Shared => Some("shared".to_string()),
                ShareOutcome::Copied => None,
                ShareOutcome::Prompted { message } => {
                    Some(message.clone())
                }
            },
            _ => None,
        }
    }
}
