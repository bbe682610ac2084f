//! Shared test helpers for slidewrap-player integration tests
//!
//! - `RecordingRenderer`: keeps every draw call plus the resulting visible state
//! - builders for players and presentations on virtual time

#![allow(dead_code)]

use slidewrap_common::events::{Direction, EventBus, SegmentMarker, SoundState};
use slidewrap_common::TomlConfig;
use slidewrap_player::audio::SilentSink;
use slidewrap_player::effects::EntranceEffect;
use slidewrap_player::share::{Clipboard, NoClipboard, ShareError};
use slidewrap_player::{ManualTimers, PlayerSettings, Presentation, Renderer, SlidePlayer, TimerEvent, TimerService};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

/// One recorded renderer call
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    Exit(usize, Direction),
    Enter(usize, Direction),
    Clear(usize),
    Active(usize, bool),
    Effects(usize, Vec<&'static str>),
    Particles(usize, usize),
    Fill(usize, f64),
    Marker(usize, SegmentMarker),
    Freeze(usize, bool),
    Nav(bool, bool),
    Pause(bool),
    Sound(SoundState),
    ShareLabel(Option<String>),
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<RenderCall>,
    pub active: BTreeSet<usize>,
    pub paused: bool,
    pub nav: Option<(bool, bool)>,
    pub sound: Option<SoundState>,
    pub share_label: Option<String>,
}

impl RecordingRenderer {
    /// Slides whose entrance effects fired, in order
    pub fn effect_slides(&self) -> Vec<usize> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RenderCall::Effects(slide, _) => Some(*slide),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&RenderCall) -> bool) -> usize {
        self.calls.iter().filter(|call| pred(call)).count()
    }
}

impl Renderer for RecordingRenderer {
    fn apply_exit_animation(&mut self, slide: usize, direction: Direction) {
        self.calls.push(RenderCall::Exit(slide, direction));
    }

    fn apply_enter_animation(&mut self, slide: usize, direction: Direction) {
        self.calls.push(RenderCall::Enter(slide, direction));
    }

    fn clear_animations(&mut self, slide: usize) {
        self.calls.push(RenderCall::Clear(slide));
    }

    fn set_active(&mut self, slide: usize, active: bool) {
        if active {
            self.active.insert(slide);
        } else {
            self.active.remove(&slide);
        }
        self.calls.push(RenderCall::Active(slide, active));
    }

    fn trigger_entrance_effects(&mut self, slide: usize, effects: &[EntranceEffect]) {
        let names = effects.iter().map(EntranceEffect::name).collect();
        self.calls.push(RenderCall::Effects(slide, names));
    }

    fn create_ambient_particles(&mut self, slide: usize, count: usize) {
        self.calls.push(RenderCall::Particles(slide, count));
    }

    fn set_segment_fill(&mut self, slide: usize, fraction: f64) {
        self.calls.push(RenderCall::Fill(slide, fraction));
    }

    fn set_segment_marker(&mut self, slide: usize, marker: SegmentMarker) {
        self.calls.push(RenderCall::Marker(slide, marker));
    }

    fn freeze_segment_fill(&mut self, slide: usize, frozen: bool) {
        self.calls.push(RenderCall::Freeze(slide, frozen));
    }

    fn update_nav_controls(&mut self, prev_visible: bool, next_visible: bool) {
        self.nav = Some((prev_visible, next_visible));
        self.calls.push(RenderCall::Nav(prev_visible, next_visible));
    }

    fn set_pause_indicator(&mut self, paused: bool) {
        self.paused = paused;
        self.calls.push(RenderCall::Pause(paused));
    }

    fn set_sound_indicator(&mut self, state: SoundState) {
        self.sound = Some(state);
        self.calls.push(RenderCall::Sound(state));
    }

    fn set_share_label(&mut self, label: Option<&str>) {
        self.share_label = label.map(str::to_string);
        self.calls.push(RenderCall::ShareLabel(self.share_label.clone()));
    }
}

/// Clipboard backed by shared memory so tests can read it back
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard(pub Arc<Mutex<Option<String>>>);

impl MemoryClipboard {
    pub fn contents(&self) -> Option<String> {
        self.0.lock().unwrap().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ShareError> {
        *self.0.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}

pub type TestPlayer = SlidePlayer<ManualTimers, RecordingRenderer>;
pub type TestPresentation = Presentation<ManualTimers, RecordingRenderer>;

/// Settings with the built-in timings: 7000ms per slide, 100ms exit, 500ms enter
pub fn settings(slide_count: usize) -> PlayerSettings {
    let mut config = TomlConfig::default();
    config.deck.slide_count = slide_count;
    PlayerSettings::from_config(&config)
}

/// Started player on virtual time
pub fn started_player(slide_count: usize) -> TestPlayer {
    let mut player = SlidePlayer::new(
        settings(slide_count),
        ManualTimers::new(),
        RecordingRenderer::default(),
        Arc::new(EventBus::default()),
    );
    player.start();
    player
}

/// Full transition window (exit + enter)
pub const TRANSITION_MS: u64 = 600;

/// Navigate and let the transition finish
pub fn go_to_settled(player: &mut TestPlayer, target: usize, direction: Direction) -> bool {
    let accepted = player.go_to(target, direction);
    player.advance_by(TRANSITION_MS);
    accepted
}

/// Armed timers carrying `event`
pub fn pending(player: &TestPlayer, event: TimerEvent) -> usize {
    player.timers().pending_with(event).len()
}

/// Deadline of the armed auto-advance timer
pub fn auto_advance_deadline(player: &TestPlayer) -> Option<u64> {
    player
        .auto_advance_timer()
        .and_then(|handle| player.timers().deadline(handle))
}

/// Started presentation with default config and the given clipboard
pub fn started_presentation(clipboard: Box<dyn Clipboard>) -> TestPresentation {
    let config = TomlConfig::default();
    let mut presentation = Presentation::new(
        &config,
        ManualTimers::new(),
        RecordingRenderer::default(),
        Arc::new(EventBus::default()),
        Box::new(SilentSink::new(None)),
        clipboard,
    );
    presentation.start();
    presentation
}

pub fn presentation_without_clipboard() -> TestPresentation {
    started_presentation(Box::new(NoClipboard))
}

pub fn now(presentation: &TestPresentation) -> u64 {
    presentation.player().timers().now_ms()
}
