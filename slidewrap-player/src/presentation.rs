//! Presentation: the player plus its collaborators
//!
//! Wires input routing, background music and sharing around a
//! [`SlidePlayer`]. Everything here runs on the single task that owns the
//! presentation; fired timers come back through [`Presentation::on_timer`].

use crate::audio::{AudioSink, BackgroundMusic};
use crate::input::{GestureThresholds, InputEvent, InputRouter, Intent};
use crate::playback::{PlayerSettings, SlidePlayer};
use crate::render::Renderer;
use crate::share::{share_link, Clipboard, ShareRequest, ShareSheet, COPIED_LABEL};
use crate::timer::{Fired, ManualTimers, TimerEvent, TimerHandle, TimerService};
use slidewrap_common::events::{EventBus, PresentationEvent, ShareOutcome, SoundState};
use slidewrap_common::TomlConfig;
use std::sync::Arc;
use tracing::debug;

pub struct Presentation<T: TimerService, R: Renderer> {
    player: SlidePlayer<T, R>,
    router: InputRouter,
    music: BackgroundMusic,
    share_sheet: Option<Box<dyn ShareSheet>>,
    clipboard: Box<dyn Clipboard>,
    share_request: ShareRequest,
    copied_label_ms: u64,
    share_restore: Option<TimerHandle>,
}

impl<T: TimerService, R: Renderer> Presentation<T, R> {
    /// Build a presentation from validated configuration
    pub fn new(
        config: &TomlConfig,
        timers: T,
        renderer: R,
        events: Arc<EventBus>,
        audio: Box<dyn AudioSink>,
        clipboard: Box<dyn Clipboard>,
    ) -> Self {
        let player = SlidePlayer::new(PlayerSettings::from_config(config), timers, renderer, events);
        Self {
            player,
            router: InputRouter::new(GestureThresholds::from(&config.input)),
            music: BackgroundMusic::new(audio, config.audio.volume),
            share_sheet: None,
            clipboard,
            share_request: ShareRequest::from(&config.share),
            copied_label_ms: config.share.copied_label_ms,
            share_restore: None,
        }
    }

    /// Use a platform share sheet ahead of the clipboard
    pub fn with_share_sheet(mut self, sheet: Box<dyn ShareSheet>) -> Self {
        self.share_sheet = Some(sheet);
        self
    }

    /// Run the player's startup sequence
    pub fn start(&mut self) {
        self.player.start();
    }

    /// Route one raw input event and apply the resulting intent
    pub fn handle_input(&mut self, event: InputEvent) -> Option<Intent> {
        let intent = self.router.handle(event, self.player.timers_mut())?;
        self.apply(intent);
        Some(intent)
    }

    pub fn apply(&mut self, intent: Intent) {
        debug!("Applying {:?}", intent);
        match intent {
            Intent::Next => {
                self.player.next();
            }
            Intent::Prev => {
                self.player.prev();
            }
            Intent::TogglePause => {
                self.player.toggle_pause();
            }
            Intent::Restart => self.player.restart(),
            Intent::Share => self.share(),
            Intent::ToggleSound => {
                self.music.toggle_mute(self.player.renderer_mut());
            }
            Intent::Start => {
                self.music.start(self.player.renderer_mut());
                self.player.next();
            }
        }
    }

    /// Dispatch a fired timer to whichever part armed it
    pub fn on_timer(&mut self, fired: Fired) {
        match fired.event {
            TimerEvent::LongPress => {
                if let Some(intent) = self.router.on_long_press(&fired) {
                    self.apply(intent);
                }
            }
            TimerEvent::ShareLabelRestore => {
                if self.share_restore == Some(fired.handle) {
                    self.share_restore = None;
                    self.player.renderer_mut().set_share_label(None);
                } else {
                    debug!("Ignoring stale share label restore {}", fired.handle);
                }
            }
            _ => self.player.on_timer(fired),
        }
    }

    pub fn player(&self) -> &SlidePlayer<T, R> {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut SlidePlayer<T, R> {
        &mut self.player
    }

    pub fn sound_state(&self) -> SoundState {
        self.music.state()
    }

    pub fn long_press_pending(&self) -> bool {
        self.router.long_press_pending()
    }

    fn share(&mut self) {
        let sheet = self
            .share_sheet
            .as_deref_mut()
            .map(|sheet| sheet as &mut dyn ShareSheet);
        let outcome = share_link(&self.share_request, sheet, self.clipboard.as_mut());

        if outcome == ShareOutcome::Copied {
            if let Some(handle) = self.share_restore.take() {
                self.player.timers_mut().cancel(handle);
            }
            self.player.renderer_mut().set_share_label(Some(COPIED_LABEL));
            self.share_restore = Some(
                self.player
                    .timers_mut()
                    .after(self.copied_label_ms, TimerEvent::ShareLabelRestore),
            );
        }

        self.player
            .events()
            .emit_lossy(PresentationEvent::ShareCompleted {
                outcome,
                timestamp: chrono::Utc::now(),
            });
    }
}

impl<R: Renderer> Presentation<ManualTimers, R> {
    /// Fire every timer due up to `until_ms`, then move the clock there
    pub fn advance_to(&mut self, until_ms: u64) {
        while let Some(fired) = self.player.timers_mut().pop_due(until_ms) {
            self.on_timer(fired);
        }
        self.player.timers_mut().set_now(until_ms);
    }

    pub fn advance_by(&mut self, delta_ms: u64) {
        let until = self.player.timers().now_ms() + delta_ms;
        self.advance_to(until);
    }
}
