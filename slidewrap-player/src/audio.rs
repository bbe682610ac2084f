//! Background music collaborator
//!
//! Music starts on the first user interaction. A rejected start (autoplay
//! policy, missing device or track) leaves the muted indicator up; it is not
//! retried automatically.

use crate::render::Renderer;
use slidewrap_common::events::SoundState;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// The platform refused to start playback
    #[error("playback rejected: {0}")]
    Rejected(String),

    /// No usable output or track
    #[error("audio unavailable: {0}")]
    Unavailable(String),
}

/// Audio output the music controller drives
pub trait AudioSink {
    fn play(&mut self) -> Result<(), AudioError>;
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
    fn set_volume(&mut self, volume: f32);
}

pub struct BackgroundMusic {
    sink: Box<dyn AudioSink>,
    started: bool,
    state: SoundState,
}

impl BackgroundMusic {
    pub fn new(mut sink: Box<dyn AudioSink>, volume: f32) -> Self {
        sink.set_volume(volume.clamp(0.0, 1.0));
        Self {
            sink,
            started: false,
            state: SoundState::Muted,
        }
    }

    /// Start the music once; later calls are no-ops
    pub fn start<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> SoundState {
        if self.started {
            return self.state;
        }
        self.started = true;
        let state = match self.sink.play() {
            Ok(()) => {
                info!("Background music started");
                SoundState::On
            }
            Err(e) => {
                warn!("Background music blocked, staying muted: {}", e);
                SoundState::Muted
            }
        };
        self.set_state(state, renderer)
    }

    /// Mute/unmute; the first call starts the music instead
    pub fn toggle_mute<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> SoundState {
        if !self.started {
            return self.start(renderer);
        }
        let state = if self.sink.is_paused() {
            match self.sink.play() {
                Ok(()) => SoundState::On,
                Err(e) => {
                    warn!("Could not resume background music: {}", e);
                    SoundState::Muted
                }
            }
        } else {
            self.sink.pause();
            SoundState::Muted
        };
        self.set_state(state, renderer)
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn state(&self) -> SoundState {
        self.state
    }

    fn set_state<R: Renderer + ?Sized>(&mut self, state: SoundState, renderer: &mut R) -> SoundState {
        self.state = state;
        renderer.set_sound_indicator(state);
        state
    }
}

/// Sink with no output device
///
/// Tracks play/pause so the controller behaves normally. When configured
/// with a track that does not exist, every play attempt is rejected.
#[derive(Debug)]
pub struct SilentSink {
    paused: bool,
    volume: f32,
    missing_track: Option<String>,
}

impl SilentSink {
    pub fn new(track: Option<&std::path::Path>) -> Self {
        let missing_track = track
            .filter(|path| !path.exists())
            .map(|path| path.display().to_string());
        Self {
            paused: true,
            volume: 1.0,
            missing_track,
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl AudioSink for SilentSink {
    fn play(&mut self) -> Result<(), AudioError> {
        if let Some(track) = &self.missing_track {
            return Err(AudioError::Unavailable(format!("track not found: {}", track)));
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EntranceEffect;
    use slidewrap_common::events::{Direction, SegmentMarker};
    use std::path::Path;

    #[derive(Default)]
    struct SoundLog(Vec<SoundState>);

    impl Renderer for SoundLog {
        fn apply_exit_animation(&mut self, _: usize, _: Direction) {}
        fn apply_enter_animation(&mut self, _: usize, _: Direction) {}
        fn clear_animations(&mut self, _: usize) {}
        fn set_active(&mut self, _: usize, _: bool) {}
        fn trigger_entrance_effects(&mut self, _: usize, _: &[EntranceEffect]) {}
        fn create_ambient_particles(&mut self, _: usize, _: usize) {}
        fn set_segment_fill(&mut self, _: usize, _: f64) {}
        fn set_segment_marker(&mut self, _: usize, _: SegmentMarker) {}
        fn freeze_segment_fill(&mut self, _: usize, _: bool) {}
        fn update_nav_controls(&mut self, _: bool, _: bool) {}
        fn set_pause_indicator(&mut self, _: bool) {}
        fn set_sound_indicator(&mut self, state: SoundState) {
            self.0.push(state);
        }
        fn set_share_label(&mut self, _: Option<&str>) {}
    }

    /// Sink that rejects the first `rejections` play attempts
    struct FlakySink {
        rejections: usize,
        paused: bool,
    }

    impl AudioSink for FlakySink {
        fn play(&mut self) -> Result<(), AudioError> {
            if self.rejections > 0 {
                self.rejections -= 1;
                return Err(AudioError::Rejected("autoplay blocked".to_string()));
            }
            self.paused = false;
            Ok(())
        }
        fn pause(&mut self) {
            self.paused = true;
        }
        fn is_paused(&self) -> bool {
            self.paused
        }
        fn set_volume(&mut self, _: f32) {}
    }

    #[test]
    fn test_start_is_one_shot() {
        let mut renderer = SoundLog::default();
        let mut music = BackgroundMusic::new(Box::new(SilentSink::new(None)), 0.6);

        assert_eq!(music.start(&mut renderer), SoundState::On);
        assert_eq!(music.start(&mut renderer), SoundState::On);
        assert_eq!(renderer.0, vec![SoundState::On]);
    }

    #[test]
    fn test_rejected_start_falls_back_to_muted() {
        let mut renderer = SoundLog::default();
        let sink = FlakySink { rejections: 1, paused: true };
        let mut music = BackgroundMusic::new(Box::new(sink), 0.6);

        assert_eq!(music.start(&mut renderer), SoundState::Muted);
        assert!(music.is_started());
        // not retried automatically; the user can unmute by hand
        assert_eq!(music.toggle_mute(&mut renderer), SoundState::On);
        assert_eq!(renderer.0, vec![SoundState::Muted, SoundState::On]);
    }

    #[test]
    fn test_toggle_before_start_starts() {
        let mut renderer = SoundLog::default();
        let mut music = BackgroundMusic::new(Box::new(SilentSink::new(None)), 0.6);

        assert_eq!(music.toggle_mute(&mut renderer), SoundState::On);
        assert_eq!(music.toggle_mute(&mut renderer), SoundState::Muted);
        assert_eq!(music.toggle_mute(&mut renderer), SoundState::On);
    }

    #[test]
    fn test_missing_track_is_rejected() {
        let mut sink = SilentSink::new(Some(Path::new("/nonexistent/song.mp3")));
        assert!(matches!(sink.play(), Err(AudioError::Unavailable(_))));
    }
}
