//! Configuration loading and config file resolution
//!
//! Configuration is a single TOML document. Every field has a built-in
//! default, so a missing file never prevents startup.
//!
//! # Config File Priority
//!
//! 1. Command-line argument (highest priority)
//! 2. `SLIDEWRAP_CONFIG` environment variable
//! 3. `<config_dir>/slidewrap/config.toml`
//! 4. Built-in defaults (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SLIDEWRAP_CONFIG";

/// Complete player configuration loaded from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TomlConfig {
    pub deck: DeckConfig,
    pub transition: TransitionConfig,
    pub progress: ProgressConfig,
    pub input: InputConfig,
    pub audio: AudioConfig,
    pub share: ShareConfig,
    pub logging: LoggingConfig,

    /// Entrance effects keyed by slide index.
    ///
    /// When absent, the defaults from [`default_effects`] apply.
    pub effects: Option<Vec<EffectConfig>>,
}

/// Slide deck shape and pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Number of slides (N)
    pub slide_count: usize,
    /// Auto-advance budget per slide
    pub slide_duration_ms: u64,
    /// Ambient particles created per slide at startup
    pub particles_per_slide: usize,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            slide_count: 8,
            slide_duration_ms: 7000,
            particles_per_slide: 18,
        }
    }
}

/// Two-phase slide transition timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Delay between applying the exit animation and swapping the active slide
    pub exit_ms: u64,
    /// Duration of the enter animation after the swap
    pub enter_ms: u64,
}

impl TransitionConfig {
    /// Full non-interruptible transition window
    pub fn window_ms(&self) -> u64 {
        self.exit_ms + self.enter_ms
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            exit_ms: 100,
            enter_ms: 500,
        }
    }
}

/// Progress indicator ramp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Interval between fill updates while playing
    pub tick_interval_ms: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
        }
    }
}

/// Gesture recognition thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Horizontal displacement a swipe must exceed
    pub swipe_min_distance_px: f64,
    /// Per-axis displacement below which a short touch counts as a tap
    pub tap_max_distance_px: f64,
    /// Duration below which a small touch counts as a tap
    pub tap_max_duration_ms: u64,
    /// Hold duration that triggers a long-press
    pub long_press_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            swipe_min_distance_px: 50.0,
            tap_max_distance_px: 10.0,
            tap_max_duration_ms: 250,
            long_press_ms: 500,
        }
    }
}

/// Background music
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Playback volume (0.0-1.0)
    pub volume: f32,
    /// Audio track to loop in the background
    pub track: Option<PathBuf>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: 0.6,
            track: None,
        }
    }
}

/// Share link contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    pub title: String,
    pub text: String,
    pub url: String,
    /// How long the "link copied" label stays visible
    pub copied_label_ms: u64,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            title: "Happy Birthday!".to_string(),
            text: "A birthday wrapped, just for you.".to_string(),
            url: "http://localhost/".to_string(),
            copied_label_ms: 2000,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_count_up_ms() -> u64 {
    1200
}

fn default_stats_ms() -> u64 {
    1500
}

fn default_confetti_pieces() -> usize {
    120
}

/// One entrance effect bound to a slide index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectConfig {
    /// Numeral counting up from zero (the "age" slide)
    CountUp {
        index: usize,
        target: u64,
        #[serde(default = "default_count_up_ms")]
        duration_ms: u64,
    },
    /// Statistic numbers counting up together (the "stats" slide)
    Stats {
        index: usize,
        values: Vec<u64>,
        #[serde(default = "default_stats_ms")]
        duration_ms: u64,
    },
    /// Confetti burst (the final slide)
    Confetti {
        index: usize,
        #[serde(default = "default_confetti_pieces")]
        pieces: usize,
    },
}

impl EffectConfig {
    /// Slide index this effect is bound to
    pub fn index(&self) -> usize {
        match self {
            EffectConfig::CountUp { index, .. }
            | EffectConfig::Stats { index, .. }
            | EffectConfig::Confetti { index, .. } => *index,
        }
    }
}

/// Built-in effect layout for a deck of `slide_count` slides:
/// count-up on slide 1, statistics on slide 2, confetti on the last slide.
pub fn default_effects(slide_count: usize) -> Vec<EffectConfig> {
    let mut effects = Vec::new();
    if slide_count > 1 {
        effects.push(EffectConfig::CountUp {
            index: 1,
            target: 22,
            duration_ms: default_count_up_ms(),
        });
    }
    if slide_count > 2 {
        effects.push(EffectConfig::Stats {
            index: 2,
            // days, hours and minutes in 22 years
            values: vec![8_030, 192_720, 11_563_200],
            duration_ms: default_stats_ms(),
        });
    }
    if slide_count > 0 {
        effects.push(EffectConfig::Confetti {
            index: slide_count - 1,
            pieces: default_confetti_pieces(),
        });
    }
    effects
}

impl TomlConfig {
    /// Parse a TOML document and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Resolve the config file and load it
    ///
    /// An explicitly named file (CLI or environment) must exist. When only the
    /// platform default location is available and it is missing, built-in
    /// defaults are used.
    pub fn load(cli_arg: Option<&Path>) -> Result<Self> {
        match resolve_config_path(cli_arg) {
            ConfigSource::Explicit(path) => Self::load_from_file(&path),
            ConfigSource::Default(path) if path.exists() => Self::load_from_file(&path),
            ConfigSource::Default(path) => {
                warn!(
                    "No config file at {}, using built-in defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            ConfigSource::BuiltIn => {
                warn!("No config directory available, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Entrance effects with defaults applied
    pub fn resolved_effects(&self) -> Vec<EffectConfig> {
        match &self.effects {
            Some(effects) => effects.clone(),
            None => default_effects(self.deck.slide_count),
        }
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        let deck = &self.deck;
        if deck.slide_count == 0 {
            return Err(Error::Config("deck.slide_count must be at least 1".to_string()));
        }
        let window = self.transition.window_ms();
        if deck.slide_duration_ms <= window {
            return Err(Error::Config(format!(
                "deck.slide_duration_ms ({}) must exceed the transition window ({}ms)",
                deck.slide_duration_ms, window
            )));
        }
        if self.progress.tick_interval_ms == 0 {
            return Err(Error::Config("progress.tick_interval_ms must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err(Error::Config(format!(
                "audio.volume ({}) must be within 0.0-1.0",
                self.audio.volume
            )));
        }
        let input = &self.input;
        if input.swipe_min_distance_px <= 0.0 || input.tap_max_distance_px < 0.0 {
            return Err(Error::Config("input distances must be positive".to_string()));
        }
        for effect in self.resolved_effects() {
            if effect.index() >= deck.slide_count {
                return Err(Error::Config(format!(
                    "effect on slide {} is outside a deck of {} slides",
                    effect.index(),
                    deck.slide_count
                )));
            }
        }
        Ok(())
    }
}

/// Where the configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named on the command line or in the environment
    Explicit(PathBuf),
    /// Platform default location (may not exist)
    Default(PathBuf),
    /// No location could be determined
    BuiltIn,
}

/// Resolve the config file location following the priority order above
pub fn resolve_config_path(cli_arg: Option<&Path>) -> ConfigSource {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return ConfigSource::Explicit(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return ConfigSource::Explicit(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    match dirs::config_dir() {
        Some(dir) => ConfigSource::Default(dir.join("slidewrap").join("config.toml")),
        None => ConfigSource::BuiltIn,
    }
}
