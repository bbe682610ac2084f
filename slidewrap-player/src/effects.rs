//! Entrance effects and decorative particles
//!
//! The state machine only decides *when* an effect starts (slide activation).
//! This module describes *what* each effect is: count-up numerals, confetti
//! bursts and the ambient particles laid out at startup.

use rand::Rng;
use slidewrap_common::config::EffectConfig;
use std::collections::BTreeMap;

/// Count-up frame period
pub const FRAME_MS: u64 = 16;

/// Confetti palette
pub const CONFETTI_COLORS: [&str; 8] = [
    "#1db954", "#f472b6", "#60a5fa", "#fbbf24", "#a78bfa", "#34d399", "#f87171", "#fff",
];

/// One slide-specific entrance effect
#[derive(Debug, Clone, PartialEq)]
pub enum EntranceEffect {
    /// Single numeral counting up (age slide)
    CountUp(CountUp),
    /// Several statistics counting up together
    Stats(Vec<CountUp>),
    /// Confetti burst with this many pieces
    Confetti { pieces: usize },
}

impl EntranceEffect {
    /// Short name used in logs and events
    pub fn name(&self) -> &'static str {
        match self {
            EntranceEffect::CountUp(_) => "count_up",
            EntranceEffect::Stats(_) => "stats",
            EntranceEffect::Confetti { .. } => "confetti",
        }
    }
}

impl From<&EffectConfig> for EntranceEffect {
    fn from(config: &EffectConfig) -> Self {
        match config {
            EffectConfig::CountUp {
                target,
                duration_ms,
                ..
            } => EntranceEffect::CountUp(CountUp::new(*target, *duration_ms)),
            EffectConfig::Stats {
                values,
                duration_ms,
                ..
            } => EntranceEffect::Stats(
                values
                    .iter()
                    .map(|value| CountUp::new(*value, *duration_ms))
                    .collect(),
            ),
            EffectConfig::Confetti { pieces, .. } => EntranceEffect::Confetti { pieces: *pieces },
        }
    }
}

/// Entrance effects grouped by slide index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntranceEffects {
    by_slide: BTreeMap<usize, Vec<EntranceEffect>>,
}

impl EntranceEffects {
    pub fn from_config(effects: &[EffectConfig]) -> Self {
        let mut by_slide: BTreeMap<usize, Vec<EntranceEffect>> = BTreeMap::new();
        for config in effects {
            by_slide
                .entry(config.index())
                .or_default()
                .push(EntranceEffect::from(config));
        }
        Self { by_slide }
    }

    /// Effects bound to `slide` (empty for plain slides)
    pub fn for_slide(&self, slide: usize) -> &[EntranceEffect] {
        self.by_slide.get(&slide).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Numeral animating from 0 to `target` in [`FRAME_MS`] frames
///
/// Each frame adds `target / (duration / FRAME_MS)`; the shown value is the
/// running total floored and capped at `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountUp {
    pub target: u64,
    pub duration_ms: u64,
}

impl CountUp {
    pub fn new(target: u64, duration_ms: u64) -> Self {
        Self {
            target,
            duration_ms,
        }
    }

    /// Increment per frame
    pub fn step(&self) -> f64 {
        let frames = self.duration_ms as f64 / FRAME_MS as f64;
        if frames <= 0.0 {
            self.target as f64
        } else {
            self.target as f64 / frames
        }
    }

    /// Displayed value `elapsed_ms` after the effect started
    pub fn value_at(&self, elapsed_ms: u64) -> u64 {
        let frames = elapsed_ms / FRAME_MS;
        // absorb float error so the last frame lands exactly on target
        let count = (frames as f64 * self.step() + 1e-9).min(self.target as f64);
        count.floor() as u64
    }

    /// Frames until the target is shown
    pub fn frame_count(&self) -> u64 {
        self.duration_ms.div_ceil(FRAME_MS)
    }
}

/// Format with `.` thousands separators (1.234.567)
pub fn format_grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Confetti piece outline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceShape {
    Round,
    Square,
}

/// One confetti piece
#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiPiece {
    /// Horizontal start position (0-100%)
    pub x_percent: f64,
    pub delay_s: f64,
    pub duration_s: f64,
    pub size_px: f64,
    pub color: &'static str,
    pub shape: PieceShape,
}

/// Lay out a confetti burst
pub fn confetti<R: Rng + ?Sized>(rng: &mut R, pieces: usize) -> Vec<ConfettiPiece> {
    (0..pieces)
        .map(|_| ConfettiPiece {
            x_percent: rng.gen_range(0.0..100.0),
            delay_s: rng.gen_range(0.0..3.0),
            duration_s: rng.gen_range(2.5..5.5),
            size_px: rng.gen_range(6.0..16.0),
            color: CONFETTI_COLORS[rng.gen_range(0..CONFETTI_COLORS.len())],
            shape: if rng.gen_bool(0.5) {
                PieceShape::Round
            } else {
                PieceShape::Square
            },
        })
        .collect()
}

/// One floating background particle
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub size_px: f64,
    pub x_percent: f64,
    pub duration_s: f64,
    /// Negative so the float is already under way when the slide appears
    pub delay_s: f64,
    pub opacity: f64,
}

/// Lay out ambient particles for one slide
pub fn ambient_particles<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Particle> {
    (0..count)
        .map(|_| Particle {
            size_px: rng.gen_range(2.0..6.0),
            x_percent: rng.gen_range(0.0..100.0),
            duration_s: rng.gen_range(6.0..16.0),
            delay_s: -rng.gen_range(0.0..15.0),
            opacity: rng.gen_range(0.3..0.8),
        })
        .collect()
}
