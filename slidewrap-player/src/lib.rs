//! # Slidewrap Player Library
//!
//! Timed slide presentation player.
//!
//! **Purpose:** Show a fixed sequence of slides, advancing automatically on a
//! timer or manually on input, with per-slide entrance effects, a segmented
//! progress indicator, background music and a share link.
//!
//! **Architecture:** A single-owner playback state machine fed by two event
//! sources (timers and input intents). Rendering, audio and sharing are
//! collaborators behind traits, so the core runs unchanged under virtual time
//! in tests and under tokio in the binary.

pub mod audio;
pub mod effects;
pub mod error;
pub mod input;
pub mod playback;
pub mod presentation;
pub mod progress;
pub mod render;
pub mod runtime;
pub mod share;
pub mod terminal;
pub mod timer;

pub use error::{Error, Result};
pub use playback::{PlayerSettings, PlaybackState, SlidePlayer};
pub use presentation::Presentation;
pub use render::Renderer;
pub use timer::{Fired, ManualTimers, TimerEvent, TimerHandle, TimerService, TokioTimers};
