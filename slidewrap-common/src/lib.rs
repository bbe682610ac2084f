//! # Slidewrap Common Library
//!
//! Shared code for the slidewrap presentation player:
//! - Error type and `Result` alias
//! - TOML configuration loading and validation
//! - Presentation event types and the broadcast `EventBus`

pub mod config;
pub mod error;
pub mod events;

pub use config::TomlConfig;
pub use error::{Error, Result};
pub use events::{Direction, EventBus, Phase, PresentationEvent, SegmentMarker};
