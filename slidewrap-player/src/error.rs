//! Error types for slidewrap-player
//!
//! Navigation never fails: out-of-range targets and reentrant transitions
//! are dropped by the state machine. Audio and share failures are recovered
//! locally by their collaborators. What is left is bad terminal input.

use thiserror::Error;

/// Main error type for slidewrap-player
#[derive(Error, Debug)]
pub enum Error {
    /// Unparseable terminal command
    #[error("Bad command: {0}")]
    BadCommand(String),
}

/// Convenience Result type using slidewrap-player Error
pub type Result<T> = std::result::Result<T, Error>;
