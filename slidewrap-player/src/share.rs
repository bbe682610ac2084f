//! Share collaborator
//!
//! Fallback chain: platform share sheet, then clipboard, then a prompt
//! showing the link for manual copying. Each step is tried once.

use slidewrap_common::config::ShareConfig;
use slidewrap_common::events::ShareOutcome;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShareError {
    /// Capability not present on this platform
    #[error("not supported on this platform")]
    Unsupported,

    /// User dismissed the share sheet
    #[error("cancelled")]
    Cancelled,

    #[error("failed: {0}")]
    Failed(String),
}

/// What gets shared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl From<&ShareConfig> for ShareRequest {
    fn from(config: &ShareConfig) -> Self {
        Self {
            title: config.title.clone(),
            text: config.text.clone(),
            url: config.url.clone(),
        }
    }
}

/// Platform share sheet
pub trait ShareSheet {
    fn share(&mut self, request: &ShareRequest) -> Result<(), ShareError>;
}

/// Clipboard writer
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ShareError>;
}

/// Label shown on the share control after a successful copy
pub const COPIED_LABEL: &str = "Link copied!";

/// Run the fallback chain
pub fn share_link(
    request: &ShareRequest,
    sheet: Option<&mut dyn ShareSheet>,
    clipboard: &mut dyn Clipboard,
) -> ShareOutcome {
    if let Some(sheet) = sheet {
        match sheet.share(request) {
            Ok(()) => {
                info!("Shared {} via share sheet", request.url);
                return ShareOutcome::Shared;
            }
            Err(e) => debug!("Share sheet unavailable ({}), trying clipboard", e),
        }
    }

    match clipboard.write_text(&request.url) {
        Ok(()) => {
            info!("Copied {} to clipboard", request.url);
            ShareOutcome::Copied
        }
        Err(e) => {
            warn!("Clipboard unavailable ({}), prompting for manual copy", e);
            ShareOutcome::Prompted {
                message: format!("Copy this link: {}", request.url),
            }
        }
    }
}

/// Clipboard for environments without one
#[derive(Debug, Default)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn write_text(&mut self, _text: &str) -> Result<(), ShareError> {
        Err(ShareError::Unsupported)
    }
}
