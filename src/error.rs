//! Error taxonomy.
//!
//! Expected playback conditions (segments not loaded, label missing, media
//! not ready) are NOT errors. They surface as status text. The types here
//! cover play rejections, malformed timecodes and the I/O edges of the crate.

use thiserror::Error;

/// Why a `play()` request was refused by the media element.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// Autoplay policy wants a user gesture first. Expected, never surfaced.
    #[error("playback blocked by autoplay policy")]
    PlaybackPolicyBlocked,

    /// The play request was interrupted by a newer load or seek.
    #[error("play request aborted")]
    Aborted,

    /// The current source cannot be played at all.
    #[error("media not supported: {0}")]
    NotSupported(String),

    #[error("play failed: {0}")]
    Other(String),
}

impl PlaybackError {
    /// Rejections that are part of normal browser behaviour and must not be reported.
    pub fn is_expected(&self) -> bool {
        matches!(self, PlaybackError::PlaybackPolicyBlocked | PlaybackError::Aborted)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimecodeError {
    #[error("empty timecode")]
    Empty,

    #[error("invalid timecode component {0:?}")]
    InvalidComponent(String),
}

/// Crate-level error for configuration, segment loading and the chat service.
#[derive(Error, Debug)]
pub enum MimicError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Chat server error: {status}: {message}")]
    ChatServer { status: u16, message: String },

    #[error("Bad request: {0}")]
    BadRequest(String),
}

pub type Result<T> = std::result::Result<T, MimicError>;
