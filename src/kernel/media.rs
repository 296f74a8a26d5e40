use serde::{Deserialize, Serialize};
use std::fmt;

/// Mirrors `HTMLMediaElement.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReadyState {
    HaveNothing = 0,
    HaveMetadata = 1,
    HaveCurrentData = 2,
    HaveFutureData = 3,
    HaveEnoughData = 4,
}

impl Default for ReadyState {
    fn default() -> Self {
        Self::HaveNothing
    }
}

/// Point-in-time view of the media element, read by the kernel before every step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MediaSnapshot {
    /// `None` until metadata has resolved.
    pub duration: Option<f64>,
    pub current_time: f64,
    pub paused: bool,
    pub ended: bool,
    pub ready_state: ReadyState,
}

impl MediaSnapshot {
    /// What a freshly attached source looks like.
    pub fn unloaded() -> Self {
        Self {
            duration: None,
            current_time: 0.0,
            paused: true,
            ended: false,
            ready_state: ReadyState::HaveNothing,
        }
    }

    /// Duration, if known and positive. Zero or NaN means "not loaded".
    pub fn known_duration(&self) -> Option<f64> {
        self.duration.filter(|d| d.is_finite() && *d > 0.0)
    }
}

/// Terminal media failure, mirroring `MediaError.code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaFault {
    Aborted,
    Network(String),
    Decode(String),
    SourceNotSupported(String),
}

impl fmt::Display for MediaFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaFault::Aborted => f.write_str("fetch aborted"),
            MediaFault::Network(m) => write!(f, "network error: {}", m),
            MediaFault::Decode(m) => write!(f, "decode error: {}", m),
            MediaFault::SourceNotSupported(m) => write!(f, "source not supported: {}", m),
        }
    }
}

/// Events the media element raises.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaSignal {
    MetadataLoaded,
    DataLoaded,
    CanPlay,
    TimeUpdate,
    Seeked,
    Pause,
    Ended,
    Error(MediaFault),
}

impl MediaSignal {
    pub fn is_readiness(&self) -> bool {
        matches!(
            self,
            MediaSignal::MetadataLoaded | MediaSignal::DataLoaded | MediaSignal::CanPlay
        )
    }
}
