use super::event::SessionId;
use super::phase::TrackingPhase;
use super::segment::ResolvedSegment;

/// A label bound to the video for the lifetime of one session.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub session: SessionId,
    pub segment: ResolvedSegment,
    /// Label tracked before this one, if any.
    pub previous: Option<String>,
}

impl Binding {
    pub fn label(&self) -> &str {
        &self.segment.label
    }

    /// True when this binding replaced a different label (not the initial load).
    pub fn is_transition(&self) -> bool {
        match &self.previous {
            Some(prev) => !prev.is_empty() && prev != &self.segment.label,
            None => false,
        }
    }
}

/// Explicit playback state. Only the controller mutates it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    AwaitingMetadata(Binding),
    Tracking(Binding),
    Failed { reason: String },
}

impl PlaybackState {
    pub fn phase(&self) -> TrackingPhase {
        match self {
            PlaybackState::Idle => TrackingPhase::Idle,
            PlaybackState::AwaitingMetadata(_) => TrackingPhase::AwaitingMetadata,
            PlaybackState::Tracking(_) => TrackingPhase::Tracking,
            PlaybackState::Failed { .. } => TrackingPhase::Failed,
        }
    }

    pub fn binding(&self) -> Option<&Binding> {
        match self {
            PlaybackState::AwaitingMetadata(b) | PlaybackState::Tracking(b) => Some(b),
            _ => None,
        }
    }

    /// Whether the media element knows its duration for the bound session.
    pub fn video_ready(&self) -> bool {
        matches!(self, PlaybackState::Tracking(_))
    }
}
