use serde::{Deserialize, Serialize};

/// Coarse lifecycle of the playback controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackingPhase {
    /// No label bound to the video.
    Idle,
    /// Label resolved, waiting for the element to learn its duration.
    AwaitingMetadata,
    /// Seeking, playing and monitoring a segment.
    Tracking,
    /// Current source raised a media error. Only a new source leaves this.
    Failed,
}

impl Default for TrackingPhase {
    fn default() -> Self {
        Self::Idle
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseRequest {
    /// Label resolved but duration unknown.
    Defer,
    /// Label resolved and duration known.
    Engage,
    /// Label could not be resolved (table empty or label missing).
    Unresolved,
    MediaFault,
    SourceAttached,
    Dispose,
}

pub struct PhaseGraph;

impl PhaseGraph {
    /// Pure function: (Current Phase, Request) -> New Phase.
    /// Returns None if the request is ignored in this phase.
    pub fn transition(current: TrackingPhase, request: PhaseRequest) -> Option<TrackingPhase> {
        use PhaseRequest::*;
        use TrackingPhase::*;

        match (current, request) {
            // Only a new source leaves Failed
            (Failed, SourceAttached) => Some(Idle),
            (Failed, Dispose) => Some(Idle),
            (Failed, _) => None,

            (_, Defer) => Some(AwaitingMetadata),
            (_, Engage) => Some(Tracking),
            (_, Unresolved) => Some(Idle),
            (_, MediaFault) => Some(Failed),
            (_, SourceAttached) => Some(Idle),
            (_, Dispose) => Some(Idle),
        }
    }
}
