use serde::{Deserialize, Serialize};

use crate::kernel::event::SessionId;
use crate::kernel::phase::TrackingPhase;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TelemetryEvent {
    PhaseTransition {
        from: TrackingPhase,
        to: TrackingPhase,
    },

    SessionStarted {
        session: SessionId,
        label: String,
        /// false on initial load, true when replacing a different label
        transition: bool,
    },

    /// Track requested before the element knew its duration.
    Deferred {
        session: SessionId,
    },

    Unresolved {
        label: String,
        reason: UnresolvedReason,
    },

    /// Rest segment reached its end and wrapped.
    SegmentLooped {
        session: SessionId,
    },

    /// A one-shot segment finished and handed back to the rest label.
    AutoReturn {
        from: SessionId,
    },

    ResumeScheduled {
        session: SessionId,
    },

    ResumeApplied {
        session: SessionId,
    },

    /// A timer fired for a session that is no longer current.
    StaleDiscarded {
        session: SessionId,
    },

    ListenersReleased {
        count: usize,
    },

    PlayRejected {
        kind: PlayRejectionKind,
    },

    SourceFault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnresolvedReason {
    NotLoaded,
    Missing,
    SourceFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayRejectionKind {
    PolicyBlocked,
    Aborted,
    Failed,
}
