use serde::{Deserialize, Serialize};

use super::media::MediaSignal;
use super::segment::SegmentTable;

/// Identifies one tracking session. Every track call opens a new one, so
/// anything stamped with an older id is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl SessionId {
    pub fn next(&self) -> Self {
        SessionId(self.0 + 1)
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    /// Fresh segment data from the store. Replaces the table wholesale.
    Segments(SegmentTable),
    /// An expression label to track. `previous` is `None` on first load.
    Track {
        label: String,
        previous: Option<String>,
    },
    /// A freshly classified label. The label tracked right now becomes `previous`.
    Express(String),
    /// Something the media element raised.
    Media(MediaSignal),
    /// A pause-recovery timer armed for `SessionId` has fired.
    ResumeDue(SessionId),
    /// A new video source replaces the current one (avatar switch).
    AttachSource(String),
    /// Explicit user pause. Suppresses auto-resume until `UserPlay`.
    UserPause,
    UserPlay,
    Dispose,
}

impl Event {
    pub fn track(label: &str, previous: Option<&str>) -> Self {
        Event::Track {
            label: label.to_string(),
            previous: previous.map(str::to_string),
        }
    }
}
