use std::fmt;
use std::time::Duration;

use super::event::SessionId;

/// Text shown in the segment-info line of the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Tracking {
        label: String,
        start: String,
        end: String,
    },
    MissingSegment(String),
    NotLoaded,
    MediaError(String),
    SourceUnavailable,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Tracking { label, start, end } => {
                write!(f, "Tracking \"{}\": {} → {}", label, start, end)
            }
            Status::MissingSegment(label) => {
                write!(f, "No segment configured for \"{}\" in database.", label)
            }
            Status::NotLoaded => f.write_str("Expressions not loaded yet."),
            Status::MediaError(detail) => {
                write!(f, "Error loading video ({}). Please check the video URL.", detail)
            }
            Status::SourceUnavailable => {
                f.write_str("Video unavailable. Select another avatar to continue.")
            }
        }
    }
}

/// Work the kernel asks the driver to perform against the media element.
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    Seek(f64),
    /// Ensure playback. Rejections are classified by the driver.
    Play,
    Pause,
    Load,
    SetSource(String),
    SetStatus(Status),
    /// Post `Event::ResumeDue(session)` after `delay`.
    ScheduleResume { session: SessionId, delay: Duration },
}
