use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TimecodeError;

/// A segment boundary as stored: either a clock string ("00:12", "01:02:03")
/// or a raw number of seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeSpec {
    Seconds(f64),
    Text(String),
}

impl TimeSpec {
    /// Seconds into the reaction video.
    /// Unparseable text resolves to 0.0 so a bad record starts at the top of the video.
    pub fn seconds(&self) -> f64 {
        match self {
            TimeSpec::Seconds(s) => *s,
            TimeSpec::Text(text) => match parse_timecode(text) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!("Unparseable timecode {:?}: {}", text, e);
                    0.0
                }
            },
        }
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeSpec::Seconds(s) => write!(f, "{}", s),
            TimeSpec::Text(t) => f.write_str(t),
        }
    }
}

impl From<&str> for TimeSpec {
    fn from(value: &str) -> Self {
        TimeSpec::Text(value.to_string())
    }
}

impl From<f64> for TimeSpec {
    fn from(value: f64) -> Self {
        TimeSpec::Seconds(value)
    }
}

/// Parses `SS`, `MM:SS`, `HH:MM:SS` (and longer) clock strings.
/// Components are weighted by 60^n counting from the right.
pub fn parse_timecode(text: &str) -> Result<f64, TimecodeError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TimecodeError::Empty);
    }

    let mut total = 0.0;
    for part in trimmed.split(':') {
        let value: f64 = part
            .trim()
            .parse()
            .map_err(|_| TimecodeError::InvalidComponent(part.to_string()))?;
        if !value.is_finite() || value < 0.0 {
            return Err(TimecodeError::InvalidComponent(part.to_string()));
        }
        total = total * 60.0 + value;
    }
    Ok(total)
}
