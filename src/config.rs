use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{MimicError, Result};
use crate::kernel::media::ReadyState;

pub const CONFIG_ENV: &str = "MIMIC_CONFIG";
pub const CHAT_URL_ENV: &str = "MIMIC_CHAT_URL";

/// Tunables for the playback kernel and its driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MimicConfig {
    /// Idle label. Its segment loops; every other segment returns to it.
    pub rest_label: String,
    /// Delay before an unexpectedly paused session is resumed.
    pub resume_delay_ms: u64,
    /// Pause recovery only kicks in when the element is at least this buffered.
    pub resume_min_ready_state: ReadyState,
    /// Driver cadence.
    pub tick_ms: u64,
    pub chat_base_url: String,
    pub chat_timeout_ms: u64,
    /// JSON export of expression documents. Stock layout when unset.
    pub segments_path: Option<PathBuf>,
    /// Length of the simulated reaction video used by the binary.
    pub video_duration_secs: f64,
    /// Persona text sent with every chat request.
    pub avatar_description: Option<String>,
}

impl Default for MimicConfig {
    fn default() -> Self {
        Self {
            rest_label: "Neutral".to_string(),
            resume_delay_ms: 200,
            resume_min_ready_state: ReadyState::HaveFutureData,
            tick_ms: 50,
            chat_base_url: "http://localhost:3000".to_string(),
            chat_timeout_ms: 30_000,
            segments_path: None,
            video_duration_secs: 80.0,
            avatar_description: None,
        }
    }
}

impl MimicConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// `MIMIC_CONFIG` file if set, defaults otherwise; `MIMIC_CHAT_URL` wins over both.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Ok(url) = std::env::var(CHAT_URL_ENV) {
            config.chat_base_url = url;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rest_label.trim().is_empty() {
            return Err(MimicError::Config("rest_label must not be empty".into()));
        }
        if self.tick_ms == 0 {
            return Err(MimicError::Config("tick_ms must be positive".into()));
        }
        if !(self.video_duration_secs.is_finite() && self.video_duration_secs > 0.0) {
            return Err(MimicError::Config(format!(
                "video_duration_secs must be positive, got {}",
                self.video_duration_secs
            )));
        }
        Ok(())
    }

    pub fn resume_delay(&self) -> Duration {
        Duration::from_millis(self.resume_delay_ms)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn chat_timeout(&self) -> Duration {
        Duration::from_millis(self.chat_timeout_ms)
    }
}
