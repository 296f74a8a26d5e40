use std::collections::VecDeque;
use std::time::Duration;

use crate::error::PlaybackError;
use crate::kernel::media::{MediaFault, MediaSignal, MediaSnapshot, ReadyState};

use super::MediaElement;

/// Deterministic stand-in for a browser video element.
///
/// Time only moves through [`MediaElement::advance`], so tests and the demo
/// binary control exactly when position-monitor ticks happen.
#[derive(Debug)]
pub struct SimulatedVideo {
    source: Option<String>,
    duration: f64,
    /// Metadata resolved: duration is visible.
    loaded: bool,
    current_time: f64,
    paused: bool,
    ended: bool,
    ready_state: ReadyState,
    autoplay_blocked: bool,
    /// Forced outcome for every `play()` call.
    play_rejection: Option<PlaybackError>,
    fault: Option<MediaFault>,
    signals: VecDeque<MediaSignal>,
    pub play_calls: u32,
    pub seek_calls: u32,
    pub load_calls: u32,
}

impl SimulatedVideo {
    /// An element whose source has not been fetched yet.
    pub fn new(duration: f64) -> Self {
        Self {
            source: None,
            duration,
            loaded: false,
            current_time: 0.0,
            paused: true,
            ended: false,
            ready_state: ReadyState::HaveNothing,
            autoplay_blocked: false,
            play_rejection: None,
            fault: None,
            signals: VecDeque::new(),
            play_calls: 0,
            seek_calls: 0,
            load_calls: 0,
        }
    }

    /// An element that already knows its duration and is fully buffered.
    pub fn ready(duration: f64) -> Self {
        let mut video = Self::new(duration);
        video.loaded = true;
        video.ready_state = ReadyState::HaveEnoughData;
        video
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// `play()` fails with the autoplay policy error until [`Self::user_gesture`].
    pub fn block_autoplay(&mut self) {
        self.autoplay_blocked = true;
    }

    pub fn user_gesture(&mut self) {
        self.autoplay_blocked = false;
    }

    /// Makes every `play()` fail with `error` until cleared with `None`.
    pub fn reject_play_with(&mut self, error: Option<PlaybackError>) {
        self.play_rejection = error;
    }

    /// Browser-internal pause (buffer hiccup, seek pause) with data still buffered.
    pub fn stall(&mut self) {
        if !self.paused {
            self.paused = true;
            self.signals.push_back(MediaSignal::Pause);
        }
    }

    /// Raises a terminal media error. Further play calls fail.
    pub fn fail(&mut self, fault: MediaFault) {
        self.paused = true;
        self.ready_state = ReadyState::HaveNothing;
        self.fault = Some(fault.clone());
        self.signals.push_back(MediaSignal::Error(fault));
    }

    /// Resolves metadata as the browser would after `load()`.
    fn resolve_metadata(&mut self) {
        if self.fault.is_some() {
            return;
        }
        self.loaded = true;
        self.ready_state = ReadyState::HaveEnoughData;
        self.signals.push_back(MediaSignal::MetadataLoaded);
        self.signals.push_back(MediaSignal::DataLoaded);
        self.signals.push_back(MediaSignal::CanPlay);
    }
}

impl MediaElement for SimulatedVideo {
    fn snapshot(&self) -> MediaSnapshot {
        MediaSnapshot {
            duration: self.loaded.then_some(self.duration),
            current_time: self.current_time,
            paused: self.paused,
            ended: self.ended,
            ready_state: self.ready_state,
        }
    }

    fn seek(&mut self, seconds: f64) {
        self.seek_calls += 1;
        let limit = if self.loaded { self.duration } else { 0.0 };
        self.current_time = seconds.clamp(0.0, limit);
        self.ended = false;
        self.signals.push_back(MediaSignal::Seeked);
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        self.play_calls += 1;
        if let Some(fault) = &self.fault {
            return Err(PlaybackError::NotSupported(fault.to_string()));
        }
        if let Some(error) = &self.play_rejection {
            return Err(error.clone());
        }
        if self.autoplay_blocked {
            return Err(PlaybackError::PlaybackPolicyBlocked);
        }
        if !self.loaded {
            // Browsers start fetching on play(); the request itself is superseded.
            self.resolve_metadata();
            return Err(PlaybackError::Aborted);
        }
        if self.ended {
            self.current_time = 0.0;
            self.ended = false;
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            self.signals.push_back(MediaSignal::Pause);
        }
    }

    fn load(&mut self) {
        self.load_calls += 1;
        if !self.loaded {
            self.resolve_metadata();
        }
    }

    fn set_source(&mut self, url: &str) {
        self.source = Some(url.to_string());
        self.loaded = false;
        self.fault = None;
        self.current_time = 0.0;
        self.paused = true;
        self.ended = false;
        self.ready_state = ReadyState::HaveNothing;
        self.signals.clear();
    }

    fn advance(&mut self, elapsed: Duration) {
        if self.paused || !self.loaded {
            return;
        }
        self.current_time = (self.current_time + elapsed.as_secs_f64()).min(self.duration);
        self.signals.push_back(MediaSignal::TimeUpdate);
        if self.current_time >= self.duration {
            self.paused = true;
            self.ended = true;
            self.signals.push_back(MediaSignal::Pause);
            self.signals.push_back(MediaSignal::Ended);
        }
    }

    fn drain_signals(&mut self) -> Vec<MediaSignal> {
        self.signals.drain(..).collect()
    }
}
