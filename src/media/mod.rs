//! Media element seam.
//!
//! The kernel never touches a player directly. The reactor owns something
//! implementing [`MediaElement`], snapshots it before every kernel step and
//! applies the resulting side effects to it.

pub mod simulated;

use std::time::Duration;

use crate::error::PlaybackError;
use crate::kernel::media::{MediaSignal, MediaSnapshot};

pub use simulated::SimulatedVideo;

pub trait MediaElement {
    fn snapshot(&self) -> MediaSnapshot;

    /// Sets the playback position. Implementations clamp to the media bounds.
    fn seek(&mut self, seconds: f64);

    fn play(&mut self) -> Result<(), PlaybackError>;

    fn pause(&mut self);

    /// Asks the element to (re)fetch metadata for its current source.
    fn load(&mut self);

    /// Replaces the source. The element is unloaded afterwards.
    fn set_source(&mut self, url: &str);

    /// Advances the element's own clock by `elapsed`.
    fn advance(&mut self, elapsed: Duration);

    /// Signals raised since the last call, oldest first.
    fn drain_signals(&mut self) -> Vec<MediaSignal>;
}
