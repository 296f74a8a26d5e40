use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{interval, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::MimicConfig;
use crate::error::PlaybackError;
use crate::media::MediaElement;

use super::controller::PlaybackController;
use super::effect::{SideEffect, Status};
use super::event::Event;
use super::telemetry::event::{PlayRejectionKind, TelemetryEvent};

/// Async driver around the playback kernel.
///
/// Owns the media element and the status sink. The kernel decides, the
/// reactor performs: every event is handled against a fresh media snapshot
/// and its effects are applied before the next event is looked at.
pub struct Reactor<M: MediaElement> {
    pub receiver: mpsc::Receiver<Event>,
    // Sender clone for timers that post back into the loop
    tx_clone: mpsc::Sender<Event>,
    pub controller: PlaybackController,
    pub media: M,
    status_tx: watch::Sender<Option<Status>>,
    tick: Duration,
}

impl<M: MediaElement> Reactor<M> {
    pub fn new(receiver: mpsc::Receiver<Event>, tx: mpsc::Sender<Event>, media: M, config: MimicConfig) -> Self {
        let (status_tx, _) = watch::channel(None);
        Self {
            receiver,
            tx_clone: tx,
            tick: config.tick(),
            controller: PlaybackController::new(config),
            media,
            status_tx,
        }
    }

    /// Status text sink for the UI.
    pub fn status_feed(&self) -> watch::Receiver<Option<Status>> {
        self.status_tx.subscribe()
    }

    pub fn sender(&self) -> mpsc::Sender<Event> {
        self.tx_clone.clone()
    }

    /// Handles `events` in order, then every media signal the resulting
    /// effects raise. Returns all effects performed.
    pub fn step(&mut self, events: Vec<Event>) -> Vec<SideEffect> {
        let mut queue: VecDeque<Event> = events.into();
        queue.extend(self.media.drain_signals().into_iter().map(Event::Media));

        let mut performed = Vec::new();
        while let Some(event) = queue.pop_front() {
            let snapshot = self.media.snapshot();
            let effects = self.controller.handle(event, &snapshot);
            self.execute(&effects);
            performed.extend(effects);
            queue.extend(self.media.drain_signals().into_iter().map(Event::Media));
        }
        performed
    }

    /// Drains queued inputs and pending media signals.
    pub fn pump(&mut self) -> Vec<SideEffect> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        self.step(events)
    }

    pub fn execute(&mut self, effects: &[SideEffect]) {
        for effect in effects {
            match effect {
                SideEffect::Seek(seconds) => self.media.seek(*seconds),
                SideEffect::Play => {
                    if let Err(e) = self.media.play() {
                        self.on_play_rejected(e);
                    }
                }
                SideEffect::Pause => self.media.pause(),
                SideEffect::Load => self.media.load(),
                SideEffect::SetSource(url) => {
                    info!("Attaching video source {}", url);
                    self.media.set_source(url);
                }
                SideEffect::SetStatus(status) => {
                    info!("[STATUS] {}", status);
                    self.status_tx.send_replace(Some(status.clone()));
                }
                SideEffect::ScheduleResume { session, delay } => {
                    let tx = self.tx_clone.clone();
                    let session = *session;
                    let delay = *delay;
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = tx.send(Event::ResumeDue(session)).await;
                    });
                }
            }
        }
    }

    fn on_play_rejected(&mut self, e: PlaybackError) {
        let kind = match &e {
            PlaybackError::PlaybackPolicyBlocked => PlayRejectionKind::PolicyBlocked,
            PlaybackError::Aborted => PlayRejectionKind::Aborted,
            _ => PlayRejectionKind::Failed,
        };
        if e.is_expected() {
            debug!("Play request not honoured: {}", e);
        } else {
            error!("Video play error: {}", e);
        }
        self.controller.telemetry.record(TelemetryEvent::PlayRejected { kind });
    }

    /// Releases every listener and stops the element.
    pub fn dispose(&mut self) {
        let released = self.controller.dispose();
        self.media.pause();
        self.media.drain_signals();
        info!("Playback disposed, released {} listeners", released);
    }

    /// Async Driver Loop
    pub async fn run(&mut self, shutdown: CancellationToken) {
        info!("Playback reactor started. Tick: {:?}", self.tick);

        let mut cadence = interval(self.tick);
        cadence.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut last = Instant::now();

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = cadence.tick() => {
                    let now = Instant::now();
                    self.media.advance(now - last);
                    last = now;
                    self.pump();
                }
            }
        }

        self.dispose();
    }
}
