use tracing::{debug, warn};

use crate::config::MimicConfig;

use super::effect::{SideEffect, Status};
use super::event::{Event, SessionId};
use super::media::{MediaFault, MediaSignal, MediaSnapshot};
use super::phase::{PhaseGraph, PhaseRequest};
use super::segment::{ResolvedSegment, SegmentLookup, SegmentTable};
use super::state::{Binding, PlaybackState};
use super::subscription::{ListenerKind, ListenerScope, READINESS};
use super::telemetry::event::{TelemetryEvent, UnresolvedReason};
use super::telemetry::recorder::TelemetryRecorder;

/// Expression playback kernel.
///
/// Pure with respect to I/O: every entry point takes the current media
/// snapshot and returns the side effects to perform. All state lives here;
/// the driver owns the media element and the timers.
#[derive(Debug)]
pub struct PlaybackController {
    config: MimicConfig,
    segments: SegmentTable,
    state: PlaybackState,
    current_label: Option<String>,
    previous_label: Option<String>,
    last_session: SessionId,
    /// Listeners of the current session. Replaced on every track call.
    scope: Option<ListenerScope>,
    /// Set by an explicit user pause; suppresses auto-resume.
    held: bool,
    status: Option<Status>,
    pub telemetry: TelemetryRecorder,
}

impl PlaybackController {
    pub fn new(config: MimicConfig) -> Self {
        Self {
            config,
            segments: SegmentTable::new(),
            state: PlaybackState::Idle,
            current_label: None,
            previous_label: None,
            last_session: SessionId(0),
            scope: None,
            held: false,
            status: None,
            telemetry: TelemetryRecorder::new(),
        }
    }

    // Read-only accessors

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn current_label(&self) -> Option<&str> {
        self.current_label.as_deref()
    }

    pub fn previous_label(&self) -> Option<&str> {
        self.previous_label.as_deref()
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn armed_listeners(&self) -> usize {
        self.scope.as_ref().map_or(0, ListenerScope::len)
    }

    /// Transition function: (state, event) -> effects.
    pub fn handle(&mut self, event: Event, media: &MediaSnapshot) -> Vec<SideEffect> {
        match event {
            Event::Segments(table) => {
                self.set_segment_table(table);
                Vec::new()
            }
            Event::Track { label, previous } => {
                self.track_expression(&label, previous.as_deref(), media)
            }
            Event::Express(label) => {
                let previous = self.current_label.clone();
                self.track_expression(&label, previous.as_deref(), media)
            }
            Event::Media(signal) => self.on_media(signal, media),
            Event::ResumeDue(session) => self.on_resume_due(session, media),
            Event::AttachSource(url) => self.attach_source(url),
            Event::UserPause => self.user_pause(),
            Event::UserPlay => self.user_play(media),
            Event::Dispose => {
                self.dispose();
                Vec::new()
            }
        }
    }

    /// Replaces the segment table. Current playback is untouched.
    pub fn set_segment_table(&mut self, table: SegmentTable) {
        debug!("Segment table replaced: {} labels", table.len());
        self.segments = table;
    }

    pub fn track_expression(
        &mut self,
        label: &str,
        previous: Option<&str>,
        media: &MediaSnapshot,
    ) -> Vec<SideEffect> {
        let label = match label.trim() {
            "" => self.config.rest_label.clone(),
            l => l.to_string(),
        };
        let mut effects = Vec::new();

        // Supersede whatever the last call armed.
        self.release_scope();
        self.held = false;
        self.previous_label = previous.filter(|p| !p.is_empty()).map(str::to_string);
        self.current_label = Some(label.clone());

        if matches!(self.state, PlaybackState::Failed { .. }) {
            self.telemetry.record(TelemetryEvent::Unresolved {
                label,
                reason: UnresolvedReason::SourceFailed,
            });
            self.set_status(Status::SourceUnavailable, &mut effects);
            return effects;
        }

        let segment = match self.segments.lookup(&label) {
            SegmentLookup::Found(segment) => segment,
            SegmentLookup::NotLoaded => {
                debug!("Track {:?} ignored: no segments loaded", label);
                self.unresolved(label, UnresolvedReason::NotLoaded, Status::NotLoaded, &mut effects);
                return effects;
            }
            SegmentLookup::Missing => {
                warn!("No segment configured for {:?}; available: {:?}", label, self.segments.labels());
                let status = Status::MissingSegment(label.clone());
                self.unresolved(label, UnresolvedReason::Missing, status, &mut effects);
                return effects;
            }
        };

        let session = self.last_session.next();
        self.last_session = session;
        self.scope = Some(ListenerScope::new(session));

        let binding = Binding {
            session,
            segment,
            previous: self.previous_label.clone(),
        };
        self.telemetry.record(TelemetryEvent::SessionStarted {
            session,
            label: binding.label().to_string(),
            transition: binding.is_transition(),
        });

        match media.known_duration() {
            Some(duration) => self.engage(binding, duration, media, &mut effects),
            None => self.defer(binding, &mut effects),
        }
        effects
    }

    /// Releases every listener and forgets the tracked label.
    /// Returns how many listeners were released.
    pub fn dispose(&mut self) -> usize {
        let released = self.release_scope();
        self.enter(PhaseRequest::Dispose, PlaybackState::Idle);
        self.current_label = None;
        self.previous_label = None;
        self.held = false;
        released
    }

    fn unresolved(
        &mut self,
        label: String,
        reason: UnresolvedReason,
        status: Status,
        effects: &mut Vec<SideEffect>,
    ) {
        self.telemetry.record(TelemetryEvent::Unresolved { label, reason });
        self.enter(PhaseRequest::Unresolved, PlaybackState::Idle);
        self.set_status(status, effects);
    }

    fn defer(&mut self, binding: Binding, effects: &mut Vec<SideEffect>) {
        debug!("Duration unknown, deferring {:?} (session {:?})", binding.label(), binding.session);
        if let Some(scope) = self.scope.as_mut() {
            for kind in READINESS {
                scope.listen_once(kind);
            }
        }
        self.telemetry.record(TelemetryEvent::Deferred { session: binding.session });
        self.enter(PhaseRequest::Defer, PlaybackState::AwaitingMetadata(binding));
        effects.push(SideEffect::Load);
    }

    fn engage(
        &mut self,
        binding: Binding,
        duration: f64,
        media: &MediaSnapshot,
        effects: &mut Vec<SideEffect>,
    ) {
        let target = clamp_seek(binding.segment.start_seconds, duration);
        debug!("Seeking to {}s for {:?}", target, binding.label());

        effects.push(SideEffect::Seek(target));
        if media.paused {
            effects.push(SideEffect::Play);
        }

        if let Some(scope) = self.scope.as_mut() {
            scope.listen_once(ListenerKind::Seeked);
            scope.listen(ListenerKind::TimeUpdate);
            scope.listen(ListenerKind::Pause);
            scope.listen(ListenerKind::Ended);
        }

        let status = tracking_status(&binding.segment);
        self.enter(PhaseRequest::Engage, PlaybackState::Tracking(binding));
        self.set_status(status, effects);
    }

    fn on_media(&mut self, signal: MediaSignal, media: &MediaSnapshot) -> Vec<SideEffect> {
        let mut effects = Vec::new();

        let signal = match signal {
            MediaSignal::Error(fault) => {
                self.fail(fault, &mut effects);
                return effects;
            }
            other => other,
        };

        let Some(kind) = ListenerKind::of(&signal) else {
            return effects;
        };
        let armed = match self.scope.as_mut() {
            Some(scope) => scope.fire(kind),
            None => false,
        };
        if !armed {
            return effects;
        }

        match signal {
            readiness if readiness.is_readiness() => self.on_readiness(media, &mut effects),
            MediaSignal::Seeked => self.ensure_playing(media, &mut effects),
            MediaSignal::TimeUpdate => self.on_time_update(media, &mut effects),
            MediaSignal::Pause => self.on_pause(media, &mut effects),
            MediaSignal::Ended => {
                // Signals queue up; an Ended raised before a newer seek is stale.
                if !media.ended {
                    debug!("Ignoring Ended, element has moved on");
                    return effects;
                }
                if let PlaybackState::Tracking(binding) = &self.state {
                    let binding = binding.clone();
                    self.on_segment_end(binding, media, &mut effects);
                }
            }
            _ => {}
        }
        effects
    }

    fn on_readiness(&mut self, media: &MediaSnapshot, effects: &mut Vec<SideEffect>) {
        let PlaybackState::AwaitingMetadata(binding) = &self.state else {
            return;
        };
        // A readiness event without a usable duration leaves the other listeners armed.
        let Some(duration) = media.known_duration() else {
            return;
        };
        let binding = binding.clone();
        if let Some(scope) = self.scope.as_mut() {
            scope.release(&READINESS);
        }
        self.engage(binding, duration, media, effects);
    }

    fn on_time_update(&mut self, media: &MediaSnapshot, effects: &mut Vec<SideEffect>) {
        let PlaybackState::Tracking(binding) = &self.state else {
            return;
        };
        let binding = binding.clone();

        let boundary = match media.known_duration() {
            Some(duration) => binding.segment.end_seconds.min(duration),
            None => binding.segment.end_seconds,
        };
        if media.current_time >= boundary {
            self.on_segment_end(binding, media, effects);
        } else {
            self.ensure_playing(media, effects);
        }
    }

    fn on_segment_end(&mut self, binding: Binding, media: &MediaSnapshot, effects: &mut Vec<SideEffect>) {
        if binding.label() == self.config.rest_label {
            let duration = media.known_duration().unwrap_or(binding.segment.start_seconds);
            effects.push(SideEffect::Seek(clamp_seek(binding.segment.start_seconds, duration)));
            if media.paused && !self.held {
                effects.push(SideEffect::Play);
            }
            self.telemetry.record(TelemetryEvent::SegmentLooped { session: binding.session });
        } else {
            debug!("{:?} finished, returning to {:?}", binding.label(), self.config.rest_label);
            self.telemetry.record(TelemetryEvent::AutoReturn { from: binding.session });
            let rest = self.config.rest_label.clone();
            effects.extend(self.track_expression(&rest, Some(binding.label()), media));
        }
    }

    fn on_pause(&mut self, media: &MediaSnapshot, effects: &mut Vec<SideEffect>) {
        let PlaybackState::Tracking(binding) = &self.state else {
            return;
        };
        if self.held {
            debug!("User pause, not resuming");
            return;
        }
        if !media.paused {
            debug!("Ignoring Pause, element is playing again");
            return;
        }
        if !media.ended && media.ready_state >= self.config.resume_min_ready_state {
            let session = binding.session;
            self.telemetry.record(TelemetryEvent::ResumeScheduled { session });
            effects.push(SideEffect::ScheduleResume {
                session,
                delay: self.config.resume_delay(),
            });
        }
    }

    fn on_resume_due(&mut self, session: SessionId, media: &MediaSnapshot) -> Vec<SideEffect> {
        let mut effects = Vec::new();
        let current = match &self.state {
            PlaybackState::Tracking(binding) => binding.session == session,
            _ => false,
        };
        if !current {
            debug!("Discarded stale resume for session {:?}", session);
            self.telemetry.record(TelemetryEvent::StaleDiscarded { session });
            return effects;
        }
        if !self.held && media.paused && !media.ended {
            self.telemetry.record(TelemetryEvent::ResumeApplied { session });
            effects.push(SideEffect::Play);
        }
        effects
    }

    fn attach_source(&mut self, url: String) -> Vec<SideEffect> {
        self.release_scope();
        self.enter(PhaseRequest::SourceAttached, PlaybackState::Idle);
        self.current_label = None;
        self.previous_label = None;

        let mut effects = vec![SideEffect::SetSource(url)];
        let rest = self.config.rest_label.clone();
        effects.extend(self.track_expression(&rest, None, &MediaSnapshot::unloaded()));
        effects
    }

    fn user_pause(&mut self) -> Vec<SideEffect> {
        self.held = true;
        vec![SideEffect::Pause]
    }

    fn user_play(&mut self, media: &MediaSnapshot) -> Vec<SideEffect> {
        self.held = false;
        let mut effects = Vec::new();
        if self.state.video_ready() {
            self.ensure_playing(media, &mut effects);
        }
        effects
    }

    fn ensure_playing(&self, media: &MediaSnapshot, effects: &mut Vec<SideEffect>) {
        if media.paused && !self.held {
            effects.push(SideEffect::Play);
        }
    }

    fn fail(&mut self, fault: MediaFault, effects: &mut Vec<SideEffect>) {
        warn!("Media error, source is unusable: {}", fault);
        self.release_scope();
        self.telemetry.record(TelemetryEvent::SourceFault);
        self.enter(
            PhaseRequest::MediaFault,
            PlaybackState::Failed {
                reason: fault.to_string(),
            },
        );
        self.set_status(Status::MediaError(fault.to_string()), effects);
    }

    fn release_scope(&mut self) -> usize {
        match self.scope.take() {
            Some(mut scope) => {
                let count = scope.release_all();
                if count > 0 {
                    self.telemetry.record(TelemetryEvent::ListenersReleased { count });
                }
                count
            }
            None => 0,
        }
    }

    /// Applies `next` if the phase graph allows `request` from the current phase.
    fn enter(&mut self, request: PhaseRequest, next: PlaybackState) -> bool {
        let from = self.state.phase();
        match PhaseGraph::transition(from, request) {
            Some(to) => {
                if from != to {
                    self.telemetry.record(TelemetryEvent::PhaseTransition { from, to });
                }
                self.state = next;
                true
            }
            None => {
                debug!("Ignored {:?} in phase {:?}", request, from);
                false
            }
        }
    }

    fn set_status(&mut self, status: Status, effects: &mut Vec<SideEffect>) {
        self.status = Some(status.clone());
        effects.push(SideEffect::SetStatus(status));
    }
}

/// Out-of-range offsets clamp to the media bounds instead of failing the seek.
fn clamp_seek(seconds: f64, duration: f64) -> f64 {
    seconds.min(duration).max(0.0)
}

fn tracking_status(segment: &ResolvedSegment) -> Status {
    Status::Tracking {
        label: segment.label.clone(),
        start: segment.start_text.clone(),
        end: segment.end_text.clone(),
    }
}
