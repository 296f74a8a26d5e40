use std::collections::VecDeque;
use super::event::{PlayRejectionKind, TelemetryEvent};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetrySnapshot {
    pub sessions_started: u64,
    pub transitions: u64,
    pub deferrals: u64,
    pub unresolved: u64,
    pub neutral_loops: u64,
    pub auto_returns: u64,
    pub resumes_scheduled: u64,
    pub resumes_applied: u64,
    pub stale_discarded: u64,
    pub listeners_released: u64,
    pub policy_blocked: u64,
    pub aborted_plays: u64,
    pub play_failures: u64,
    pub source_faults: u64,
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();

    for event in events {
        match event {
            TelemetryEvent::SessionStarted { transition, .. } => {
                snap.sessions_started += 1;
                if *transition {
                    snap.transitions += 1;
                }
            }
            TelemetryEvent::Deferred { .. } => snap.deferrals += 1,
            TelemetryEvent::Unresolved { .. } => snap.unresolved += 1,
            TelemetryEvent::SegmentLooped { .. } => snap.neutral_loops += 1,
            TelemetryEvent::AutoReturn { .. } => snap.auto_returns += 1,
            TelemetryEvent::ResumeScheduled { .. } => snap.resumes_scheduled += 1,
            TelemetryEvent::ResumeApplied { .. } => snap.resumes_applied += 1,
            TelemetryEvent::StaleDiscarded { .. } => snap.stale_discarded += 1,
            TelemetryEvent::ListenersReleased { count } => {
                snap.listeners_released += *count as u64;
            }
            TelemetryEvent::PlayRejected { kind } => match kind {
                PlayRejectionKind::PolicyBlocked => snap.policy_blocked += 1,
                PlayRejectionKind::Aborted => snap.aborted_plays += 1,
                PlayRejectionKind::Failed => snap.play_failures += 1,
            },
            TelemetryEvent::SourceFault => snap.source_faults += 1,
            TelemetryEvent::PhaseTransition { .. } => {}
        }
    }

    snap
}
