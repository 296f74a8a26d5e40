//! Playback telemetry.
//!
//! # SAFETY INVARIANT
//! Telemetry is a READ-ONLY side-effect layer.
//! The controller writes to it but must **NEVER** read it back when deciding what to do.
//!
//! # PRIVACY INVARIANT
//! Events carry session ids, labels from the segment table and counts.
//! Chat text never enters telemetry.

pub mod event;
pub mod metrics;
pub mod recorder;
