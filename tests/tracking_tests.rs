use mimic::kernel::controller::PlaybackController;
use mimic::kernel::effect::{SideEffect, Status};
use mimic::kernel::event::Event;
use mimic::kernel::media::{MediaSignal, MediaSnapshot, ReadyState};
use mimic::kernel::phase::TrackingPhase;
use mimic::kernel::segment::{ExpressionSegment, SegmentTable};
use mimic::kernel::state::PlaybackState;
use mimic::kernel::timecode::{parse_timecode, TimeSpec};
use mimic::MimicConfig;

fn scenario_table() -> SegmentTable {
    SegmentTable::from_segments(vec![
        ExpressionSegment::new("Funny", "00:00", "00:12"),
        ExpressionSegment::new("Neutral", "00:50", "00:55"),
        ExpressionSegment::new("Bored", "01:10", "01:20"),
        ExpressionSegment::new("Late", "01:30", "01:40"),
    ])
}

/// 60s video, buffered, at `at` seconds.
fn playing(at: f64) -> MediaSnapshot {
    MediaSnapshot {
        duration: Some(60.0),
        current_time: at,
        paused: false,
        ended: false,
        ready_state: ReadyState::HaveEnoughData,
    }
}

fn paused(at: f64) -> MediaSnapshot {
    MediaSnapshot {
        paused: true,
        ..playing(at)
    }
}

fn controller() -> PlaybackController {
    let mut controller = PlaybackController::new(MimicConfig::default());
    controller.set_segment_table(scenario_table());
    controller
}

fn seeks(effects: &[SideEffect]) -> Vec<f64> {
    effects
        .iter()
        .filter_map(|e| match e {
            SideEffect::Seek(s) => Some(*s),
            _ => None,
        })
        .collect()
}

#[test]
fn test_timecode_forms() {
    assert_eq!(parse_timecode("00:12").unwrap(), 12.0);
    assert_eq!(parse_timecode("01:05").unwrap(), 65.0);
    assert_eq!(parse_timecode("01:02:03").unwrap(), 3723.0);
    assert_eq!(TimeSpec::Seconds(42.0).seconds(), 42.0);
}

#[test]
fn test_ready_video_seeks_to_segment_start() {
    let mut c = controller();

    let effects = c.track_expression("Funny", None, &paused(30.0));

    assert_eq!(seeks(&effects), vec![0.0]);
    assert!(effects.contains(&SideEffect::Play), "Paused video must be started");
    assert_eq!(c.state().phase(), TrackingPhase::Tracking);
    assert_eq!(
        c.status().map(ToString::to_string).as_deref(),
        Some("Tracking \"Funny\": 00:00 → 00:12")
    );
}

#[test]
fn test_start_past_duration_is_clamped() {
    let mut c = controller();

    let effects = c.track_expression("Late", None, &playing(10.0));

    assert_eq!(seeks(&effects), vec![60.0], "Start 01:30 clamps to the 60s duration");
    assert!(!effects.contains(&SideEffect::Play), "Already playing, no play request");
}

#[test]
fn test_neutral_loops_at_segment_end() {
    let mut c = controller();
    c.track_expression("Neutral", None, &playing(0.0));

    // Inside the segment: nothing to do
    let effects = c.handle(Event::Media(MediaSignal::TimeUpdate), &playing(53.0));
    assert!(effects.is_empty());

    // End reached: wrap to start, keep going
    let effects = c.handle(Event::Media(MediaSignal::TimeUpdate), &playing(55.0));
    assert_eq!(effects, vec![SideEffect::Seek(50.0)]);
    assert_eq!(c.current_label(), Some("Neutral"));

    // Wrapped a second time while the element happened to be paused
    let effects = c.handle(Event::Media(MediaSignal::TimeUpdate), &paused(55.2));
    assert_eq!(effects, vec![SideEffect::Seek(50.0), SideEffect::Play]);

    assert_eq!(c.telemetry.snapshot().neutral_loops, 2);
}

#[test]
fn test_expression_returns_to_neutral() {
    let mut c = controller();

    let effects = c.track_expression("Funny", Some("Neutral"), &paused(52.0));
    assert_eq!(seeks(&effects), vec![0.0]);
    assert!(effects.contains(&SideEffect::Play));

    let effects = c.handle(Event::Media(MediaSignal::TimeUpdate), &playing(11.9));
    assert!(seeks(&effects).is_empty(), "Not there yet");

    let effects = c.handle(Event::Media(MediaSignal::TimeUpdate), &playing(12.0));
    assert_eq!(seeks(&effects), vec![50.0], "Auto transition seeks to the Neutral start");
    assert_eq!(c.current_label(), Some("Neutral"));
    assert_eq!(c.previous_label(), Some("Funny"));

    match c.state() {
        PlaybackState::Tracking(binding) => {
            assert_eq!(binding.label(), "Neutral");
            assert_eq!(binding.previous.as_deref(), Some("Funny"));
            assert!(binding.is_transition());
        }
        other => panic!("Expected Tracking(Neutral), got {:?}", other),
    }

    let snap = c.telemetry.snapshot();
    assert_eq!(snap.auto_returns, 1);
    assert_eq!(snap.sessions_started, 2);
}

#[test]
fn test_empty_table_reports_not_loaded() {
    let mut c = PlaybackController::new(MimicConfig::default());

    let effects = c.track_expression("Funny", None, &playing(20.0));

    assert_eq!(effects, vec![SideEffect::SetStatus(Status::NotLoaded)]);
    assert_eq!(c.status().unwrap().to_string(), "Expressions not loaded yet.");
    assert_eq!(c.state(), &PlaybackState::Idle);
    assert_eq!(c.current_label(), Some("Funny"));
}

#[test]
fn test_missing_label_names_the_label() {
    let mut c = controller();

    let effects = c.track_expression("Ecstatic", Some("Neutral"), &playing(20.0));

    assert!(seeks(&effects).is_empty(), "Missing label must not move the video");
    assert_eq!(
        c.status().unwrap().to_string(),
        "No segment configured for \"Ecstatic\" in database."
    );
    assert_eq!(c.state().phase(), TrackingPhase::Idle);
}

#[test]
fn test_missing_label_silences_previous_monitor() {
    let mut c = controller();
    c.track_expression("Funny", None, &playing(0.0));
    c.track_expression("Ecstatic", Some("Funny"), &playing(3.0));

    // Funny's monitor is gone: reaching its end does nothing
    let effects = c.handle(Event::Media(MediaSignal::TimeUpdate), &playing(12.0));
    assert!(effects.is_empty());
    assert_eq!(c.armed_listeners(), 0);
}

#[test]
fn test_blank_label_means_rest() {
    let mut c = controller();

    let effects = c.track_expression("  ", None, &playing(0.0));

    assert_eq!(seeks(&effects), vec![50.0]);
    assert_eq!(c.current_label(), Some("Neutral"));
}

#[test]
fn test_superseded_deferral_never_acts() {
    let mut c = controller();
    let unloaded = MediaSnapshot::unloaded();

    // Both arrive before metadata
    let effects = c.track_expression("Funny", Some("Neutral"), &unloaded);
    assert_eq!(effects, vec![SideEffect::Load]);
    assert_eq!(c.state().phase(), TrackingPhase::AwaitingMetadata);

    let effects = c.track_expression("Bored", Some("Funny"), &unloaded);
    assert_eq!(effects, vec![SideEffect::Load]);
    assert_eq!(c.armed_listeners(), 3, "Only the Bored readiness listeners remain");

    let effects = c.handle(Event::Media(MediaSignal::MetadataLoaded), &paused(0.0));
    assert_eq!(seeks(&effects), vec![60.0], "Bored start 01:10 clamped to 60s");

    // Remaining readiness events find nothing armed
    let effects = c.handle(Event::Media(MediaSignal::CanPlay), &paused(60.0));
    assert!(effects.is_empty());

    assert_eq!(c.current_label(), Some("Bored"));
    assert_eq!(c.telemetry.snapshot().deferrals, 2);
}

#[test]
fn test_readiness_without_duration_keeps_waiting() {
    let mut c = controller();
    c.track_expression("Funny", None, &MediaSnapshot::unloaded());

    // Metadata event but duration still zero
    let zero = MediaSnapshot {
        duration: Some(0.0),
        ..MediaSnapshot::unloaded()
    };
    let effects = c.handle(Event::Media(MediaSignal::MetadataLoaded), &zero);
    assert!(effects.is_empty());
    assert_eq!(c.state().phase(), TrackingPhase::AwaitingMetadata);

    let effects = c.handle(Event::Media(MediaSignal::CanPlay), &paused(0.0));
    assert_eq!(seeks(&effects), vec![0.0]);
    assert_eq!(c.state().phase(), TrackingPhase::Tracking);
}

#[test]
fn test_end_beyond_duration_returns_on_ended() {
    let mut c = PlaybackController::new(MimicConfig::default());
    c.set_segment_table(SegmentTable::from_segments(vec![
        ExpressionSegment::new("Bored", "00:40", "01:20"),
        ExpressionSegment::new("Neutral", "00:10", "00:15"),
    ]));
    c.track_expression("Bored", None, &playing(0.0));

    let finished = MediaSnapshot {
        current_time: 60.0,
        paused: true,
        ended: true,
        ..playing(60.0)
    };
    let effects = c.handle(Event::Media(MediaSignal::Ended), &finished);

    assert_eq!(seeks(&effects), vec![10.0]);
    assert!(effects.contains(&SideEffect::Play));
    assert_eq!(c.current_label(), Some("Neutral"));
}

#[test]
fn test_express_uses_current_label_as_previous() {
    let mut c = controller();
    c.handle(Event::Express("Neutral".into()), &playing(0.0));
    assert_eq!(c.previous_label(), None);

    c.handle(Event::Express("Funny".into()), &playing(51.0));
    assert_eq!(c.previous_label(), Some("Neutral"));
    assert_eq!(c.telemetry.snapshot().transitions, 1);
}

#[test]
fn test_segment_table_swap_leaves_playback_alone() {
    let mut c = controller();
    c.track_expression("Funny", None, &playing(0.0));

    let effects = c.handle(Event::Segments(SegmentTable::new()), &playing(4.0));
    assert!(effects.is_empty());
    assert_eq!(c.state().phase(), TrackingPhase::Tracking);

    // The next label sees the new (empty) table
    c.track_expression("Neutral", Some("Funny"), &playing(5.0));
    assert_eq!(c.status(), Some(&Status::NotLoaded));
}

#[test]
fn test_dispose_releases_everything() {
    let mut c = controller();
    c.track_expression("Funny", None, &playing(0.0));
    // Seeked (once), TimeUpdate, Pause, Ended
    assert_eq!(c.armed_listeners(), 4);

    assert_eq!(c.dispose(), 4);
    assert_eq!(c.state(), &PlaybackState::Idle);
    assert_eq!(c.current_label(), None);

    let effects = c.handle(Event::Media(MediaSignal::TimeUpdate), &playing(12.0));
    assert!(effects.is_empty());
}
