use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use mimic::kernel::effect::{SideEffect, Status};
use mimic::kernel::event::Event;
use mimic::kernel::phase::TrackingPhase;
use mimic::kernel::segment::{default_expressions, ExpressionSegment, SegmentTable};
use mimic::media::{MediaElement, SimulatedVideo};
use mimic::{MimicConfig, PlaybackError, Reactor};

fn scenario_table() -> SegmentTable {
    SegmentTable::from_segments(vec![
        ExpressionSegment::new("Funny", "00:00", "00:12"),
        ExpressionSegment::new("Neutral", "00:50", "00:55"),
        ExpressionSegment::new("Bored", "00:30", "00:40"),
    ])
}

fn reactor(video: SimulatedVideo, config: MimicConfig) -> Reactor<SimulatedVideo> {
    let (tx, rx) = mpsc::channel(100);
    Reactor::new(rx, tx, video, config)
}

#[tokio::test]
async fn test_funny_then_back_to_neutral() {
    let mut reactor = reactor(SimulatedVideo::ready(60.0), MimicConfig::default());

    reactor.step(vec![
        Event::Segments(scenario_table()),
        Event::track("Funny", Some("Neutral")),
    ]);
    assert_eq!(reactor.media.current_time(), 0.0);
    assert!(!reactor.media.is_paused(), "Funny should be playing");

    reactor.media.advance(Duration::from_secs(6));
    reactor.pump();
    assert_eq!(reactor.controller.current_label(), Some("Funny"));

    // Reaches 00:12
    reactor.media.advance(Duration::from_secs(6));
    reactor.pump();
    assert_eq!(reactor.media.current_time(), 50.0);
    assert_eq!(reactor.controller.current_label(), Some("Neutral"));
    assert_eq!(reactor.controller.previous_label(), Some("Funny"));

    // Neutral loops within 00:50-00:55
    reactor.media.advance(Duration::from_secs(5));
    reactor.pump();
    assert_eq!(reactor.media.current_time(), 50.0);
    assert!(!reactor.media.is_paused());
    assert_eq!(reactor.controller.current_label(), Some("Neutral"));
}

#[tokio::test]
async fn test_only_latest_label_acts_after_load() {
    let mut reactor = reactor(SimulatedVideo::new(60.0), MimicConfig::default());

    reactor.step(vec![
        Event::Segments(scenario_table()),
        Event::track("Funny", Some("Neutral")),
        Event::track("Bored", Some("Funny")),
    ]);

    assert_eq!(reactor.media.seek_calls, 1, "Funny never seeks");
    assert_eq!(reactor.media.current_time(), 30.0);
    assert_eq!(reactor.controller.current_label(), Some("Bored"));
    assert_eq!(reactor.controller.state().phase(), TrackingPhase::Tracking);
}

#[tokio::test]
async fn test_autoplay_block_is_swallowed() {
    let mut video = SimulatedVideo::ready(60.0);
    video.block_autoplay();
    let mut reactor = reactor(video, MimicConfig::default());
    let feed = reactor.status_feed();

    reactor.step(vec![Event::Segments(scenario_table()), Event::track("Funny", None)]);

    // Seeked, but not playing; tracking carries on regardless
    assert_eq!(reactor.media.current_time(), 0.0);
    assert!(reactor.media.is_paused());
    assert_eq!(reactor.controller.state().phase(), TrackingPhase::Tracking);
    assert!(matches!(&*feed.borrow(), Some(Status::Tracking { label, .. }) if label == "Funny"));

    let snap = reactor.controller.telemetry.snapshot();
    assert!(snap.policy_blocked >= 1);
    assert_eq!(snap.play_failures, 0);

    // User clicks play
    reactor.media.user_gesture();
    reactor.step(vec![Event::UserPlay]);
    assert!(!reactor.media.is_paused());
}

#[tokio::test]
async fn test_signals_of_finished_segment_stay_inert() {
    let mut reactor = reactor(SimulatedVideo::ready(80.0), MimicConfig::default());
    reactor.step(vec![
        Event::Segments(SegmentTable::from_segments(default_expressions())),
        Event::track("Bored", Some("Neutral")),
    ]);
    assert_eq!(reactor.media.current_time(), 70.0);

    // Bored ends exactly at the end of the video: TimeUpdate, Pause and Ended arrive together
    reactor.media.advance(Duration::from_secs(10));
    let effects = reactor.pump();

    let seeks: Vec<&SideEffect> = effects.iter().filter(|e| matches!(e, SideEffect::Seek(_))).collect();
    assert_eq!(seeks, vec![&SideEffect::Seek(50.0)], "One seek back to Neutral");
    assert_eq!(reactor.controller.current_label(), Some("Neutral"));
    assert_eq!(reactor.media.current_time(), 50.0);
    assert!(!reactor.media.is_paused());

    let snap = reactor.controller.telemetry.snapshot();
    assert_eq!(snap.auto_returns, 1);
    assert_eq!(snap.neutral_loops, 0);
    assert_eq!(snap.resumes_scheduled, 0);
}

#[tokio::test]
async fn test_play_failure_keeps_tracking() {
    let mut video = SimulatedVideo::ready(60.0);
    video.reject_play_with(Some(PlaybackError::Other("decoder busy".into())));
    let mut reactor = reactor(video, MimicConfig::default());
    let feed = reactor.status_feed();

    reactor.step(vec![Event::Segments(scenario_table()), Event::track("Funny", None)]);

    assert_eq!(reactor.media.current_time(), 0.0);
    assert!(reactor.media.is_paused());
    assert_eq!(reactor.controller.state().phase(), TrackingPhase::Tracking);
    assert_eq!(
        (*feed.borrow()).as_ref().map(ToString::to_string).as_deref(),
        Some("Tracking \"Funny\": 00:00 → 00:12")
    );

    // Engage and seek completion both asked for playback
    let snap = reactor.controller.telemetry.snapshot();
    assert_eq!(snap.play_failures, 2);
    assert_eq!(snap.policy_blocked, 0);
    assert_eq!(snap.aborted_plays, 0);

    reactor.media.reject_play_with(None);
    reactor.step(vec![Event::UserPlay]);
    assert!(!reactor.media.is_paused());
}

#[tokio::test]
async fn test_stall_is_resumed_after_delay() {
    let config = MimicConfig {
        resume_delay_ms: 20,
        ..Default::default()
    };
    let mut reactor = reactor(SimulatedVideo::ready(60.0), config);
    reactor.step(vec![Event::Segments(scenario_table()), Event::track("Neutral", None)]);
    assert!(!reactor.media.is_paused());

    reactor.media.stall();
    reactor.pump();
    assert!(reactor.media.is_paused(), "Resume waits for the timer");

    tokio::time::sleep(Duration::from_millis(100)).await;
    reactor.pump();
    assert!(!reactor.media.is_paused(), "Timer should have resumed playback");
    assert_eq!(reactor.controller.telemetry.snapshot().resumes_applied, 1);
}

#[tokio::test]
async fn test_fault_stops_tracking() {
    let mut reactor = reactor(SimulatedVideo::ready(60.0), MimicConfig::default());
    let feed = reactor.status_feed();
    reactor.step(vec![Event::Segments(scenario_table()), Event::track("Neutral", None)]);

    reactor.media.fail(mimic::kernel::media::MediaFault::Network("404".into()));
    reactor.pump();

    assert_eq!(reactor.controller.state().phase(), TrackingPhase::Failed);
    assert!(matches!(&*feed.borrow(), Some(Status::MediaError(_))));

    // Attaching a new source starts over on the rest label
    reactor.step(vec![Event::AttachSource("https://cdn/avatar-2.mp4".into())]);
    assert_eq!(reactor.media.source(), Some("https://cdn/avatar-2.mp4"));
    assert_eq!(reactor.media.current_time(), 50.0);
    assert_eq!(reactor.controller.state().phase(), TrackingPhase::Tracking);
}

#[tokio::test]
async fn test_run_loop_until_shutdown() {
    let config = MimicConfig {
        tick_ms: 10,
        ..Default::default()
    };
    let mut reactor = reactor(SimulatedVideo::new(60.0), config);
    let tx = reactor.sender();

    tx.send(Event::Segments(scenario_table())).await.unwrap();
    tx.send(Event::AttachSource("local://avatar.mp4".into())).await.unwrap();

    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        trigger.cancel();
    });

    reactor.run(shutdown).await;

    // Disposed on exit
    assert_eq!(reactor.controller.current_label(), None);
    assert!(reactor.media.is_paused());
    assert_eq!(reactor.media.source(), Some("local://avatar.mp4"));
    assert!(reactor.media.current_time() >= 50.0);
    assert_eq!(reactor.controller.telemetry.snapshot().sessions_started, 1);
}
