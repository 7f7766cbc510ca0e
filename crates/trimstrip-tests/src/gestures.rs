//! End-to-end pointer gestures through the headless timeline.

use crossbeam_channel::{unbounded, Receiver};
use trimstrip_core::{
    DragPhase, Handle, PlayheadTracking, PointerEvent, TimelineEvent, TimelineOptions,
    TrimTimeline, Vec2,
};

const EPS: f32 = 1e-4;

// ── Helpers ────────────────────────────────────────────────────

/// 1000x116 at density 1: ten 100px frames spanning x = 0..1000.
fn timeline(options: TimelineOptions) -> (TrimTimeline, Receiver<TimelineEvent>) {
    let mut timeline = TrimTimeline::new(options).unwrap();
    timeline.layout(1000.0, 116.0);
    timeline.set_duration_micros(10_000_000);
    let (tx, rx) = unbounded();
    timeline.set_listener(Box::new(tx));
    (timeline, rx)
}

fn at(x: f32) -> Vec2 {
    Vec2::new(x, 50.0)
}

fn drain(rx: &Receiver<TimelineEvent>) -> Vec<TimelineEvent> {
    rx.try_iter().collect()
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPS
}

// ── Trim handles ───────────────────────────────────────────────

#[test]
fn right_handle_gesture_stops_at_min_width() {
    let (mut t, rx) = timeline(TimelineOptions {
        start_progress: 0.2,
        min_range_width: 0.15,
        ..Default::default()
    });

    assert!(t.handle_pointer(PointerEvent::Down(at(1000.0))).handled);
    assert_eq!(t.drag_phase(), DragPhase::DraggingRight);
    t.handle_pointer(PointerEvent::Move(at(300.0)));
    t.handle_pointer(PointerEvent::Up(at(300.0)));

    assert!(approx(t.state().trim_start, 0.2));
    assert!(approx(t.state().trim_end, 0.35));
    assert_eq!(t.drag_phase(), DragPhase::Idle);

    let events = drain(&rx);
    assert_eq!(events.len(), 4, "{events:?}");
    assert_eq!(events[0], TimelineEvent::DraggingStateChanged(true));
    assert!(matches!(events[1], TimelineEvent::RightProgressChanged(p) if approx(p, 0.35)));
    assert!(matches!(
        events[2],
        TimelineEvent::DurationChanged(d) if d.abs_diff(1_500_000) <= 10
    ));
    assert_eq!(events[3], TimelineEvent::DraggingStateChanged(false));
}

#[test]
fn left_handle_past_max_width_pulls_end_in() {
    let (mut t, rx) = timeline(TimelineOptions {
        play_line: false,
        min_range_width: 0.1,
        max_range_width: 0.5,
        ..Default::default()
    });

    t.handle_pointer(PointerEvent::Down(at(5.0)));
    assert_eq!(t.drag_phase(), DragPhase::DraggingLeft);

    // 0.3 leaves a 0.7 window, wider than 0.5
    t.handle_pointer(PointerEvent::Move(at(305.0)));
    assert!(approx(t.state().trim_start, 0.3));
    assert!(approx(t.state().trim_end, 0.8));

    // start stops at the end, then the min width pushes it back
    t.handle_pointer(PointerEvent::Move(at(905.0)));
    t.handle_pointer(PointerEvent::Up(at(905.0)));
    assert!(approx(t.state().trim_start, 0.7));
    assert!(approx(t.state().trim_end, 0.8));

    let events = drain(&rx);
    assert!(events
        .iter()
        .any(|e| matches!(e, TimelineEvent::LeftProgressChanged(p) if approx(*p, 0.3))));
    assert!(!events
        .iter()
        .any(|e| matches!(e, TimelineEvent::PlayProgressChanged(_))));
}

#[test]
fn left_handle_from_full_range_to_point_nine() {
    let (mut t, _rx) = timeline(TimelineOptions {
        play_line: false,
        min_range_width: 0.1,
        max_range_width: 0.5,
        ..Default::default()
    });

    t.handle_pointer(PointerEvent::Down(at(0.0)));
    t.handle_pointer(PointerEvent::Move(at(900.0)));
    assert!(approx(t.state().trim_start, 0.9));
    assert!(approx(t.state().trim_end, 1.0));
}

#[test]
fn cancel_keeps_last_position() {
    let (mut t, rx) = timeline(TimelineOptions::default());
    t.handle_pointer(PointerEvent::Down(at(1000.0)));
    t.handle_pointer(PointerEvent::Move(at(700.0)));
    t.handle_pointer(PointerEvent::Cancel);

    assert!(approx(t.state().trim_end, 0.7));
    assert_eq!(t.drag_phase(), DragPhase::Idle);
    assert_eq!(
        drain(&rx).last(),
        Some(&TimelineEvent::DraggingStateChanged(false))
    );
}

#[test]
fn resize_keeps_fractions() {
    let (mut t, _rx) = timeline(TimelineOptions::default());
    t.handle_pointer(PointerEvent::Down(at(1000.0)));
    t.handle_pointer(PointerEvent::Move(at(600.0)));
    t.handle_pointer(PointerEvent::Up(at(600.0)));

    assert!(t.layout(500.0, 116.0));
    assert!(approx(t.state().trim_end, 0.6));
    let x = t.state().handle_position(Handle::Right, t.geometry());
    assert_eq!(t.handle_at(Vec2::new(x, 50.0)), Some(Handle::Right));
}

// ── Playhead ───────────────────────────────────────────────────

#[test]
fn playhead_wins_over_overlapping_trim_handle() {
    let (mut t, rx) = timeline(TimelineOptions {
        start_progress: 0.2,
        end_progress: 0.6,
        progress: 0.2,
        ..Default::default()
    });

    t.handle_pointer(PointerEvent::Down(at(200.0)));
    assert_eq!(t.drag_phase(), DragPhase::DraggingPlay);

    t.handle_pointer(PointerEvent::Move(at(900.0)));
    assert!(approx(t.play_progress(), 0.6));
    t.handle_pointer(PointerEvent::Move(at(400.0)));
    assert!(approx(t.play_progress(), 0.4));
    t.handle_pointer(PointerEvent::Up(at(400.0)));

    // trim untouched by a playhead drag
    assert!(approx(t.state().trim_start, 0.2));
    assert!(approx(t.state().trim_end, 0.6));

    let plays: Vec<f32> = drain(&rx)
        .into_iter()
        .filter_map(|e| match e {
            TimelineEvent::PlayProgressChanged(p) => Some(p),
            _ => None,
        })
        .collect();
    assert_eq!(plays.len(), 2);
    assert!(approx(plays[0], 0.6) && approx(plays[1], 0.4));
}

#[test]
fn disabled_playhead_cannot_be_grabbed() {
    let (mut t, _rx) = timeline(TimelineOptions {
        play_line: false,
        progress: 0.5,
        ..Default::default()
    });
    assert!(!t.handle_pointer(PointerEvent::Down(at(500.0))).handled);
    assert_eq!(t.drag_phase(), DragPhase::Idle);
}

#[test]
fn proportional_playhead_slides_with_window() {
    let (mut t, rx) = timeline(TimelineOptions {
        progress: 0.5,
        ..Default::default()
    });
    t.handle_pointer(PointerEvent::Down(at(1000.0)));
    t.handle_pointer(PointerEvent::Move(at(300.0)));

    assert!(approx(t.state().play_position, 0.5));
    assert!(approx(t.play_progress(), 0.15));
    assert!(!drain(&rx)
        .iter()
        .any(|e| matches!(e, TimelineEvent::PlayProgressChanged(_))));
}

#[test]
fn clamped_playhead_reports_new_position() {
    let (mut t, rx) = timeline(TimelineOptions {
        progress: 0.5,
        playhead_tracking: PlayheadTracking::Clamped,
        ..Default::default()
    });
    t.handle_pointer(PointerEvent::Down(at(1000.0)));
    t.handle_pointer(PointerEvent::Move(at(300.0)));

    assert!(approx(t.play_progress(), 0.3));
    let events = drain(&rx);
    // trim callbacks precede the playhead callback
    assert!(matches!(events[1], TimelineEvent::RightProgressChanged(_)));
    assert!(matches!(events[2], TimelineEvent::DurationChanged(_)));
    assert!(matches!(events[3], TimelineEvent::PlayProgressChanged(p) if approx(p, 0.3)));
}

#[test]
fn set_progress_is_silent_and_clamped() {
    let (mut t, rx) = timeline(TimelineOptions {
        start_progress: 0.25,
        end_progress: 0.75,
        ..Default::default()
    });
    t.set_progress(0.9);
    assert!(approx(t.play_progress(), 0.75));
    t.set_progress(0.5);
    assert!(approx(t.play_progress(), 0.5));
    assert!(drain(&rx).is_empty());
}
