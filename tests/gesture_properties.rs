//! Behavioural tests for the gesture core, driven through `GestureMachine` and `run`
//! with a scripted source and a recording pointer.

mod common;

use common::{Call, Log, RecordingClock, RecordingPointer};
use std::time::Duration;
use threefinger::backends::virtual_input::VirtualSource;
use threefinger::calibration::AxisRangeTable;
use threefinger::config::Settings;
use threefinger::event::{RawEvent, ABS_MT_TRACKING_ID, ABS_X, ABS_Y, TRACKING_ID_RELEASED};
use threefinger::gesture::{run, GestureMachine, StreamEnd, Transition};
use threefinger::metadata::{Capabilities, DeviceMeta};
use threefinger::motion::{MotionOutcome, MotionTranslator};
use threefinger::selector::select_touchpad;
use threefinger::{GestureError, InputSource, SourceError};

fn machine(log: &Log) -> GestureMachine {
    GestureMachine::new(&Settings::default(), AxisRangeTable::default())
        .with_clock(RecordingClock(log.clone()))
}

fn contact(id: i32) -> RawEvent {
    RawEvent::abs(ABS_MT_TRACKING_ID, id)
}

fn lift() -> RawEvent {
    RawEvent::abs(ABS_MT_TRACKING_ID, TRACKING_ID_RELEASED)
}

fn x(v: i32) -> RawEvent {
    RawEvent::abs(ABS_X, v)
}

fn y(v: i32) -> RawEvent {
    RawEvent::abs(ABS_Y, v)
}

/// Start a drag with a known baseline at `(bx, by)`.
fn dragging(m: &mut GestureMachine, sink: &mut RecordingPointer, bx: i32, by: i32) {
    for ev in [x(bx), y(by), contact(1), contact(2), contact(3)] {
        m.handle(&ev, sink).unwrap();
    }
    assert!(m.state().is_dragging());
}

#[test]
fn active_tracks_finger_count_threshold() {
    let log = Log::default();
    let mut m = machine(&log);
    let mut sink = RecordingPointer::new(&log, (0, 0));

    // Deterministic pseudo-random walk of contacts and lifts.
    let mut seed: u32 = 0x2545_f491;
    let mut expected: u32 = 0;
    for i in 0..2_000 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let ev = if (seed >> 16) % 2 == 0 {
            expected += 1;
            contact(i)
        } else {
            expected = expected.saturating_sub(1);
            lift()
        };
        m.handle(&ev, &mut sink).unwrap();

        let s = m.state();
        assert_eq!(s.finger_count, expected);
        assert_eq!(s.three_fingers_active, expected >= 3, "after event {i}");
        assert_eq!(s.button_pressed, s.three_fingers_active, "after event {i}");
    }

    // Every press was matched by at most one outstanding release.
    let presses = log.count(&Call::Press);
    let releases = log.count(&Call::Release);
    let held = usize::from(m.state().button_pressed);
    assert_eq!(presses, releases + held);
}

#[test]
fn button_presses_once_across_three_four_three() {
    let log = Log::default();
    let mut m = machine(&log);
    let mut sink = RecordingPointer::new(&log, (0, 0));

    let script = [
        contact(1),
        contact(2),
        contact(3),
        contact(4),
        lift(),
        lift(),
        lift(),
        lift(),
    ];
    let transitions: Vec<Transition> = script
        .iter()
        .map(|ev| m.handle(ev, &mut sink).unwrap())
        .collect();

    assert_eq!(transitions[2], Transition::Pressed);
    assert_eq!(transitions[3], Transition::Fingers { count: 4 });
    assert_eq!(transitions[4], Transition::Fingers { count: 3 });
    assert_eq!(transitions[5], Transition::Released);
    assert_eq!(log.actions(), vec![Call::Press, Call::Release]);
}

#[test]
fn press_waits_the_debounce_delay_first() {
    let log = Log::default();
    let mut m = machine(&log);
    let mut sink = RecordingPointer::new(&log, (0, 0));

    for id in 1..=3 {
        m.handle(&contact(id), &mut sink).unwrap();
    }
    assert_eq!(
        log.calls(),
        vec![Call::Sleep(Duration::from_micros(2500)), Call::Press]
    );
}

#[test]
fn jitter_below_threshold_never_writes() {
    let log = Log::default();
    let mut m = machine(&log).with_translator(MotionTranslator::new(0.1, 0.5));
    let mut sink = RecordingPointer::new(&log, (400, 300));
    dragging(&mut m, &mut sink, 0, 0);

    // Two pairs each scaling to (0.3, 0.4).
    for (px, py) in [(3, 4), (6, 8)] {
        m.handle(&x(px), &mut sink).unwrap();
        let out = m.handle(&y(py), &mut sink).unwrap();
        assert_eq!(out, Transition::Motion(MotionOutcome::Suppressed));
    }
    assert_eq!(log.writes(), 0);

    // One pair scaling to (0.6, 0.0).
    m.handle(&x(12), &mut sink).unwrap();
    m.handle(&y(8), &mut sink).unwrap();
    assert_eq!(log.writes(), 1);
}

#[test]
fn raw_delta_is_scaled_by_half() {
    let log = Log::default();
    let mut m = machine(&log);
    let mut sink = RecordingPointer::new(&log, (1000, 1000));
    dragging(&mut m, &mut sink, 200, 200);

    m.handle(&x(210), &mut sink).unwrap();
    let out = m.handle(&y(180), &mut sink).unwrap();

    assert_eq!(
        out,
        Transition::Motion(MotionOutcome::Moved { dx: 5, dy: -10 })
    );
    assert_eq!(log.actions().last(), Some(&Call::SetPosition(1005, 990)));
}

#[test]
fn motion_follows_live_pointer_position() {
    let log = Log::default();
    let mut m = machine(&log);
    let mut sink = RecordingPointer::new(&log, (50, 50));
    dragging(&mut m, &mut sink, 0, 0);

    m.handle(&x(20), &mut sink).unwrap();
    m.handle(&y(0), &mut sink).unwrap();
    m.handle(&x(40), &mut sink).unwrap();
    m.handle(&y(0), &mut sink).unwrap();

    let moves: Vec<Call> = log
        .actions()
        .into_iter()
        .filter(|c| matches!(c, Call::SetPosition(..)))
        .collect();
    assert_eq!(moves, vec![Call::SetPosition(60, 50), Call::SetPosition(70, 50)]);
}

#[test]
fn no_pointer_motion_outside_a_drag() {
    let log = Log::default();
    let mut m = machine(&log);
    let mut sink = RecordingPointer::new(&log, (0, 0));

    for ev in [contact(1), contact(2), x(0), y(0), x(500), y(500), lift()] {
        m.handle(&ev, &mut sink).unwrap();
    }
    assert!(log.calls().is_empty());
    assert_eq!((m.state().last_x, m.state().last_y), (500, 500));
}

#[test]
fn pointer_write_failure_is_isolated_to_one_event() {
    let log = Log::default();
    let mut m = machine(&log);
    let mut sink = RecordingPointer::new(&log, (100, 100)).failing_writes(1);
    dragging(&mut m, &mut sink, 0, 0);

    m.handle(&x(20), &mut sink).unwrap();
    let before = m.state().clone();
    let err = m.handle(&y(20), &mut sink).unwrap_err();
    assert!(matches!(err, GestureError::Move(_)));

    let after = m.state();
    assert_eq!(after.finger_count, before.finger_count);
    assert_eq!(after.three_fingers_active, before.three_fingers_active);
    assert_eq!(after.button_pressed, before.button_pressed);
    // The failed sample still became the baseline.
    assert_eq!((after.last_x, after.last_y), (20, 20));

    m.handle(&x(40), &mut sink).unwrap();
    let out = m.handle(&y(20), &mut sink).unwrap();
    assert_eq!(out, Transition::Motion(MotionOutcome::Moved { dx: 10, dy: 0 }));
    assert_eq!(log.actions().last(), Some(&Call::SetPosition(110, 100)));
}

#[test]
fn selector_prefers_touchpad_name_over_capabilities() {
    let generic = VirtualSource::with_meta(
        DeviceMeta::new("Generic HID", "/dev/input/event2")
            .with_capabilities(Capabilities::absolute([(ABS_X, 0, 4095), (ABS_Y, 0, 4095)])),
    );
    let touchpad = VirtualSource::with_meta(DeviceMeta::new(
        "Synaptics TouchPad",
        "/dev/input/event5",
    ));

    let picked = select_touchpad(vec![Box::new(generic), Box::new(touchpad)]).unwrap();
    assert_eq!(picked.name(), "Synaptics TouchPad");
    assert_eq!(picked.id(), "/dev/input/event5");
}

#[test]
fn selector_returns_none_without_candidates() {
    let keyboard = VirtualSource::new("/dev/input/event0", "AT Translated Set 2 keyboard");
    assert!(select_touchpad(vec![Box::new(keyboard)]).is_none());
    assert!(select_touchpad(Vec::new()).is_none());
}

#[test]
fn end_to_end_three_finger_drag() {
    let log = Log::default();
    let mut m = machine(&log);
    let mut sink = RecordingPointer::new(&log, (640, 480));
    let mut source = VirtualSource::touchpad(1000, 1000);
    source
        .contact()
        .contact()
        .contact()
        .x(100)
        .y(100)
        .x(130)
        .y(100)
        .lift();

    let summary = run(&mut source, &mut sink, &mut m);

    assert_eq!(
        log.actions(),
        vec![Call::Press, Call::SetPosition(655, 480), Call::Release]
    );
    assert_eq!(summary.events, 8);
    assert_eq!(summary.presses, 1);
    assert_eq!(summary.moves, 1);
    assert_eq!(summary.releases, 1);
    assert_eq!(summary.failed, 0);
    assert!(matches!(summary.end, StreamEnd::Closed));
    assert_eq!(m.state().finger_count, 2);
}

#[test]
fn run_keeps_going_after_a_failed_event() {
    let log = Log::default();
    let mut m = machine(&log);
    let mut sink = RecordingPointer::new(&log, (0, 0)).failing_writes(1);
    let mut source = VirtualSource::touchpad(1000, 1000);
    source
        .x(0)
        .y(0)
        .contact()
        .contact()
        .contact()
        .x(10)
        .y(0)
        .x(20)
        .y(0);

    let summary = run(&mut source, &mut sink, &mut m);

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.moves, 1);
    assert_eq!(log.actions(), vec![Call::Press, Call::SetPosition(5, 0)]);
    assert!(m.state().button_pressed);
}

#[test]
fn read_failure_ends_the_session() {
    let log = Log::default();
    let mut m = machine(&log);
    let mut sink = RecordingPointer::new(&log, (0, 0));
    let mut source = VirtualSource::touchpad(1000, 1000);
    source
        .contact()
        .contact()
        .contact()
        .fail(std::io::ErrorKind::NotFound)
        .lift();

    let summary = run(&mut source, &mut sink, &mut m);

    match summary.end {
        StreamEnd::Failed(SourceError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected io failure, got {other:?}"),
    }
    assert_eq!(summary.events, 3);
    // Not reconnected: the queued lift is never read and the button stays held.
    assert_eq!(source.pending(), 1);
    assert_eq!(log.actions(), vec![Call::Press]);
}

#[test]
fn out_of_range_samples_are_not_clamped() {
    let log = Log::default();
    let ranges = AxisRangeTable {
        x: threefinger::calibration::AxisRange { min: 0, max: 100 },
        y: threefinger::calibration::AxisRange { min: 0, max: 100 },
    };
    let mut m = GestureMachine::new(&Settings::default(), ranges)
        .with_clock(RecordingClock(log.clone()));
    let mut sink = RecordingPointer::new(&log, (0, 0));
    dragging(&mut m, &mut sink, 100, 100);

    m.handle(&x(300), &mut sink).unwrap();
    let out = m.handle(&y(100), &mut sink).unwrap();
    assert_eq!(out, Transition::Motion(MotionOutcome::Moved { dx: 100, dy: 0 }));
}
