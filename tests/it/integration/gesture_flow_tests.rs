//! Integration tests driving the viewport with synthetic hand landmarks.

use crate::helpers::{
    CameraProbe, FakeCamera, TestPlanBuilder, approx, last_ticket, ms, notice_log, open_hand,
    pinch_hand, stream,
};
use floorplan_view::gesture::{
    CalibrationStep, GestureEvent, GesturePhase, HandLandmarks, LandmarkSample,
};
use floorplan_view::notifications::NoticeLog;
use floorplan_view::{CameraError, FloorPlanView, Point, Settings, Viewport};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

/// Inference frames spaced above the 15 fps limit.
struct Clock {
    t0: Instant,
    frames: u64,
}

impl Clock {
    fn new(t0: Instant) -> Self {
        Self { t0, frames: 0 }
    }

    fn next(&mut self) -> Instant {
        self.frames += 1;
        self.t0 + ms(self.frames * 70)
    }

    fn skip(&mut self, frames: u64) -> Instant {
        self.frames += frames;
        self.t0 + ms(self.frames * 70)
    }
}

fn feed(view: &mut FloorPlanView, now: Instant, hand: Option<HandLandmarks>) -> Option<GestureEvent> {
    view.landmark_mailbox().post(LandmarkSample { at: now, hand });
    view.frame(now).gesture
}

fn open_view(t0: Instant) -> (FloorPlanView, Rc<CameraProbe>, Rc<RefCell<NoticeLog>>) {
    let (mut view, _) = TestPlanBuilder::new(1000.0, 800.0)
        .viewport_size(500.0, 400.0)
        .with_last_viewport(Viewport::new(1.0, Point::new(-250.0, -200.0)))
        .with_default_view(Viewport::new(0.5, Point::ZERO))
        .open(t0);
    let (camera, probe) = FakeCamera::new();
    let log = notice_log();
    view.attach_gesture_control(Box::new(camera), Box::new(log.clone()));
    (view, probe, log)
}

/// Enable, deliver the camera and calibrate at a 0.3 pinch ratio.
fn calibrated_view(t0: Instant, clock: &mut Clock) -> (FloorPlanView, Rc<CameraProbe>, Rc<RefCell<NoticeLog>>) {
    let (mut view, probe, log) = open_view(t0);
    assert!(view.toggle_gesture_control());
    assert!(view.camera_ready(last_ticket(&probe), Ok(stream(&probe)), t0));
    for _ in 0..30 {
        let now = clock.next();
        feed(&mut view, now, Some(pinch_hand(Point::new(0.5, 0.5), 0.3)));
    }
    (view, probe, log)
}

#[test]
fn test_enable_and_calibrate() {
    let t0 = Instant::now();
    let (mut view, probe, log) = open_view(t0);

    assert!(view.toggle_gesture_control());
    assert_eq!(probe.requests.borrow().len(), 1);
    assert!(matches!(view.gesture().unwrap().phase(), GesturePhase::Enabling { .. }));

    assert!(view.camera_ready(last_ticket(&probe), Ok(stream(&probe)), t0));
    assert!(view.gesture().unwrap().has_camera());
    assert!(matches!(view.gesture().unwrap().phase(), GesturePhase::Calibrating { .. }));

    let mut clock = Clock::new(t0);
    let mut last = None;
    for _ in 0..30 {
        let now = clock.next();
        last = feed(&mut view, now, Some(pinch_hand(Point::new(0.5, 0.5), 0.4)));
    }
    assert!(matches!(
        last,
        Some(GestureEvent::Calibration(CalibrationStep::Done(outcome))) if !outcome.timed_out
    ));
    let ratio = view.gesture().unwrap().calibration().pinch_ratio.unwrap();
    assert!((ratio - 0.4).abs() < 1e-3);
    assert!(matches!(view.gesture().unwrap().phase(), GesturePhase::Idle));

    let keys = log.borrow().keys();
    assert_eq!(
        keys,
        vec![
            "gesture.starting",
            "gesture.enabled",
            "calibration.started",
            "calibration.progress",
            "calibration.progress",
            "calibration.progress",
            "calibration.done",
        ]
    );
}

#[test]
fn test_calibration_timeout_uses_fallback() {
    let t0 = Instant::now();
    let (mut view, probe, log) = open_view(t0);
    view.toggle_gesture_control();
    view.camera_ready(last_ticket(&probe), Ok(stream(&probe)), t0);

    assert_eq!(view.frame(t0 + ms(7990)).gesture, None);
    let event = view.frame(t0 + ms(8000)).gesture;
    assert!(matches!(
        event,
        Some(GestureEvent::Calibration(CalibrationStep::Done(outcome))) if outcome.timed_out
    ));
    assert_eq!(view.gesture().unwrap().calibration().pinch_ratio, Some(0.35));
    assert_eq!(log.borrow().keys().last(), Some(&"calibration.fallback"));
}

#[test]
fn test_pinch_pan_moves_pan_but_not_zoom() {
    let t0 = Instant::now();
    let mut clock = Clock::new(t0);
    let (mut view, _probe, _log) = calibrated_view(t0, &mut clock);

    let now = clock.next();
    assert_eq!(
        feed(&mut view, now, Some(pinch_hand(Point::new(0.5, 0.5), 0.3))),
        Some(GestureEvent::PanStarted)
    );

    // Hand moves left in the camera image; mirrored, the plan moves right.
    // 50px beyond a 12px dead zone at gain 1.5 is 57px.
    let mut last = None;
    for _ in 0..40 {
        let now = clock.next();
        last = feed(&mut view, now, Some(pinch_hand(Point::new(0.4, 0.5), 0.3)));
    }
    let Some(GestureEvent::Panned(pan)) = last else {
        panic!("expected Panned, got {:?}", last);
    };
    assert!((pan.x - -193.0).abs() < 0.01, "{:?}", pan);
    assert!((pan.y - -200.0).abs() < 0.01, "{:?}", pan);
    assert!(approx(view.viewport().zoom(), 1.0));

    // Loosening past the stay band ends the pan without moving further
    let now = clock.next();
    assert_eq!(
        feed(&mut view, now, Some(pinch_hand(Point::new(0.3, 0.5), 0.9))),
        Some(GestureEvent::PanEnded)
    );
    assert!((view.viewport().pan().x - pan.x).abs() < 0.01);
}

#[test]
fn test_hand_loss_ends_pan_after_grace() {
    let t0 = Instant::now();
    let mut clock = Clock::new(t0);
    let (mut view, _probe, _log) = calibrated_view(t0, &mut clock);

    let now = clock.next();
    feed(&mut view, now, Some(pinch_hand(Point::new(0.5, 0.5), 0.3)));
    assert!(view.gesture().unwrap().is_panning());

    // A short dropout keeps the pan alive
    let now = clock.next();
    assert_eq!(feed(&mut view, now, None), Some(GestureEvent::NoHand));
    assert!(view.gesture().unwrap().is_panning());

    // The grace period expires between frames
    let now = clock.skip(5);
    assert_eq!(view.frame(now).gesture, Some(GestureEvent::HandLost));
    assert!(!view.gesture().unwrap().is_panning());
    assert!(!view.gesture().unwrap().hand_detected());
}

#[test]
fn test_open_hand_hold_restores_default_view_once() {
    let t0 = Instant::now();
    let mut clock = Clock::new(t0);
    let (mut view, _probe, log) = calibrated_view(t0, &mut clock);
    assert!(approx(view.viewport().zoom(), 1.0));

    let mut events = Vec::new();
    for _ in 0..20 {
        let now = clock.next();
        events.push(feed(&mut view, now, Some(open_hand(Point::new(0.5, 0.5)))));
    }
    let resets = events
        .iter()
        .filter(|e| **e == Some(GestureEvent::ViewReset))
        .count();
    assert_eq!(resets, 1);
    assert_eq!(view.viewport().viewport(), Viewport::new(0.5, Point::ZERO));
    assert_eq!(
        log.borrow().keys().iter().filter(|k| **k == "gesture.view_reset").count(),
        1
    );
}

#[test]
fn test_open_hand_across_hand_loss_does_not_count_as_hold() {
    let t0 = Instant::now();
    let mut clock = Clock::new(t0);
    let (mut view, _probe, _log) = calibrated_view(t0, &mut clock);
    let before = view.viewport().viewport();
    let origin = Point::new(0.5, 0.5);

    let now = clock.next();
    assert_eq!(feed(&mut view, now, Some(open_hand(origin))), Some(GestureEvent::Tracking));

    let mut lost = false;
    for _ in 0..30 {
        let now = clock.next();
        lost |= feed(&mut view, now, None) == Some(GestureEvent::HandLost);
    }
    assert!(lost);
    assert!(!view.gesture().unwrap().hand_detected());

    // The hand comes back open at the same spot: the hold starts over
    let now = clock.next();
    assert_eq!(feed(&mut view, now, Some(open_hand(origin))), Some(GestureEvent::Tracking));
    assert_eq!(view.viewport().viewport(), before);

    let mut events = Vec::new();
    for _ in 0..10 {
        let now = clock.next();
        events.push(feed(&mut view, now, Some(open_hand(origin))));
    }
    assert!(events.contains(&Some(GestureEvent::ViewReset)));
}

#[test]
fn test_settings_reload_keeps_reset_cooldown() {
    let t0 = Instant::now();
    let mut clock = Clock::new(t0);
    let (mut view, _probe, _log) = calibrated_view(t0, &mut clock);
    let origin = Point::new(0.5, 0.5);

    let mut fired = false;
    while !fired {
        let now = clock.next();
        fired = feed(&mut view, now, Some(open_hand(origin))) == Some(GestureEvent::ViewReset);
    }

    view.apply_settings(Settings::default());
    for _ in 0..20 {
        let now = clock.next();
        assert_ne!(feed(&mut view, now, Some(open_hand(origin))), Some(GestureEvent::ViewReset));
    }
}

#[test]
fn test_throttled_frames_are_dropped() {
    let t0 = Instant::now();
    let mut clock = Clock::new(t0);
    let (mut view, _probe, _log) = calibrated_view(t0, &mut clock);

    let now = clock.next();
    assert!(!view.gesture().unwrap().wants_frame(now - ms(30)));
    feed(&mut view, now, Some(pinch_hand(Point::new(0.5, 0.5), 0.3)));
    assert_eq!(
        feed(&mut view, now + ms(20), Some(pinch_hand(Point::new(0.5, 0.5), 0.3))),
        Some(GestureEvent::Throttled)
    );
}

#[test]
fn test_stale_camera_is_released() {
    let t0 = Instant::now();
    let (mut view, probe, log) = open_view(t0);

    assert!(view.toggle_gesture_control());
    let ticket = last_ticket(&probe);
    assert!(!view.toggle_gesture_control());

    // The stream arrives after the user already turned gesture control off
    assert!(!view.camera_ready(ticket, Ok(stream(&probe)), t0 + ms(500)));
    assert_eq!(probe.stops.get(), 1);
    assert!(!view.gesture().unwrap().has_camera());
    assert_eq!(log.borrow().keys(), vec!["gesture.starting", "gesture.disabled"]);

    // A stale ticket from an older request is refused even while enabling
    assert!(view.toggle_gesture_control());
    assert!(!view.camera_ready(ticket, Ok(stream(&probe)), t0 + ms(600)));
    assert_eq!(probe.stops.get(), 2);
    assert!(view.camera_ready(last_ticket(&probe), Ok(stream(&probe)), t0 + ms(700)));
}

#[test]
fn test_disable_and_leave_release_camera() {
    let t0 = Instant::now();
    let mut clock = Clock::new(t0);
    let (mut view, probe, log) = calibrated_view(t0, &mut clock);
    assert_eq!(probe.stops.get(), 0);

    assert!(!view.toggle_gesture_control());
    assert_eq!(probe.stops.get(), 1);
    assert_eq!(log.borrow().keys().last(), Some(&"gesture.disabled"));

    // Re-enabling skips calibration: the learned ratio is kept
    assert!(view.toggle_gesture_control());
    view.camera_ready(last_ticket(&probe), Ok(stream(&probe)), clock.next());
    assert!(matches!(view.gesture().unwrap().phase(), GesturePhase::Idle));

    view.leave();
    assert_eq!(probe.stops.get(), 2);
    assert!(!view.gesture().unwrap().is_enabled());

    // Frames after leaving are ignored
    let now = clock.next();
    assert_eq!(
        feed(&mut view, now, Some(pinch_hand(Point::new(0.5, 0.5), 0.3))),
        Some(GestureEvent::Inactive)
    );
}

#[test]
fn test_dropping_view_releases_camera() {
    let t0 = Instant::now();
    let (mut view, probe, _log) = open_view(t0);
    view.toggle_gesture_control();
    view.camera_ready(last_ticket(&probe), Ok(stream(&probe)), t0);
    drop(view);
    assert_eq!(probe.stops.get(), 1);
}

#[test]
fn test_insecure_context_reports_error() {
    let t0 = Instant::now();
    let (mut view, _) = TestPlanBuilder::new(1000.0, 800.0).open(t0);
    let (camera, probe) = FakeCamera::insecure();
    let log = notice_log();
    view.attach_gesture_control(Box::new(camera), Box::new(log.clone()));

    assert!(!view.toggle_gesture_control());
    assert!(probe.requests.borrow().is_empty());
    let log = log.borrow();
    let errors: Vec<_> = log.errors().map(|n| n.key).collect();
    assert_eq!(errors, vec!["camera.insecure_context"]);
}

#[test]
fn test_permission_denied_returns_to_disabled() {
    let t0 = Instant::now();
    let (mut view, probe, log) = open_view(t0);
    view.toggle_gesture_control();

    assert!(!view.camera_ready(last_ticket(&probe), Err(CameraError::PermissionDenied), t0));
    assert!(!view.gesture().unwrap().is_enabled());
    assert_eq!(log.borrow().errors().count(), 1);
    assert_eq!(log.borrow().keys().last(), Some(&"camera.permission_denied"));
}

#[test]
fn test_request_calibration_enables_camera() {
    let t0 = Instant::now();
    let mut clock = Clock::new(t0);
    let (mut view, probe, _log) = calibrated_view(t0, &mut clock);
    view.toggle_gesture_control();

    // Recalibrating from off starts the camera, then calibrates on arrival
    view.request_calibration(clock.next());
    assert_eq!(probe.requests.borrow().len(), 2);
    view.camera_ready(last_ticket(&probe), Ok(stream(&probe)), clock.next());
    assert!(matches!(view.gesture().unwrap().phase(), GesturePhase::Calibrating { .. }));
}
