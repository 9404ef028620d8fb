//! Unit tests for viewport math and the viewport controller.

use crate::helpers::{approx, approx_point, ms};
use floorplan_view::constants::{MAX_ZOOM, MIN_ZOOM};
use floorplan_view::settings::ViewportSettings;
use floorplan_view::viewport::{ChangeOrigin, PanBounds, Viewport, ViewportController, fit_to_content};
use floorplan_view::{Point, Size};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

fn random_viewport(rng: &mut StdRng) -> Viewport {
    Viewport::new(
        rng.gen_range(MIN_ZOOM..=MAX_ZOOM),
        Point::new(rng.gen_range(-2000.0..2000.0), rng.gen_range(-2000.0..2000.0)),
    )
}

fn random_point(rng: &mut StdRng) -> Point {
    Point::new(rng.gen_range(-1000.0..3000.0), rng.gen_range(-1000.0..3000.0))
}

#[test]
fn test_screen_world_round_trip() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
        let vp = random_viewport(&mut rng);
        let p = random_point(&mut rng);
        let back = vp.screen_to_world(vp.world_to_screen(p));
        assert!((back.x - p.x).abs() < 0.05, "{:?} -> {:?}", p, back);
        assert!((back.y - p.y).abs() < 0.05, "{:?} -> {:?}", p, back);
    }
}

#[test]
fn test_zoom_at_keeps_pointer_stationary() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..500 {
        let vp = random_viewport(&mut rng);
        let screen = Point::new(rng.gen_range(0.0..800.0), rng.gen_range(0.0..600.0));
        let world = vp.screen_to_world(screen);
        let zoomed = vp.zoomed_at(screen, rng.gen_range(0.25..4.0));
        let after = zoomed.world_to_screen(world);
        assert!((after.x - screen.x).abs() < 0.1, "{:?} vs {:?}", after, screen);
        assert!((after.y - screen.y).abs() < 0.1, "{:?} vs {:?}", after, screen);
        assert!((MIN_ZOOM..=MAX_ZOOM).contains(&zoomed.zoom));
    }
}

#[test]
fn test_clamp_pan_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(3);
    let bounds = PanBounds {
        viewport: Size::new(800.0, 600.0),
        content: Size::new(1200.0, 400.0),
        margin: 120.0,
    };
    for _ in 0..500 {
        let zoom = rng.gen_range(MIN_ZOOM..=MAX_ZOOM);
        let pan = Point::new(rng.gen_range(-5000.0..5000.0), rng.gen_range(-5000.0..5000.0));
        let once = bounds.clamp_pan(zoom, pan);
        assert_eq!(bounds.clamp_pan(zoom, once), once);
    }
}

#[test]
fn test_fit_scenario_snapshot() {
    let vp = fit_to_content(Size::new(500.0, 400.0), Size::new(1000.0, 800.0));
    insta::assert_debug_snapshot!(vp, @r"
    Viewport {
        zoom: 0.5,
        pan: Point {
            x: 0.0,
            y: 0.0,
        },
    }
    ");
}

#[test]
fn test_fit_centers_letterboxed_content() {
    // Wide viewport: height limits the scale, content centred horizontally
    let vp = fit_to_content(Size::new(1000.0, 400.0), Size::new(1000.0, 800.0));
    assert!(approx(vp.zoom, 0.5));
    assert!(approx_point(vp.pan, Point::new(250.0, 0.0)));
}

#[test]
fn test_controller_wheel_style_zoom_commits_after_settle() {
    let t0 = Instant::now();
    let mut c = ViewportController::new(
        Size::new(500.0, 400.0),
        Size::new(1000.0, 800.0),
        ViewportSettings::default(),
    );
    c.enter_plan(None, t0);
    c.poll(t0);

    assert!(c.zoom_at(Point::new(100.0, 100.0), 1.5, ChangeOrigin::Continuous, t0 + ms(10)));
    assert!(approx(c.zoom(), 0.75));
    assert_eq!(c.poll(t0 + ms(100)).committed, None);

    let signals = c.poll(t0 + ms(600));
    assert_eq!(signals.committed, Some(c.viewport()));
}

#[test]
fn test_resize_reclamps_pan() {
    let t0 = Instant::now();
    let mut c = ViewportController::new(
        Size::new(500.0, 400.0),
        Size::new(1000.0, 800.0),
        ViewportSettings::default(),
    );
    c.set_zoom(2.0, t0);
    c.set_pan(Point::new(-1620.0, -1320.0), ChangeOrigin::Discrete, t0);
    assert!(approx_point(c.pan(), Point::new(-1620.0, -1320.0)));

    // Larger viewport: scaled content 2000x1600 in 1000x800 allows down to -1120/-920
    c.resize(Size::new(1000.0, 800.0), t0);
    assert!(approx_point(c.pan(), Point::new(-1120.0, -920.0)));
}
