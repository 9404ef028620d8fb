//! Unit tests for settings persistence.

use floorplan_view::Settings;
use floorplan_view::settings::ViewportSettings;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let settings = Settings::load_from(&dir.path().join("absent.json")).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    let mut settings = Settings::default();
    settings.gesture.dead_zone_px = 20.0;
    settings.gesture.mirror_x = false;
    settings.viewport.commit_settle_ms = 750;
    settings.save_to(&path).unwrap();

    let loaded = Settings::load_from(&path).unwrap();
    assert_eq!(loaded, settings);
    assert_eq!(loaded.viewport.commit_settle(), Duration::from_millis(750));
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{"gesture": {"gain": 2.0}}"#).unwrap();

    let loaded = Settings::load_from(&path).unwrap();
    assert_eq!(loaded.gesture.gain, 2.0);
    assert_eq!(loaded.gesture.reset_hold_ms, 550);
    assert_eq!(loaded.viewport, ViewportSettings::default());
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(Settings::load_from(&path).is_err());
}

#[test]
fn test_viewport_defaults_snapshot() {
    let json = serde_json::to_string_pretty(&ViewportSettings::default()).unwrap();
    insta::assert_snapshot!(json, @r#"
    {
      "pan_margin": 120.0,
      "readable_zoom": 1.0,
      "zoom_wheel_divisor": 500.0,
      "keyboard_pan_step": 48.0,
      "keyboard_zoom_factor": 1.2,
      "focus_animation_ms": 300,
      "render_coalesce_ms": 16,
      "commit_settle_ms": 500
    }
    "#);
}

#[test]
fn test_gesture_intervals() {
    let gesture = Settings::default().gesture;
    assert_eq!(gesture.hand_loss_grace(), Duration::from_millis(300));
    assert_eq!(gesture.calibration_timeout(), Duration::from_secs(8));
    let interval = gesture.inference_interval().as_secs_f64();
    assert!((interval - 1.0 / 15.0).abs() < 1e-6);
}

#[test]
fn test_extreme_inference_fps_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{"gesture":{"inference_fps":1e-20}}"#).unwrap();

    let settings = Settings::load_from(&path).unwrap();
    assert_eq!(settings.gesture.inference_interval(), Duration::MAX);

    let mut gesture = settings.gesture;
    gesture.inference_fps = 0.0;
    assert_eq!(gesture.inference_interval(), Duration::ZERO);
}
