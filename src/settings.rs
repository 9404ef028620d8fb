//! User-tunable settings for the viewport and gesture layers.
//!
//! Stored as JSON in the platform config directory. Every field has a
//! default, so partial or older files keep loading. The gesture dead zone
//! and gain in particular are camera dependent and meant to be tuned here.

use crate::constants::*;
use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;

const APP_DIR: &str = "floorplan-view";
const SETTINGS_FILE: &str = "settings.json";

/// Location of the settings file, if the platform has a config directory.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub viewport: ViewportSettings,
    pub gesture: GestureSettings,
}

impl Settings {
    /// Load from the default location, falling back to defaults on any error.
    pub fn load() -> Self {
        let Some(path) = default_settings_path() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to load settings from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> SettingsResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self) -> SettingsResult<()> {
        let path = default_settings_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Write atomically: serialize into a sibling temp file, then rename.
    pub fn save_to(&self, path: &Path) -> SettingsResult<()> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        let json = serde_json::to_string_pretty(self)?;
        tmp.write_all(json.as_bytes())?;
        tmp.flush()?;
        tmp.persist(path)?;
        Ok(())
    }
}

// ============================================================================
// Viewport
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    pub pan_margin: f32,
    pub readable_zoom: f32,
    pub zoom_wheel_divisor: f32,
    pub keyboard_pan_step: f32,
    pub keyboard_zoom_factor: f32,
    pub focus_animation_ms: u64,
    pub render_coalesce_ms: u64,
    pub commit_settle_ms: u64,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            pan_margin: PAN_MARGIN,
            readable_zoom: READABLE_ZOOM,
            zoom_wheel_divisor: ZOOM_WHEEL_DIVISOR,
            keyboard_pan_step: KEYBOARD_PAN_STEP,
            keyboard_zoom_factor: KEYBOARD_ZOOM_FACTOR,
            focus_animation_ms: FOCUS_ANIMATION_MS,
            render_coalesce_ms: RENDER_COALESCE_MS,
            commit_settle_ms: COMMIT_SETTLE_MS,
        }
    }
}

impl ViewportSettings {
    pub fn focus_animation(&self) -> Duration {
        Duration::from_millis(self.focus_animation_ms)
    }

    pub fn render_coalesce(&self) -> Duration {
        Duration::from_millis(self.render_coalesce_ms)
    }

    pub fn commit_settle(&self) -> Duration {
        Duration::from_millis(self.commit_settle_ms)
    }
}

// ============================================================================
// Gesture
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureSettings {
    /// Displacements shorter than this (screen px) are ignored
    pub dead_zone_px: f32,
    /// Multiplier applied to displacement beyond the dead zone
    pub gain: f32,
    /// Exponential smoothing factor in (0, 1]; 1 disables smoothing
    pub smoothing: f32,
    /// Flip the horizontal axis for front-facing (selfie) cameras
    pub mirror_x: bool,
    pub inference_fps: f32,
    pub hand_loss_grace_ms: u64,
    pub reset_hold_ms: u64,
    pub reset_cooldown_ms: u64,
    pub reset_drift_tolerance: f32,
    pub pan_enter_factor: f32,
    pub pan_stay_factor: f32,
    pub open_extension: f32,
    pub open_gap: f32,
    pub calibration_frames: usize,
    pub calibration_release_ratio: f32,
    pub calibration_timeout_ms: u64,
    pub calibration_fallback_ratio: f32,
    pub progress_bucket_percent: u8,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            dead_zone_px: GESTURE_DEAD_ZONE_PX,
            gain: GESTURE_GAIN,
            smoothing: GESTURE_SMOOTHING,
            mirror_x: true,
            inference_fps: INFERENCE_FPS,
            hand_loss_grace_ms: HAND_LOSS_GRACE_MS,
            reset_hold_ms: RESET_HOLD_MS,
            reset_cooldown_ms: RESET_COOLDOWN_MS,
            reset_drift_tolerance: RESET_DRIFT_TOLERANCE,
            pan_enter_factor: PAN_ENTER_FACTOR,
            pan_stay_factor: PAN_STAY_FACTOR,
            open_extension: OPEN_EXTENSION,
            open_gap: OPEN_GAP,
            calibration_frames: CALIBRATION_FRAMES,
            calibration_release_ratio: CALIBRATION_RELEASE_RATIO,
            calibration_timeout_ms: CALIBRATION_TIMEOUT_MS,
            calibration_fallback_ratio: CALIBRATION_FALLBACK_RATIO,
            progress_bucket_percent: PROGRESS_BUCKET_PERCENT,
        }
    }
}

impl GestureSettings {
    /// Minimum spacing between accepted inference frames.
    pub fn inference_interval(&self) -> Duration {
        if self.inference_fps > 0.0 {
            Duration::try_from_secs_f64(1.0 / f64::from(self.inference_fps)).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        }
    }

    pub fn hand_loss_grace(&self) -> Duration {
        Duration::from_millis(self.hand_loss_grace_ms)
    }

    pub fn reset_hold(&self) -> Duration {
        Duration::from_millis(self.reset_hold_ms)
    }

    pub fn reset_cooldown(&self) -> Duration {
        Duration::from_millis(self.reset_cooldown_ms)
    }

    pub fn calibration_timeout(&self) -> Duration {
        Duration::from_millis(self.calibration_timeout_ms)
    }
}
