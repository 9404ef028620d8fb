//! Engine-wide constants.
//!
//! Centralizes magic numbers for the viewport, selection and gesture layers.
//! Values that are device dependent are only defaults here; the live values
//! come from [`crate::settings::Settings`].

// ============================================================================
// Zoom & Pan
// ============================================================================

/// Minimum zoom level
pub const MIN_ZOOM: f32 = 0.2;

/// Maximum zoom level
pub const MAX_ZOOM: f32 = 3.0;

/// Default zoom level
pub const DEFAULT_ZOOM: f32 = 1.0;

/// Elastic overscroll allowance around the scaled content, in screen pixels
pub const PAN_MARGIN: f32 = 120.0;

/// Lowest zoom a focus-to-point will settle on, so the target stays legible
pub const READABLE_ZOOM: f32 = 1.0;

/// Pixel wheel delta that corresponds to a full zoom doubling/halving step
pub const ZOOM_WHEEL_DIVISOR: f32 = 500.0;

/// Line-mode wheel deltas are converted to pixels with this factor
pub const WHEEL_LINE_HEIGHT: f32 = 20.0;

/// Screen pixels panned per arrow key press
pub const KEYBOARD_PAN_STEP: f32 = 48.0;

/// Multiplicative zoom step for `+` / `-`
pub const KEYBOARD_ZOOM_FACTOR: f32 = 1.2;

// ============================================================================
// Animation & Timing
// ============================================================================

/// Focus-to-point animation duration in milliseconds
pub const FOCUS_ANIMATION_MS: u64 = 300;

/// Minimum interval between render notifications during continuous input
pub const RENDER_COALESCE_MS: u64 = 16;

/// Settle delay before a viewport change is committed to persistence
pub const COMMIT_SETTLE_MS: u64 = 500;

// ============================================================================
// Selection
// ============================================================================

/// Minimum size (screen pixels) of a selection box on both axes.
/// Smaller boxes are treated as a click rather than a drag.
pub const MIN_SELECTION_BOX: f32 = 5.0;

/// Pick radius around an object marker, in screen pixels at scale 1
pub const OBJECT_HIT_RADIUS: f32 = 14.0;

// ============================================================================
// Gesture Control
// ============================================================================

/// Pose inference rate, independent of the display refresh rate
pub const INFERENCE_FPS: f32 = 15.0;

/// No-hand period after which `hand_detected` drops and pan sessions end
pub const HAND_LOSS_GRACE_MS: u64 = 300;

/// Screen-space dead zone for gesture panning, in pixels
pub const GESTURE_DEAD_ZONE_PX: f32 = 12.0;

/// Gain applied to hand displacement beyond the dead zone
pub const GESTURE_GAIN: f32 = 1.5;

/// Exponential smoothing factor applied to the gesture pan target
pub const GESTURE_SMOOTHING: f32 = 0.35;

/// Pinch ratio multiplier (of the calibrated ratio) to start a pan
pub const PAN_ENTER_FACTOR: f32 = 1.25;

/// Pinch ratio multiplier (of the calibrated ratio) to keep a pan going
pub const PAN_STAY_FACTOR: f32 = 1.8;

/// Fingertip-to-wrist distance, in palm widths, for a finger to count as extended
pub const OPEN_EXTENSION: f32 = 1.5;

/// Minimum gap between adjacent fingertips, in palm widths, for an open hand
pub const OPEN_GAP: f32 = 0.3;

/// Hold time before the open-hand reset fires
pub const RESET_HOLD_MS: u64 = 550;

/// Cooldown after a reset before it may fire again
pub const RESET_COOLDOWN_MS: u64 = 2500;

/// Allowed drift of the hand centre (normalized image units) during a reset hold
pub const RESET_DRIFT_TOLERANCE: f32 = 0.04;

// ============================================================================
// Calibration
// ============================================================================

/// Consecutive qualifying frames required for a calibration
pub const CALIBRATION_FRAMES: usize = 30;

/// A frame only qualifies while the pinch ratio stays at or below this value
pub const CALIBRATION_RELEASE_RATIO: f32 = 0.9;

/// Calibration gives up and falls back after this long
pub const CALIBRATION_TIMEOUT_MS: u64 = 8000;

/// Pinch ratio used when calibration times out
pub const CALIBRATION_FALLBACK_RATIO: f32 = 0.35;

/// Calibration progress is reported in buckets of this many percent
pub const PROGRESS_BUCKET_PERCENT: u8 = 25;
