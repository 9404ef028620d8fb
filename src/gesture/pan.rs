//! Hand-driven pan session.
//!
//! A session anchors the hand centre and the viewport pan at the moment the
//! pan pose was entered. Each frame the hand displacement is scaled to
//! screen pixels, passed through a radial dead zone and a gain, and added to
//! the anchored pan. The result is exponentially smoothed before it is
//! applied. Zoom is never touched.

use crate::geometry::{Point, Size};
use crate::settings::GestureSettings;
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanTuning {
    pub dead_zone_px: f32,
    pub gain: f32,
    pub smoothing: f32,
    pub mirror_x: bool,
}

impl From<&GestureSettings> for PanTuning {
    fn from(settings: &GestureSettings) -> Self {
        Self {
            dead_zone_px: settings.dead_zone_px.max(0.0),
            gain: settings.gain,
            smoothing: settings.smoothing.clamp(f32::EPSILON, 1.0),
            mirror_x: settings.mirror_x,
        }
    }
}

/// Shrinks `delta` towards zero by `dead_zone` along its own direction.
///
/// Displacements inside the zone vanish; larger ones lose exactly the zone
/// radius, so output grows continuously from zero at the boundary.
pub fn apply_dead_zone(delta: Point, dead_zone: f32) -> Point {
    let len = delta.length();
    if len <= dead_zone || len == 0.0 {
        return Point::ZERO;
    }
    delta * ((len - dead_zone) / len)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanSession {
    start_center: Point,
    start_pan: Point,
    start_zoom: f32,
    start_pinch_ratio: f32,
    smoothed: Point,
}

impl PanSession {
    pub fn open(center: Point, pinch_ratio: f32, viewport: Viewport) -> Self {
        Self {
            start_center: center,
            start_pan: viewport.pan,
            start_zoom: viewport.zoom,
            start_pinch_ratio: pinch_ratio,
            smoothed: viewport.pan,
        }
    }

    pub fn start_center(&self) -> Point {
        self.start_center
    }

    pub fn start_pan(&self) -> Point {
        self.start_pan
    }

    pub fn start_zoom(&self) -> f32 {
        self.start_zoom
    }

    pub fn start_pinch_ratio(&self) -> f32 {
        self.start_pinch_ratio
    }

    /// Unsmoothed pan for a hand at `center`.
    pub fn target(&self, center: Point, viewport_size: Size, tuning: &PanTuning) -> Point {
        let mut delta = Point::new(
            (center.x - self.start_center.x) * viewport_size.width,
            (center.y - self.start_center.y) * viewport_size.height,
        );
        if tuning.mirror_x {
            delta.x = -delta.x;
        }
        self.start_pan + apply_dead_zone(delta, tuning.dead_zone_px) * tuning.gain
    }

    /// Advance the smoothed pan one frame and return it.
    pub fn step(&mut self, center: Point, viewport_size: Size, tuning: &PanTuning) -> Point {
        let target = self.target(center, viewport_size, tuning);
        self.smoothed = self.smoothed.lerp(target, tuning.smoothing);
        self.smoothed
    }
}
