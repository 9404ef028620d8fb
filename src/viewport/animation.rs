//! Focus-to-point animation.

use super::transform::Viewport;
use crate::geometry::{Point, Size};
use std::time::{Duration, Instant};

/// Eases zoom and the on-screen centre from one viewport to another.
///
/// The world point at the screen centre travels in a straight line, which
/// keeps the target in view for the whole animation even while zooming.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusAnimation {
    from_center: Point,
    to_center: Point,
    from_zoom: f32,
    to_zoom: f32,
    target: Viewport,
    start: Instant,
    duration: Duration,
}

impl FocusAnimation {
    pub fn new(
        from: Viewport,
        target: Viewport,
        viewport_size: Size,
        start: Instant,
        duration: Duration,
    ) -> Self {
        Self {
            from_center: from.world_center(viewport_size),
            to_center: target.world_center(viewport_size),
            from_zoom: from.zoom,
            to_zoom: target.zoom,
            target,
            start,
            duration,
        }
    }

    pub fn target(&self) -> Viewport {
        self.target
    }

    /// Viewport at `now`, and whether the animation has finished.
    pub fn sample(&self, now: Instant, viewport_size: Size) -> (Viewport, bool) {
        let elapsed = now.saturating_duration_since(self.start);
        if self.duration.is_zero() || elapsed >= self.duration {
            return (self.target, true);
        }
        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        let eased = ease_out_cubic(t);
        let zoom = self.from_zoom + (self.to_zoom - self.from_zoom) * eased;
        let center = self.from_center.lerp(self.to_center, eased);
        (Viewport::centered_on(center, zoom, viewport_size), false)
    }
}

#[inline]
fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}
