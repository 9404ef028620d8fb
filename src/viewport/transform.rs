//! Pure viewport math: screen/world mapping, zoom-at-point, pan clamping
//! and fit-to-content.
//!
//! Screen = world * zoom + pan. Nothing here holds state; the controller
//! composes these functions.

use crate::constants::{DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM};
use crate::geometry::{Point, Size};
use serde::{Deserialize, Serialize};

/// `{zoom, pan}` for one floor-plan view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub zoom: f32,
    pub pan: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            pan: Point::ZERO,
        }
    }
}

impl Viewport {
    pub fn new(zoom: f32, pan: Point) -> Self {
        Self {
            zoom: clamp_zoom(zoom),
            pan,
        }
    }

    #[inline]
    pub fn world_to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.zoom + self.pan.x, p.y * self.zoom + self.pan.y)
    }

    #[inline]
    pub fn screen_to_world(&self, p: Point) -> Point {
        Point::new((p.x - self.pan.x) / self.zoom, (p.y - self.pan.y) / self.zoom)
    }

    /// Convert a screen-space delta (e.g. a drag) to world units.
    #[inline]
    pub fn delta_screen_to_world(&self, delta: Point) -> Point {
        Point::new(delta.x / self.zoom, delta.y / self.zoom)
    }

    /// Multiply zoom by `factor` (clamped) while keeping the world point
    /// under `screen_point` stationary: `pan' = screen - zoom' * world`.
    pub fn zoomed_at(&self, screen_point: Point, factor: f32) -> Viewport {
        let world = self.screen_to_world(screen_point);
        let zoom = clamp_zoom(self.zoom * factor);
        Viewport {
            zoom,
            pan: Point::new(screen_point.x - world.x * zoom, screen_point.y - world.y * zoom),
        }
    }

    /// Viewport at `zoom` that puts `world` in the middle of the screen.
    pub fn centered_on(world: Point, zoom: f32, viewport_size: Size) -> Viewport {
        let zoom = clamp_zoom(zoom);
        Viewport {
            zoom,
            pan: Point::new(
                viewport_size.width / 2.0 - world.x * zoom,
                viewport_size.height / 2.0 - world.y * zoom,
            ),
        }
    }

    /// World point currently shown at the middle of the screen.
    pub fn world_center(&self, viewport_size: Size) -> Point {
        self.screen_to_world(Point::new(viewport_size.width / 2.0, viewport_size.height / 2.0))
    }
}

/// Clamp to `[MIN_ZOOM, MAX_ZOOM]`; non-finite input resets to the default.
#[inline]
pub fn clamp_zoom(zoom: f32) -> f32 {
    if zoom.is_finite() {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        DEFAULT_ZOOM
    }
}

/// Sizes that bound where pan may go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanBounds {
    pub viewport: Size,
    pub content: Size,
    /// Overscroll allowance in screen pixels
    pub margin: f32,
}

impl PanBounds {
    /// Clamp `pan` so the content cannot drift away from the viewport.
    ///
    /// Per axis, with `s` the scaled content size and `v` the viewport size,
    /// pan stays within `[min(0, v - s) - margin, max(0, v - s) + margin]`.
    /// Content smaller than the viewport floats freely inside it (plus the
    /// margin); larger content keeps its edges within `margin` of the
    /// viewport edges. The result is idempotent.
    pub fn clamp_pan(&self, zoom: f32, pan: Point) -> Point {
        Point::new(
            clamp_axis(pan.x, self.viewport.width, self.content.width * zoom, self.margin),
            clamp_axis(pan.y, self.viewport.height, self.content.height * zoom, self.margin),
        )
    }
}

fn clamp_axis(pan: f32, view: f32, scaled: f32, margin: f32) -> f32 {
    let margin = margin.max(0.0);
    let slack = view - scaled;
    let lo = slack.min(0.0) - margin;
    let hi = slack.max(0.0) + margin;
    if pan.is_finite() { pan.clamp(lo, hi) } else { 0.0 }
}

/// Fit content into the viewport without upscaling, centered.
///
/// Empty content or viewport yields the default viewport.
pub fn fit_to_content(viewport_size: Size, content_size: Size) -> Viewport {
    if viewport_size.is_empty() || content_size.is_empty() {
        return Viewport::default();
    }
    let scale = (viewport_size.width / content_size.width)
        .min(viewport_size.height / content_size.height)
        .min(1.0);
    let zoom = clamp_zoom(scale);
    Viewport {
        zoom,
        pan: Point::new(
            (viewport_size.width - content_size.width * zoom) / 2.0,
            (viewport_size.height - content_size.height * zoom) / 2.0,
        ),
    }
}
