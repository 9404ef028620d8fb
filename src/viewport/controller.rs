//! Stateful viewport for one floor-plan view.
//!
//! Every mutation goes through this object, so pointer input, keyboard
//! input and gesture control serialize on it and the last writer in a frame
//! wins.

use super::animation::FocusAnimation;
use super::scheduler::{ChangeOrigin, TransformScheduler, TransformSignals};
use super::transform::{PanBounds, Viewport, clamp_zoom, fit_to_content};
use crate::geometry::{Point, Size};
use crate::settings::ViewportSettings;
use std::time::Instant;

/// Read/write access to a viewport, as needed by gesture control.
pub trait ViewportHost {
    fn viewport(&self) -> Viewport;
    fn viewport_size(&self) -> Size;
    /// Continuous pan write; clamped by the host.
    fn set_pan(&mut self, pan: Point, now: Instant);
    /// Restore the saved default view, or fit-to-view without one.
    fn restore_default_view(&mut self, now: Instant);
}

pub struct ViewportController {
    viewport: Viewport,
    viewport_size: Size,
    content_size: Size,
    default_view: Option<Viewport>,
    animation: Option<FocusAnimation>,
    scheduler: TransformScheduler,
    settings: ViewportSettings,
}

impl ViewportController {
    pub fn new(viewport_size: Size, content_size: Size, settings: ViewportSettings) -> Self {
        let scheduler =
            TransformScheduler::new(settings.render_coalesce(), settings.commit_settle());
        Self {
            viewport: fit_to_content(viewport_size, content_size),
            viewport_size,
            content_size,
            default_view: None,
            animation: None,
            scheduler,
            settings,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn zoom(&self) -> f32 {
        self.viewport.zoom
    }

    pub fn pan(&self) -> Point {
        self.viewport.pan
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    pub fn content_size(&self) -> Size {
        self.content_size
    }

    pub fn settings(&self) -> &ViewportSettings {
        &self.settings
    }

    pub fn apply_settings(&mut self, settings: ViewportSettings) {
        self.scheduler
            .set_timings(settings.render_coalesce(), settings.commit_settle());
        self.settings = settings;
    }

    fn bounds(&self) -> PanBounds {
        PanBounds {
            viewport: self.viewport_size,
            content: self.content_size,
            margin: self.settings.pan_margin,
        }
    }

    /// Clamp pan for `zoom` against the current sizes and margin.
    pub fn clamp_pan(&self, zoom: f32, pan: Point) -> Point {
        self.bounds().clamp_pan(zoom, pan)
    }

    #[inline]
    pub fn world_to_screen(&self, p: Point) -> Point {
        self.viewport.world_to_screen(p)
    }

    #[inline]
    pub fn screen_to_world(&self, p: Point) -> Point {
        self.viewport.screen_to_world(p)
    }

    /// Install a viewport (zoom clamped, pan clamped) and schedule signals.
    fn commit_viewport(&mut self, zoom: f32, pan: Point, origin: ChangeOrigin, now: Instant) -> bool {
        let zoom = clamp_zoom(zoom);
        let next = Viewport {
            zoom,
            pan: self.clamp_pan(zoom, pan),
        };
        if next == self.viewport {
            return false;
        }
        self.viewport = next;
        self.scheduler.mark_changed(origin, now);
        true
    }

    /// User input takes over from any running focus animation.
    fn interrupt(&mut self) {
        if self.animation.take().is_some() {
            tracing::debug!("Focus animation interrupted by input");
        }
    }

    // ------------------------------------------------------------------------
    // Direct manipulation
    // ------------------------------------------------------------------------

    pub fn set_pan(&mut self, pan: Point, origin: ChangeOrigin, now: Instant) -> bool {
        self.interrupt();
        self.commit_viewport(self.viewport.zoom, pan, origin, now)
    }

    pub fn pan_by(&mut self, delta: Point, origin: ChangeOrigin, now: Instant) -> bool {
        let pan = self.viewport.pan + delta;
        self.set_pan(pan, origin, now)
    }

    /// Set zoom about the viewport centre.
    pub fn set_zoom(&mut self, zoom: f32, now: Instant) -> bool {
        let factor = clamp_zoom(zoom) / self.viewport.zoom;
        let center = Point::new(self.viewport_size.width / 2.0, self.viewport_size.height / 2.0);
        self.zoom_at(center, factor, ChangeOrigin::Discrete, now)
    }

    /// Multiplicative zoom keeping the world point under `screen_point` fixed.
    pub fn zoom_at(
        &mut self,
        screen_point: Point,
        factor: f32,
        origin: ChangeOrigin,
        now: Instant,
    ) -> bool {
        self.interrupt();
        let next = self.viewport.zoomed_at(screen_point, factor);
        self.commit_viewport(next.zoom, next.pan, origin, now)
    }

    /// Fit the whole plan into the viewport.
    pub fn fit_to_view(&mut self, now: Instant) -> bool {
        self.interrupt();
        let fitted = fit_to_content(self.viewport_size, self.content_size);
        self.commit_viewport(fitted.zoom, fitted.pan, ChangeOrigin::Discrete, now)
    }

    // ------------------------------------------------------------------------
    // Focus
    // ------------------------------------------------------------------------

    /// Target viewport that centres `world_point`, zoomed to at least the
    /// readable floor.
    pub fn focus_target(&self, world_point: Point, target_zoom: Option<f32>) -> Viewport {
        let zoom = clamp_zoom(
            target_zoom
                .unwrap_or(self.viewport.zoom)
                .max(self.settings.readable_zoom),
        );
        let centered = Viewport::centered_on(world_point, zoom, self.viewport_size);
        Viewport {
            zoom,
            pan: self.clamp_pan(zoom, centered.pan),
        }
    }

    /// Animate towards [`Self::focus_target`]. Call [`Self::advance`] each frame.
    pub fn focus_to(&mut self, world_point: Point, target_zoom: Option<f32>, now: Instant) {
        let target = self.focus_target(world_point, target_zoom);
        let duration = self.settings.focus_animation();
        if duration.is_zero() {
            self.animation = None;
            self.commit_viewport(target.zoom, target.pan, ChangeOrigin::Discrete, now);
            return;
        }
        tracing::debug!(x = world_point.x, y = world_point.y, zoom = target.zoom, "Focus animation started");
        self.animation = Some(FocusAnimation::new(
            self.viewport,
            target,
            self.viewport_size,
            now,
            duration,
        ));
    }

    pub fn focus_to_immediate(&mut self, world_point: Point, target_zoom: Option<f32>, now: Instant) {
        self.interrupt();
        let target = self.focus_target(world_point, target_zoom);
        self.commit_viewport(target.zoom, target.pan, ChangeOrigin::Discrete, now);
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Step the focus animation. Returns true while it is still running.
    pub fn advance(&mut self, now: Instant) -> bool {
        let Some(animation) = self.animation.as_ref() else {
            return false;
        };
        let (next, done) = animation.sample(now, self.viewport_size);
        if done {
            self.animation = None;
        }
        self.commit_viewport(next.zoom, next.pan, ChangeOrigin::Continuous, now);
        !done
    }

    // ------------------------------------------------------------------------
    // Default view & plan entry
    // ------------------------------------------------------------------------

    pub fn save_default_view(&mut self) {
        self.default_view = Some(self.viewport);
    }

    pub fn set_default_view(&mut self, view: Option<Viewport>) {
        self.default_view = view;
    }

    pub fn default_view(&self) -> Option<Viewport> {
        self.default_view
    }

    pub fn restore_default_view(&mut self, now: Instant) -> bool {
        self.interrupt();
        match self.default_view {
            Some(view) => self.commit_viewport(view.zoom, view.pan, ChangeOrigin::Discrete, now),
            None => self.fit_to_view(now),
        }
    }

    /// Initial viewport on plan entry: the saved one (re-clamped), else the
    /// default view, else fit-to-view. Loading is not itself a change to persist.
    pub fn enter_plan(&mut self, saved: Option<Viewport>, now: Instant) {
        self.animation = None;
        self.scheduler.reset();
        let initial = saved
            .or(self.default_view)
            .unwrap_or_else(|| fit_to_content(self.viewport_size, self.content_size));
        let zoom = clamp_zoom(initial.zoom);
        self.viewport = Viewport {
            zoom,
            pan: self.clamp_pan(zoom, initial.pan),
        };
        self.scheduler.mark_committed(self.viewport);
        self.scheduler.mark_changed(ChangeOrigin::Discrete, now);
    }

    /// The host element was resized; re-clamp.
    pub fn resize(&mut self, viewport_size: Size, now: Instant) {
        self.viewport_size = viewport_size;
        let (zoom, pan) = (self.viewport.zoom, self.viewport.pan);
        self.commit_viewport(zoom, pan, ChangeOrigin::Discrete, now);
    }

    /// The floor-plan image changed size; re-clamp.
    pub fn set_content_size(&mut self, content_size: Size, now: Instant) {
        self.content_size = content_size;
        let (zoom, pan) = (self.viewport.zoom, self.viewport.pan);
        self.commit_viewport(zoom, pan, ChangeOrigin::Discrete, now);
    }

    /// Poll render and commit signals. Call once per display frame.
    pub fn poll(&mut self, now: Instant) -> TransformSignals {
        self.scheduler.poll(now, self.viewport)
    }

    /// Commit immediately if a change is still settling (leaving the view).
    pub fn flush_commit(&mut self) -> Option<Viewport> {
        self.animation = None;
        self.scheduler.flush(self.viewport)
    }
}

impl ViewportHost for ViewportController {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    fn set_pan(&mut self, pan: Point, now: Instant) {
        ViewportController::set_pan(self, pan, ChangeOrigin::Continuous, now);
    }

    fn restore_default_view(&mut self, now: Instant) {
        ViewportController::restore_default_view(self, now);
    }
}
