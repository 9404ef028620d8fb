//! Wheel zoom/pan and keyboard navigation.

use super::{KeyCommand, Modifiers, WheelDelta};
use crate::constants::WHEEL_LINE_HEIGHT;
use crate::geometry::Point;
use crate::view::FloorPlanView;
use crate::viewport::ChangeOrigin;
use std::time::Instant;

impl FloorPlanView {
    /// Zoom about the pointer with Control/Command held, pan otherwise.
    /// Returns whether the viewport changed.
    pub fn wheel(&mut self, screen: Point, delta: WheelDelta, modifiers: Modifiers, now: Instant) -> bool {
        let pixels = match delta {
            WheelDelta::Pixels(d) => d,
            WheelDelta::Lines(d) => d * WHEEL_LINE_HEIGHT,
        };

        if modifiers.zooms() {
            let divisor = self.viewport.settings().zoom_wheel_divisor;
            if divisor <= 0.0 {
                return false;
            }
            let factor = 1.0 - pixels.y / divisor;
            if (factor - 1.0).abs() <= 0.001 || factor <= 0.0 {
                return false;
            }
            return self
                .viewport
                .zoom_at(screen, factor, ChangeOrigin::Continuous, now);
        }

        self.viewport.pan_by(pixels, ChangeOrigin::Continuous, now)
    }

    /// Returns whether anything changed.
    pub fn key(&mut self, command: KeyCommand, now: Instant) -> bool {
        let step = self.viewport.settings().keyboard_pan_step;
        let zoom_step = self.viewport.settings().keyboard_zoom_factor;

        match command {
            KeyCommand::PanLeft => self.pan_discrete(Point::new(step, 0.0), now),
            KeyCommand::PanRight => self.pan_discrete(Point::new(-step, 0.0), now),
            KeyCommand::PanUp => self.pan_discrete(Point::new(0.0, step), now),
            KeyCommand::PanDown => self.pan_discrete(Point::new(0.0, -step), now),
            KeyCommand::ZoomIn => {
                let zoom = self.viewport.zoom() * zoom_step;
                self.viewport.set_zoom(zoom, now)
            }
            KeyCommand::ZoomOut => {
                let zoom = self.viewport.zoom() / zoom_step;
                self.viewport.set_zoom(zoom, now)
            }
            KeyCommand::RestoreDefaultView => self.viewport.restore_default_view(now),
            KeyCommand::FitToView => self.viewport.fit_to_view(now),
            KeyCommand::Cancel => self.cancel_interaction(),
        }
    }

    fn pan_discrete(&mut self, delta: Point, now: Instant) -> bool {
        self.viewport.pan_by(delta, ChangeOrigin::Discrete, now)
    }
}
