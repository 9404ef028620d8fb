//! Pointer, wheel and keyboard input for the floor-plan view.
//!
//! The hosting UI translates its native events into the small event types
//! below and calls the handlers on [`crate::view::FloorPlanView`]. All
//! positions passed in are screen coordinates relative to the viewport
//! element.
//!
//! ## Modules
//!
//! - `state` - Input state machine enum and helper methods
//! - `pointer_down` - Selection and drag/pan/box initiation
//! - `drag` - Pointer move handling while a gesture is in flight
//! - `pointer_up` - Finalizing drags and box selection
//! - `transform` - Wheel zoom/pan and keyboard navigation

mod drag;
mod pointer_down;
mod pointer_up;
mod state;
mod transform;

pub use state::InputState;

use crate::geometry::Point;
use crate::types::{MapObject, ObjectId};
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    /// Command on macOS, Windows key elsewhere
    pub platform: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        platform: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        platform: false,
    };

    pub const CONTROL: Self = Self {
        shift: false,
        control: true,
        platform: false,
    };

    /// Wheel zooms instead of panning while this is held.
    pub fn zooms(&self) -> bool {
        self.control || self.platform
    }
}

/// Wheel delta as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelDelta {
    Pixels(Point),
    Lines(Point),
}

/// Keyboard commands the view understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
    ZoomIn,
    ZoomOut,
    RestoreDefaultView,
    FitToView,
    /// Escape: cancel an in-flight drag, otherwise clear the selection
    Cancel,
}

impl KeyCommand {
    /// Map a key name (DOM `KeyboardEvent.key` style) to a command.
    pub fn from_key(key: &str) -> Option<Self> {
        let command = match key {
            "ArrowLeft" | "left" => Self::PanLeft,
            "ArrowRight" | "right" => Self::PanRight,
            "ArrowUp" | "up" => Self::PanUp,
            "ArrowDown" | "down" => Self::PanDown,
            "+" | "=" => Self::ZoomIn,
            "-" | "_" => Self::ZoomOut,
            "0" => Self::RestoreDefaultView,
            "f" | "F" => Self::FitToView,
            "Escape" | "escape" => Self::Cancel,
            _ => return None,
        };
        Some(command)
    }
}

/// Topmost object whose marker covers `screen`.
///
/// Markers are drawn in list order, so the search runs backwards. The pick
/// radius is in screen pixels and grows with the object's scale, not with zoom.
pub fn object_at(
    objects: &[MapObject],
    viewport: &Viewport,
    screen: Point,
    radius: f32,
) -> Option<ObjectId> {
    objects
        .iter()
        .rev()
        .find(|object| {
            let marker = viewport.world_to_screen(object.position());
            marker.distance(screen) <= radius * object.scale.max(0.0)
        })
        .map(|object| object.id)
}
