//! Pointer input state machine.
//!
//! One explicit state instead of a handful of flags, so a drag and a box
//! selection can never be in flight at the same time.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Panning              (middle button down)
//! Idle -> DraggingObjects      (primary down on an object; selection adjusted first)
//! Idle -> DraggingRoom         (primary down inside the selected room)
//! Idle -> BoxSelecting         (primary down anywhere else)
//!
//! Any -> Idle                  (pointer up finalizes, Escape cancels)
//! ```

use crate::geometry::{Point, Rect};
use crate::selection::GroupDrag;
use crate::types::{ObjectId, RoomId, RoomShape};

#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No active pointer operation
    #[default]
    Idle,

    /// Panning the view
    Panning {
        /// Last pointer position (screen) for delta calculation
        last_pos: Point,
    },

    /// Moving the selected objects together
    DraggingObjects { drag: GroupDrag },

    /// Moving the selected room
    DraggingRoom {
        room_id: RoomId,
        /// World position where the drag started
        handle_start: Point,
        /// Shape before the drag; the preview is this plus `delta`
        original: RoomShape,
        delta: Point,
    },

    /// Rubber-band selection, corners in screen coordinates
    BoxSelecting {
        start: Point,
        current: Point,
        /// Shift held: toggle membership instead of replacing
        toggle: bool,
    },
}

impl InputState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_panning(&self) -> bool {
        matches!(self, Self::Panning { .. })
    }

    /// True while objects or a room are being moved.
    pub fn is_dragging(&self) -> bool {
        matches!(
            self,
            Self::DraggingObjects { .. } | Self::DraggingRoom { .. }
        )
    }

    pub fn is_box_selecting(&self) -> bool {
        matches!(self, Self::BoxSelecting { .. })
    }

    /// Selection rectangle in screen coordinates, for drawing the overlay.
    pub fn selection_box(&self) -> Option<Rect> {
        match self {
            Self::BoxSelecting { start, current, .. } => Some(Rect::from_corners(*start, *current)),
            _ => None,
        }
    }

    /// Preview position of an object being dragged.
    pub fn dragged_position(&self, id: ObjectId) -> Option<Point> {
        match self {
            Self::DraggingObjects { drag } => drag
                .start_positions()
                .iter()
                .find(|(dragged, _)| *dragged == id)
                .map(|(_, start)| *start + drag.delta()),
            _ => None,
        }
    }

    /// Preview shape of the room being dragged.
    pub fn dragged_room(&self) -> Option<(RoomId, RoomShape)> {
        match self {
            Self::DraggingRoom {
                room_id,
                original,
                delta,
                ..
            } => Some((*room_id, original.translated(*delta))),
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::Idle;
    }
}
