//! Pointer down - selection and drag/pan/box initiation.

use super::{InputState, Modifiers, PointerButton};
use crate::geometry::Point;
use crate::hit_testing::room_contains;
use crate::profile_scope;
use crate::selection::GroupDrag;
use crate::view::FloorPlanView;

impl FloorPlanView {
    /// Returns whether the view needs a redraw.
    pub fn pointer_down(&mut self, screen: Point, button: PointerButton, modifiers: Modifiers) -> bool {
        profile_scope!("pointer_down");

        if !self.input.is_idle() {
            return false;
        }

        match button {
            PointerButton::Middle => {
                self.input = InputState::Panning { last_pos: screen };
                false
            }
            PointerButton::Secondary => false,
            PointerButton::Primary => self.primary_down(screen, modifiers),
        }
    }

    fn primary_down(&mut self, screen: Point, modifiers: Modifiers) -> bool {
        let world = self.viewport.screen_to_world(screen);

        if let Some(id) = self.object_at_screen(screen) {
            // Shift-click only edits the selection
            if modifiers.shift {
                self.selection.handle_object_click(id, true);
                return true;
            }
            if !self.selection.contains(id) {
                self.selection.handle_object_click(id, false);
            }
            let drag = GroupDrag::begin(&self.objects, self.selection.selected_ids(), world);
            tracing::debug!("Drag started for {} object(s)", drag.start_positions().len());
            self.input = InputState::DraggingObjects { drag };
            return true;
        }

        // A selected room is dragged from anywhere inside it, even where
        // another room overlaps it.
        if !modifiers.shift {
            if let Some(room) = self
                .selection
                .selected_room_id()
                .and_then(|id| self.room(id))
                .filter(|room| room_contains(room, world))
            {
                self.input = InputState::DraggingRoom {
                    room_id: room.id,
                    handle_start: world,
                    original: room.shape.clone(),
                    delta: Point::ZERO,
                };
                return false;
            }
        }

        self.input = InputState::BoxSelecting {
            start: screen,
            current: screen,
            toggle: modifiers.shift,
        };
        true
    }
}
