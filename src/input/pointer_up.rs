//! Pointer up - commit drags, finalize box selection.

use super::InputState;
use crate::geometry::{Point, Rect};
use crate::profile_scope;
use crate::selection::selection_box_query;
use crate::view::FloorPlanView;

impl FloorPlanView {
    /// Returns whether the view needs a redraw.
    pub fn pointer_up(&mut self, screen: Point) -> bool {
        profile_scope!("pointer_up");

        let world = self.viewport.screen_to_world(screen);
        match std::mem::take(&mut self.input) {
            InputState::Idle | InputState::Panning { .. } => false,

            InputState::DraggingObjects { mut drag } => {
                drag.update(world);
                if drag.delta() == Point::ZERO || drag.is_empty() {
                    return false;
                }
                let positions = drag.finish();
                tracing::debug!("Committing group move of {} object(s)", positions.len());
                self.move_objects(&positions);
                true
            }

            InputState::DraggingRoom {
                room_id,
                handle_start,
                original,
                ..
            } => {
                let delta = world - handle_start;
                if delta == Point::ZERO {
                    return false;
                }
                let Some(mut room) = self.room(room_id).cloned() else {
                    return false;
                };
                room.shape = original.translated(delta);
                self.update_room(room);
                true
            }

            InputState::BoxSelecting { start, toggle, .. } => {
                self.finish_box_selection(start, screen, toggle);
                true
            }
        }
    }

    /// Escape: cancel a drag (the model was never touched, so dropping the
    /// preview restores the start positions), otherwise clear the selection.
    pub fn cancel_interaction(&mut self) -> bool {
        if self.input.is_idle() {
            let had_selection = !self.selection.is_empty();
            self.selection.clear();
            return had_selection;
        }
        tracing::debug!("Pointer interaction cancelled");
        self.input.reset();
        true
    }

    fn finish_box_selection(&mut self, start: Point, end: Point, toggle: bool) {
        let rect = Rect::from_corners(
            self.viewport.screen_to_world(start),
            self.viewport.screen_to_world(end),
        );
        let min_size = self.min_selection_box_world();

        // Too small to be a box: treat as a click on the plan
        if rect.width < min_size || rect.height < min_size {
            let world = self.viewport.screen_to_world(start);
            match self.room_at(world).map(|room| room.id) {
                Some(room_id) if !toggle => self.selection.select_room(room_id),
                Some(_) => {}
                None if !toggle => self.selection.clear(),
                None => {}
            }
            return;
        }

        let ids = selection_box_query(&self.objects, rect, min_size);
        if toggle {
            self.selection.toggle_objects(ids);
        } else {
            self.selection.replace_objects(ids);
        }
    }
}
