//! Pointer move - pan, group drag, room drag and box tracking.
//!
//! Called at pointer-event rate. Moves only update previews; nothing is
//! persisted until pointer up.

use super::InputState;
use crate::geometry::Point;
use crate::profile_scope;
use crate::view::FloorPlanView;
use crate::viewport::ChangeOrigin;
use std::time::Instant;

impl FloorPlanView {
    /// Returns whether the view needs a redraw.
    pub fn pointer_move(&mut self, screen: Point, now: Instant) -> bool {
        profile_scope!("pointer_move");

        let world = self.viewport.screen_to_world(screen);
        match &mut self.input {
            InputState::Idle => false,
            InputState::Panning { last_pos } => {
                let delta = screen - *last_pos;
                *last_pos = screen;
                self.viewport.pan_by(delta, ChangeOrigin::Continuous, now)
            }
            InputState::DraggingObjects { drag } => {
                drag.update(world);
                true
            }
            InputState::DraggingRoom {
                handle_start,
                delta,
                ..
            } => {
                *delta = world - *handle_start;
                true
            }
            InputState::BoxSelecting { current, .. } => {
                *current = screen;
                true
            }
        }
    }
}
