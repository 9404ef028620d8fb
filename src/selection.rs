//! Object/room selection and group transforms.
//!
//! Object selection and room selection are mutually exclusive: selecting a
//! room drops all selected objects and vice versa.

use crate::geometry::{Point, Rect};
use crate::profile_scope;
use crate::types::{MapObject, ObjectId, RoomId};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    selected_ids: HashSet<ObjectId>,
    selected_room_id: Option<RoomId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Click selection. With `toggle` (shift held) the object's membership
    /// flips; otherwise it becomes the only selected object.
    pub fn handle_object_click(&mut self, id: ObjectId, toggle: bool) {
        self.selected_room_id = None;
        if toggle {
            if !self.selected_ids.remove(&id) {
                self.selected_ids.insert(id);
            }
        } else {
            if self.selected_ids.len() == 1 && self.selected_ids.contains(&id) {
                return;
            }
            self.selected_ids.clear();
            self.selected_ids.insert(id);
        }
    }

    /// Replace the object selection, e.g. after a box select.
    pub fn replace_objects<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = ObjectId>,
    {
        self.selected_room_id = None;
        self.selected_ids.clear();
        self.selected_ids.extend(ids);
    }

    /// Flip membership of every id (shift + box select).
    pub fn toggle_objects<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = ObjectId>,
    {
        self.selected_room_id = None;
        for id in ids {
            if !self.selected_ids.remove(&id) {
                self.selected_ids.insert(id);
            }
        }
    }

    pub fn select_room(&mut self, id: RoomId) {
        self.selected_ids.clear();
        self.selected_room_id = Some(id);
    }

    pub fn clear(&mut self) {
        self.selected_ids.clear();
        self.selected_room_id = None;
    }

    /// Drop ids that no longer exist (after a delete).
    pub fn retain_objects(&mut self, mut keep: impl FnMut(ObjectId) -> bool) {
        self.selected_ids.retain(|id| keep(*id));
    }

    pub fn forget_room(&mut self, id: RoomId) {
        if self.selected_room_id == Some(id) {
            self.selected_room_id = None;
        }
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.selected_ids.contains(&id)
    }

    pub fn selected_ids(&self) -> &HashSet<ObjectId> {
        &self.selected_ids
    }

    pub fn selected_room_id(&self) -> Option<RoomId> {
        self.selected_room_id
    }

    pub fn len(&self) -> usize {
        self.selected_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected_ids.is_empty() && self.selected_room_id.is_none()
    }
}

/// Ids of all objects inside the closed world-space `rect`.
///
/// A box narrower or shorter than `min_size` is an accidental click, not a
/// drag, and selects nothing.
pub fn selection_box_query<'a>(
    objects: impl IntoIterator<Item = &'a MapObject>,
    rect: Rect,
    min_size: f32,
) -> Vec<ObjectId> {
    profile_scope!("selection_box_query");

    if rect.width < min_size || rect.height < min_size {
        return Vec::new();
    }
    objects
        .into_iter()
        .filter(|object| rect.contains(object.position()))
        .map(|object| object.id)
        .collect()
}

/// Bounds of the selected objects' positions, `None` for an empty set.
pub fn bounding_box_of<'a>(
    objects: impl IntoIterator<Item = &'a MapObject>,
    ids: &HashSet<ObjectId>,
) -> Option<Rect> {
    if ids.is_empty() {
        return None;
    }
    Rect::bounding(
        objects
            .into_iter()
            .filter(|object| ids.contains(&object.id))
            .map(MapObject::position),
    )
}

// ============================================================================
// Group drag
// ============================================================================

/// Snapshot-based group move.
///
/// Every position during and after the drag is computed from the snapshot
/// taken at drag start plus the handle's total displacement, so no error
/// accumulates across intermediate frames.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupDrag {
    handle_start: Point,
    start_positions: Vec<(ObjectId, Point)>,
    delta: Point,
}

impl GroupDrag {
    /// Snapshot the selected objects and the drag handle's world position.
    pub fn begin<'a>(
        objects: impl IntoIterator<Item = &'a MapObject>,
        ids: &HashSet<ObjectId>,
        handle_start: Point,
    ) -> Self {
        let start_positions = objects
            .into_iter()
            .filter(|object| ids.contains(&object.id))
            .map(|object| (object.id, object.position()))
            .collect();
        Self {
            handle_start,
            start_positions,
            delta: Point::ZERO,
        }
    }

    /// Track the handle's current world position.
    pub fn update(&mut self, handle_current: Point) {
        self.delta = handle_current - self.handle_start;
    }

    pub fn delta(&self) -> Point {
        self.delta
    }

    pub fn is_empty(&self) -> bool {
        self.start_positions.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.start_positions.iter().map(|(id, _)| *id)
    }

    /// Preview positions for rendering; nothing is committed.
    pub fn positions(&self) -> Vec<(ObjectId, Point)> {
        self.start_positions
            .iter()
            .map(|(id, start)| (*id, *start + self.delta))
            .collect()
    }

    /// Start positions, used to cancel a drag.
    pub fn start_positions(&self) -> &[(ObjectId, Point)] {
        &self.start_positions
    }

    /// Final positions to commit through the normal object-move path.
    pub fn finish(self) -> Vec<(ObjectId, Point)> {
        self.positions()
    }
}
