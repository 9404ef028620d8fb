//! Spatial hit testing for room membership.
//!
//! Room membership of an object is never stored authoritatively: it is
//! recomputed from geometry with [`reassign_rooms_for_objects`] after every
//! room edit and every object move.

use crate::geometry::{Point, Rect};
use crate::profile_scope;
use crate::types::{MapObject, ObjectId, Room, RoomId, RoomShape};
use std::collections::HashMap;

/// Closed bounds check. Zero-area rectangles never contain anything.
#[inline]
pub fn point_in_rect(rect: &Rect, p: Point) -> bool {
    rect.has_area() && rect.contains(p)
}

/// Even-odd ray casting. Polygons with fewer than three points never
/// contain anything.
///
/// The polygon's bounding box is checked first. Points exactly on an edge
/// may land on either side, but always the same side for the same input.
pub fn point_in_polygon(points: &[Point], p: Point) -> bool {
    if points.len() < 3 {
        return false;
    }
    match Rect::bounding(points.iter().copied()) {
        Some(bounds) if bounds.contains(p) => {}
        _ => return false,
    }

    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Whether `room` contains `p`.
pub fn room_contains(room: &Room, p: Point) -> bool {
    match &room.shape {
        RoomShape::Rect { rect } => point_in_rect(rect, p),
        RoomShape::Poly { points } => point_in_polygon(points, p),
    }
}

/// Topmost room containing `p`.
///
/// `rooms` is in draw order, so the search walks it backwards and the last
/// drawn room wins on overlap.
pub fn room_at(rooms: &[Room], p: Point) -> Option<&Room> {
    rooms.iter().rev().find(|room| room_contains(room, p))
}

/// Recompute every object's room and return only the objects whose room
/// changed, mapped to their new room (or `None` when they left all rooms).
///
/// Callers apply the result as one batch.
pub fn reassign_rooms_for_objects<'a>(
    rooms: &[Room],
    objects: impl IntoIterator<Item = &'a MapObject>,
) -> HashMap<ObjectId, Option<RoomId>> {
    reassign_rooms_with(objects, |p| room_at(rooms, p).map(|room| room.id))
}

/// Same as [`reassign_rooms_for_objects`] with a caller-supplied lookup,
/// e.g. [`crate::spatial_index::RoomIndex::room_at`].
pub fn reassign_rooms_with<'a>(
    objects: impl IntoIterator<Item = &'a MapObject>,
    mut resolve: impl FnMut(Point) -> Option<RoomId>,
) -> HashMap<ObjectId, Option<RoomId>> {
    profile_scope!("reassign_rooms");

    let mut changes = HashMap::new();
    for object in objects {
        let resolved = resolve(object.position());
        if resolved != object.room_id {
            changes.insert(object.id, resolved);
        }
    }
    if !changes.is_empty() {
        tracing::debug!(changed = changes.len(), "Room membership changed");
    }
    changes
}

/// Apply a reassignment batch to an object list in place.
pub fn apply_room_changes(objects: &mut [MapObject], changes: &HashMap<ObjectId, Option<RoomId>>) {
    for object in objects.iter_mut() {
        if let Some(room_id) = changes.get(&object.id) {
            object.room_id = *room_id;
        }
    }
}
