//! Spatial Index Module
//!
//! R-tree over room bounding boxes. Point queries first narrow the rooms to
//! those whose bounds contain the point, then run the exact shape test on
//! the candidates from topmost to bottommost. The answer always matches
//! [`crate::hit_testing::room_at`] on the same rooms in the same order.

use crate::geometry::{Point, Rect};
use crate::hit_testing::room_contains;
use crate::types::{Room, RoomId};
use rstar::{AABB, RTree, RTreeObject};
use std::collections::HashMap;

/// A room's bounding box plus its position in draw order.
#[derive(Debug, Clone, Copy)]
pub struct SpatialEntry {
    pub room_id: RoomId,
    /// Monotonic draw sequence; higher is drawn later (on top)
    pub order: u64,
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl SpatialEntry {
    fn new(room_id: RoomId, order: u64, bounds: Rect) -> Self {
        Self {
            room_id,
            order,
            min_x: bounds.x,
            min_y: bounds.y,
            max_x: bounds.x + bounds.width,
            max_y: bounds.y + bounds.height,
        }
    }
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.min_x, self.min_y], [self.max_x, self.max_y])
    }
}

impl PartialEq for SpatialEntry {
    fn eq(&self, other: &Self) -> bool {
        self.room_id == other.room_id
    }
}

/// A tracked room. Degenerate rooms keep their draw order but stay out of
/// the tree.
struct IndexedRoom {
    order: u64,
    entry: Option<SpatialEntry>,
    room: Room,
}

/// Spatial index for rooms using an R-tree.
pub struct RoomIndex {
    tree: RTree<SpatialEntry>,
    rooms: HashMap<RoomId, IndexedRoom>,
    next_order: u64,
}

impl RoomIndex {
    pub fn new() -> Self {
        Self {
            tree: RTree::new(),
            rooms: HashMap::new(),
            next_order: 0,
        }
    }

    /// Build from rooms in draw order.
    pub fn from_rooms(rooms: &[Room]) -> Self {
        let mut index = Self::new();
        index.rebuild(rooms);
        index
    }

    /// Replace the whole index. Degenerate rooms are tracked for draw order
    /// but never enter the tree since they can never contain a point.
    pub fn rebuild(&mut self, rooms: &[Room]) {
        self.rooms.clear();
        let mut entries = Vec::with_capacity(rooms.len());
        for (order, room) in rooms.iter().enumerate() {
            let order = order as u64;
            let entry = Self::entry_for(room, order);
            entries.extend(entry);
            self.rooms.insert(
                room.id,
                IndexedRoom {
                    order,
                    entry,
                    room: room.clone(),
                },
            );
        }
        self.next_order = rooms.len() as u64;
        self.tree = RTree::bulk_load(entries);
    }

    fn entry_for(room: &Room, order: u64) -> Option<SpatialEntry> {
        if room.shape.is_degenerate() {
            return None;
        }
        room.shape
            .bounds()
            .map(|bounds| SpatialEntry::new(room.id, order, bounds))
    }

    fn place(&mut self, room: &Room, order: u64) {
        let entry = Self::entry_for(room, order);
        if let Some(entry) = entry {
            self.tree.insert(entry);
        }
        self.rooms.insert(
            room.id,
            IndexedRoom {
                order,
                entry,
                room: room.clone(),
            },
        );
    }

    /// Add a newly drawn room on top of all others.
    pub fn insert(&mut self, room: &Room) {
        self.remove(room.id);
        let order = self.next_order;
        self.next_order += 1;
        self.place(room, order);
    }

    /// Update a room's geometry, keeping its place in draw order even while
    /// its shape is degenerate.
    ///
    /// A room that is not yet tracked goes on top.
    pub fn update(&mut self, room: &Room) {
        let Some(order) = self.rooms.get(&room.id).map(|existing| existing.order) else {
            self.insert(room);
            return;
        };
        self.remove(room.id);
        self.place(room, order);
    }

    pub fn remove(&mut self, room_id: RoomId) -> bool {
        let Some(indexed) = self.rooms.remove(&room_id) else {
            return false;
        };
        if let Some(entry) = indexed.entry {
            self.tree.remove(&entry);
        }
        true
    }

    /// Topmost room containing `p`.
    pub fn room_at(&self, p: Point) -> Option<RoomId> {
        let point_envelope = AABB::from_point([p.x, p.y]);
        let mut candidates: Vec<&SpatialEntry> = self
            .tree
            .locate_in_envelope_intersecting(&point_envelope)
            .collect();
        candidates.sort_unstable_by(|a, b| b.order.cmp(&a.order));

        candidates
            .into_iter()
            .filter_map(|entry| self.rooms.get(&entry.room_id))
            .find(|indexed| room_contains(&indexed.room, p))
            .map(|indexed| indexed.room.id)
    }

    /// Rooms whose bounds intersect a rectangular region.
    pub fn query_rect(&self, rect: Rect) -> Vec<RoomId> {
        let max = rect.max();
        let envelope = AABB::from_corners([rect.x, rect.y], [max.x, max.y]);
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.room_id)
            .collect()
    }

    /// Number of rooms that can be hit (degenerate rooms excluded).
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
        self.rooms.clear();
        self.next_order = 0;
    }
}

impl Default for RoomIndex {
    fn default() -> Self {
        Self::new()
    }
}
