//! Core types for floor-plan content.
//!
//! Rooms and objects live in world coordinates. Their records are owned by
//! the external data store; the engine only reads them and reports derived
//! changes back.

use crate::geometry::{Point, Rect, Size};
use crate::viewport::Viewport;
use serde::{Deserialize, Serialize};

/// Identifier of a placed object (marker).
pub type ObjectId = u64;

/// Identifier of a room.
pub type RoomId = u64;

/// Identifier of a floor plan.
pub type PlanId = u64;

// ============================================================================
// Rooms
// ============================================================================

/// Shape of a room. Serialized with a `kind` tag of `"rect"` or `"poly"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RoomShape {
    Rect { rect: Rect },
    Poly { points: Vec<Point> },
}

impl RoomShape {
    /// Axis-aligned bounds of the shape, `None` for an empty polygon.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            RoomShape::Rect { rect } => Some(*rect),
            RoomShape::Poly { points } => Rect::bounding(points.iter().copied()),
        }
    }

    /// Whether the shape can contain points at all.
    ///
    /// Polygons need at least three vertices, rectangles a positive area.
    pub fn is_degenerate(&self) -> bool {
        match self {
            RoomShape::Rect { rect } => !rect.has_area(),
            RoomShape::Poly { points } => points.len() < 3,
        }
    }

    /// Same shape moved by `delta`.
    pub fn translated(&self, delta: Point) -> RoomShape {
        match self {
            RoomShape::Rect { rect } => RoomShape::Rect {
                rect: rect.translate(delta),
            },
            RoomShape::Poly { points } => RoomShape::Poly {
                points: points.iter().map(|p| *p + delta).collect(),
            },
        }
    }
}

/// A named zone drawn over the floor plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    #[serde(flatten)]
    pub shape: RoomShape,
}

impl Room {
    pub fn rect(id: RoomId, name: impl Into<String>, rect: Rect) -> Self {
        Self {
            id,
            name: name.into(),
            shape: RoomShape::Rect { rect },
        }
    }

    pub fn polygon(id: RoomId, name: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            id,
            name: name.into(),
            shape: RoomShape::Poly { points },
        }
    }
}

// ============================================================================
// Objects
// ============================================================================

/// A labeled marker placed on the plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    pub id: ObjectId,
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Cached back-reference, recomputed from geometry. Never authoritative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<RoomId>,
}

fn default_scale() -> f32 {
    1.0
}

impl MapObject {
    pub fn new(id: ObjectId, x: f32, y: f32) -> Self {
        Self {
            id,
            x,
            y,
            scale: 1.0,
            room_id: None,
        }
    }

    #[inline]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn set_position(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
    }
}

// ============================================================================
// Floor plan
// ============================================================================

/// Everything the engine needs to open one floor plan, as loaded from the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FloorPlan {
    pub id: PlanId,
    pub name: String,
    /// Pixel size of the floor-plan image; world coordinates span this area
    pub image_size: Size,
    /// Draw order: later rooms are on top
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub objects: Vec<MapObject>,
    #[serde(default)]
    pub default_view: Option<Viewport>,
    /// Viewport at the time the plan was last left
    #[serde(default)]
    pub last_viewport: Option<Viewport>,
}

impl FloorPlan {
    pub fn new(id: PlanId, name: impl Into<String>, image_size: Size) -> Self {
        Self {
            id,
            name: name.into(),
            image_size,
            rooms: Vec::new(),
            objects: Vec::new(),
            default_view: None,
            last_viewport: None,
        }
    }
}
