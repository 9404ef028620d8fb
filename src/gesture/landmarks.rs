//! Hand landmark samples and the measurements derived from them.
//!
//! Samples use the common 21-point hand topology with coordinates
//! normalized to the camera image (`0..1` on both axes).

use crate::error::LandmarkCountError;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_TIP: usize = 20;

/// Landmarks that barely move when fingers flex; their centroid is the hand centre.
const STABLE_POINTS: [usize; 5] = [WRIST, INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];

/// Fingertips from thumb to pinky.
const TIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Palm widths below this are treated as a failed detection.
const MIN_PALM_WIDTH: f32 = 1e-4;

/// One hand detection for one camera frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLandmarks")]
pub struct HandLandmarks {
    points: Vec<Point>,
}

/// Wire shape of [`HandLandmarks`] before the point count is checked.
#[derive(Deserialize)]
struct RawLandmarks {
    points: Vec<Point>,
}

impl TryFrom<RawLandmarks> for HandLandmarks {
    type Error = LandmarkCountError;

    fn try_from(raw: RawLandmarks) -> Result<Self, Self::Error> {
        let found = raw.points.len();
        HandLandmarks::new(raw.points).ok_or(LandmarkCountError {
            expected: LANDMARK_COUNT,
            found,
        })
    }
}

impl HandLandmarks {
    /// `None` unless exactly [`LANDMARK_COUNT`] points are given.
    pub fn new(points: Vec<Point>) -> Option<Self> {
        (points.len() == LANDMARK_COUNT).then_some(Self { points })
    }

    #[inline]
    pub fn point(&self, index: usize) -> Point {
        self.points[index]
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Distance between the index and pinky knuckles.
    pub fn palm_width(&self) -> f32 {
        self.point(INDEX_MCP).distance(self.point(PINKY_MCP))
    }

    /// Thumb-to-index fingertip distance in palm widths.
    pub fn pinch_ratio(&self) -> Option<f32> {
        let palm = self.palm_width();
        (palm > MIN_PALM_WIDTH).then(|| self.point(THUMB_TIP).distance(self.point(INDEX_TIP)) / palm)
    }

    pub fn center(&self) -> Point {
        let sum = STABLE_POINTS
            .iter()
            .fold(Point::ZERO, |acc, &i| acc + self.point(i));
        sum * (1.0 / STABLE_POINTS.len() as f32)
    }

    /// All per-frame measurements, or `None` for a degenerate detection.
    pub fn metrics(&self) -> Option<HandMetrics> {
        let palm = self.palm_width();
        if !(palm > MIN_PALM_WIDTH) {
            return None;
        }
        let wrist = self.point(WRIST);
        let tip = |i: usize| self.point(TIPS[i]);

        let mut extensions = [0.0; 4];
        for (slot, finger) in extensions.iter_mut().zip(1..5) {
            *slot = tip(finger).distance(wrist) / palm;
        }
        let mut gaps = [0.0; 4];
        for (slot, finger) in gaps.iter_mut().zip(0..4) {
            *slot = tip(finger).distance(tip(finger + 1)) / palm;
        }

        Some(HandMetrics {
            pinch_ratio: tip(0).distance(tip(1)) / palm,
            center: self.center(),
            palm_width: palm,
            extensions,
            gaps,
        })
    }
}

/// Scale-free measurements of one hand sample. Distances are in palm widths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandMetrics {
    pub pinch_ratio: f32,
    /// Centroid of the stable landmarks, normalized image coordinates
    pub center: Point,
    pub palm_width: f32,
    /// Index, middle, ring, pinky tip distance from the wrist
    pub extensions: [f32; 4],
    /// Thumb-index, index-middle, middle-ring, ring-pinky tip gaps
    pub gaps: [f32; 4],
}
