//! Stateless geometry primitives
//!
//! Headings and bearings are in degrees, measured counter-clockwise from +x.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::heading_vector;

/// A position with a heading
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
    /// Heading in degrees
    pub heading: f32,
}

impl Point2D {
    pub const fn new(x: f32, y: f32, heading: f32) -> Self {
        Self { x, y, heading }
    }

    /// A point with zero heading
    pub fn at(pos: Vec2) -> Self {
        Self::new(pos.x, pos.y, 0.0)
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl From<Vec2> for Point2D {
    fn from(pos: Vec2) -> Self {
        Self::at(pos)
    }
}

impl From<Point2D> for Vec2 {
    fn from(p: Point2D) -> Self {
        p.pos()
    }
}

/// Euclidean distance between two points
#[inline]
pub fn distance(p1: &Point2D, p2: &Point2D) -> f32 {
    p1.pos().distance(p2.pos())
}

/// Bearing from p1 to p2 in degrees, (-180, 180]
#[inline]
pub fn bearing(p1: &Point2D, p2: &Point2D) -> f32 {
    (p2.y - p1.y).atan2(p2.x - p1.x).to_degrees()
}

/// Signed angle from p1's heading to the bearing toward p2 (degrees)
///
/// Uses sin(C) = cross(heading, separation) / |separation|, so the result is
/// continuous through ±180 and positive when p2 is to the left (CCW). Only
/// spans [-90, 90]: a point directly behind reads as dead ahead.
pub fn relative_bearing(p1: &Point2D, p2: &Point2D) -> f32 {
    let h = heading_vector(p1.heading);
    let sep = p2.pos() - p1.pos();
    let d = sep.length();
    if d == 0.0 {
        return 0.0;
    }
    let sin_c = (h.perp_dot(sep) / d).clamp(-1.0, 1.0);
    sin_c.asin().to_degrees()
}

/// Perpendicular distance from `point` to the infinite line through a and b
///
/// Not clamped to the segment; callers pair this with a bounding-box check.
/// A degenerate segment (a == b) falls back to point distance.
pub fn segment_distance(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let d = b - a;
    let len = d.length();
    if len == 0.0 {
        return point.distance(a);
    }
    (d.y * point.x - d.x * point.y + b.x * a.y - b.y * a.x).abs() / len
}

/// Strict containment in the axis-aligned rectangle spanned by two corners
pub fn is_in_rect(point: Vec2, corner_a: Vec2, corner_b: Vec2) -> bool {
    let min = corner_a.min(corner_b);
    let max = corner_a.max(corner_b);
    min.x < point.x && point.x < max.x && min.y < point.y && point.y < max.y
}
