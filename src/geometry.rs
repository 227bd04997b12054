//! Rectangles, corner-handle resize math, and segment distance.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::{MIN_NODE_HEIGHT, MIN_NODE_WIDTH};

/// Width and height in document units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Corner handle on a selected node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResizeHandle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 4] = [Self::TopLeft, Self::TopRight, Self::BottomLeft, Self::BottomRight];

    /// Whether dragging this handle moves the left edge.
    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::TopLeft | Self::BottomLeft)
    }

    /// Whether dragging this handle moves the top edge.
    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight)
    }
}

/// Axis-aligned rectangle in document space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn from_parts(pos: Point, size: Size) -> Self {
        Self { x: pos.x, y: pos.y, width: size.width, height: size.height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point { x: self.x + self.width / 2.0, y: self.y + self.height / 2.0 }
    }

    #[must_use]
    pub fn corner(&self, handle: ResizeHandle) -> Point {
        match handle {
            ResizeHandle::TopLeft => Point::new(self.x, self.y),
            ResizeHandle::TopRight => Point::new(self.right(), self.y),
            ResizeHandle::BottomLeft => Point::new(self.x, self.bottom()),
            ResizeHandle::BottomRight => Point::new(self.right(), self.bottom()),
        }
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.right() && pt.y >= self.y && pt.y <= self.bottom()
    }
}

/// Resize `start` by dragging `handle` through `(dx, dy)` document units.
///
/// Width and height are clamped to the node minimums. The edges opposite the
/// handle stay where they were in `start`.
#[must_use]
pub fn resize_rect(handle: ResizeHandle, start: Rect, dx: f64, dy: f64) -> Rect {
    let width = if handle.moves_left() { start.width - dx } else { start.width + dx }.max(MIN_NODE_WIDTH);
    let height = if handle.moves_top() { start.height - dy } else { start.height + dy }.max(MIN_NODE_HEIGHT);
    let x = if handle.moves_left() { start.x + (start.width - width) } else { start.x };
    let y = if handle.moves_top() { start.y + (start.height - height) } else { start.y };
    Rect { x, y, width, height }
}

/// Shortest distance from `pt` to the segment `a`–`b`.
#[must_use]
pub fn distance_to_segment(pt: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return pt.distance(a);
    }
    let t = (((pt.x - a.x) * dx + (pt.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    pt.distance(Point::new(a.x + t * dx, a.y + t * dy))
}
