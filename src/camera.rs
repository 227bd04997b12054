#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};

/// A point in screen, canvas-local, or document space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Zoom/pan state of the canvas, plus the on-screen placement of the canvas element.
///
/// `pan` is in canvas-local CSS pixels. `origin` is the screen position of the
/// canvas element's top-left corner. `width` / `height` are the visible canvas size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f64,
    pub pan: Point,
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { zoom: 1.0, pan: Point::default(), origin: Point::default(), width: 0.0, height: 0.0 }
    }
}

impl Viewport {
    /// Convert a screen point to canvas-local coordinates.
    #[must_use]
    pub fn screen_to_local(&self, screen: Point) -> Point {
        Point { x: screen.x - self.origin.x, y: screen.y - self.origin.y }
    }

    /// Convert a screen point to document coordinates.
    ///
    /// This is the only screen-to-document mapping in the engine; node
    /// creation, drag, resize, and the connection preview all go through it.
    #[must_use]
    pub fn screen_to_document(&self, screen: Point) -> Point {
        let local = self.screen_to_local(screen);
        Point { x: (local.x - self.pan.x) / self.zoom, y: (local.y - self.pan.y) / self.zoom }
    }

    /// Convert a document point back to screen coordinates.
    #[must_use]
    pub fn document_to_screen(&self, doc: Point) -> Point {
        Point {
            x: doc.x * self.zoom + self.pan.x + self.origin.x,
            y: doc.y * self.zoom + self.pan.y + self.origin.y,
        }
    }

    /// Convert a screen-space distance (pixels) to a document-space distance.
    #[must_use]
    pub fn screen_dist_to_document(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Center of the visible canvas in canvas-local coordinates.
    #[must_use]
    pub fn center(&self) -> Point {
        Point { x: self.width / 2.0, y: self.height / 2.0 }
    }

    /// Change zoom by `delta`, keeping the document point under `pivot` fixed.
    ///
    /// `pivot` is canvas-local. Returns `false` when the clamped zoom is unchanged.
    pub fn zoom_by(&mut self, delta: f64, pivot: Point) -> bool {
        let old_zoom = self.zoom;
        let new_zoom = clamp_zoom(old_zoom + delta);
        if new_zoom == old_zoom {
            return false;
        }
        let ratio = new_zoom / old_zoom;
        self.pan = Point { x: pivot.x - (pivot.x - self.pan.x) * ratio, y: pivot.y - (pivot.y - self.pan.y) * ratio };
        self.zoom = new_zoom;
        true
    }

    /// One zoom step in, pivoted at the viewport center.
    pub fn zoom_in(&mut self) -> bool {
        self.zoom_by(ZOOM_STEP, self.center())
    }

    /// One zoom step out, pivoted at the viewport center.
    pub fn zoom_out(&mut self) -> bool {
        self.zoom_by(-ZOOM_STEP, self.center())
    }

    /// Back to zoom 1 with no pan.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan = Point::default();
    }

    /// Restore a persisted zoom/pan pair. Invalid zoom values fall back to 1.
    pub fn restore(&mut self, zoom: f64, pan: Point) {
        self.zoom = if zoom.is_finite() && zoom > 0.0 { clamp_zoom(zoom) } else { 1.0 };
        self.pan = pan;
    }

    /// Zoom as a whole percentage for display.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn zoom_percent(&self) -> i64 {
        (self.zoom * 100.0).round() as i64
    }
}

/// Clamp a zoom factor to the allowed range.
#[must_use]
pub fn clamp_zoom(zoom: f64) -> f64 {
    zoom.clamp(ZOOM_MIN, ZOOM_MAX)
}
