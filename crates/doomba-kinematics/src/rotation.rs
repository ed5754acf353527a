//! Rotation of the robot glyph for the overlay.
//!
//! Screen coordinates: x grows right, y grows down. A positive angle rotates
//! counter-clockwise as seen on screen.

use libm::{cos, fabs, sin};

/// A glyph of `width × height` rotated about its own center and re-centered
/// on an anchor point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationTransform {
    width: f64,
    height: f64,
    anchor: (f64, f64),
    cos: f64,
    sin: f64,
}

impl RotationTransform {
    /// Rotate a `width × height` glyph by `angle_degrees` and center it on `anchor`.
    pub fn new(width: f64, height: f64, angle_degrees: f64, anchor: (f64, f64)) -> Self {
        let angle = angle_degrees.to_radians();
        RotationTransform {
            width,
            height,
            anchor,
            cos: cos(angle),
            sin: sin(angle),
        }
    }

    /// Size of the axis-aligned box that holds the rotated glyph.
    pub fn rotated_size(&self) -> (f64, f64) {
        let (c, s) = (fabs(self.cos), fabs(self.sin));
        (
            self.width * c + self.height * s,
            self.width * s + self.height * c,
        )
    }

    /// Top-left corner of the rotated bounding box, in screen coordinates.
    pub fn top_left(&self) -> (f64, f64) {
        let (w, h) = self.rotated_size();
        (self.anchor.0 - w / 2.0, self.anchor.1 - h / 2.0)
    }

    /// Map a glyph-local point (origin at the glyph's top-left) to the screen.
    pub fn map_point(&self, x: f64, y: f64) -> (f64, f64) {
        let dx = x - self.width / 2.0;
        let dy = y - self.height / 2.0;
        (
            self.anchor.0 + dx * self.cos + dy * self.sin,
            self.anchor.1 - dx * self.sin + dy * self.cos,
        )
    }

    /// Map the four corners of a glyph-local rectangle, clockwise from its top-left.
    pub fn map_rect(&self, x: f64, y: f64, w: f64, h: f64) -> [(f64, f64); 4] {
        [
            self.map_point(x, y),
            self.map_point(x + w, y),
            self.map_point(x + w, y + h),
            self.map_point(x, y + h),
        ]
    }
}
