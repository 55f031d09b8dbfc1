//! Shared geometry and the pan camera.
//!
//! World space is the coordinate system node positions are computed in, with
//! the origin at the center of the content. Screen space is the viewport, in
//! CSS pixels, with the origin at its center. The camera is a pure translation
//! (the world offset); zoom is a presentation concern and lives outside.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

/// A point in either screen or world space.
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

    /// Whether both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Width and height of a measured rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A measurement is usable once both sides are finite and positive.
    ///
    /// The render layer reports zero sizes before its first layout pass.
    #[must_use]
    pub fn is_measured(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Pan camera. `pan_x` / `pan_y` are the world offset in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Camera {
    #[must_use]
    pub fn new(pan_x: f64, pan_y: f64) -> Self {
        Self { pan_x, pan_y }
    }

    /// Convert a screen-space point to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point { x: screen.x - self.pan_x, y: screen.y - self.pan_y }
    }

    /// Convert a world-space point to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point { x: world.x + self.pan_x, y: world.y + self.pan_y }
    }
}
