//! Legal pan range for content larger than its viewport.
//!
//! Offsets use a centered origin: offset 0 places the content's center on the
//! viewport's center. On an axis where the content is larger than the viewport
//! the content may slide until either edge meets the matching viewport edge,
//! giving `[-(c - v)/2, (c - v)/2]`. Where it fits, the axis collapses to 0.

#[cfg(test)]
#[path = "bounds_test.rs"]
mod bounds_test;

use serde::Serialize;

use crate::camera::{Point, Size};

/// Legal world-offset range, per axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BoundsRange {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundsRange {
    /// Degenerate range: no movement permitted.
    pub const ZERO: Self = Self { min_x: 0.0, max_x: 0.0, min_y: 0.0, max_y: 0.0 };

    #[must_use]
    pub fn x_range(&self) -> [f64; 2] {
        [self.min_x, self.max_x]
    }

    #[must_use]
    pub fn y_range(&self) -> [f64; 2] {
        [self.min_y, self.max_y]
    }

    /// The centering offset.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    /// Nearest legal offset. Non-finite components land on the nearest bound
    /// (NaN on the minimum).
    #[must_use]
    pub fn clamp(&self, p: Point) -> Point {
        Point::new(clamp_axis(p.x, self.min_x, self.max_x), clamp_axis(p.y, self.min_y, self.max_y))
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        (self.min_x..=self.max_x).contains(&p.x) && (self.min_y..=self.max_y).contains(&p.y)
    }

    /// True when neither axis allows movement.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.max_x <= self.min_x && self.max_y <= self.min_y
    }
}

/// Derive the legal offset range from measured content and viewport sizes.
///
/// Unmeasured sizes (zero, negative, or non-finite) yield [`BoundsRange::ZERO`].
#[must_use]
pub fn compute_bounds(content: Size, viewport: Size) -> BoundsRange {
    if !content.is_measured() || !viewport.is_measured() {
        return BoundsRange::ZERO;
    }
    let (min_x, max_x) = axis_range(content.width, viewport.width);
    let (min_y, max_y) = axis_range(content.height, viewport.height);
    BoundsRange { min_x, max_x, min_y, max_y }
}

fn axis_range(content: f64, viewport: f64) -> (f64, f64) {
    let excess = content - viewport;
    if excess <= 0.0 {
        return (0.0, 0.0);
    }
    let overhang = excess / 2.0;
    (-excess + overhang, overhang)
}

fn clamp_axis(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() { min } else { value.clamp(min, max) }
}
