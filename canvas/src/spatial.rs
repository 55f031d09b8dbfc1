//! Point quadtree over node centers for neighbor queries.
//!
//! The tree is rebuilt from scratch at the start of every resolver pass; its
//! buffers are kept between rebuilds so steady-state passes do not allocate.
//! Leaves own a contiguous range of `items`, which is partitioned in place by
//! quadrant while the tree is built.
//!
//! Queries return every indexed point within a Euclidean radius of a center.
//! Traversal order depends only on the input points, so results are
//! reproducible for identical inputs.

#[cfg(test)]
#[path = "spatial_test.rs"]
mod spatial_test;

use crate::camera::Point;
use crate::consts::{QUADTREE_LEAF_CAPACITY, QUADTREE_MAX_DEPTH};

const NO_CHILD: u32 = u32::MAX;

#[derive(Debug, Clone, Copy)]
struct Cell {
    min_x: f64,
    min_y: f64,
    size: f64,
    /// Child cells in quadrant order (NW, NE, SW, SE with y growing down).
    children: [u32; 4],
    /// Range into `items` covered by this cell.
    start: usize,
    end: usize,
}

impl Cell {
    fn is_leaf(&self) -> bool {
        self.children.iter().all(|&c| c == NO_CHILD)
    }

    /// Squared distance from `p` to the nearest point of this cell's square.
    fn distance_sq(&self, p: Point) -> f64 {
        let dx = (self.min_x - p.x).max(0.0).max(p.x - (self.min_x + self.size));
        let dy = (self.min_y - p.y).max(0.0).max(p.y - (self.min_y + self.size));
        dx * dx + dy * dy
    }
}

/// A quadtree over a set of points, addressed by their index in the input slice.
#[derive(Debug, Default)]
pub struct QuadTree {
    cells: Vec<Cell>,
    items: Vec<usize>,
    points: Vec<Point>,
    stack: Vec<u32>,
}

impl QuadTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree over `points`.
    #[must_use]
    pub fn build(points: &[Point]) -> Self {
        let mut tree = Self::new();
        tree.rebuild(points.iter().copied());
        tree
    }

    /// Replace the indexed points, reusing existing allocations.
    pub fn rebuild(&mut self, points: impl IntoIterator<Item = Point>) {
        self.cells.clear();
        self.items.clear();
        self.points.clear();
        self.points.extend(points);
        if self.points.is_empty() {
            return;
        }
        self.items.extend(0..self.points.len());

        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;
        for p in &self.points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        // Square root cell with a margin, so points on the max edge still fall inside.
        let margin = ((max_x - min_x).max(max_y - min_y) * 0.05).max(1.0);
        let size = (max_x - min_x).max(max_y - min_y) + 2.0 * margin;
        let center_x = f64::midpoint(min_x, max_x);
        let center_y = f64::midpoint(min_y, max_y);

        let len = self.items.len();
        self.build_cell(0, len, center_x - size / 2.0, center_y - size / 2.0, size, 0);
    }

    /// Number of indexed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of cells in the tree (diagnostics).
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Append to `out` the index of every point within `radius` of `center`.
    ///
    /// `out` is not cleared; callers reuse one buffer across queries.
    pub fn query_radius(&mut self, center: Point, radius: f64, out: &mut Vec<usize>) {
        if self.cells.is_empty() || radius.is_nan() || radius < 0.0 || !center.is_finite() {
            return;
        }
        let radius_sq = radius * radius;
        self.stack.clear();
        self.stack.push(0);

        while let Some(idx) = self.stack.pop() {
            let cell = self.cells[idx as usize];
            if cell.distance_sq(center) > radius_sq {
                continue;
            }
            if cell.is_leaf() {
                for &item in &self.items[cell.start..cell.end] {
                    let p = self.points[item];
                    let dx = p.x - center.x;
                    let dy = p.y - center.y;
                    if dx * dx + dy * dy <= radius_sq {
                        out.push(item);
                    }
                }
            } else {
                // Reverse push so quadrants pop in NW, NE, SW, SE order.
                for &child in cell.children.iter().rev() {
                    if child != NO_CHILD {
                        self.stack.push(child);
                    }
                }
            }
        }
    }

    fn build_cell(&mut self, start: usize, end: usize, min_x: f64, min_y: f64, size: f64, depth: usize) -> u32 {
        let idx = u32::try_from(self.cells.len()).unwrap_or(NO_CHILD);
        self.cells.push(Cell { min_x, min_y, size, children: [NO_CHILD; 4], start, end });

        if end - start <= QUADTREE_LEAF_CAPACITY || depth >= QUADTREE_MAX_DEPTH || idx == NO_CHILD {
            return idx;
        }

        let half = size / 2.0;
        let mid_x = min_x + half;
        let mid_y = min_y + half;

        let points = &self.points;
        let items = &mut self.items[start..end];
        items.sort_by_key(|&i| quadrant(points[i], mid_x, mid_y));

        let mut counts = [0_usize; 4];
        for &i in items.iter() {
            counts[quadrant(points[i], mid_x, mid_y)] += 1;
        }

        let origins = [(min_x, min_y), (mid_x, min_y), (min_x, mid_y), (mid_x, mid_y)];
        let mut children = [NO_CHILD; 4];
        let mut cursor = start;
        for (q, &count) in counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let (cx, cy) = origins[q];
            children[q] = self.build_cell(cursor, cursor + count, cx, cy, half, depth + 1);
            cursor += count;
        }

        self.cells[idx as usize].children = children;
        idx
    }
}

/// Quadrant of `p` relative to the split point: 0 NW, 1 NE, 2 SW, 3 SE.
fn quadrant(p: Point, mid_x: f64, mid_y: f64) -> usize {
    usize::from(p.x >= mid_x) + 2 * usize::from(p.y >= mid_y)
}
