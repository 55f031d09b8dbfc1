//! Rectangle collision resolution.
//!
//! One pass visits nodes in id order. For node `i` it queries the quadtree for
//! every node whose pass-start center could belong to a rectangle overlapping
//! `i`, then separates each overlapping pair `(i, j)` with `j > i` along the
//! axis of smaller penetration. Corrections are written straight into the node
//! slice, so later pairs in the same pass see them.
//!
//! Candidate radius: two padded boxes can only overlap when their centers are
//! closer than the sum of their half-diagonals, so `half_diag(i) + max_half_diag`
//! covers every partner. Nodes drift during a pass while the index keeps their
//! starting centers; the radius is widened by the largest drift seen so far,
//! which keeps the search exact for the positions being tested.

#[cfg(test)]
#[path = "collide_test.rs"]
mod collide_test;

use serde::Serialize;

use crate::camera::Point;
use crate::consts::SEPARATION_SLOP;
use crate::node::Node;
use crate::spatial::QuadTree;

/// What one resolver pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PassReport {
    /// Overlapping pairs found (and corrected) during the pass.
    pub overlaps: usize,
    /// Deepest penetration corrected, along its resolution axis.
    pub max_penetration: f64,
}

/// What a batch of passes did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatchReport {
    /// Passes actually executed; fewer than requested when a pass found no overlap.
    pub passes: u32,
    /// Overlapping pairs found by the last executed pass.
    pub last_overlaps: usize,
}

/// Overlap between padded rectangles in a node set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OverlapStats {
    /// Number of overlapping pairs.
    pub pairs: usize,
    /// Summed intersection area over those pairs.
    pub area: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Pairwise overlap resolver with reusable scratch space.
#[derive(Debug)]
pub struct CollisionResolver {
    strength: f64,
    tree: QuadTree,
    candidates: Vec<usize>,
    starts: Vec<Point>,
}

impl CollisionResolver {
    /// `strength` is the share of each penetration removed per pair visit,
    /// split equally between the two nodes. Values outside (0, 1] are clamped.
    #[must_use]
    pub fn new(strength: f64) -> Self {
        let strength = if strength.is_finite() { strength.clamp(f64::EPSILON, 1.0) } else { 1.0 };
        Self { strength, tree: QuadTree::new(), candidates: Vec::new(), starts: Vec::new() }
    }

    #[must_use]
    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Run up to `max_passes` passes, stopping after the first pass that finds
    /// nothing to correct. Never loops beyond `max_passes`.
    pub fn resolve(&mut self, nodes: &mut [Node], max_passes: u32) -> BatchReport {
        let mut report = BatchReport::default();
        for _ in 0..max_passes {
            let pass = self.pass(nodes);
            report.passes += 1;
            report.last_overlaps = pass.overlaps;
            if pass.overlaps == 0 {
                break;
            }
        }
        report
    }

    /// One corrective sweep over all nodes.
    pub fn pass(&mut self, nodes: &mut [Node]) -> PassReport {
        let mut report = PassReport::default();
        if nodes.len() < 2 {
            return report;
        }

        self.tree.rebuild(nodes.iter().map(Node::center));
        self.starts.clear();
        self.starts.extend(nodes.iter().map(Node::center));
        let max_half_diagonal = nodes.iter().map(Node::half_diagonal).fold(0.0, f64::max);
        let mut max_drift = 0.0_f64;

        for i in 0..nodes.len() {
            let radius = nodes[i].half_diagonal() + max_half_diagonal + max_drift;
            self.candidates.clear();
            self.tree.query_radius(nodes[i].center(), radius, &mut self.candidates);
            self.candidates.sort_unstable();

            for &j in &self.candidates {
                if j <= i {
                    continue;
                }
                let Some(penetration) = self.separate(nodes, i, j) else {
                    continue;
                };
                report.overlaps += 1;
                report.max_penetration = report.max_penetration.max(penetration);
                max_drift = max_drift
                    .max(drift(&nodes[i], self.starts[i]))
                    .max(drift(&nodes[j], self.starts[j]));
            }
        }
        report
    }

    /// Measure remaining overlap without moving anything.
    pub fn measure(&mut self, nodes: &[Node]) -> OverlapStats {
        let mut stats = OverlapStats::default();
        if nodes.len() < 2 {
            return stats;
        }
        self.tree.rebuild(nodes.iter().map(Node::center));
        let max_half_diagonal = nodes.iter().map(Node::half_diagonal).fold(0.0, f64::max);

        for (i, a) in nodes.iter().enumerate() {
            self.candidates.clear();
            self.tree
                .query_radius(a.center(), a.half_diagonal() + max_half_diagonal, &mut self.candidates);
            for &j in &self.candidates {
                if j <= i {
                    continue;
                }
                let area = intersection_area(a, &nodes[j]);
                if area > 0.0 {
                    stats.pairs += 1;
                    stats.area += area;
                }
            }
        }
        stats
    }

    /// Push `i` and `j` apart if they overlap; returns the corrected penetration.
    fn separate(&self, nodes: &mut [Node], i: usize, j: usize) -> Option<f64> {
        let a = nodes[i];
        let b = nodes[j];
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let px = a.half_width() + b.half_width() - dx.abs();
        let py = a.half_height() + b.half_height() - dy.abs();
        if px <= 0.0 || py <= 0.0 {
            return None;
        }

        let bits = tie_break(a.id, b.id);
        let axis = if px < py {
            Axis::X
        } else if py < px {
            Axis::Y
        } else if bits & 1 == 0 {
            Axis::X
        } else {
            Axis::Y
        };
        let (penetration, along) = match axis {
            Axis::X => (px, dx),
            Axis::Y => (py, dy),
        };
        // Direction from a to b on the chosen axis.
        let sign = if along > 0.0 {
            1.0
        } else if along < 0.0 {
            -1.0
        } else if bits & 2 == 0 {
            1.0
        } else {
            -1.0
        };

        let shift = sign * (penetration * self.strength + SEPARATION_SLOP) / 2.0;
        match axis {
            Axis::X => {
                nodes[i].x -= shift;
                nodes[j].x += shift;
            }
            Axis::Y => {
                nodes[i].y -= shift;
                nodes[j].y += shift;
            }
        }
        Some(penetration)
    }
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Overlap statistics for a node set, using a throwaway resolver.
#[must_use]
pub fn overlap_stats(nodes: &[Node]) -> OverlapStats {
    CollisionResolver::default().measure(nodes)
}

/// Intersection area of two padded boxes (0 when they only touch).
#[must_use]
pub fn intersection_area(a: &Node, b: &Node) -> f64 {
    let w = (a.x + a.half_width()).min(b.x + b.half_width()) - (a.x - a.half_width()).max(b.x - b.half_width());
    let h = (a.y + a.half_height()).min(b.y + b.half_height()) - (a.y - a.half_height()).max(b.y - b.half_height());
    if w > 0.0 && h > 0.0 { w * h } else { 0.0 }
}

/// Whether two padded boxes overlap (touching edges do not count).
#[must_use]
pub fn overlaps(a: &Node, b: &Node) -> bool {
    (a.x - b.x).abs() < a.half_width() + b.half_width() && (a.y - b.y).abs() < a.half_height() + b.half_height()
}

fn drift(node: &Node, start: Point) -> f64 {
    (node.x - start.x).hypot(node.y - start.y)
}

/// Deterministic bits derived from a node pair; bit 0 picks the axis on an
/// exact penetration tie, bit 1 the direction when centers coincide on it.
fn tie_break(a: usize, b: usize) -> u64 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut z = (((lo as u64) << 32) ^ (hi as u64)).wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
