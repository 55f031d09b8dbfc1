//! Node model: tile inputs, placed outputs, seeding, and the node arena.
//!
//! Data flows into this layer from the external data source as an ordered list
//! of [`TileSpec`]s. Each spec becomes one [`Node`] whose [`NodeId`] is its
//! index in that list; ids are stable for the lifetime of the arena. Only the
//! simulation mutates node positions. Consumers receive [`PlacedTile`]s, which
//! carry the caller's opaque payload through unchanged.

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;

use serde::{Deserialize, Serialize};

use crate::camera::{Point, Size};
use crate::consts::{MIN_NODE_SIZE, SEED_INITIAL_ANGLE, SEED_INITIAL_RADIUS};

/// Stable identifier of a node: its index in the input order.
pub type NodeId = usize;

/// One rectangle to be placed, as supplied by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSpec<P = serde_json::Value> {
    pub width: f64,
    pub height: f64,
    /// Opaque per-tile data (for example an image locator). Never inspected.
    pub payload: P,
}

impl<P> TileSpec<P> {
    #[must_use]
    pub fn new(width: f64, height: f64, payload: P) -> Self {
        Self { width, height, payload }
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// A tile with its final position, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedTile<P = serde_json::Value> {
    pub id: NodeId,
    /// Center x in world space.
    pub x: f64,
    /// Center y in world space.
    pub y: f64,
    /// Visual width (without padding).
    pub width: f64,
    /// Visual height (without padding).
    pub height: f64,
    pub payload: P,
}

impl<P> PlacedTile<P> {
    /// Left edge in world space.
    #[must_use]
    pub fn left(&self) -> f64 {
        self.x - self.width / 2.0
    }

    /// Top edge in world space.
    #[must_use]
    pub fn top(&self) -> f64 {
        self.y - self.height / 2.0
    }
}

/// How initial positions are chosen before the first tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Seed {
    /// Golden-angle spiral around the origin.
    #[default]
    Phyllotaxis,
    /// Every node starts at the same point.
    Centered(Point),
    /// Caller-supplied centers by node index. Missing or non-finite entries
    /// fall back to the spiral position for that index.
    Positions(Vec<Point>),
}

impl Seed {
    /// Seed position for node `index`.
    #[must_use]
    pub fn position(&self, index: usize) -> Point {
        match self {
            Self::Phyllotaxis => phyllotaxis(index),
            Self::Centered(p) if p.is_finite() => *p,
            Self::Centered(_) => Point::default(),
            Self::Positions(points) => match points.get(index) {
                Some(p) if p.is_finite() => *p,
                _ => phyllotaxis(index),
            },
        }
    }
}

/// Spiral seed position for node `index`: radius `10·√(0.5 + i)`, angle `i·π(3−√5)`.
#[must_use]
pub fn phyllotaxis(index: usize) -> Point {
    #[allow(clippy::cast_precision_loss)]
    let i = index as f64;
    let radius = SEED_INITIAL_RADIUS * (0.5 + i).sqrt();
    let angle = i * SEED_INITIAL_ANGLE;
    Point::new(radius * angle.cos(), radius * angle.sin())
}

/// One rectangle under simulation. `x` / `y` are its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub width: f64,
    pub height: f64,
    /// Safe-area margin added to both width and height when testing overlap.
    pub padding: f64,
    pub x: f64,
    pub y: f64,
}

impl Node {
    /// Half of the padded width.
    #[must_use]
    pub fn half_width(&self) -> f64 {
        (self.width + self.padding) / 2.0
    }

    /// Half of the padded height.
    #[must_use]
    pub fn half_height(&self) -> f64 {
        (self.height + self.padding) / 2.0
    }

    /// Half of the padded diagonal; every point of the padded box lies within it of the center.
    #[must_use]
    pub fn half_diagonal(&self) -> f64 {
        self.half_width().hypot(self.half_height())
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Clamp a dimension to a positive finite size.
#[must_use]
pub fn sanitize_extent(value: f64) -> f64 {
    if value.is_finite() && value >= MIN_NODE_SIZE { value } else { MIN_NODE_SIZE }
}

/// Clamp a padding to a non-negative finite margin.
#[must_use]
pub fn sanitize_padding(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

/// Owned, index-addressed storage for the nodes of one layout run.
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
    /// Nodes whose width or height had to be clamped on creation.
    clamped: usize,
}

impl NodeArena {
    /// Create an arena from sizes in input order, seeding every position.
    #[must_use]
    pub fn new(sizes: impl IntoIterator<Item = Size>, padding: f64, seed: &Seed) -> Self {
        let padding = sanitize_padding(padding);
        let mut clamped = 0;
        let nodes = sizes
            .into_iter()
            .enumerate()
            .map(|(id, size)| {
                let width = sanitize_extent(size.width);
                let height = sanitize_extent(size.height);
                if width.to_bits() != size.width.to_bits() || height.to_bits() != size.height.to_bits() {
                    clamped += 1;
                }
                let p = seed.position(id);
                Node { id, width, height, padding, x: p.x, y: p.y }
            })
            .collect();
        Self { nodes, clamped }
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Mutable access for the simulation.
    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// How many inputs had malformed dimensions.
    #[must_use]
    pub fn clamped_count(&self) -> usize {
        self.clamped
    }

    /// Centers in id order.
    #[must_use]
    pub fn positions(&self) -> Vec<Point> {
        self.nodes.iter().map(Node::center).collect()
    }

    /// Pair every node with its payload, consuming the payloads in id order.
    #[must_use]
    pub fn place<P>(&self, payloads: Vec<P>) -> Vec<PlacedTile<P>> {
        self.nodes
            .iter()
            .zip(payloads)
            .map(|(node, payload)| PlacedTile {
                id: node.id,
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                payload,
            })
            .collect()
    }
}
