//! Shared numeric constants for the canvas crate.

// ── Layout ──────────────────────────────────────────────────────

/// Smallest width or height a node may have; malformed sizes are clamped up to this.
pub const MIN_NODE_SIZE: f64 = 1.0;

/// Extra distance added to every separation so float rounding cannot leave a
/// resolved pair overlapping by a few ulps.
pub const SEPARATION_SLOP: f64 = 1e-6;

/// Radius scale of the phyllotaxis seed spiral.
pub const SEED_INITIAL_RADIUS: f64 = 10.0;

/// Golden angle, π(3 − √5), between consecutive phyllotaxis seeds.
pub const SEED_INITIAL_ANGLE: f64 = std::f64::consts::PI * (3.0 - 2.236_067_977_499_79);

/// Maximum quadtree depth before a cell stops subdividing.
pub const QUADTREE_MAX_DEPTH: usize = 12;

/// Items a quadtree leaf holds before it subdivides.
pub const QUADTREE_LEAF_CAPACITY: usize = 8;

// ── Drag ────────────────────────────────────────────────────────

/// Elastic "give" applied past a bound.
pub const DEFAULT_DAMPING_FACTOR: f64 = 3.0;

/// Largest integration step for the snap-back spring, in seconds.
pub const SPRING_MAX_STEP_SECS: f64 = 1.0 / 240.0;

/// Longest frame the spring will integrate in one call; larger gaps are truncated.
pub const SPRING_MAX_FRAME_SECS: f64 = 0.25;
