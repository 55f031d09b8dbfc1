//! Bounded pan controller with rubber-band overshoot and snap-back.
//!
//! The controller owns the world offset. Pointer deltas accumulate into a raw
//! drag position; the displayed offset is that raw position passed through
//! [`dampen`] per axis, so pulling past a bound meets growing resistance. On
//! release an out-of-range offset springs back to the nearest legal value.
//! A drag that starts mid-spring takes over from the in-flight value: the raw
//! position is recovered with [`dampen_inverse`], so nothing jumps.
//!
//! Until both content and viewport have been measured the bounds are
//! degenerate and drags are ignored.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::bounds::{BoundsRange, compute_bounds};
use crate::camera::{Point, Size};
use crate::config::DragConfig;
use crate::damping::{dampen, dampen_inverse};
use crate::input::DragDelta;
use crate::spring::Spring;

/// What the pan surface is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging,
    /// Snap-back spring in flight.
    Settling,
}

/// The offset the render layer applies as a translation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct WorldOffset {
    pub x: f64,
    pub y: f64,
    pub state: InteractionState,
}

impl WorldOffset {
    #[must_use]
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone)]
pub struct DragController {
    config: DragConfig,
    bounds: BoundsRange,
    measured: bool,
    state: InteractionState,
    /// Undamped drag position; only meaningful while dragging.
    raw: Point,
    spring_x: Spring,
    spring_y: Spring,
}

impl DragController {
    /// Invalid tuning is replaced field by field with the defaults.
    #[must_use]
    pub fn new(config: DragConfig) -> Self {
        let config = {
            let sanitized = config.sanitized();
            if sanitized != config {
                warn!(?config, ?sanitized, "invalid drag config replaced with defaults");
            }
            sanitized
        };
        Self {
            config,
            bounds: BoundsRange::ZERO,
            measured: false,
            state: InteractionState::Idle,
            raw: Point::default(),
            spring_x: Spring::new(config.spring, 0.0),
            spring_y: Spring::new(config.spring, 0.0),
        }
    }

    #[must_use]
    pub fn offset(&self) -> WorldOffset {
        WorldOffset { x: self.spring_x.value(), y: self.spring_y.value(), state: self.state }
    }

    #[must_use]
    pub fn state(&self) -> InteractionState {
        self.state
    }

    #[must_use]
    pub fn bounds(&self) -> BoundsRange {
        self.bounds
    }

    #[must_use]
    pub fn is_measured(&self) -> bool {
        self.measured
    }

    /// CSS cursor for the pan surface.
    #[must_use]
    pub fn cursor(&self) -> &'static str {
        if self.state == InteractionState::Dragging { "grabbing" } else { "grab" }
    }

    /// New content or viewport measurements.
    ///
    /// The first real measurement centers the content. Losing the measurement
    /// freezes the offset and disables dragging until it comes back. On a
    /// regular resize:
    /// - idle: the offset is clamped into the new range
    /// - settling: the snap-back is retargeted
    /// - dragging: the next move damps against the new range
    pub fn on_resize(&mut self, content: Size, viewport: Size) -> WorldOffset {
        if !(content.is_measured() && viewport.is_measured()) {
            debug!(?content, ?viewport, "drag bounds unmeasured");
            self.bounds = BoundsRange::ZERO;
            self.measured = false;
            self.state = InteractionState::Idle;
            self.jump(self.offset().point());
            return self.offset();
        }
        self.bounds = compute_bounds(content, viewport);

        if !self.measured {
            self.measured = true;
            self.state = InteractionState::Idle;
            self.jump(self.bounds.center());
            debug!(bounds = ?self.bounds, "drag bounds measured, content centered");
            return self.offset();
        }

        match self.state {
            InteractionState::Idle => {
                let clamped = self.bounds.clamp(self.offset().point());
                self.jump(clamped);
            }
            InteractionState::Settling => {
                let target = self.bounds.clamp(Point::new(self.spring_x.target(), self.spring_y.target()));
                self.spring_x.retarget(target.x);
                self.spring_y.retarget(target.y);
                self.update_settling();
            }
            InteractionState::Dragging => {}
        }
        self.offset()
    }

    /// Pointer down on the pan surface.
    pub fn on_drag_start(&mut self) -> WorldOffset {
        if !self.measured {
            return self.offset();
        }
        self.take_over();
        self.offset()
    }

    /// Pointer moved by `delta`. Starts a drag implicitly if none is active;
    /// a delta with `pointer_down == false` also ends the drag.
    pub fn on_drag_move(&mut self, delta: DragDelta) -> WorldOffset {
        if !self.measured {
            return self.offset();
        }
        if self.state != InteractionState::Dragging {
            self.take_over();
        }

        let [rx, ry] = [self.bounds.x_range(), self.bounds.y_range()];
        let factor = self.config.damping_factor;
        self.raw = Point::new(
            accumulate(self.raw.x, delta.dx, rx, factor),
            accumulate(self.raw.y, delta.dy, ry, factor),
        );
        self.jump(Point::new(dampen(self.raw.x, rx, factor), dampen(self.raw.y, ry, factor)));
        trace!(
            raw_x = self.raw.x,
            raw_y = self.raw.y,
            x = self.spring_x.value(),
            y = self.spring_y.value(),
            "drag move"
        );

        if delta.pointer_down { self.offset() } else { self.on_drag_end() }
    }

    /// Pointer released. An out-of-range offset snaps back to the nearest
    /// legal value; an in-range one stays put.
    pub fn on_drag_end(&mut self) -> WorldOffset {
        if self.state != InteractionState::Dragging {
            return self.offset();
        }
        let current = self.offset().point();
        let target = self.bounds.clamp(current);
        if target == current {
            self.state = InteractionState::Idle;
        } else {
            debug!(?current, ?target, "snap back");
            self.spring_x.start(target.x, 0.0);
            self.spring_y.start(target.y, 0.0);
            self.state = InteractionState::Settling;
            self.update_settling();
        }
        self.offset()
    }

    /// Advance the snap-back by `dt` seconds.
    pub fn advance(&mut self, dt: f64) -> WorldOffset {
        if self.state == InteractionState::Settling {
            self.spring_x.advance(dt);
            self.spring_y.advance(dt);
            self.update_settling();
        }
        self.offset()
    }

    /// Freeze any snap-back and recover the raw drag position behind the
    /// displayed offset.
    fn take_over(&mut self) {
        self.spring_x.stop();
        self.spring_y.stop();
        let factor = self.config.damping_factor;
        self.raw = Point::new(
            dampen_inverse(self.spring_x.value(), self.bounds.x_range(), factor),
            dampen_inverse(self.spring_y.value(), self.bounds.y_range(), factor),
        );
        self.state = InteractionState::Dragging;
    }

    fn jump(&mut self, p: Point) {
        self.spring_x.jump(p.x);
        self.spring_y.jump(p.y);
    }

    fn update_settling(&mut self) {
        if !self.spring_x.is_active() && !self.spring_y.is_active() {
            self.state = InteractionState::Idle;
        }
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(DragConfig::default())
    }
}

/// Add a delta to a raw drag coordinate. A non-finite result lands on the
/// bound it was heading for (NaN on the minimum).
fn accumulate(raw: f64, delta: f64, range: [f64; 2], factor: f64) -> f64 {
    let next = raw + delta;
    if next.is_finite() { next } else { dampen_inverse(dampen(next, range, factor), range, factor) }
}
