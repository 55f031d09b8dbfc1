//! One-dimensional damped spring for the snap-back transition.
//!
//! The host advances the spring with the elapsed frame time. Integration is
//! semi-implicit Euler in sub-steps of at most [`SPRING_MAX_STEP_SECS`]; frames
//! longer than [`SPRING_MAX_FRAME_SECS`] are truncated so a stalled host does
//! not make the spring jump. Once within `rest_delta` of the target and slower
//! than `rest_speed`, the spring lands exactly on the target and goes idle.

#[cfg(test)]
#[path = "spring_test.rs"]
mod spring_test;

use crate::config::SpringConfig;
use crate::consts::{SPRING_MAX_FRAME_SECS, SPRING_MAX_STEP_SECS};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    config: SpringConfig,
    value: f64,
    velocity: f64,
    target: f64,
    active: bool,
}

impl Spring {
    /// An idle spring resting at `value`. Invalid tuning falls back to the defaults.
    #[must_use]
    pub fn new(config: SpringConfig, value: f64) -> Self {
        Self { config: config.sanitized(), value, velocity: 0.0, target: value, active: false }
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Animate from the current value toward `target`.
    pub fn start(&mut self, target: f64, velocity: f64) {
        self.target = target;
        self.velocity = if velocity.is_finite() { velocity } else { 0.0 };
        self.active = true;
        self.settle_if_resting();
    }

    /// Move the target without disturbing value or velocity.
    pub fn retarget(&mut self, target: f64) {
        if self.active {
            self.target = target;
            self.settle_if_resting();
        }
    }

    /// Freeze at the current value.
    pub fn stop(&mut self) {
        self.active = false;
        self.velocity = 0.0;
        self.target = self.value;
    }

    /// Place the spring at `value`, idle.
    pub fn jump(&mut self, value: f64) {
        self.value = value;
        self.stop();
    }

    /// Integrate `dt` seconds. Returns whether the spring is still moving.
    pub fn advance(&mut self, dt: f64) -> bool {
        if !self.active || !(dt.is_finite() && dt > 0.0) {
            return self.active;
        }
        let dt = dt.min(SPRING_MAX_FRAME_SECS);
        let steps = (dt / SPRING_MAX_STEP_SECS).ceil().max(1.0);
        let h = dt / steps;

        let SpringConfig { stiffness, damping, mass, .. } = self.config;
        let mut remaining = steps;
        while remaining > 0.0 && self.active {
            let accel = (-stiffness * (self.value - self.target) - damping * self.velocity) / mass;
            self.velocity += accel * h;
            self.value += self.velocity * h;
            if !(self.value.is_finite() && self.velocity.is_finite()) {
                self.value = self.target;
                self.velocity = 0.0;
                self.active = false;
                break;
            }
            self.settle_if_resting();
            remaining -= 1.0;
        }
        self.active
    }

    fn settle_if_resting(&mut self) {
        if (self.value - self.target).abs() < self.config.rest_delta && self.velocity.abs() < self.config.rest_speed {
            self.value = self.target;
            self.velocity = 0.0;
            self.active = false;
        }
    }
}
