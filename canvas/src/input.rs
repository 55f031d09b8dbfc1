//! Input model: mouse buttons, drag deltas, and the pointer gesture state.
//!
//! The engine turns absolute pointer positions into per-event [`DragDelta`]s
//! using [`InputState`]; the drag controller only ever sees deltas.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::error::DeltaParseError;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Whether this button starts a canvas drag.
    #[must_use]
    pub fn drags(self) -> bool {
        matches!(self, Self::Primary | Self::Middle)
    }
}

/// One pointer-move step, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DragDelta {
    pub dx: f64,
    pub dy: f64,
    /// Whether the pointer is still held after this step.
    pub pointer_down: bool,
}

impl DragDelta {
    #[must_use]
    pub fn new(dx: f64, dy: f64, pointer_down: bool) -> Self {
        Self { dx, dy, pointer_down }
    }
}

impl FromStr for DragDelta {
    type Err = DeltaParseError;

    /// Parse `"dx,dy"`. A trailing `",up"` marks the pointer as released.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || DeltaParseError { input: raw.to_owned() };
        let mut parts = raw.split(',').map(str::trim);
        let mut number = || -> Result<f64, DeltaParseError> {
            parts.next().ok_or_else(invalid)?.parse().map_err(|_| invalid())
        };
        let dx = number()?;
        let dy = number()?;
        let pointer_down = match parts.next() {
            None => true,
            Some("up") => false,
            Some(_) => return Err(invalid()),
        };
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self { dx, dy, pointer_down })
    }
}

/// Pointer gesture tracked between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is dragging the canvas.
    Panning {
        /// Screen-space position of the previous pointer event, used to compute the delta.
        last_screen: Point,
    },
}

impl InputState {
    /// Record a pointer move and return the step since the previous event.
    ///
    /// Returns `None` when no gesture is active.
    pub fn step(&mut self, screen: Point) -> Option<DragDelta> {
        let Self::Panning { last_screen } = self else {
            return None;
        };
        let delta = DragDelta::new(screen.x - last_screen.x, screen.y - last_screen.y, true);
        *last_screen = screen;
        Some(delta)
    }
}
