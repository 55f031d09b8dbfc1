//! Host-facing engine: one layout driver plus one pan controller.
//!
//! The host feeds tiles, viewport measurements, pointer events, and frame
//! ticks into [`EngineCore`] and receives [`Action`]s describing what changed.
//! Nothing here touches a real display; the host applies the offset and draws.

use serde::Serialize;
use tracing::debug;

use crate::camera::{Camera, Point, Size};
use crate::config::{DragConfig, LayoutConfig};
use crate::drag::{DragController, InteractionState, WorldOffset};
use crate::driver::{LayoutDriver, LayoutHandle, LayoutOutcome};
use crate::input::{Button, InputState};
use crate::node::{NodeId, PlacedTile, Seed, TileSpec};
use crate::simulation::{LayoutSummary, Phase};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A layout run finished; read the tiles with [`EngineCore::tiles`].
    LayoutReady { run_id: u64, summary: LayoutSummary },
    LayoutCancelled { run_id: u64 },
    OffsetChanged(WorldOffset),
    SetCursor(String),
    RenderNeeded,
}

/// Screen-space rectangle of a placed tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Bounding box of the placed tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Content {
    center: Point,
    size: Size,
}

/// Core engine state.
pub struct EngineCore<P = serde_json::Value> {
    pub layout: LayoutDriver<P>,
    pub drag: DragController,
    pub input: InputState,
    pending: Option<LayoutHandle<P>>,
    tiles: Vec<PlacedTile<P>>,
    summary: Option<LayoutSummary>,
    content: Option<Content>,
    viewport: Size,
}

impl<P> Default for EngineCore<P> {
    fn default() -> Self {
        Self::new(LayoutConfig::default(), DragConfig::default())
    }
}

impl<P> EngineCore<P> {
    #[must_use]
    pub fn new(layout: LayoutConfig, drag: DragConfig) -> Self {
        Self {
            layout: LayoutDriver::new(layout),
            drag: DragController::new(drag),
            input: InputState::default(),
            pending: None,
            tiles: Vec::new(),
            summary: None,
            content: None,
            viewport: Size::default(),
        }
    }

    // --- Data inputs ---

    /// Start laying out a new tile set. A run in flight is cancelled first.
    pub fn load_tiles(&mut self, tiles: Vec<TileSpec<P>>, seed: &Seed) -> Vec<Action> {
        let previous = self.pending.take();
        self.pending = Some(self.layout.start(tiles, seed));

        let mut actions = Vec::new();
        if let Some(mut previous) = previous {
            if let Some(LayoutOutcome::Cancelled) = previous.try_outcome() {
                actions.push(Action::LayoutCancelled { run_id: previous.run_id() });
            }
        }
        actions
    }

    /// Stop the layout run in flight, if any.
    pub fn cancel_layout(&mut self) -> Vec<Action> {
        self.layout.cancel();
        self.poll_layout()
    }

    // --- Viewport ---

    /// Update the viewport size in CSS pixels.
    pub fn on_resize(&mut self, viewport: Size) -> Vec<Action> {
        self.viewport = viewport;
        self.remeasure()
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        if !button.drags() || !self.drag.is_measured() {
            return Vec::new();
        }
        self.input = InputState::Panning { last_screen: screen_pt };
        let offset = self.drag.on_drag_start();
        vec![Action::SetCursor(self.drag.cursor().to_owned()), Action::OffsetChanged(offset)]
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let Some(delta) = self.input.step(screen_pt) else {
            return Vec::new();
        };
        let offset = self.drag.on_drag_move(delta);
        vec![Action::OffsetChanged(offset), Action::RenderNeeded]
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, _button: Button) -> Vec<Action> {
        let Some(mut delta) = self.input.step(screen_pt) else {
            return Vec::new();
        };
        self.input = InputState::Idle;
        delta.pointer_down = false;
        let offset = self.drag.on_drag_move(delta);
        vec![Action::SetCursor(self.drag.cursor().to_owned()), Action::OffsetChanged(offset), Action::RenderNeeded]
    }

    // --- Frame ---

    /// One animation frame: a layout tick if a run is live, then `dt` seconds
    /// of snap-back.
    pub fn on_frame(&mut self, dt: f64) -> Vec<Action> {
        if self.layout.is_running() {
            self.layout.tick();
        }
        let mut actions = self.poll_layout();

        if self.drag.state() == InteractionState::Settling {
            actions.push(Action::OffsetChanged(self.drag.advance(dt)));
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    // --- Queries ---

    /// Tiles of the last completed layout, in input order.
    #[must_use]
    pub fn tiles(&self) -> &[PlacedTile<P>] {
        &self.tiles
    }

    #[must_use]
    pub fn summary(&self) -> Option<LayoutSummary> {
        self.summary
    }

    #[must_use]
    pub fn layout_phase(&self) -> Option<Phase> {
        self.layout.phase()
    }

    #[must_use]
    pub fn offset(&self) -> WorldOffset {
        self.drag.offset()
    }

    #[must_use]
    pub fn cursor(&self) -> &'static str {
        self.drag.cursor()
    }

    /// Bounding-box size of the placed tiles, zero before the first layout.
    #[must_use]
    pub fn content_size(&self) -> Size {
        self.content.map_or_else(Size::default, |c| c.size)
    }

    /// Pan camera: offset zero puts the content's center on the viewport's center.
    #[must_use]
    pub fn camera(&self) -> Camera {
        let offset = self.drag.offset();
        let center = self.content.map_or_else(Point::default, |c| c.center);
        Camera::new(
            offset.x + self.viewport.width / 2.0 - center.x,
            offset.y + self.viewport.height / 2.0 - center.y,
        )
    }

    /// Where a tile currently sits on screen.
    #[must_use]
    pub fn tile_screen_rect(&self, id: NodeId) -> Option<ScreenRect> {
        let tile = self.tiles.get(id)?;
        let top_left = self.camera().world_to_screen(Point::new(tile.left(), tile.top()));
        Some(ScreenRect { left: top_left.x, top: top_left.y, width: tile.width, height: tile.height })
    }

    fn poll_layout(&mut self) -> Vec<Action> {
        let Some(handle) = self.pending.as_mut() else {
            return Vec::new();
        };
        let run_id = handle.run_id();
        let Some(outcome) = handle.try_outcome() else {
            return Vec::new();
        };
        self.pending = None;

        match outcome {
            LayoutOutcome::Cancelled => vec![Action::LayoutCancelled { run_id }],
            LayoutOutcome::Completed(snapshot) => {
                self.content = content_of(&snapshot.tiles);
                self.tiles = snapshot.tiles;
                self.summary = Some(snapshot.summary);
                debug!(run_id, tiles = self.tiles.len(), content = ?self.content, "layout applied");

                let mut actions = vec![Action::LayoutReady { run_id, summary: snapshot.summary }];
                actions.extend(self.remeasure());
                if !actions.contains(&Action::RenderNeeded) {
                    actions.push(Action::RenderNeeded);
                }
                actions
            }
        }
    }

    fn remeasure(&mut self) -> Vec<Action> {
        let before = self.drag.offset();
        let after = self.drag.on_resize(self.content_size(), self.viewport);
        if after == before { Vec::new() } else { vec![Action::OffsetChanged(after), Action::RenderNeeded] }
    }
}

fn content_of<P>(tiles: &[PlacedTile<P>]) -> Option<Content> {
    let first = tiles.first()?;
    let (mut left, mut top) = (first.left(), first.top());
    let (mut right, mut bottom) = (left + first.width, top + first.height);
    for tile in tiles {
        left = left.min(tile.left());
        top = top.min(tile.top());
        right = right.max(tile.left() + tile.width);
        bottom = bottom.max(tile.top() + tile.height);
    }
    Some(Content {
        center: Point::new((left + right) / 2.0, (top + bottom) / 2.0),
        size: Size::new(right - left, bottom - top),
    })
}
