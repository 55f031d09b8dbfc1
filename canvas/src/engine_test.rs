#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

// =============================================================
// Helpers
// =============================================================

fn tiles(count: usize) -> Vec<TileSpec> {
    (0..count)
        .map(|i| {
            let side = 100.0 + 10.0 * (i % 6) as f64;
            TileSpec::new(side, side + 20.0, json!({ "src": format!("/img/{i}.jpg") }))
        })
        .collect()
}

fn core() -> EngineCore {
    EngineCore::new(LayoutConfig { padding: 20.0, ..LayoutConfig::default() }, DragConfig::default())
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn has_action<F>(actions: &[Action], pred: F) -> bool
where
    F: Fn(&Action) -> bool,
{
    actions.iter().any(pred)
}

fn has_render_needed(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::RenderNeeded))
}

fn last_offset(actions: &[Action]) -> Option<WorldOffset> {
    actions.iter().rev().find_map(|a| match a {
        Action::OffsetChanged(offset) => Some(*offset),
        _ => None,
    })
}

/// Tick frames until the pending layout resolves; returns every action seen.
fn run_layout(core: &mut EngineCore) -> Vec<Action> {
    let mut seen = Vec::new();
    for _ in 0..1000 {
        let actions = core.on_frame(1.0 / 60.0);
        let done = has_action(&actions, |a| matches!(a, Action::LayoutReady { .. } | Action::LayoutCancelled { .. }));
        seen.extend(actions);
        if done {
            break;
        }
    }
    seen
}

/// A laid-out engine whose content is larger than a 50x50 viewport.
fn ready_core() -> EngineCore {
    let mut core = core();
    core.load_tiles(tiles(12), &Seed::Phyllotaxis);
    run_layout(&mut core);
    core.on_resize(Size::new(50.0, 50.0));
    core
}

// =============================================================
// Construction and defaults
// =============================================================

#[test]
fn core_default_is_empty_and_idle() {
    let core: EngineCore = EngineCore::default();
    assert!(core.tiles().is_empty());
    assert!(core.summary().is_none());
    assert_eq!(core.layout_phase(), None);
    assert_eq!(core.offset(), WorldOffset::default());
    assert_eq!(core.cursor(), "grab");
    assert_eq!(core.content_size(), Size::default());
}

#[test]
fn core_frame_without_work_is_quiet() {
    let mut core = core();
    assert!(core.on_frame(1.0 / 60.0).is_empty());
}

// =============================================================
// Layout
// =============================================================

#[test]
fn core_layout_completes_over_frames() {
    let mut core = core();
    assert!(core.load_tiles(tiles(12), &Seed::Phyllotaxis).is_empty());
    assert_eq!(core.layout_phase(), Some(Phase::Init));

    let actions = run_layout(&mut core);
    assert!(has_action(&actions, |a| matches!(a, Action::LayoutReady { summary, .. } if summary.converged())));
    assert!(has_render_needed(&actions));
    assert_eq!(core.layout_phase(), None);
    assert_eq!(core.tiles().len(), 12);
    assert_eq!(core.tiles()[3].payload, json!({ "src": "/img/3.jpg" }));
}

#[test]
fn core_reload_cancels_previous_run() {
    let mut core = core();
    core.load_tiles(tiles(8), &Seed::Phyllotaxis);
    core.on_frame(1.0 / 60.0);
    let actions = core.load_tiles(tiles(4), &Seed::Phyllotaxis);
    assert_eq!(actions, vec![Action::LayoutCancelled { run_id: 1 }]);

    run_layout(&mut core);
    assert_eq!(core.tiles().len(), 4);
}

#[test]
fn core_cancel_layout_reports_once() {
    let mut core = core();
    core.load_tiles(tiles(8), &Seed::Phyllotaxis);
    assert_eq!(core.cancel_layout(), vec![Action::LayoutCancelled { run_id: 1 }]);
    assert!(core.cancel_layout().is_empty());
    assert!(core.on_frame(1.0 / 60.0).is_empty());
    assert!(core.tiles().is_empty());
}

#[test]
fn core_content_size_covers_every_tile() {
    let core = ready_core();
    let size = core.content_size();
    assert!(size.is_measured());
    for tile in core.tiles() {
        let rect = core.tile_screen_rect(tile.id).unwrap();
        assert!(rect.width <= size.width && rect.height <= size.height);
    }
}

#[test]
fn core_camera_centers_content_at_zero_offset() {
    let core = ready_core();
    assert_eq!(core.offset().x, 0.0);
    let size = core.content_size();

    // Content bounding box in screen space is centered on the 50x50 viewport.
    let rects: Vec<ScreenRect> = core.tiles().iter().filter_map(|t| core.tile_screen_rect(t.id)).collect();
    let left = rects.iter().map(|r| r.left).fold(f64::INFINITY, f64::min);
    let top = rects.iter().map(|r| r.top).fold(f64::INFINITY, f64::min);
    assert!((left + size.width / 2.0 - 25.0).abs() < 1e-9);
    assert!((top + size.height / 2.0 - 25.0).abs() < 1e-9);
}

#[test]
fn core_tile_screen_rect_unknown_id() {
    let core = ready_core();
    assert!(core.tile_screen_rect(99).is_none());
}

// =============================================================
// Pointer input
// =============================================================

#[test]
fn core_pointer_down_before_measurement_is_ignored() {
    let mut core = core();
    assert!(core.on_pointer_down(pt(10.0, 10.0), Button::Primary).is_empty());
    assert!(core.on_pointer_move(pt(20.0, 20.0)).is_empty());
}

#[test]
fn core_secondary_button_does_not_drag() {
    let mut core = ready_core();
    assert!(core.on_pointer_down(pt(10.0, 10.0), Button::Secondary).is_empty());
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn core_drag_moves_offset_and_camera() {
    let mut core = ready_core();
    let before = core.camera();
    let actions = core.on_pointer_down(pt(10.0, 10.0), Button::Primary);
    assert!(actions.contains(&Action::SetCursor("grabbing".to_owned())));

    let actions = core.on_pointer_move(pt(20.0, 15.0));
    let offset = last_offset(&actions).unwrap();
    assert_eq!((offset.x, offset.y), (10.0, 5.0));
    assert!(has_render_needed(&actions));

    let after = core.camera();
    assert!((after.pan_x - before.pan_x - 10.0).abs() < 1e-9);
    assert!((after.pan_y - before.pan_y - 5.0).abs() < 1e-9);
}

#[test]
fn core_pointer_up_in_range_goes_idle() {
    let mut core = ready_core();
    core.on_pointer_down(pt(0.0, 0.0), Button::Primary);
    let actions = core.on_pointer_up(pt(4.0, -3.0), Button::Primary);
    assert!(actions.contains(&Action::SetCursor("grab".to_owned())));
    let offset = last_offset(&actions).unwrap();
    assert_eq!((offset.x, offset.y, offset.state), (4.0, -3.0, InteractionState::Idle));
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn core_overdrag_springs_back_over_frames() {
    let mut core = ready_core();
    let bounds = core.drag.bounds();
    core.on_pointer_down(pt(0.0, 0.0), Button::Primary);
    core.on_pointer_move(pt(5000.0, 0.0));
    let actions = core.on_pointer_up(pt(5000.0, 0.0), Button::Primary);
    assert_eq!(last_offset(&actions).unwrap().state, InteractionState::Settling);

    for _ in 0..1000 {
        if core.offset().state == InteractionState::Idle {
            break;
        }
        assert!(has_render_needed(&core.on_frame(1.0 / 60.0)));
    }
    assert_eq!(core.offset().x, bounds.max_x);
    assert_eq!(core.offset().y, 0.0);
}

#[test]
fn core_pointer_up_without_down_is_ignored() {
    let mut core = ready_core();
    assert!(core.on_pointer_up(pt(1.0, 1.0), Button::Primary).is_empty());
}

// =============================================================
// Resize
// =============================================================

#[test]
fn core_resize_before_layout_keeps_bounds_degenerate() {
    let mut core = core();
    assert!(core.on_resize(Size::new(800.0, 600.0)).is_empty());
    assert!(!core.drag.is_measured());
}

#[test]
fn core_growing_viewport_clamps_offset() {
    let mut core = ready_core();
    core.on_pointer_down(pt(0.0, 0.0), Button::Primary);
    core.on_pointer_up(pt(20.0, 0.0), Button::Primary);
    assert_eq!(core.offset().x, 20.0);

    let big = core.content_size();
    let actions = core.on_resize(Size::new(big.width, big.height));
    assert_eq!(last_offset(&actions).unwrap().x, 0.0);
}
