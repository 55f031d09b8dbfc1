use super::*;

// =============================================================
// Button
// =============================================================

#[test]
fn primary_and_middle_drag() {
    assert!(Button::Primary.drags());
    assert!(Button::Middle.drags());
    assert!(!Button::Secondary.drags());
}

// =============================================================
// DragDelta
// =============================================================

#[test]
fn parse_plain_delta_keeps_pointer_down() {
    assert_eq!("12,-4.5".parse::<DragDelta>(), Ok(DragDelta::new(12.0, -4.5, true)));
}

#[test]
fn parse_release_marker() {
    assert_eq!(" 3 , 0 , up".parse::<DragDelta>(), Ok(DragDelta::new(3.0, 0.0, false)));
}

#[test]
fn parse_rejects_malformed() {
    for raw in ["", "1", "a,2", "1,2,down", "1,2,up,4"] {
        assert_eq!(raw.parse::<DragDelta>(), Err(DeltaParseError { input: raw.to_owned() }));
    }
}

#[test]
fn default_delta_is_released_and_still() {
    let d = DragDelta::default();
    assert_eq!((d.dx, d.dy, d.pointer_down), (0.0, 0.0, false));
}

// =============================================================
// InputState
// =============================================================

#[test]
fn input_state_default_is_idle() {
    assert_eq!(InputState::default(), InputState::Idle);
}

#[test]
fn idle_step_yields_nothing() {
    let mut state = InputState::Idle;
    assert_eq!(state.step(Point::new(5.0, 5.0)), None);
    assert_eq!(state, InputState::Idle);
}

#[test]
fn panning_step_reports_delta_and_advances() {
    let mut state = InputState::Panning { last_screen: Point::new(10.0, 20.0) };
    assert_eq!(state.step(Point::new(15.0, 12.0)), Some(DragDelta::new(5.0, -8.0, true)));
    assert_eq!(state, InputState::Panning { last_screen: Point::new(15.0, 12.0) });
    assert_eq!(state.step(Point::new(15.0, 12.0)), Some(DragDelta::new(0.0, 0.0, true)));
}
