#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_default_is_origin() {
    assert_eq!(Point::default(), Point::new(0.0, 0.0));
}

#[test]
fn point_finite_checks_both_axes() {
    assert!(Point::new(1.0, -2.0).is_finite());
    assert!(!Point::new(f64::NAN, 0.0).is_finite());
    assert!(!Point::new(0.0, f64::INFINITY).is_finite());
}

// --- Size ---

#[test]
fn size_measured_requires_positive_sides() {
    assert!(Size::new(10.0, 20.0).is_measured());
    assert!(!Size::new(0.0, 20.0).is_measured());
    assert!(!Size::new(10.0, -1.0).is_measured());
    assert!(!Size::default().is_measured());
}

#[test]
fn size_measured_rejects_non_finite() {
    assert!(!Size::new(f64::NAN, 20.0).is_measured());
    assert!(!Size::new(10.0, f64::INFINITY).is_measured());
}

// --- Camera ---

#[test]
fn camera_default_pan_is_zero() {
    let cam = Camera::default();
    assert_eq!(cam.pan_x, 0.0);
    assert_eq!(cam.pan_y, 0.0);
}

#[test]
fn screen_to_world_identity() {
    let cam = Camera::default();
    let world = cam.screen_to_world(Point::new(50.0, 75.0));
    assert!(point_approx_eq(world, Point::new(50.0, 75.0)));
}

#[test]
fn screen_to_world_with_pan() {
    let cam = Camera::new(100.0, -50.0);
    let world = cam.screen_to_world(Point::new(150.0, 0.0));
    assert!(point_approx_eq(world, Point::new(50.0, 50.0)));
}

#[test]
fn world_to_screen_with_pan() {
    let cam = Camera::new(-30.0, 20.0);
    let screen = cam.world_to_screen(Point::new(10.0, 10.0));
    assert!(point_approx_eq(screen, Point::new(-20.0, 30.0)));
}

#[test]
fn round_trip_world_screen_world() {
    let cam = Camera::new(123.5, -77.25);
    let original = Point::new(42.0, -17.5);
    let back = cam.screen_to_world(cam.world_to_screen(original));
    assert!(point_approx_eq(original, back));
}
