#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

// =============================================================
// Identity inside the range
// =============================================================

#[test]
fn inside_range_is_identity() {
    for v in [-50.0, -12.5, 0.0, 30.0, 49.999, 50.0] {
        assert_eq!(dampen(v, [-50.0, 50.0], 3.0), v);
    }
}

#[test]
fn offset_inside_bounds_passes_through() {
    assert_eq!(dampen(30.0, [-50.0, 50.0], 3.0), 30.0);
}

#[test]
fn bounds_map_to_themselves() {
    assert_eq!(dampen(100.0, [0.0, 100.0], 3.0), 100.0);
    assert_eq!(dampen(0.0, [0.0, 100.0], 3.0), 0.0);
}

// =============================================================
// Overshoot
// =============================================================

#[test]
fn overshoot_above_max_is_square_root_scaled() {
    let out = dampen(150.0, [0.0, 100.0], 3.0);
    assert!(approx_eq(out, 100.0 + 50.0_f64.sqrt() * 3.0));
    assert!((out - 121.213).abs() < 1e-3);
}

#[test]
fn overshoot_below_min_mirrors_above() {
    let out = dampen(-50.0, [0.0, 100.0], 3.0);
    assert!(approx_eq(out, -(50.0_f64.sqrt()) * 3.0));
}

#[test]
fn continuity_at_max() {
    let range = [0.0, 100.0];
    let mut last_gap = f64::INFINITY;
    for eps in [1.0, 1e-2, 1e-4, 1e-8, 1e-12] {
        let gap = dampen(100.0 + eps, range, 3.0) - 100.0;
        assert!(gap >= 0.0);
        assert!(gap < last_gap);
        last_gap = gap;
    }
    assert!(last_gap < 1e-5);
}

#[test]
fn continuity_at_min() {
    let gap = 0.0 - dampen(-1e-12, [0.0, 100.0], 3.0);
    assert!(gap > 0.0 && gap < 1e-5);
}

#[test]
fn monotonic_past_max() {
    let range = [0.0, 100.0];
    let mut prev = dampen(100.0, range, 3.0);
    for step in 1..200 {
        let v = 100.0 + f64::from(step) * 2.5;
        let out = dampen(v, range, 3.0);
        assert!(out > prev, "dampen({v}) = {out} should exceed {prev}");
        prev = out;
    }
}

#[test]
fn monotonic_below_min() {
    let range = [0.0, 100.0];
    let mut prev = dampen(0.0, range, 3.0);
    for step in 1..200 {
        let v = -f64::from(step) * 2.5;
        let out = dampen(v, range, 3.0);
        assert!(out < prev);
        prev = out;
    }
}

#[test]
fn overshoot_advances_less_than_raw_drag() {
    let out = dampen(400.0, [0.0, 100.0], 3.0);
    assert!(out > 100.0);
    assert!(out < 400.0);
}

#[test]
fn zero_factor_pins_to_bound() {
    assert_eq!(dampen(500.0, [0.0, 100.0], 0.0), 100.0);
    assert_eq!(dampen(-500.0, [0.0, 100.0], 0.0), 0.0);
}

#[test]
fn degenerate_range_is_elastic_around_point() {
    let out = dampen(16.0, [0.0, 0.0], 3.0);
    assert!(approx_eq(out, 12.0));
    assert_eq!(dampen(0.0, [0.0, 0.0], 3.0), 0.0);
}

// =============================================================
// Non-finite guards
// =============================================================

#[test]
fn nan_value_maps_to_min() {
    assert_eq!(dampen(f64::NAN, [-10.0, 10.0], 3.0), -10.0);
}

#[test]
fn infinite_values_map_to_nearest_bound() {
    assert_eq!(dampen(f64::INFINITY, [-10.0, 10.0], 3.0), 10.0);
    assert_eq!(dampen(f64::NEG_INFINITY, [-10.0, 10.0], 3.0), -10.0);
}

#[test]
fn inverted_range_is_reordered() {
    assert_eq!(dampen(5.0, [10.0, -10.0], 3.0), 5.0);
    assert!(dampen(20.0, [10.0, -10.0], 3.0) > 10.0);
}

#[test]
fn non_finite_bound_collapses_to_finite_one() {
    assert_eq!(sanitize_range([f64::NAN, 4.0]), [4.0, 4.0]);
    assert_eq!(sanitize_range([-3.0, f64::INFINITY]), [-3.0, -3.0]);
    assert_eq!(sanitize_range([f64::NAN, f64::NAN]), [0.0, 0.0]);
}

#[test]
fn invalid_factor_falls_back_to_default() {
    let expected = dampen(150.0, [0.0, 100.0], 3.0);
    assert_eq!(dampen(150.0, [0.0, 100.0], -1.0), expected);
    assert_eq!(dampen(150.0, [0.0, 100.0], f64::NAN), expected);
}

#[test]
fn output_is_always_finite() {
    for v in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1e300, -1e300] {
        assert!(dampen(v, [-1.0, 1.0], 3.0).is_finite());
    }
}

// =============================================================
// Inverse
// =============================================================

#[test]
fn inverse_recovers_raw_value_past_max() {
    let range = [-50.0, 50.0];
    for raw in [55.0, 80.0, 250.0, 1000.0] {
        let shown = dampen(raw, range, 3.0);
        assert!(approx_eq(dampen_inverse(shown, range, 3.0), raw));
    }
}

#[test]
fn inverse_recovers_raw_value_below_min() {
    let range = [-50.0, 50.0];
    for raw in [-51.0, -90.0, -600.0] {
        let shown = dampen(raw, range, 3.0);
        assert!(approx_eq(dampen_inverse(shown, range, 3.0), raw));
    }
}

#[test]
fn inverse_is_identity_inside_range() {
    assert_eq!(dampen_inverse(12.0, [-50.0, 50.0], 3.0), 12.0);
}

#[test]
fn inverse_with_zero_factor_clamps() {
    assert_eq!(dampen_inverse(70.0, [-50.0, 50.0], 0.0), 50.0);
}
