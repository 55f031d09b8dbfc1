//! Rubber-band damping for drag offsets.
//!
//! Inside `[min, max]` the mapping is the identity. Past a bound the overshoot
//! grows with the square root of the distance, scaled by `factor`, so a drag
//! meets increasing resistance the farther it is pulled. The mapping is
//! continuous and strictly increasing (for `factor > 0`), which makes it
//! invertible; [`dampen_inverse`] recovers the raw drag position behind a
//! displayed offset.

#[cfg(test)]
#[path = "damping_test.rs"]
mod damping_test;

use crate::consts::DEFAULT_DAMPING_FACTOR;

/// Map `value` through the elastic clamp for `[min, max]`.
///
/// Non-finite inputs never propagate: `+∞` maps to `max`, `-∞` and NaN to
/// `min`. Non-finite bounds collapse onto the finite one (or 0), an inverted
/// range is reordered, and a negative or non-finite `factor` falls back to
/// the default of 3.
#[must_use]
pub fn dampen(value: f64, range: [f64; 2], factor: f64) -> f64 {
    let [min, max] = sanitize_range(range);
    let factor = sanitize_factor(factor);

    if value.is_nan() {
        return min;
    }
    if value > max {
        if value == f64::INFINITY {
            return max;
        }
        max + (value - max).sqrt() * factor
    } else if value < min {
        if value == f64::NEG_INFINITY {
            return min;
        }
        min - (min - value).sqrt() * factor
    } else {
        value
    }
}

/// The raw value `r` for which `dampen(r, range, factor) == value`.
///
/// With `factor == 0` every overshoot collapses onto the bound, so the bound
/// itself is returned.
#[must_use]
pub fn dampen_inverse(value: f64, range: [f64; 2], factor: f64) -> f64 {
    let [min, max] = sanitize_range(range);
    let factor = sanitize_factor(factor);

    if !value.is_finite() {
        return dampen(value, [min, max], factor);
    }
    if factor == 0.0 {
        return value.clamp(min, max);
    }
    if value > max {
        let extra = (value - max) / factor;
        max + extra * extra
    } else if value < min {
        let extra = (min - value) / factor;
        min - extra * extra
    } else {
        value
    }
}

/// Reorder and de-NaN a `[min, max]` pair.
#[must_use]
pub fn sanitize_range([min, max]: [f64; 2]) -> [f64; 2] {
    let (min, max) = match (min.is_finite(), max.is_finite()) {
        (true, true) => (min, max),
        (true, false) => (min, min),
        (false, true) => (max, max),
        (false, false) => (0.0, 0.0),
    };
    if min <= max { [min, max] } else { [max, min] }
}

fn sanitize_factor(factor: f64) -> f64 {
    if factor.is_finite() && factor >= 0.0 { factor } else { DEFAULT_DAMPING_FACTOR }
}
