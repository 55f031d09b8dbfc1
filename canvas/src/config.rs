//! Layout and drag configuration.
//!
//! Defaults follow the tuning the tiles were designed with: 500 resolver passes
//! per tick, 10% energy decay, and a stiff overdamped pan spring. Every knob can
//! be overridden from `TILEFIELD_*` environment variables; unset variables keep
//! their default, malformed ones are reported rather than ignored.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_DAMPING_FACTOR;
use crate::error::ConfigError;

const DEFAULT_PADDING: f64 = 0.0;
const DEFAULT_ITERATIONS_PER_TICK: u32 = 500;
const DEFAULT_DECAY_RATE: f64 = 0.1;
const DEFAULT_CONVERGENCE_EPSILON: f64 = 1e-3;
const DEFAULT_MAX_TICKS: u32 = 300;
const DEFAULT_STRENGTH: f64 = 1.0;

const DEFAULT_SPRING_STIFFNESS: f64 = 300.0;
const DEFAULT_SPRING_DAMPING: f64 = 80.0;
const DEFAULT_SPRING_MASS: f64 = 1.0;
const DEFAULT_SPRING_REST_DELTA: f64 = 0.01;
const DEFAULT_SPRING_REST_SPEED: f64 = 0.01;

/// Parameters for one layout run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Margin enforced between tiles, added to every tile's width and height.
    pub padding: f64,
    /// Resolver passes per tick.
    pub iterations_per_tick: u32,
    /// Fraction of energy removed per tick, in (0, 1].
    pub decay_rate: f64,
    /// The run converges once energy falls below this.
    pub convergence_epsilon: f64,
    /// Hard tick budget.
    pub max_ticks: u32,
    /// Share of each penetration corrected per pair visit, in (0, 1].
    pub strength: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            iterations_per_tick: DEFAULT_ITERATIONS_PER_TICK,
            decay_rate: DEFAULT_DECAY_RATE,
            convergence_epsilon: DEFAULT_CONVERGENCE_EPSILON,
            max_ticks: DEFAULT_MAX_TICKS,
            strength: DEFAULT_STRENGTH,
        }
    }
}

impl LayoutConfig {
    /// Build a layout config from environment variables.
    ///
    /// Optional:
    /// - `TILEFIELD_PADDING`: default 0
    /// - `TILEFIELD_ITERATIONS_PER_TICK`: default 500
    /// - `TILEFIELD_DECAY_RATE`: default 0.1
    /// - `TILEFIELD_CONVERGENCE_EPSILON`: default 0.001
    /// - `TILEFIELD_MAX_TICKS`: default 300
    /// - `TILEFIELD_STRENGTH`: default 1.0
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable does not parse or the result fails
    /// [`LayoutConfig::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            padding: env_parse("TILEFIELD_PADDING", DEFAULT_PADDING)?,
            iterations_per_tick: env_parse("TILEFIELD_ITERATIONS_PER_TICK", DEFAULT_ITERATIONS_PER_TICK)?,
            decay_rate: env_parse("TILEFIELD_DECAY_RATE", DEFAULT_DECAY_RATE)?,
            convergence_epsilon: env_parse("TILEFIELD_CONVERGENCE_EPSILON", DEFAULT_CONVERGENCE_EPSILON)?,
            max_ticks: env_parse("TILEFIELD_MAX_TICKS", DEFAULT_MAX_TICKS)?,
            strength: env_parse("TILEFIELD_STRENGTH", DEFAULT_STRENGTH)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every parameter against its legal range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.padding.is_finite() && self.padding >= 0.0) {
            return Err(out_of_range("padding", self.padding, "a finite value >= 0"));
        }
        if self.iterations_per_tick == 0 {
            return Err(out_of_range("iterations_per_tick", 0.0, ">= 1"));
        }
        if !(self.decay_rate > 0.0 && self.decay_rate <= 1.0) {
            return Err(out_of_range("decay_rate", self.decay_rate, "(0, 1]"));
        }
        if !(self.convergence_epsilon > 0.0 && self.convergence_epsilon < 1.0) {
            return Err(out_of_range("convergence_epsilon", self.convergence_epsilon, "(0, 1)"));
        }
        if self.max_ticks == 0 {
            return Err(out_of_range("max_ticks", 0.0, ">= 1"));
        }
        if !(self.strength > 0.0 && self.strength <= 1.0) {
            return Err(out_of_range("strength", self.strength, "(0, 1]"));
        }
        Ok(())
    }

    /// Replace every field that fails [`LayoutConfig::validate`] with its default.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        Self {
            padding: if self.padding.is_finite() && self.padding >= 0.0 { self.padding } else { d.padding },
            iterations_per_tick: if self.iterations_per_tick == 0 {
                d.iterations_per_tick
            } else {
                self.iterations_per_tick
            },
            decay_rate: unit_or(self.decay_rate, d.decay_rate),
            convergence_epsilon: if self.convergence_epsilon > 0.0 && self.convergence_epsilon < 1.0 {
                self.convergence_epsilon
            } else {
                d.convergence_epsilon
            },
            max_ticks: if self.max_ticks == 0 { d.max_ticks } else { self.max_ticks },
            strength: unit_or(self.strength, d.strength),
        }
    }
}

/// Snap-back spring tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
    /// Distance to target under which the spring may settle.
    pub rest_delta: f64,
    /// Speed under which the spring may settle.
    pub rest_speed: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: DEFAULT_SPRING_STIFFNESS,
            damping: DEFAULT_SPRING_DAMPING,
            mass: DEFAULT_SPRING_MASS,
            rest_delta: DEFAULT_SPRING_REST_DELTA,
            rest_speed: DEFAULT_SPRING_REST_SPEED,
        }
    }
}

impl SpringConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] when any field is non-positive or non-finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("spring.stiffness", self.stiffness),
            ("spring.damping", self.damping),
            ("spring.mass", self.mass),
            ("spring.rest_delta", self.rest_delta),
            ("spring.rest_speed", self.rest_speed),
        ];
        for (field, value) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(out_of_range(field, value, "a finite value > 0"));
            }
        }
        Ok(())
    }

    /// Replace every non-positive or non-finite field with its default.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        Self {
            stiffness: positive_or(self.stiffness, d.stiffness),
            damping: positive_or(self.damping, d.damping),
            mass: positive_or(self.mass, d.mass),
            rest_delta: positive_or(self.rest_delta, d.rest_delta),
            rest_speed: positive_or(self.rest_speed, d.rest_speed),
        }
    }
}

/// Drag controller tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragConfig {
    /// Elastic "give" past a bound; 0 pins the offset to the bound.
    pub damping_factor: f64,
    pub spring: SpringConfig,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self { damping_factor: DEFAULT_DAMPING_FACTOR, spring: SpringConfig::default() }
    }
}

impl DragConfig {
    /// Build a drag config from environment variables.
    ///
    /// Optional:
    /// - `TILEFIELD_DAMPING_FACTOR`: default 3
    /// - `TILEFIELD_SPRING_STIFFNESS`: default 300
    /// - `TILEFIELD_SPRING_DAMPING`: default 80
    /// - `TILEFIELD_SPRING_MASS`: default 1
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable does not parse or the result fails
    /// [`DragConfig::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let spring = SpringConfig {
            stiffness: env_parse("TILEFIELD_SPRING_STIFFNESS", DEFAULT_SPRING_STIFFNESS)?,
            damping: env_parse("TILEFIELD_SPRING_DAMPING", DEFAULT_SPRING_DAMPING)?,
            mass: env_parse("TILEFIELD_SPRING_MASS", DEFAULT_SPRING_MASS)?,
            ..SpringConfig::default()
        };
        let config = Self {
            damping_factor: env_parse("TILEFIELD_DAMPING_FACTOR", DEFAULT_DAMPING_FACTOR)?,
            spring,
        };
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] for a negative or non-finite damping
    /// factor, or an invalid spring.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.damping_factor.is_finite() && self.damping_factor >= 0.0) {
            return Err(out_of_range("damping_factor", self.damping_factor, "a finite value >= 0"));
        }
        self.spring.validate()
    }

    /// Replace every field that fails [`DragConfig::validate`] with its default.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let damping_factor = if self.damping_factor.is_finite() && self.damping_factor >= 0.0 {
            self.damping_factor
        } else {
            DEFAULT_DAMPING_FACTOR
        };
        Self { damping_factor, spring: self.spring.sanitized() }
    }
}

/// `value` when it lies in (0, 1], else `default`.
fn unit_or(value: f64, default: f64) -> f64 {
    if value > 0.0 && value <= 1.0 { value } else { default }
}

fn positive_or(value: f64, default: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { default }
}

fn out_of_range(field: &'static str, value: f64, expected: &'static str) -> ConfigError {
    ConfigError::OutOfRange { field, value, expected }
}

fn env_parse<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    raw.trim()
        .parse::<T>()
        .map_err(|_| ConfigError::Parse { key: key.to_owned(), value: raw.to_owned() })
}
