// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Extraction parameter space and suggested conditions.
//!
//! The solvent system is parameterized by the aqueous fraction alone; the
//! organic fraction is always derived as `1.0 - aqueous_fraction` so the
//! composition constraint cannot be violated by construction.

use serde::{Deserialize, Serialize};

/// Tolerance used when checking the composition constraint on stored data.
const COMPOSITION_EPSILON: f64 = 1e-9;

/// Inclusive bounds for one free parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterBounds {
    pub min: f64,
    pub max: f64,
}

impl ParameterBounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Width of the interval.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Map a unit-interval coordinate into these bounds.
    pub fn lerp(&self, t: f64) -> f64 {
        self.min + self.span() * t
    }

    fn is_within(&self, outer: &ParameterBounds) -> bool {
        self.min >= outer.min && self.max <= outer.max
    }
}

/// Physical limits of the rig; per-experiment bounds may narrow these but
/// never widen them.
pub mod domain {
    use super::ParameterBounds;

    pub const AQUEOUS_FRACTION: ParameterBounds = ParameterBounds::new(0.0, 1.0);
    pub const STIRRING_SPEED_RPM: ParameterBounds = ParameterBounds::new(100.0, 500.0);
    pub const STIRRING_TIME_S: ParameterBounds = ParameterBounds::new(10.0, 120.0);
    pub const TEMPERATURE_C: ParameterBounds = ParameterBounds::new(4.0, 40.0);
}

/// Search bounds for the four free parameters of an experiment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpace {
    pub aqueous_fraction: ParameterBounds,
    pub stirring_speed_rpm: ParameterBounds,
    pub stirring_time_s: ParameterBounds,
    pub temperature_c: ParameterBounds,
}

impl Default for ParameterSpace {
    fn default() -> Self {
        Self {
            aqueous_fraction: domain::AQUEOUS_FRACTION,
            stirring_speed_rpm: domain::STIRRING_SPEED_RPM,
            stirring_time_s: domain::STIRRING_TIME_S,
            temperature_c: domain::TEMPERATURE_C,
        }
    }
}

impl ParameterSpace {
    /// Bounds in a fixed order for code that iterates over dimensions.
    pub fn dimensions(&self) -> [ParameterBounds; 4] {
        [
            self.aqueous_fraction,
            self.stirring_speed_rpm,
            self.stirring_time_s,
            self.temperature_c,
        ]
    }

    /// Check that every bound pair is ordered, finite, and inside the rig's
    /// physical domain.
    pub fn validate(&self) -> Result<(), SpaceError> {
        let checks = [
            ("aqueous_fraction", self.aqueous_fraction, domain::AQUEOUS_FRACTION),
            ("stirring_speed_rpm", self.stirring_speed_rpm, domain::STIRRING_SPEED_RPM),
            ("stirring_time_s", self.stirring_time_s, domain::STIRRING_TIME_S),
            ("temperature_c", self.temperature_c, domain::TEMPERATURE_C),
        ];

        for (name, bounds, outer) in checks {
            if !bounds.min.is_finite() || !bounds.max.is_finite() {
                return Err(SpaceError::NonFiniteBounds { parameter: name });
            }
            if bounds.min >= bounds.max {
                return Err(SpaceError::EmptyBounds { parameter: name });
            }
            if !bounds.is_within(&outer) {
                return Err(SpaceError::OutsideDomain {
                    parameter: name,
                    min: outer.min,
                    max: outer.max,
                });
            }
        }
        Ok(())
    }
}

/// One concrete set of conditions to run at the bench.
///
/// `organic_fraction` is stored for readability of serialized records but is
/// always derived; construct via [`Conditions::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    /// Fraction of aqueous solvent (0.0-1.0)
    pub aqueous_fraction: f64,
    /// Fraction of organic solvent, always `1.0 - aqueous_fraction`
    pub organic_fraction: f64,
    /// Stirring speed in rpm
    pub stirring_speed_rpm: f64,
    /// Stirring duration in seconds
    pub stirring_time_s: f64,
    /// Temperature during extraction in degrees Celsius
    pub temperature_c: f64,
}

impl Conditions {
    /// Build conditions from the free parameters, deriving the organic
    /// fraction.
    pub fn new(
        aqueous_fraction: f64,
        stirring_speed_rpm: f64,
        stirring_time_s: f64,
        temperature_c: f64,
    ) -> Self {
        Self {
            aqueous_fraction,
            organic_fraction: 1.0 - aqueous_fraction,
            stirring_speed_rpm,
            stirring_time_s,
            temperature_c,
        }
    }

    /// Free parameters in the same order as [`ParameterSpace::dimensions`].
    pub fn free_parameters(&self) -> [f64; 4] {
        [
            self.aqueous_fraction,
            self.stirring_speed_rpm,
            self.stirring_time_s,
            self.temperature_c,
        ]
    }

    /// Validate against an experiment's search bounds.
    pub fn validate_in(&self, space: &ParameterSpace) -> Result<(), SpaceError> {
        if (self.aqueous_fraction + self.organic_fraction - 1.0).abs() > COMPOSITION_EPSILON {
            return Err(SpaceError::CompositionViolated {
                aqueous: self.aqueous_fraction,
                organic: self.organic_fraction,
            });
        }

        let checks = [
            ("aqueous_fraction", self.aqueous_fraction, space.aqueous_fraction),
            ("stirring_speed_rpm", self.stirring_speed_rpm, space.stirring_speed_rpm),
            ("stirring_time_s", self.stirring_time_s, space.stirring_time_s),
            ("temperature_c", self.temperature_c, space.temperature_c),
        ];

        for (name, value, bounds) in checks {
            if !value.is_finite() || !bounds.contains(value) {
                return Err(SpaceError::OutOfBounds {
                    parameter: name,
                    value,
                    min: bounds.min,
                    max: bounds.max,
                });
            }
        }
        Ok(())
    }
}

/// Errors from parameter-space validation.
#[derive(Debug, thiserror::Error)]
pub enum SpaceError {
    #[error("Bounds for '{parameter}' are not finite")]
    NonFiniteBounds { parameter: &'static str },

    #[error("Bounds for '{parameter}' are empty (min must be below max)")]
    EmptyBounds { parameter: &'static str },

    #[error("Bounds for '{parameter}' exceed the rig domain [{min}, {max}]")]
    OutsideDomain {
        parameter: &'static str,
        min: f64,
        max: f64,
    },

    #[error("Value {value} for '{parameter}' is outside [{min}, {max}]")]
    OutOfBounds {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Solvent fractions must sum to 1.0 (aqueous {aqueous} + organic {organic})")]
    CompositionViolated { aqueous: f64, organic: f64 },
}
