// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Measured objectives and go/no-go thresholds.
//!
//! Every completed trial reports five measurements: product recovery, purity
//! (LCAP), phase-separation efficiency, emulsion penalty (rag-layer severity
//! at the interface), and total processing time.

use serde::{Deserialize, Serialize};

/// The five measured objectives for one completed trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    /// Product recovery into the organic phase (%)
    pub recovery_pct: f64,
    /// Product purity as LC area percent (%)
    pub purity_pct: f64,
    /// Phase-separation efficiency (%)
    pub separation_pct: f64,
    /// Emulsion penalty: rag-layer severity (%)
    pub emulsion_pct: f64,
    /// Total processing time including settling (s)
    pub total_time_s: f64,
}

impl Measurements {
    /// Check that every value is finite and inside its physical range.
    pub fn validate(&self) -> Result<(), MeasurementsError> {
        let percents = [
            ("recovery_pct", self.recovery_pct),
            ("purity_pct", self.purity_pct),
            ("separation_pct", self.separation_pct),
            ("emulsion_pct", self.emulsion_pct),
        ];

        for (name, value) in percents {
            if !value.is_finite() {
                return Err(MeasurementsError::NotFinite { objective: name });
            }
            if !(0.0..=100.0).contains(&value) {
                return Err(MeasurementsError::OutOfRange {
                    objective: name,
                    value,
                    min: 0.0,
                    max: 100.0,
                });
            }
        }

        if !self.total_time_s.is_finite() {
            return Err(MeasurementsError::NotFinite {
                objective: "total_time_s",
            });
        }
        if self.total_time_s < 0.0 {
            return Err(MeasurementsError::Negative {
                objective: "total_time_s",
                value: self.total_time_s,
            });
        }
        Ok(())
    }
}

/// Per-experiment go/no-go thresholds.
///
/// An absent threshold means the objective still participates in dominance
/// ranking but does not gate feasibility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Minimum acceptable recovery (%)
    pub recovery_min_pct: Option<f64>,
    /// Minimum acceptable purity (% LCAP)
    pub purity_min_pct: Option<f64>,
    /// Minimum acceptable phase-separation efficiency (%)
    pub separation_min_pct: Option<f64>,
    /// Maximum tolerable emulsion penalty (%)
    pub emulsion_max_pct: Option<f64>,
    /// Maximum acceptable total time (s)
    pub total_time_max_s: Option<f64>,
}

impl Default for Thresholds {
    /// Process-development defaults: at least half the product recovered,
    /// purity at spec, and a run that fits in a working shift of the rig.
    fn default() -> Self {
        Self {
            recovery_min_pct: Some(50.0),
            purity_min_pct: Some(90.0),
            separation_min_pct: None,
            emulsion_max_pct: None,
            total_time_max_s: Some(1200.0),
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<(), MeasurementsError> {
        let percents = [
            ("recovery_min_pct", self.recovery_min_pct),
            ("purity_min_pct", self.purity_min_pct),
            ("separation_min_pct", self.separation_min_pct),
            ("emulsion_max_pct", self.emulsion_max_pct),
        ];

        for (name, threshold) in percents {
            if let Some(value) = threshold {
                if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                    return Err(MeasurementsError::OutOfRange {
                        objective: name,
                        value,
                        min: 0.0,
                        max: 100.0,
                    });
                }
            }
        }

        if let Some(value) = self.total_time_max_s {
            if !value.is_finite() || value < 0.0 {
                return Err(MeasurementsError::Negative {
                    objective: "total_time_max_s",
                    value,
                });
            }
        }
        Ok(())
    }

    /// Whether a set of measurements clears every configured threshold.
    pub fn is_met(&self, m: &Measurements) -> bool {
        let above = [
            (self.recovery_min_pct, m.recovery_pct),
            (self.purity_min_pct, m.purity_pct),
            (self.separation_min_pct, m.separation_pct),
        ];
        let below = [
            (self.emulsion_max_pct, m.emulsion_pct),
            (self.total_time_max_s, m.total_time_s),
        ];

        above.iter().all(|(t, v)| t.is_none_or(|t| *v >= t))
            && below.iter().all(|(t, v)| t.is_none_or(|t| *v <= t))
    }
}

/// Errors from measurement or threshold validation.
#[derive(Debug, thiserror::Error)]
pub enum MeasurementsError {
    #[error("Value for '{objective}' is not finite")]
    NotFinite { objective: &'static str },

    #[error("Value {value} for '{objective}' is outside [{min}, {max}]")]
    OutOfRange {
        objective: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Value {value} for '{objective}' must be non-negative")]
    Negative { objective: &'static str, value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn good() -> Measurements {
        Measurements {
            recovery_pct: 72.0,
            purity_pct: 93.5,
            separation_pct: 85.0,
            emulsion_pct: 20.0,
            total_time_s: 600.0,
        }
    }

    #[test]
    fn test_valid_measurements() {
        assert!(good().validate().is_ok());
    }

    #[test]
    fn test_percent_out_of_range() {
        let m = Measurements {
            purity_pct: 101.0,
            ..good()
        };
        assert!(matches!(
            m.validate(),
            Err(MeasurementsError::OutOfRange { objective: "purity_pct", .. })
        ));
    }

    #[test]
    fn test_nan_rejected() {
        let m = Measurements {
            recovery_pct: f64::NAN,
            ..good()
        };
        assert!(matches!(
            m.validate(),
            Err(MeasurementsError::NotFinite { objective: "recovery_pct" })
        ));
    }

    #[test]
    fn test_default_thresholds_met() {
        assert!(Thresholds::default().is_met(&good()));
    }

    #[test]
    fn test_threshold_failures() {
        let thresholds = Thresholds::default();

        let slow = Measurements {
            total_time_s: 1500.0,
            ..good()
        };
        assert!(!thresholds.is_met(&slow));

        let impure = Measurements {
            purity_pct: 88.0,
            ..good()
        };
        assert!(!thresholds.is_met(&impure));
    }

    #[test]
    fn test_unset_thresholds_do_not_gate() {
        let thresholds = Thresholds {
            recovery_min_pct: None,
            purity_min_pct: None,
            separation_min_pct: None,
            emulsion_max_pct: None,
            total_time_max_s: None,
        };
        let bad = Measurements {
            recovery_pct: 1.0,
            purity_pct: 1.0,
            separation_pct: 1.0,
            emulsion_pct: 99.0,
            total_time_s: 1999.0,
        };
        assert!(thresholds.is_met(&bad));
    }

    #[test]
    fn test_emulsion_threshold() {
        let thresholds = Thresholds {
            emulsion_max_pct: Some(30.0),
            ..Thresholds::default()
        };
        assert!(thresholds.is_met(&good()));
        let raggy = Measurements {
            emulsion_pct: 45.0,
            ..good()
        };
        assert!(!thresholds.is_met(&raggy));
    }
}
