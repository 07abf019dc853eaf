// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Deterministic bench model for demos and tests.
//!
//! Synthetic response surfaces with qualitatively realistic couplings:
//! organic-rich systems recover more product, hard stirring emulsifies, and a
//! poorly separated or emulsified batch pays for it in settling time. Real
//! campaigns replace this with measurements from the rig.

use crate::models::{Conditions, Measurements};

/// Upper clamp for total processing time (s).
const MAX_TOTAL_TIME_S: f64 = 2000.0;

/// Evaluate the bench model at the given conditions.
pub fn simulate(c: &Conditions) -> Measurements {
    let recovery = 0.3
        + 0.5 * c.organic_fraction
        + 0.2 * (c.stirring_speed_rpm / 500.0)
        + 0.1 * (c.temperature_c / 40.0);
    let recovery_pct = recovery.clamp(0.0, 1.0) * 100.0;

    let purity_pct =
        (85.0 + 10.0 * c.aqueous_fraction + 5.0 * (c.temperature_c - 20.0) / 36.0).clamp(0.0, 100.0);

    let separation = 0.7
        + 0.2 * (1.0 - c.stirring_speed_rpm / 500.0)
        + 0.1 * (c.temperature_c - 4.0) / 36.0;
    let separation_pct = separation.clamp(0.0, 1.0) * 100.0;

    let emulsion =
        0.1 + 0.6 * (c.stirring_speed_rpm / 500.0) + 0.3 * (c.stirring_time_s / 120.0);
    let emulsion_pct = emulsion.clamp(0.0, 1.0) * 100.0;

    // Base processing plus settling, stretched by poor separation and rag.
    let total_time_s = (c.stirring_time_s
        + 50.0
        + 1000.0 * (1.0 - separation_pct / 100.0)
        + 500.0 * (emulsion_pct / 100.0))
        .clamp(0.0, MAX_TOTAL_TIME_S);

    Measurements {
        recovery_pct,
        purity_pct,
        separation_pct,
        emulsion_pct,
        total_time_s,
    }
}
