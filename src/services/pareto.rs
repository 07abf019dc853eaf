// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Multi-objective dominance analytics.
//!
//! All comparisons run on a canonical minimization vector so the mixed
//! maximize/minimize objective set needs no special-casing downstream.

use crate::models::Measurements;

/// Number of objectives in the canonical vector.
pub const OBJECTIVE_COUNT: usize = 5;

/// Canonical minimization vector: maximized objectives are negated.
///
/// Order: recovery, purity, separation, emulsion, total time.
pub fn objective_vector(m: &Measurements) -> [f64; OBJECTIVE_COUNT] {
    [
        -m.recovery_pct,
        -m.purity_pct,
        -m.separation_pct,
        m.emulsion_pct,
        m.total_time_s,
    ]
}

/// Strict Pareto dominance: `a` is no worse everywhere and better somewhere.
pub fn dominates(a: &[f64; OBJECTIVE_COUNT], b: &[f64; OBJECTIVE_COUNT]) -> bool {
    let mut strictly_better = false;
    for (x, y) in a.iter().zip(b) {
        if x > y {
            return false;
        }
        if x < y {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Indices of the non-dominated members of `vectors`.
///
/// Duplicates of a front member are kept; only strictly dominated points are
/// dropped.
pub fn pareto_front(vectors: &[[f64; OBJECTIVE_COUNT]]) -> Vec<usize> {
    (0..vectors.len())
        .filter(|&i| {
            vectors
                .iter()
                .enumerate()
                .all(|(j, other)| i == j || !dominates(other, &vectors[i]))
        })
        .collect()
}

/// Crowding distance per front member, NSGA-II style.
///
/// Boundary points get `f64::INFINITY`; interior points get the normalized
/// perimeter of their neighbor cuboid. Larger means more isolated.
pub fn crowding_distances(front: &[[f64; OBJECTIVE_COUNT]]) -> Vec<f64> {
    let n = front.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let mut distances = vec![0.0_f64; n];
    let mut order: Vec<usize> = (0..n).collect();

    for obj in 0..OBJECTIVE_COUNT {
        order.sort_by(|&a, &b| front[a][obj].total_cmp(&front[b][obj]));

        let low = front[order[0]][obj];
        let high = front[order[n - 1]][obj];
        let span = high - low;

        // A flat objective has no extremes worth protecting.
        if span <= 0.0 {
            continue;
        }

        distances[order[0]] = f64::INFINITY;
        distances[order[n - 1]] = f64::INFINITY;

        for w in order.windows(3) {
            let (prev, mid, next) = (w[0], w[1], w[2]);
            distances[mid] += (front[next][obj] - front[prev][obj]) / span;
        }
    }
    distances
}

/// Index of the best-compromise point: minimal equal-weight sum of min-max
/// normalized objectives. `None` for an empty input.
///
/// Transparent substitute for a model-based recommendation; callers should
/// surface the full front alongside it.
pub fn best_compromise(vectors: &[[f64; OBJECTIVE_COUNT]]) -> Option<usize> {
    if vectors.is_empty() {
        return None;
    }

    let mut lows = [f64::INFINITY; OBJECTIVE_COUNT];
    let mut highs = [f64::NEG_INFINITY; OBJECTIVE_COUNT];
    for v in vectors {
        for obj in 0..OBJECTIVE_COUNT {
            lows[obj] = lows[obj].min(v[obj]);
            highs[obj] = highs[obj].max(v[obj]);
        }
    }

    let score = |v: &[f64; OBJECTIVE_COUNT]| -> f64 {
        (0..OBJECTIVE_COUNT)
            .map(|obj| {
                let span = highs[obj] - lows[obj];
                if span <= 0.0 {
                    0.0
                } else {
                    (v[obj] - lows[obj]) / span
                }
            })
            .sum()
    };

    (0..vectors.len()).min_by(|&a, &b| score(&vectors[a]).total_cmp(&score(&vectors[b])))
}
