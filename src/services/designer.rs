// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Suggestion engine for new trial conditions.
//!
//! Two phases, both reproducible from the experiment seed:
//!
//! 1. **Space-filling**: the first `exploration_trials` suggestions come
//!    from a Latin hypercube design generated wholly from the seed; a trial's
//!    index selects its row, so batch sizes never change the sequence.
//! 2. **Refinement**: later suggestions perturb a parent drawn from the
//!    current feasible Pareto front (all completed trials if none are
//!    feasible), preferring isolated front members by crowding distance.

use crate::models::{Conditions, Experiment, ParameterSpace, Trial, TrialOrigin};
use crate::services::pareto;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Gaussian perturbation scale as a fraction of each bound span.
const PERTURBATION_SCALE: f64 = 0.1;

/// Stateless suggestion engine.
#[derive(Debug, Default, Clone)]
pub struct DesignService;

impl DesignService {
    pub fn new() -> Self {
        Self
    }

    /// Generate `count` suggestions starting at `start_index`.
    ///
    /// `history` must hold every existing trial of the experiment; only
    /// completed trials influence refinement.
    pub fn suggest(
        &self,
        experiment: &Experiment,
        history: &[Trial],
        start_index: u32,
        count: usize,
    ) -> Vec<(Conditions, TrialOrigin)> {
        let design = latin_hypercube(experiment.seed, experiment.exploration_trials as usize);

        (0..count)
            .map(|offset| {
                let index = start_index + offset as u32;
                if (index as usize) < design.len() {
                    let conditions = map_to_space(&design[index as usize], &experiment.space);
                    (conditions, TrialOrigin::SpaceFilling)
                } else {
                    self.refine(experiment, history, index)
                }
            })
            .collect()
    }

    /// One refinement suggestion for the given trial index.
    fn refine(
        &self,
        experiment: &Experiment,
        history: &[Trial],
        index: u32,
    ) -> (Conditions, TrialOrigin) {
        let mut rng = StdRng::seed_from_u64(experiment.seed.wrapping_add(index as u64));

        let completed: Vec<&Trial> = history
            .iter()
            .filter(|t| t.is_completed() && t.measurements.is_some())
            .collect();

        // Nothing to learn from yet; keep exploring.
        if completed.is_empty() {
            let conditions = uniform_sample(&experiment.space, &mut rng);
            return (conditions, TrialOrigin::SpaceFilling);
        }

        let feasible: Vec<&Trial> = completed
            .iter()
            .filter(|t| t.feasible == Some(true))
            .copied()
            .collect();
        let pool: &[&Trial] = if feasible.is_empty() { &completed } else { &feasible };

        let vectors: Vec<_> = pool
            .iter()
            .map(|t| pareto::objective_vector(t.measurements.as_ref().unwrap()))
            .collect();
        let front = pareto::pareto_front(&vectors);
        let front_vectors: Vec<_> = front.iter().map(|&i| vectors[i]).collect();
        let crowding = pareto::crowding_distances(&front_vectors);

        // Binary tournament on crowding distance.
        let a = rng.random_range(0..front.len());
        let b = rng.random_range(0..front.len());
        let winner = if crowding[a] >= crowding[b] { a } else { b };
        let parent = pool[front[winner]];

        let free = parent.conditions.free_parameters();
        let dims = experiment.space.dimensions();
        let mut perturbed = [0.0_f64; 4];
        for d in 0..4 {
            let step = gaussian(&mut rng) * PERTURBATION_SCALE * dims[d].span();
            perturbed[d] = dims[d].clamp(free[d] + step);
        }

        (
            Conditions::new(perturbed[0], perturbed[1], perturbed[2], perturbed[3]),
            TrialOrigin::ParetoRefinement,
        )
    }
}

/// Latin hypercube design on the unit cube, one row per trial index.
///
/// Pure function of `(seed, n)` so every caller sees the same design.
fn latin_hypercube(seed: u64, n: usize) -> Vec<[f64; 4]> {
    if n == 0 {
        return Vec::new();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = vec![[0.0_f64; 4]; n];

    for d in 0..4 {
        let mut strata: Vec<usize> = (0..n).collect();
        strata.shuffle(&mut rng);
        for (row, stratum) in strata.iter().enumerate() {
            let jitter: f64 = rng.random();
            points[row][d] = (*stratum as f64 + jitter) / n as f64;
        }
    }
    points
}

/// Map a unit-cube point into an experiment's bounds.
fn map_to_space(point: &[f64; 4], space: &ParameterSpace) -> Conditions {
    let dims = space.dimensions();
    Conditions::new(
        dims[0].lerp(point[0]),
        dims[1].lerp(point[1]),
        dims[2].lerp(point[2]),
        dims[3].lerp(point[3]),
    )
}

fn uniform_sample(space: &ParameterSpace, rng: &mut StdRng) -> Conditions {
    let dims = space.dimensions();
    let mut values = [0.0_f64; 4];
    for d in 0..4 {
        values[d] = dims[d].lerp(rng.random());
    }
    Conditions::new(values[0], values[1], values[2], values[3])
}

/// Standard normal draw via Box-Muller (`rand_distr` is not a dependency).
fn gaussian(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.random::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}
