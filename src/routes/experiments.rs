// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Experiment lifecycle, suggestion, report, and auto-run routes.

use crate::error::{AppError, Result};
use crate::models::{
    Experiment, ExperimentStatus, ParameterSpace, Thresholds, Trial, TrialOrigin, TrialStatus,
    experiment::DEFAULT_EXPLORATION_TRIALS,
};
use crate::services::{pareto, simulator};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Experiment routes (require API key auth).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/experiments",
            post(create_experiment).get(list_experiments),
        )
        .route(
            "/api/experiments/{id}",
            get(get_experiment).delete(delete_experiment),
        )
        .route("/api/experiments/{id}/archive", post(archive_experiment))
        .route("/api/experiments/{id}/suggestions", post(suggest_trials))
        .route("/api/experiments/{id}/report", get(get_report))
        .route("/api/experiments/{id}/autorun", post(autorun))
}

// ─── Create / Fetch / List ───────────────────────────────────

/// Request body for creating an experiment.
///
/// Bounds and thresholds default to the full rig domain and the
/// process-development go/no-go gates; the seed defaults to a random one
/// (recorded on the experiment so the run stays reproducible).
#[derive(Deserialize, Validate)]
pub struct CreateExperimentRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub space: Option<ParameterSpace>,
    pub thresholds: Option<Thresholds>,
    pub seed: Option<u64>,
    #[validate(range(min = 1, max = 4096))]
    pub exploration_trials: Option<u32>,
}

/// Create a new experiment.
async fn create_experiment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateExperimentRequest>,
) -> Result<Json<Experiment>> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let space = request.space.unwrap_or_default();
    space
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let thresholds = request.thresholds.unwrap_or_default();
    thresholds
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let now = chrono::Utc::now();
    let experiment = Experiment {
        id: Uuid::new_v4(),
        name: request.name,
        description: request.description,
        space,
        thresholds,
        seed: request.seed.unwrap_or_else(rand::random),
        exploration_trials: request
            .exploration_trials
            .unwrap_or(DEFAULT_EXPLORATION_TRIALS),
        status: ExperimentStatus::Active,
        created_at: now,
        updated_at: now,
    };

    tracing::info!(
        experiment_id = %experiment.id,
        name = %experiment.name,
        seed = experiment.seed,
        "Created experiment"
    );

    state.store.insert_experiment(experiment.clone());
    Ok(Json(experiment))
}

#[derive(Deserialize)]
struct ListExperimentsQuery {
    /// Filter by lifecycle status
    status: Option<ExperimentStatus>,
}

#[derive(Serialize)]
pub struct ExperimentsResponse {
    pub experiments: Vec<Experiment>,
}

/// List experiments, newest first.
async fn list_experiments(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListExperimentsQuery>,
) -> Result<Json<ExperimentsResponse>> {
    let experiments = state.store.list_experiments(params.status);
    Ok(Json(ExperimentsResponse { experiments }))
}

/// Fetch one experiment.
async fn get_experiment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Experiment>> {
    let experiment = state
        .store
        .get_experiment(id)
        .ok_or_else(|| AppError::NotFound(format!("Experiment {id} not found")))?;
    Ok(Json(experiment))
}

// ─── Archive / Delete ────────────────────────────────────────

/// Archive an experiment; it becomes read-only.
async fn archive_experiment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Experiment>> {
    let experiment =
        state
            .store
            .set_experiment_status(id, ExperimentStatus::Archived, chrono::Utc::now())?;
    tracing::info!(experiment_id = %id, "Archived experiment");
    Ok(Json(experiment))
}

/// Response for experiment deletion.
#[derive(Serialize)]
pub struct DeleteExperimentResponse {
    pub success: bool,
}

/// Delete an experiment and every trial that belongs to it.
async fn delete_experiment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteExperimentResponse>> {
    state.store.delete_experiment(id)?;
    tracing::info!(experiment_id = %id, "Deleted experiment");
    Ok(Json(DeleteExperimentResponse { success: true }))
}

// ─── Suggestions ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SuggestRequest {
    /// Number of new pending trials to generate
    #[serde(default = "default_suggestion_count")]
    pub count: usize,
}

fn default_suggestion_count() -> usize {
    1
}

#[derive(Serialize)]
pub struct TrialsCreatedResponse {
    pub trials: Vec<Trial>,
}

/// Ask the engine for new trial conditions.
///
/// Each request reserves a disjoint index range, so concurrent clients get
/// distinct suggestions from the same seeded sequence.
async fn suggest_trials(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<SuggestRequest>,
) -> Result<Json<TrialsCreatedResponse>> {
    if request.count == 0 || request.count > state.config.max_suggestion_batch {
        return Err(AppError::BadRequest(format!(
            "'count' must be between 1 and {}",
            state.config.max_suggestion_batch
        )));
    }

    let experiment = state
        .store
        .get_experiment(id)
        .ok_or_else(|| AppError::NotFound(format!("Experiment {id} not found")))?;
    if !experiment.is_active() {
        return Err(AppError::Conflict(
            "Experiment is archived; no new suggestions".to_string(),
        ));
    }

    let history = state.store.trials_for_experiment(id);
    let start_index = state.store.reserve_trial_indices(id, request.count as u32);

    let now = chrono::Utc::now();
    let trials: Vec<Trial> = state
        .designer
        .suggest(&experiment, &history, start_index, request.count)
        .into_iter()
        .enumerate()
        .map(|(offset, (conditions, origin))| {
            Trial::suggested(id, start_index + offset as u32, conditions, origin, now)
        })
        .collect();

    state.store.insert_trials(&trials);

    tracing::debug!(
        experiment_id = %id,
        start_index,
        count = trials.len(),
        "Generated suggestions"
    );

    Ok(Json(TrialsCreatedResponse { trials }))
}

// ─── Report ──────────────────────────────────────────────────

/// Trial counts broken down by status and origin.
#[derive(Serialize)]
pub struct TrialCounts {
    pub total: u32,
    pub pending: u32,
    pub completed: u32,
    pub abandoned: u32,
    pub feasible: u32,
    pub space_filling: u32,
    pub pareto_refinement: u32,
    pub manual: u32,
}

/// Best observed value per objective over completed trials.
#[derive(Serialize)]
pub struct BestObserved {
    pub recovery_pct: f64,
    pub purity_pct: f64,
    pub separation_pct: f64,
    pub emulsion_pct: f64,
    pub total_time_s: f64,
}

/// Pareto report for one experiment.
#[derive(Serialize)]
pub struct ReportResponse {
    pub experiment_id: Uuid,
    pub name: String,
    pub status: ExperimentStatus,
    pub thresholds: Thresholds,
    pub counts: TrialCounts,
    pub best_observed: Option<BestObserved>,
    /// Non-dominated completed trials (feasible ones when any exist)
    pub pareto_front: Vec<Trial>,
    pub best_compromise: Option<Trial>,
}

/// Summarize an experiment: counts, per-objective bests, the current Pareto
/// front, and the best-compromise trial.
async fn get_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReportResponse>> {
    let experiment = state
        .store
        .get_experiment(id)
        .ok_or_else(|| AppError::NotFound(format!("Experiment {id} not found")))?;

    let trials = state.store.trials_for_experiment(id);

    let mut counts = TrialCounts {
        total: trials.len() as u32,
        pending: 0,
        completed: 0,
        abandoned: 0,
        feasible: 0,
        space_filling: 0,
        pareto_refinement: 0,
        manual: 0,
    };
    for trial in &trials {
        match trial.status {
            TrialStatus::Pending => counts.pending += 1,
            TrialStatus::Completed => counts.completed += 1,
            TrialStatus::Abandoned => counts.abandoned += 1,
        }
        match trial.origin {
            TrialOrigin::SpaceFilling => counts.space_filling += 1,
            TrialOrigin::ParetoRefinement => counts.pareto_refinement += 1,
            TrialOrigin::Manual => counts.manual += 1,
        }
        if trial.feasible == Some(true) {
            counts.feasible += 1;
        }
    }

    let completed: Vec<&Trial> = trials
        .iter()
        .filter(|t| t.is_completed() && t.measurements.is_some())
        .collect();

    let best_observed = completed.iter().map(|t| t.measurements.unwrap()).fold(
        None::<BestObserved>,
        |best, m| {
            Some(match best {
                None => BestObserved {
                    recovery_pct: m.recovery_pct,
                    purity_pct: m.purity_pct,
                    separation_pct: m.separation_pct,
                    emulsion_pct: m.emulsion_pct,
                    total_time_s: m.total_time_s,
                },
                Some(b) => BestObserved {
                    recovery_pct: b.recovery_pct.max(m.recovery_pct),
                    purity_pct: b.purity_pct.max(m.purity_pct),
                    separation_pct: b.separation_pct.max(m.separation_pct),
                    emulsion_pct: b.emulsion_pct.min(m.emulsion_pct),
                    total_time_s: b.total_time_s.min(m.total_time_s),
                },
            })
        },
    );

    // Feasible trials define the front when any exist; otherwise rank
    // everything completed so early campaigns still get a picture.
    let feasible: Vec<&Trial> = completed
        .iter()
        .filter(|t| t.feasible == Some(true))
        .copied()
        .collect();
    let pool: &[&Trial] = if feasible.is_empty() {
        &completed
    } else {
        &feasible
    };

    let vectors: Vec<_> = pool
        .iter()
        .map(|t| pareto::objective_vector(t.measurements.as_ref().unwrap()))
        .collect();
    let pareto_front: Vec<Trial> = pareto::pareto_front(&vectors)
        .into_iter()
        .map(|i| pool[i].clone())
        .collect();
    let best_compromise = pareto::best_compromise(&vectors).map(|i| pool[i].clone());

    Ok(Json(ReportResponse {
        experiment_id: experiment.id,
        name: experiment.name,
        status: experiment.status,
        thresholds: experiment.thresholds,
        counts,
        best_observed,
        pareto_front,
        best_compromise,
    }))
}

// ─── Auto-run ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AutorunRequest {
    /// Number of suggest-simulate-complete rounds to run
    #[serde(default = "default_autorun_trials")]
    pub trials: usize,
}

fn default_autorun_trials() -> usize {
    30
}

#[derive(Serialize)]
pub struct AutorunResponse {
    pub completed: usize,
    pub trials: Vec<Trial>,
}

/// Run the suggest-simulate-complete loop against the bench model.
///
/// Trials are completed one at a time so refinement suggestions see every
/// earlier result, matching how a bench campaign would proceed.
async fn autorun(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<AutorunRequest>,
) -> Result<Json<AutorunResponse>> {
    if request.trials == 0 || request.trials > state.config.max_autorun_trials {
        return Err(AppError::BadRequest(format!(
            "'trials' must be between 1 and {}",
            state.config.max_autorun_trials
        )));
    }

    let experiment = state
        .store
        .get_experiment(id)
        .ok_or_else(|| AppError::NotFound(format!("Experiment {id} not found")))?;
    if !experiment.is_active() {
        return Err(AppError::Conflict(
            "Experiment is archived; no new trials".to_string(),
        ));
    }

    let mut trials = Vec::with_capacity(request.trials);
    for _ in 0..request.trials {
        let history = state.store.trials_for_experiment(id);
        let index = state.store.reserve_trial_indices(id, 1);

        let (conditions, origin) = state
            .designer
            .suggest(&experiment, &history, index, 1)
            .pop()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("empty suggestion batch")))?;

        let trial = Trial::suggested(id, index, conditions, origin, chrono::Utc::now());
        state.store.insert_trials(&[trial.clone()]);

        let measurements = simulator::simulate(&conditions);
        let feasible = experiment.thresholds.is_met(&measurements);
        let completed =
            state
                .store
                .complete_trial(trial.id, measurements, feasible, chrono::Utc::now())?;
        trials.push(completed);
    }

    tracing::info!(
        experiment_id = %id,
        completed = trials.len(),
        "Auto-run finished"
    );

    Ok(Json(AutorunResponse {
        completed: trials.len(),
        trials,
    }))
}
