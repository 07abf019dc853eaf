// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trial attachment, listing, and lifecycle routes.

use crate::error::{AppError, Result};
use crate::models::{Measurements, Trial, TrialOrigin, TrialStatus};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Trial routes (require API key auth).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/experiments/{id}/trials",
            post(attach_trial).get(list_trials),
        )
        .route("/api/trials/{id}/complete", post(complete_trial))
        .route("/api/trials/{id}/abandon", post(abandon_trial))
}

// ─── Manual Attachment ───────────────────────────────────────

/// Client-chosen conditions for a manual trial.
///
/// Only the free parameters appear; the organic fraction is derived
/// server-side so the composition constraint cannot be violated.
#[derive(Deserialize)]
pub struct AttachTrialRequest {
    pub aqueous_fraction: f64,
    pub stirring_speed_rpm: f64,
    pub stirring_time_s: f64,
    pub temperature_c: f64,
}

/// Attach a trial at explicit conditions.
async fn attach_trial(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<AttachTrialRequest>,
) -> Result<Json<Trial>> {
    let experiment = state
        .store
        .get_experiment(id)
        .ok_or_else(|| AppError::NotFound(format!("Experiment {id} not found")))?;
    if !experiment.is_active() {
        return Err(AppError::Conflict(
            "Experiment is archived; no new trials".to_string(),
        ));
    }

    let conditions = crate::models::Conditions::new(
        request.aqueous_fraction,
        request.stirring_speed_rpm,
        request.stirring_time_s,
        request.temperature_c,
    );
    conditions
        .validate_in(&experiment.space)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let index = state.store.reserve_trial_indices(id, 1);
    let trial = Trial::suggested(id, index, conditions, TrialOrigin::Manual, chrono::Utc::now());
    state.store.insert_trials(&[trial.clone()]);

    tracing::info!(experiment_id = %id, trial_id = %trial.id, index, "Attached manual trial");

    Ok(Json(trial))
}

// ─── Listing ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct TrialsQuery {
    /// Filter by lifecycle status
    status: Option<TrialStatus>,
    /// Cursor for forward pagination (opaque token).
    cursor: Option<String>,
    /// Pagination: items per page
    #[serde(default = "default_per_page")]
    per_page: u32,
}

fn default_per_page() -> u32 {
    50
}

const MAX_PER_PAGE: u32 = 100;

fn parse_cursor(cursor: Option<&str>) -> Result<Option<u32>> {
    cursor
        .map(|raw| {
            let invalid_cursor =
                || AppError::BadRequest("Invalid 'cursor' parameter".to_string());

            let decoded = URL_SAFE_NO_PAD.decode(raw).map_err(|_| invalid_cursor())?;
            let decoded_str = std::str::from_utf8(&decoded).map_err(|_| invalid_cursor())?;
            decoded_str.parse::<u32>().map_err(|_| invalid_cursor())
        })
        .transpose()
}

fn encode_cursor(index: u32) -> String {
    URL_SAFE_NO_PAD.encode(index.to_string())
}

#[derive(Serialize)]
pub struct TrialsResponse {
    pub trials: Vec<Trial>,
    pub per_page: u32,
    /// Total number of trials matching the query.
    /// This is 0 if `next_cursor` is present, as the exact total is not
    /// known without walking every page.
    pub total: u32,
    pub next_cursor: Option<String>,
}

/// List an experiment's trials in index order.
async fn list_trials(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(params): Query<TrialsQuery>,
) -> Result<Json<TrialsResponse>> {
    state
        .store
        .get_experiment(id)
        .ok_or_else(|| AppError::NotFound(format!("Experiment {id} not found")))?;

    let limit = params.per_page.min(MAX_PER_PAGE) as usize;
    if limit == 0 {
        return Err(AppError::BadRequest(
            "'per_page' must be greater than 0".to_string(),
        ));
    }
    let after_index = parse_cursor(params.cursor.as_deref())?;

    let mut trials: Vec<Trial> = state
        .store
        .trials_for_experiment(id)
        .into_iter()
        .filter(|t| params.status.is_none_or(|s| t.status == s))
        .filter(|t| after_index.is_none_or(|after| t.index > after))
        .collect();

    let has_more = trials.len() > limit;
    trials.truncate(limit);

    let next_cursor = if has_more {
        trials.last().map(|t| encode_cursor(t.index))
    } else {
        None
    };
    let total = if next_cursor.is_some() {
        0
    } else {
        trials.len() as u32
    };

    Ok(Json(TrialsResponse {
        trials,
        per_page: limit as u32,
        total,
        next_cursor,
    }))
}

// ─── Lifecycle ───────────────────────────────────────────────

/// Request body for reporting bench results.
#[derive(Deserialize)]
pub struct CompleteTrialRequest {
    pub measurements: Measurements,
}

/// Report measurements for a pending trial.
async fn complete_trial(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<CompleteTrialRequest>,
) -> Result<Json<Trial>> {
    request
        .measurements
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let trial = state
        .store
        .get_trial(id)
        .ok_or_else(|| AppError::NotFound(format!("Trial {id} not found")))?;
    let experiment = state
        .store
        .get_experiment(trial.experiment_id)
        .ok_or_else(|| AppError::NotFound("Experiment not found".to_string()))?;
    if !experiment.is_active() {
        return Err(AppError::Conflict(
            "Experiment is archived; no new completions".to_string(),
        ));
    }

    let feasible = experiment.thresholds.is_met(&request.measurements);
    let completed =
        state
            .store
            .complete_trial(id, request.measurements, feasible, chrono::Utc::now())?;

    tracing::info!(
        trial_id = %id,
        experiment_id = %experiment.id,
        feasible,
        "Completed trial"
    );

    Ok(Json(completed))
}

/// Request body for abandoning a trial.
#[derive(Deserialize, Default)]
pub struct AbandonTrialRequest {
    /// Optional operator note (e.g. "emulsion never settled")
    #[serde(default)]
    pub note: Option<String>,
}

/// Abandon a pending trial.
///
/// Allowed even on archived experiments: giving up on a stale pending
/// trial adds no data.
async fn abandon_trial(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<AbandonTrialRequest>,
) -> Result<Json<Trial>> {
    let abandoned = state
        .store
        .abandon_trial(id, request.note, chrono::Utc::now())?;

    tracing::info!(trial_id = %id, "Abandoned trial");

    Ok(Json(abandoned))
}
