// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Experiment record: a named search over the extraction parameter space.

use crate::models::objectives::Thresholds;
use crate::models::space::ParameterSpace;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default size of the space-filling phase before Pareto-guided refinement
/// kicks in.
pub const DEFAULT_EXPLORATION_TRIALS: u32 = 16;

/// A stored experiment definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experiment {
    /// Experiment ID (also the storage key)
    pub id: Uuid,
    /// Human-readable name (e.g. "API-1403 workup screen")
    pub name: String,
    /// Optional free-text description
    pub description: Option<String>,
    /// Search bounds for the free parameters
    pub space: ParameterSpace,
    /// Go/no-go thresholds for feasibility
    pub thresholds: Thresholds,
    /// RNG seed; the suggestion sequence is reproducible from this
    pub seed: u64,
    /// Number of space-filling trials before refinement
    pub exploration_trials: u32,
    /// Lifecycle status
    pub status: ExperimentStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Experiment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentStatus {
    /// Accepting suggestions and trial results
    Active,
    /// Read-only: no new suggestions or completions
    Archived,
}

impl Experiment {
    pub fn is_active(&self) -> bool {
        self.status == ExperimentStatus::Active
    }
}
