// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trial record: one suggested (and possibly executed) set of conditions.

use crate::models::objectives::Measurements;
use crate::models::space::Conditions;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored trial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trial {
    /// Trial ID (also the storage key)
    pub id: Uuid,
    /// Owning experiment
    pub experiment_id: Uuid,
    /// Per-experiment sequence number, 0-based and monotonically increasing
    pub index: u32,
    /// Conditions to run at the bench
    pub conditions: Conditions,
    /// How the conditions were generated
    pub origin: TrialOrigin,
    /// Lifecycle status
    pub status: TrialStatus,
    /// Reported measurements, present once completed
    pub measurements: Option<Measurements>,
    /// Whether the measurements cleared every configured threshold
    pub feasible: Option<bool>,
    /// When the trial was suggested
    pub suggested_at: DateTime<Utc>,
    /// When the trial was completed or abandoned
    pub completed_at: Option<DateTime<Utc>>,
    /// Optional operator note (e.g. abandon reason)
    pub note: Option<String>,
}

/// How a trial's conditions were generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialOrigin {
    /// Latin-hypercube exploration phase
    SpaceFilling,
    /// Perturbation of a Pareto-front parent
    ParetoRefinement,
    /// Client-supplied conditions
    Manual,
}

/// Trial lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialStatus {
    /// Suggested, awaiting bench results
    Pending,
    /// Measurements reported
    Completed,
    /// Given up without results
    Abandoned,
}

impl Trial {
    /// Build a freshly suggested trial.
    pub fn suggested(
        experiment_id: Uuid,
        index: u32,
        conditions: Conditions,
        origin: TrialOrigin,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            experiment_id,
            index,
            conditions,
            origin,
            status: TrialStatus::Pending,
            measurements: None,
            feasible: None,
            suggested_at: now,
            completed_at: None,
            note: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TrialStatus::Completed
    }
}
