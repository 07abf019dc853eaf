// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Concurrent in-memory store with typed operations.
//!
//! Experiments and trials live in `DashMap`s; when a snapshot path is
//! configured the whole store is rewritten to disk (temp file + rename)
//! after each mutation and reloaded at startup. Bench-scale trial volumes
//! make the full rewrite cheap.

use crate::models::{Experiment, ExperimentStatus, Measurements, Trial, TrialStatus};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

/// Store for experiments and their trials.
pub struct Store {
    experiments: DashMap<Uuid, Experiment>,
    trials: DashMap<Uuid, Trial>,
    /// Trial IDs per experiment, append-only; readers sort by trial index.
    trial_order: DashMap<Uuid, Vec<Uuid>>,
    /// Next free trial index per experiment.
    next_index: DashMap<Uuid, u32>,
    snapshot_path: Option<PathBuf>,
}

/// On-disk snapshot format.
#[derive(Serialize, Deserialize)]
struct Snapshot {
    experiments: Vec<Experiment>,
    trials: Vec<Trial>,
}

impl Store {
    /// Create an empty store with no persistence.
    pub fn new() -> Self {
        Self {
            experiments: DashMap::new(),
            trials: DashMap::new(),
            trial_order: DashMap::new(),
            next_index: DashMap::new(),
            snapshot_path: None,
        }
    }

    /// Open a store, loading the snapshot file when it exists.
    pub fn open(snapshot_path: Option<PathBuf>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        store.snapshot_path = snapshot_path;

        if let Some(path) = store.snapshot_path.clone() {
            if path.exists() {
                let data =
                    fs::read_to_string(&path).map_err(|e| StoreError::IoError(e.to_string()))?;
                let snapshot: Snapshot =
                    serde_json::from_str(&data).map_err(|e| StoreError::ParseError(e.to_string()))?;
                store.load(snapshot);
                tracing::info!(
                    path = %path.display(),
                    experiments = store.experiments.len(),
                    trials = store.trials.len(),
                    "Loaded snapshot"
                );
            }
        }
        Ok(store)
    }

    fn load(&self, snapshot: Snapshot) {
        for experiment in snapshot.experiments {
            self.experiments.insert(experiment.id, experiment);
        }
        let mut trials = snapshot.trials;
        trials.sort_by_key(|t| (t.experiment_id, t.index));
        for trial in trials {
            self.trial_order
                .entry(trial.experiment_id)
                .or_default()
                .push(trial.id);
            let mut next = self.next_index.entry(trial.experiment_id).or_insert(0);
            *next = (*next).max(trial.index + 1);
            drop(next);
            self.trials.insert(trial.id, trial);
        }
    }

    // ─── Experiment Operations ───────────────────────────────────

    pub fn insert_experiment(&self, experiment: Experiment) {
        self.experiments.insert(experiment.id, experiment);
        self.persist();
    }

    pub fn get_experiment(&self, id: Uuid) -> Option<Experiment> {
        self.experiments.get(&id).map(|e| e.clone())
    }

    /// List experiments, newest first, optionally filtered by status.
    pub fn list_experiments(&self, status: Option<ExperimentStatus>) -> Vec<Experiment> {
        let mut experiments: Vec<Experiment> = self
            .experiments
            .iter()
            .filter(|e| status.is_none_or(|s| e.status == s))
            .map(|e| e.clone())
            .collect();
        experiments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        experiments
    }

    /// Change an experiment's lifecycle status.
    pub fn set_experiment_status(
        &self,
        id: Uuid,
        status: ExperimentStatus,
        now: DateTime<Utc>,
    ) -> Result<Experiment, StoreError> {
        let updated = {
            let mut experiment = self
                .experiments
                .get_mut(&id)
                .ok_or(StoreError::ExperimentNotFound)?;
            experiment.status = status;
            experiment.updated_at = now;
            experiment.clone()
        };
        self.persist();
        Ok(updated)
    }

    /// Delete an experiment and every trial that belongs to it.
    pub fn delete_experiment(&self, id: Uuid) -> Result<(), StoreError> {
        self.experiments
            .remove(&id)
            .ok_or(StoreError::ExperimentNotFound)?;

        if let Some((_, trial_ids)) = self.trial_order.remove(&id) {
            for trial_id in trial_ids {
                self.trials.remove(&trial_id);
            }
        }
        self.next_index.remove(&id);
        self.persist();
        Ok(())
    }

    // ─── Trial Operations ────────────────────────────────────────

    /// Atomically reserve `count` consecutive trial indices.
    ///
    /// Returns the first reserved index. Concurrent suggestion requests get
    /// disjoint ranges, which keeps the seeded design reproducible.
    pub fn reserve_trial_indices(&self, experiment_id: Uuid, count: u32) -> u32 {
        let mut next = self.next_index.entry(experiment_id).or_insert(0);
        let start = *next;
        *next += count;
        start
    }

    pub fn insert_trials(&self, trials: &[Trial]) {
        for trial in trials {
            self.trial_order
                .entry(trial.experiment_id)
                .or_default()
                .push(trial.id);
            self.trials.insert(trial.id, trial.clone());
        }
        self.persist();
    }

    pub fn get_trial(&self, id: Uuid) -> Option<Trial> {
        self.trials.get(&id).map(|t| t.clone())
    }

    /// Record measurements for a pending trial.
    pub fn complete_trial(
        &self,
        id: Uuid,
        measurements: Measurements,
        feasible: bool,
        now: DateTime<Utc>,
    ) -> Result<Trial, StoreError> {
        let completed = {
            let mut trial = self.trials.get_mut(&id).ok_or(StoreError::TrialNotFound)?;
            if trial.status != TrialStatus::Pending {
                return Err(StoreError::TrialNotPending {
                    status: trial.status,
                });
            }
            trial.status = TrialStatus::Completed;
            trial.measurements = Some(measurements);
            trial.feasible = Some(feasible);
            trial.completed_at = Some(now);
            trial.clone()
        };
        self.persist();
        Ok(completed)
    }

    /// Abandon a pending trial.
    pub fn abandon_trial(
        &self,
        id: Uuid,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Trial, StoreError> {
        let abandoned = {
            let mut trial = self.trials.get_mut(&id).ok_or(StoreError::TrialNotFound)?;
            if trial.status != TrialStatus::Pending {
                return Err(StoreError::TrialNotPending {
                    status: trial.status,
                });
            }
            trial.status = TrialStatus::Abandoned;
            trial.note = note;
            trial.completed_at = Some(now);
            trial.clone()
        };
        self.persist();
        Ok(abandoned)
    }

    /// Every trial of an experiment, in index order.
    pub fn trials_for_experiment(&self, experiment_id: Uuid) -> Vec<Trial> {
        let Some(trial_ids) = self.trial_order.get(&experiment_id) else {
            return Vec::new();
        };
        let mut trials: Vec<Trial> = trial_ids
            .iter()
            .filter_map(|id| self.trials.get(id).map(|t| t.clone()))
            .collect();
        trials.sort_by_key(|t| t.index);
        trials
    }

    // ─── Persistence ─────────────────────────────────────────────

    /// Rewrite the snapshot file if one is configured.
    ///
    /// Failures are logged rather than surfaced; the in-memory state is
    /// already updated and the next mutation retries the write.
    fn persist(&self) {
        let Some(path) = &self.snapshot_path else {
            return;
        };

        let mut trials: Vec<Trial> = self.trials.iter().map(|t| t.clone()).collect();
        trials.sort_by_key(|t| (t.experiment_id, t.index));
        let mut experiments: Vec<Experiment> =
            self.experiments.iter().map(|e| e.clone()).collect();
        experiments.sort_by_key(|e| e.id);

        let snapshot = Snapshot {
            experiments,
            trials,
        };

        let result = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| StoreError::ParseError(e.to_string()))
            .and_then(|data| {
                let tmp = path.with_extension("json.tmp");
                fs::write(&tmp, data).map_err(|e| StoreError::IoError(e.to_string()))?;
                fs::rename(&tmp, path).map_err(|e| StoreError::IoError(e.to_string()))
            });

        if let Err(e) = result {
            tracing::warn!(error = %e, path = %path.display(), "Failed to write snapshot");
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Experiment not found")]
    ExperimentNotFound,

    #[error("Trial not found")]
    TrialNotFound,

    #[error("Trial is {status:?}, expected pending")]
    TrialNotPending { status: TrialStatus },

    #[error("Failed to read snapshot: {0}")]
    IoError(String),

    #[error("Failed to parse snapshot: {0}")]
    ParseError(String),
}
