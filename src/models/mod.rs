// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod experiment;
pub mod objectives;
pub mod space;
pub mod trial;

pub use experiment::{Experiment, ExperimentStatus};
pub use objectives::{Measurements, Thresholds};
pub use space::{Conditions, ParameterBounds, ParameterSpace};
pub use trial::{Trial, TrialOrigin, TrialStatus};
