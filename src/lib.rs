// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Extraction-Planner: design liquid-liquid extraction experiments
//!
//! This crate provides the backend API for an ask/tell experiment-design
//! loop: clients create an experiment over the extraction parameter space,
//! request suggested trial conditions, report measured objectives, and read
//! out the Pareto front and a best-compromise recommendation.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Store;
use services::DesignService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub designer: DesignService,
}
