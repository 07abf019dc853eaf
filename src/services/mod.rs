// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Business logic services.

pub mod designer;
pub mod pareto;
pub mod simulator;

pub use designer::DesignService;
