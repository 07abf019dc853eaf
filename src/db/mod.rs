// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage layer (in-memory with optional JSON snapshot).

pub mod memory;

pub use memory::{Store, StoreError};
