// ABOUTME: Domain service layer combining repository lookups with core validation
// ABOUTME: Protocol-agnostic exercise catalog and workout logging operations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Services validate drafts with `setbook_core`, check cross-entity rules
//! that need the store (ownership, existence, kind compatibility), and
//! persist through the repository traits. They return [`AppError`] so any
//! transport can map failures uniformly.
//!
//! [`AppError`]: setbook_core::errors::AppError

/// Exercise definitions: create, update, list, restricted delete
pub mod exercise_catalog;

/// Workouts, their exercise entries, and sets
pub mod workouts;

pub use exercise_catalog::ExerciseCatalog;
pub use workouts::WorkoutService;
