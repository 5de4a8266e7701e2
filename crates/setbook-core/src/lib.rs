// ABOUTME: Core domain types for the Setbook workout logging API
// ABOUTME: Foundation crate with error handling, validation rules, and training volume aggregation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Setbook Core
//!
//! Pure domain layer for the Setbook workout logging API. Nothing in this crate
//! performs I/O: store lookups (uniqueness, references) happen in the service
//! layer of the main crate and feed their findings back into the same
//! [`errors::ValidationErrors`] collection used here.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode`, the validation error collection, and
//!   domain-specific auth and database errors
//! - **constants**: Field limits and storage discriminators
//! - **models**: Users, exercises, workouts, workout exercises, and the
//!   strength/cardio set hierarchy with volume aggregation

/// Unified error handling system with standard error codes
pub mod errors;

/// Field limits and storage discriminators
pub mod constants;

/// Core data models (User, Exercise, Workout, WorkoutExercise, WorkoutSet)
pub mod models;
