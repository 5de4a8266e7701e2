// ABOUTME: Domain entities for the workout log and their draft validation
// ABOUTME: Re-exports users, exercises, workouts, workout exercises, and sets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Domain Models
//!
//! Entities form a strict containment hierarchy: a [`Workout`] owns its
//! [`WorkoutExercise`] entries, which own their [`WorkoutSet`]s. An
//! [`Exercise`] is shared and only referenced.
//!
//! Each entity has a `*Draft` carrying caller input. `validate()` checks
//! every rule and returns either a `Valid*` value ready to persist or the full
//! list of violations. Aggregates (`total_volume`) are computed from loaded
//! children and never stored.

mod exercise;
mod user;
mod workout;
mod workout_exercise;
mod workout_set;

pub use exercise::{BodyPart, Exercise, ExerciseDraft, Laterality, ValidExercise};
pub use user::{
    is_valid_email, sanitize_email, sanitize_image_url, sanitize_name, User, UserFieldPolicy,
    UserProfile,
};
pub use workout::{ValidWorkout, Workout, WorkoutDetail, WorkoutDraft};
pub use workout_exercise::{
    total_volume, ValidWorkoutExercise, WorkoutExercise, WorkoutExerciseDetail,
    WorkoutExerciseDraft,
};
pub use workout_set::{
    strength_volume, SetAttributes, SetDraft, SetKind, SetMetrics, ValidSet, WorkoutSet,
};
