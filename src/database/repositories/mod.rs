// ABOUTME: Repository traits forming the persistence interface of the workout log
// ABOUTME: Services depend on these traits; SQLite implementations wrap Database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Repositories
//!
//! One trait per aggregate. Implementations must enforce the same
//! uniqueness, cascade and restrict rules as the SQLite schema and report
//! violations as [`DatabaseError::Validation`] or
//! [`DatabaseError::RestrictedDeletion`].

mod exercise_repository;
mod user_repository;
mod workout_exercise_repository;
mod workout_repository;
mod workout_set_repository;

use async_trait::async_trait;

use setbook_core::models::{
    Exercise, User, UserProfile, ValidExercise, ValidSet, ValidWorkout, ValidWorkoutExercise,
    Workout, WorkoutExercise, WorkoutSet,
};

use super::DatabaseError;

pub use exercise_repository::ExerciseRepositoryImpl;
pub use user_repository::UserRepositoryImpl;
pub use workout_exercise_repository::WorkoutExerciseRepositoryImpl;
pub use workout_repository::WorkoutRepositoryImpl;
pub use workout_set_repository::WorkoutSetRepositoryImpl;

/// Users keyed by identity provider subject id
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user for a new subject id
    async fn create(&self, firebase_uid: &str, profile: &UserProfile)
        -> Result<User, DatabaseError>;

    /// Overwrite the profile fields of an existing user
    async fn update_profile(&self, user_id: i64, profile: &UserProfile)
        -> Result<User, DatabaseError>;

    /// Get a user by row id
    async fn get(&self, user_id: i64) -> Result<Option<User>, DatabaseError>;

    /// Get a user by subject id
    async fn get_by_firebase_uid(&self, firebase_uid: &str) -> Result<Option<User>, DatabaseError>;
}

/// Shared exercise catalog
#[async_trait]
pub trait ExerciseRepository: Send + Sync {
    /// Insert an exercise
    async fn create(&self, exercise: &ValidExercise) -> Result<Exercise, DatabaseError>;

    /// Replace an exercise's attributes
    async fn update(&self, id: i64, exercise: &ValidExercise) -> Result<Exercise, DatabaseError>;

    /// Get an exercise by id
    async fn get(&self, id: i64) -> Result<Option<Exercise>, DatabaseError>;

    /// Every exercise, newest first
    async fn list(&self) -> Result<Vec<Exercise>, DatabaseError>;

    /// Whether any workout entry references the exercise
    async fn is_referenced(&self, id: i64) -> Result<bool, DatabaseError>;

    /// Whether an exercise other than `except_id` already uses `name`
    async fn name_taken(&self, name: &str, except_id: Option<i64>)
        -> Result<bool, DatabaseError>;

    /// Delete an unreferenced exercise
    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;
}

/// Workouts, always scoped to their owner
#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    /// Create a workout
    async fn create(&self, user_id: i64, workout: &ValidWorkout) -> Result<Workout, DatabaseError>;

    /// Replace a workout's attributes
    async fn update(
        &self,
        user_id: i64,
        id: i64,
        workout: &ValidWorkout,
    ) -> Result<Workout, DatabaseError>;

    /// Get a workout owned by `user_id`
    async fn get(&self, user_id: i64, id: i64) -> Result<Option<Workout>, DatabaseError>;

    /// A user's workouts, newest first
    async fn list(&self, user_id: i64) -> Result<Vec<Workout>, DatabaseError>;

    /// Delete a workout and everything it owns
    async fn delete(&self, user_id: i64, id: i64) -> Result<(), DatabaseError>;
}

/// Exercise entries within workouts
#[async_trait]
pub trait WorkoutExerciseRepository: Send + Sync {
    /// Add an entry to a workout
    async fn create(
        &self,
        workout_id: i64,
        entry: &ValidWorkoutExercise,
    ) -> Result<WorkoutExercise, DatabaseError>;

    /// Replace an entry's attributes
    async fn update(
        &self,
        id: i64,
        entry: &ValidWorkoutExercise,
    ) -> Result<WorkoutExercise, DatabaseError>;

    /// Get an entry by id
    async fn get(&self, id: i64) -> Result<Option<WorkoutExercise>, DatabaseError>;

    /// A workout's entries by position
    async fn list_for_workout(&self, workout_id: i64)
        -> Result<Vec<WorkoutExercise>, DatabaseError>;

    /// Delete an entry and its sets
    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;
}

/// Sets within workout entries
#[async_trait]
pub trait WorkoutSetRepository: Send + Sync {
    /// Insert a set with its computed volume
    async fn create(&self, set: &ValidSet) -> Result<WorkoutSet, DatabaseError>;

    /// Replace a set's attributes and volume
    async fn update(&self, id: i64, set: &ValidSet) -> Result<WorkoutSet, DatabaseError>;

    /// Get a set by id
    async fn get(&self, id: i64) -> Result<Option<WorkoutSet>, DatabaseError>;

    /// Every set in a workout, by entry position then set position
    async fn list_for_workout(&self, workout_id: i64) -> Result<Vec<WorkoutSet>, DatabaseError>;

    /// Number of sets under one entry
    async fn count_for_entry(&self, workout_exercise_id: i64) -> Result<i64, DatabaseError>;

    /// Delete a set
    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;
}
