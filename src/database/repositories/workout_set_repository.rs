// ABOUTME: Workout set repository implementation backed by SQLite
// ABOUTME: Persists the set kind discriminator and the volume computed at validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;

use setbook_core::models::{ValidSet, WorkoutSet};

use super::WorkoutSetRepository;
use crate::database::{Database, DatabaseError};

/// SQLite implementation of `WorkoutSetRepository`
pub struct WorkoutSetRepositoryImpl {
    db: Database,
}

impl WorkoutSetRepositoryImpl {
    /// Create a new `WorkoutSetRepository` with the given database connection
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WorkoutSetRepository for WorkoutSetRepositoryImpl {
    async fn create(&self, set: &ValidSet) -> Result<WorkoutSet, DatabaseError> {
        self.db.create_workout_set(set).await
    }

    async fn update(&self, id: i64, set: &ValidSet) -> Result<WorkoutSet, DatabaseError> {
        self.db.update_workout_set(id, set).await
    }

    async fn get(&self, id: i64) -> Result<Option<WorkoutSet>, DatabaseError> {
        self.db.get_workout_set(id).await
    }

    async fn list_for_workout(&self, workout_id: i64) -> Result<Vec<WorkoutSet>, DatabaseError> {
        self.db.list_sets_for_workout(workout_id).await
    }

    async fn count_for_entry(&self, workout_exercise_id: i64) -> Result<i64, DatabaseError> {
        self.db.count_workout_sets(workout_exercise_id).await
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        self.db.delete_workout_set(id).await
    }
}
