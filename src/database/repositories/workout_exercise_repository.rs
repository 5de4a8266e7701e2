// ABOUTME: Workout exercise repository implementation backed by SQLite
// ABOUTME: Entry writes surface position and exercise collisions as taken validation errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;

use setbook_core::models::{ValidWorkoutExercise, WorkoutExercise};

use super::WorkoutExerciseRepository;
use crate::database::{Database, DatabaseError};

/// SQLite implementation of `WorkoutExerciseRepository`
pub struct WorkoutExerciseRepositoryImpl {
    db: Database,
}

impl WorkoutExerciseRepositoryImpl {
    /// Create a new `WorkoutExerciseRepository` with the given database connection
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WorkoutExerciseRepository for WorkoutExerciseRepositoryImpl {
    async fn create(
        &self,
        workout_id: i64,
        entry: &ValidWorkoutExercise,
    ) -> Result<WorkoutExercise, DatabaseError> {
        self.db.create_workout_exercise(workout_id, entry).await
    }

    async fn update(
        &self,
        id: i64,
        entry: &ValidWorkoutExercise,
    ) -> Result<WorkoutExercise, DatabaseError> {
        self.db.update_workout_exercise(id, entry).await
    }

    async fn get(&self, id: i64) -> Result<Option<WorkoutExercise>, DatabaseError> {
        self.db.get_workout_exercise(id).await
    }

    async fn list_for_workout(
        &self,
        workout_id: i64,
    ) -> Result<Vec<WorkoutExercise>, DatabaseError> {
        self.db.list_workout_exercises(workout_id).await
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        self.db.delete_workout_exercise(id).await
    }
}
