// ABOUTME: Workout repository implementation backed by SQLite
// ABOUTME: Every operation is scoped to the owning user id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;

use setbook_core::models::{ValidWorkout, Workout};

use super::WorkoutRepository;
use crate::database::{Database, DatabaseError};

/// SQLite implementation of `WorkoutRepository`
pub struct WorkoutRepositoryImpl {
    db: Database,
}

impl WorkoutRepositoryImpl {
    /// Create a new `WorkoutRepository` with the given database connection
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WorkoutRepository for WorkoutRepositoryImpl {
    async fn create(&self, user_id: i64, workout: &ValidWorkout) -> Result<Workout, DatabaseError> {
        self.db.create_workout(user_id, workout).await
    }

    async fn update(
        &self,
        user_id: i64,
        id: i64,
        workout: &ValidWorkout,
    ) -> Result<Workout, DatabaseError> {
        self.db.update_workout(user_id, id, workout).await
    }

    async fn get(&self, user_id: i64, id: i64) -> Result<Option<Workout>, DatabaseError> {
        self.db.get_workout(user_id, id).await
    }

    async fn list(&self, user_id: i64) -> Result<Vec<Workout>, DatabaseError> {
        self.db.list_workouts(user_id).await
    }

    async fn delete(&self, user_id: i64, id: i64) -> Result<(), DatabaseError> {
        self.db.delete_workout(user_id, id).await
    }
}
