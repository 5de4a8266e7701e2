// ABOUTME: Exercise repository implementation backed by SQLite
// ABOUTME: Catalog writes, reference checks, and restricted deletes through Database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;

use setbook_core::models::{Exercise, ValidExercise};

use super::ExerciseRepository;
use crate::database::{Database, DatabaseError};

/// SQLite implementation of `ExerciseRepository`
pub struct ExerciseRepositoryImpl {
    db: Database,
}

impl ExerciseRepositoryImpl {
    /// Create a new `ExerciseRepository` with the given database connection
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ExerciseRepository for ExerciseRepositoryImpl {
    async fn create(&self, exercise: &ValidExercise) -> Result<Exercise, DatabaseError> {
        self.db.create_exercise(exercise).await
    }

    async fn update(&self, id: i64, exercise: &ValidExercise) -> Result<Exercise, DatabaseError> {
        self.db.update_exercise(id, exercise).await
    }

    async fn get(&self, id: i64) -> Result<Option<Exercise>, DatabaseError> {
        self.db.get_exercise(id).await
    }

    async fn list(&self) -> Result<Vec<Exercise>, DatabaseError> {
        self.db.list_exercises().await
    }

    async fn is_referenced(&self, id: i64) -> Result<bool, DatabaseError> {
        self.db.exercise_is_referenced(id).await
    }

    async fn name_taken(
        &self,
        name: &str,
        except_id: Option<i64>,
    ) -> Result<bool, DatabaseError> {
        self.db.exercise_name_taken(name, except_id).await
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        self.db.delete_exercise(id).await
    }
}
