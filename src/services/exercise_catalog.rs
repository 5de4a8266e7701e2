// ABOUTME: Exercise catalog business logic on top of the exercise repository
// ABOUTME: Draft validation, kind lock for referenced exercises, and restrict-on-delete
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use tracing::{debug, info};

use setbook_core::errors::{AppError, AppResult, FieldError, ValidationCode, ValidationErrors};
use setbook_core::models::{Exercise, ExerciseDraft};

use crate::database::repositories::{ExerciseRepository, ExerciseRepositoryImpl};
use crate::database::Database;

/// Shared catalog of exercise definitions
#[derive(Clone)]
pub struct ExerciseCatalog {
    exercises: Arc<dyn ExerciseRepository>,
}

impl ExerciseCatalog {
    /// Catalog backed by `exercises`
    #[must_use]
    pub fn new(exercises: Arc<dyn ExerciseRepository>) -> Self {
        Self { exercises }
    }

    /// Catalog backed by the SQLite repository
    #[must_use]
    pub fn from_database(db: &Database) -> Self {
        Self::new(Arc::new(ExerciseRepositoryImpl::new(db.clone())))
    }

    /// Validate and store a new exercise
    ///
    /// # Errors
    ///
    /// Returns a validation error listing every violated rule, including a
    /// name already in use
    pub async fn create(&self, draft: &ExerciseDraft) -> AppResult<Exercise> {
        let mut errors = ValidationErrors::new();
        let valid = match draft.validate() {
            Ok(valid) => Some(valid),
            Err(violations) => {
                errors.extend(violations);
                None
            }
        };
        self.check_name_available(draft, None, &mut errors).await?;

        let valid = match valid {
            Some(valid) if errors.is_empty() => valid,
            _ => return Err(AppError::validation(errors)),
        };

        let exercise = self.exercises.create(&valid).await?;

        info!(
            exercise_id = exercise.id,
            name = %exercise.name,
            body_part = %exercise.body_part,
            "Created exercise"
        );
        Ok(exercise)
    }

    /// Replace an exercise's attributes
    ///
    /// Moving a referenced exercise across the cardio boundary would leave
    /// its logged sets with the wrong kind, so it is rejected.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, or a validation error
    /// (including `body_part: kind_locked`)
    pub async fn update(&self, id: i64, draft: &ExerciseDraft) -> AppResult<Exercise> {
        let current = self.get(id).await?;

        let mut errors = ValidationErrors::new();
        let valid = match draft.validate() {
            Ok(valid) => Some(valid),
            Err(violations) => {
                errors.extend(violations);
                None
            }
        };
        self.check_name_available(draft, Some(id), &mut errors).await?;

        let crosses_kind = draft
            .body_part
            .is_some_and(|body_part| body_part.is_cardio() != current.is_cardio());
        if crosses_kind && self.exercises.is_referenced(id).await? {
            debug!(exercise_id = id, "Refusing kind change of referenced exercise");
            errors.push(
                FieldError::new("body_part", ValidationCode::KindLocked)
                    .with_param("value", current.body_part.as_str()),
            );
        }

        let valid = match valid {
            Some(valid) if errors.is_empty() => valid,
            _ => return Err(AppError::validation(errors)),
        };

        let exercise = self.exercises.update(id, &valid).await?;
        info!(exercise_id = id, "Updated exercise");
        Ok(exercise)
    }

    /// Record `name: taken` alongside the draft's other violations
    ///
    /// The unique index still guards against a concurrent insert.
    async fn check_name_available(
        &self,
        draft: &ExerciseDraft,
        except_id: Option<i64>,
        errors: &mut ValidationErrors,
    ) -> AppResult<()> {
        let Some(name) = draft.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) else {
            return Ok(());
        };
        if self.exercises.name_taken(name, except_id).await? {
            debug!(name = %name, "Exercise name already in use");
            errors.push(FieldError::new("name", ValidationCode::Taken));
        }
        Ok(())
    }

    /// Get an exercise
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id
    pub async fn get(&self, id: i64) -> AppResult<Exercise> {
        self.exercises
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Exercise").with_resource_id(id.to_string()))
    }

    /// Every exercise, newest first
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails
    pub async fn list(&self) -> AppResult<Vec<Exercise>> {
        Ok(self.exercises.list().await?)
    }

    /// Delete an exercise no workout references
    ///
    /// # Errors
    ///
    /// Returns `RestrictedDeletion` while any workout entry references the
    /// exercise, or `NotFound` for an unknown id
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.exercises.delete(id).await?;
        info!(exercise_id = id, "Deleted exercise");
        Ok(())
    }
}
