// ABOUTME: Workout logging business logic across workouts, entries, and sets
// ABOUTME: Enforces per-user ownership, kind-dispatched set creation, and computes volume totals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Workout service
//!
//! Every operation takes the acting user's id. Workouts belonging to anyone
//! else, and anything nested under them, are reported as not found.
//!
//! Writes are validated bottom-up per entity before they reach the store;
//! the store's unique constraints catch whatever races past those checks.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use setbook_core::errors::{AppError, AppResult, FieldError, ValidationCode, ValidationErrors};
use setbook_core::models::{
    Exercise, SetAttributes, SetKind, Workout, WorkoutDetail, WorkoutDraft, WorkoutExercise,
    WorkoutExerciseDetail, WorkoutExerciseDraft, WorkoutSet,
};

use crate::database::repositories::{
    ExerciseRepository, ExerciseRepositoryImpl, WorkoutExerciseRepository,
    WorkoutExerciseRepositoryImpl, WorkoutRepository, WorkoutRepositoryImpl,
    WorkoutSetRepository, WorkoutSetRepositoryImpl,
};
use crate::database::Database;

/// Workout, entry and set operations for one store
#[derive(Clone)]
pub struct WorkoutService {
    workouts: Arc<dyn WorkoutRepository>,
    entries: Arc<dyn WorkoutExerciseRepository>,
    sets: Arc<dyn WorkoutSetRepository>,
    exercises: Arc<dyn ExerciseRepository>,
}

impl WorkoutService {
    /// Service over the given repositories
    #[must_use]
    pub fn new(
        workouts: Arc<dyn WorkoutRepository>,
        entries: Arc<dyn WorkoutExerciseRepository>,
        sets: Arc<dyn WorkoutSetRepository>,
        exercises: Arc<dyn ExerciseRepository>,
    ) -> Self {
        Self {
            workouts,
            entries,
            sets,
            exercises,
        }
    }

    /// Service backed by the SQLite repositories
    #[must_use]
    pub fn from_database(db: &Database) -> Self {
        Self::new(
            Arc::new(WorkoutRepositoryImpl::new(db.clone())),
            Arc::new(WorkoutExerciseRepositoryImpl::new(db.clone())),
            Arc::new(WorkoutSetRepositoryImpl::new(db.clone())),
            Arc::new(ExerciseRepositoryImpl::new(db.clone())),
        )
    }

    /// Create a workout
    ///
    /// # Errors
    ///
    /// Returns a validation error if the start is missing or the end is not
    /// strictly after it
    pub async fn create_workout(&self, user_id: i64, draft: &WorkoutDraft) -> AppResult<Workout> {
        let valid = draft.validate()?;
        let workout = self.workouts.create(user_id, &valid).await?;
        info!(user_id, workout_id = workout.id, "Created workout");
        Ok(workout)
    }

    /// Replace a workout's attributes
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user owns no such workout, or a validation error
    pub async fn update_workout(
        &self,
        user_id: i64,
        workout_id: i64,
        draft: &WorkoutDraft,
    ) -> AppResult<Workout> {
        self.owned_workout(user_id, workout_id).await?;
        let valid = draft.validate()?;
        Ok(self.workouts.update(user_id, workout_id, &valid).await?)
    }

    /// Get a workout
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user owns no such workout
    pub async fn get_workout(&self, user_id: i64, workout_id: i64) -> AppResult<Workout> {
        self.owned_workout(user_id, workout_id).await
    }

    /// A user's workouts, newest first
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails
    pub async fn list_workouts(&self, user_id: i64) -> AppResult<Vec<Workout>> {
        Ok(self.workouts.list(user_id).await?)
    }

    /// Delete a workout with all its entries and sets
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user owns no such workout
    pub async fn delete_workout(&self, user_id: i64, workout_id: i64) -> AppResult<()> {
        self.workouts.delete(user_id, workout_id).await?;
        info!(user_id, workout_id, "Deleted workout");
        Ok(())
    }

    /// Load a workout with its entries, their exercises, and their sets
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user owns no such workout
    pub async fn workout_detail(&self, user_id: i64, workout_id: i64) -> AppResult<WorkoutDetail> {
        let workout = self.owned_workout(user_id, workout_id).await?;
        let entries = self.entries.list_for_workout(workout_id).await?;

        let mut sets_by_entry: HashMap<i64, Vec<WorkoutSet>> = HashMap::new();
        for set in self.sets.list_for_workout(workout_id).await? {
            sets_by_entry
                .entry(set.workout_exercise_id)
                .or_default()
                .push(set);
        }

        let mut exercises: HashMap<i64, Exercise> = HashMap::new();
        let mut details = Vec::with_capacity(entries.len());
        for entry in entries {
            let exercise = match exercises.get(&entry.exercise_id) {
                Some(exercise) => exercise.clone(),
                None => {
                    let exercise = self.referenced_exercise(&entry).await?;
                    exercises.insert(exercise.id, exercise.clone());
                    exercise
                }
            };
            let sets = sets_by_entry.remove(&entry.id).unwrap_or_default();
            details.push(WorkoutExerciseDetail {
                entry,
                exercise,
                sets,
            });
        }

        let detail = WorkoutDetail {
            workout,
            exercises: details,
        };
        debug!(
            workout_id,
            entries = detail.exercises.len(),
            total_volume = ?detail.total_volume(),
            "Loaded workout detail"
        );
        Ok(detail)
    }

    /// Add an exercise to a workout
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unowned workout or unknown exercise, or a
    /// validation error (including a position or exercise already used in
    /// the workout)
    pub async fn add_exercise(
        &self,
        user_id: i64,
        workout_id: i64,
        draft: &WorkoutExerciseDraft,
    ) -> AppResult<WorkoutExercise> {
        self.owned_workout(user_id, workout_id).await?;
        let valid = draft.validate()?;
        self.existing_exercise(valid.exercise_id).await?;

        let entry = self.entries.create(workout_id, &valid).await?;
        info!(
            workout_id,
            workout_exercise_id = entry.id,
            exercise_id = entry.exercise_id,
            order_index = entry.order_index,
            "Added exercise to workout"
        );
        Ok(entry)
    }

    /// Replace an entry's attributes
    ///
    /// Swapping the exercise is allowed only while the entry's sets would
    /// keep a matching kind.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unowned entry or unknown exercise, or a
    /// validation error (including `exercise: invalid_exercise_kind`)
    pub async fn update_exercise_entry(
        &self,
        user_id: i64,
        entry_id: i64,
        draft: &WorkoutExerciseDraft,
    ) -> AppResult<WorkoutExercise> {
        let current = self.owned_entry(user_id, entry_id).await?;
        let valid = draft.validate()?;

        if valid.exercise_id != current.exercise_id {
            let previous = self.referenced_exercise(&current).await?;
            let next = self.existing_exercise(valid.exercise_id).await?;
            let kind_changes =
                SetKind::for_body_part(previous.body_part) != SetKind::for_body_part(next.body_part);
            if kind_changes && self.sets.count_for_entry(entry_id).await? > 0 {
                let mut errors = ValidationErrors::new();
                errors.push(
                    FieldError::new("exercise", ValidationCode::InvalidExerciseKind)
                        .with_param("value", next.body_part.as_str()),
                );
                return Err(AppError::validation(errors));
            }
        }

        Ok(self.entries.update(entry_id, &valid).await?)
    }

    /// Remove an entry and its sets from a workout
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user owns no such entry
    pub async fn remove_exercise(&self, user_id: i64, entry_id: i64) -> AppResult<()> {
        self.owned_entry(user_id, entry_id).await?;
        self.entries.delete(entry_id).await?;
        info!(user_id, workout_exercise_id = entry_id, "Removed exercise from workout");
        Ok(())
    }

    /// Log a set under an entry
    ///
    /// The set kind follows the entry's exercise: cardio exercises get
    /// cardio sets, everything else gets strength sets.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user owns no such entry, or a validation
    /// error listing every violated rule
    pub async fn add_set(
        &self,
        user_id: i64,
        entry_id: i64,
        attributes: SetAttributes,
    ) -> AppResult<WorkoutSet> {
        let entry = self.owned_entry(user_id, entry_id).await?;
        let exercise = self.referenced_exercise(&entry).await?;

        let valid = entry
            .build_set(&exercise, attributes)
            .validate(exercise.body_part)?;
        let set = self.sets.create(&valid).await?;

        info!(
            workout_exercise_id = entry_id,
            set_id = set.id,
            kind = %set.kind(),
            volume = set.volume,
            "Logged set"
        );
        Ok(set)
    }

    /// Replace a set's attributes; its kind stays fixed
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user owns no such set, or a validation error
    pub async fn update_set(
        &self,
        user_id: i64,
        set_id: i64,
        attributes: SetAttributes,
    ) -> AppResult<WorkoutSet> {
        let (entry, current) = self.owned_set(user_id, set_id).await?;
        let exercise = self.referenced_exercise(&entry).await?;

        let valid = current
            .draft_update(attributes)
            .validate(exercise.body_part)?;
        let set = self.sets.update(set_id, &valid).await?;

        debug!(set_id, volume = set.volume, "Updated set");
        Ok(set)
    }

    /// Delete a set
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user owns no such set
    pub async fn delete_set(&self, user_id: i64, set_id: i64) -> AppResult<()> {
        self.owned_set(user_id, set_id).await?;
        self.sets.delete(set_id).await?;
        debug!(set_id, "Deleted set");
        Ok(())
    }

    async fn owned_workout(&self, user_id: i64, workout_id: i64) -> AppResult<Workout> {
        self.workouts
            .get(user_id, workout_id)
            .await?
            .ok_or_else(|| AppError::not_found("Workout").with_resource_id(workout_id.to_string()))
    }

    async fn owned_entry(&self, user_id: i64, entry_id: i64) -> AppResult<WorkoutExercise> {
        let not_found =
            || AppError::not_found("WorkoutExercise").with_resource_id(entry_id.to_string());

        let entry = self.entries.get(entry_id).await?.ok_or_else(not_found)?;
        if self.workouts.get(user_id, entry.workout_id).await?.is_none() {
            return Err(not_found());
        }
        Ok(entry)
    }

    async fn owned_set(
        &self,
        user_id: i64,
        set_id: i64,
    ) -> AppResult<(WorkoutExercise, WorkoutSet)> {
        let not_found = || AppError::not_found("WorkoutSet").with_resource_id(set_id.to_string());

        let set = self.sets.get(set_id).await?.ok_or_else(not_found)?;
        let entry = self
            .entries
            .get(set.workout_exercise_id)
            .await?
            .ok_or_else(not_found)?;
        if self.workouts.get(user_id, entry.workout_id).await?.is_none() {
            return Err(not_found());
        }
        Ok((entry, set))
    }

    async fn existing_exercise(&self, exercise_id: i64) -> AppResult<Exercise> {
        self.exercises
            .get(exercise_id)
            .await?
            .ok_or_else(|| AppError::not_found("Exercise").with_resource_id(exercise_id.to_string()))
    }

    /// Exercise an existing entry points at; restrict-on-delete keeps it present
    async fn referenced_exercise(&self, entry: &WorkoutExercise) -> AppResult<Exercise> {
        self.exercises.get(entry.exercise_id).await?.ok_or_else(|| {
            AppError::internal(format!(
                "workout exercise {} references missing exercise {}",
                entry.id, entry.exercise_id
            ))
        })
    }
}
