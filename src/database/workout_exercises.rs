// ABOUTME: Workout exercise entry database operations
// ABOUTME: Positions and exercises are unique per workout; entries cascade with their workout

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use setbook_core::models::{ValidWorkoutExercise, WorkoutExercise};

use super::errors::translate_write_error;
use super::{Database, DatabaseError};

const ENTRY_COLUMNS: &str =
    "id, workout_id, exercise_id, order_index, notes, created_at, updated_at";

impl Database {
    /// Create workout_exercises table
    ///
    /// `exercise_id` restricts deletion of the referenced exercise.
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub(super) async fn migrate_workout_exercises(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workout_exercises (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                workout_id INTEGER NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
                exercise_id INTEGER NOT NULL REFERENCES exercises(id) ON DELETE RESTRICT,
                order_index INTEGER NOT NULL,
                notes TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                CONSTRAINT workout_exercises_order_index_positive CHECK (order_index >= 1),
                UNIQUE (workout_id, order_index),
                UNIQUE (workout_id, exercise_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_workout_exercises_exercise_id ON workout_exercises(exercise_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Add an entry to a workout
    ///
    /// # Errors
    ///
    /// Returns a `taken` validation error on `order_index` or `exercise` when
    /// the position or exercise is already used in the workout
    pub async fn create_workout_exercise(
        &self,
        workout_id: i64,
        entry: &ValidWorkoutExercise,
    ) -> Result<WorkoutExercise, DatabaseError> {
        let now = Utc::now();
        let row = sqlx::query(&format!(
            r"
            INSERT INTO workout_exercises (workout_id, exercise_id, order_index, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {ENTRY_COLUMNS}
            "
        ))
        .bind(workout_id)
        .bind(entry.exercise_id)
        .bind(entry.order_index)
        .bind(&entry.notes)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(translate_write_error)?;

        row_to_workout_exercise(&row)
    }

    /// Replace an entry's attributes
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the entry does not exist, or a `taken`
    /// validation error on a position or exercise collision
    pub async fn update_workout_exercise(
        &self,
        entry_id: i64,
        entry: &ValidWorkoutExercise,
    ) -> Result<WorkoutExercise, DatabaseError> {
        let row = sqlx::query(&format!(
            r"
            UPDATE workout_exercises
            SET exercise_id = $2, order_index = $3, notes = $4, updated_at = $5
            WHERE id = $1
            RETURNING {ENTRY_COLUMNS}
            "
        ))
        .bind(entry_id)
        .bind(entry.exercise_id)
        .bind(entry.order_index)
        .bind(&entry.notes)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(translate_write_error)?
        .ok_or_else(|| DatabaseError::not_found("WorkoutExercise", entry_id))?;

        row_to_workout_exercise(&row)
    }

    /// Get an entry by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_workout_exercise(
        &self,
        entry_id: i64,
    ) -> Result<Option<WorkoutExercise>, DatabaseError> {
        sqlx::query(&format!(
            "SELECT {ENTRY_COLUMNS} FROM workout_exercises WHERE id = $1"
        ))
        .bind(entry_id)
        .fetch_optional(&self.pool)
        .await?
        .as_ref()
        .map(row_to_workout_exercise)
        .transpose()
    }

    /// List a workout's entries by position
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_workout_exercises(
        &self,
        workout_id: i64,
    ) -> Result<Vec<WorkoutExercise>, DatabaseError> {
        sqlx::query(&format!(
            r"
            SELECT {ENTRY_COLUMNS} FROM workout_exercises
            WHERE workout_id = $1
            ORDER BY order_index ASC
            "
        ))
        .bind(workout_id)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(row_to_workout_exercise)
        .collect()
    }

    /// Delete an entry and its sets
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the entry does not exist
    pub async fn delete_workout_exercise(&self, entry_id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM workout_exercises WHERE id = $1")
            .bind(entry_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("WorkoutExercise", entry_id));
        }

        Ok(())
    }
}

fn row_to_workout_exercise(row: &SqliteRow) -> Result<WorkoutExercise, DatabaseError> {
    Ok(WorkoutExercise {
        id: row.try_get("id")?,
        workout_id: row.try_get("workout_id")?,
        exercise_id: row.try_get("exercise_id")?,
        order_index: row.try_get("order_index")?,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
