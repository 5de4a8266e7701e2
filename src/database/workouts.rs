// ABOUTME: Workout database operations scoped to the owning user
// ABOUTME: A workout owned by someone else is indistinguishable from a missing one

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use setbook_core::models::{ValidWorkout, Workout};

use super::{Database, DatabaseError};

const WORKOUT_COLUMNS: &str =
    "id, user_id, performed_start_at, performed_end_at, memo, created_at, updated_at";

impl Database {
    /// Create workouts table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub(super) async fn migrate_workouts(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workouts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                performed_start_at TEXT NOT NULL,
                performed_end_at TEXT,
                memo TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_workouts_user_id ON workouts(user_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Create a workout for `user_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_workout(
        &self,
        user_id: i64,
        workout: &ValidWorkout,
    ) -> Result<Workout, DatabaseError> {
        let now = Utc::now();
        let row = sqlx::query(&format!(
            r"
            INSERT INTO workouts (user_id, performed_start_at, performed_end_at, memo, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {WORKOUT_COLUMNS}
            "
        ))
        .bind(user_id)
        .bind(workout.performed_start_at)
        .bind(workout.performed_end_at)
        .bind(&workout.memo)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        row_to_workout(&row)
    }

    /// Replace a workout's attributes
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `user_id` owns no workout `workout_id`
    pub async fn update_workout(
        &self,
        user_id: i64,
        workout_id: i64,
        workout: &ValidWorkout,
    ) -> Result<Workout, DatabaseError> {
        let row = sqlx::query(&format!(
            r"
            UPDATE workouts
            SET performed_start_at = $3, performed_end_at = $4, memo = $5, updated_at = $6
            WHERE id = $1 AND user_id = $2
            RETURNING {WORKOUT_COLUMNS}
            "
        ))
        .bind(workout_id)
        .bind(user_id)
        .bind(workout.performed_start_at)
        .bind(workout.performed_end_at)
        .bind(&workout.memo)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Workout", workout_id))?;

        row_to_workout(&row)
    }

    /// Get a workout owned by `user_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_workout(
        &self,
        user_id: i64,
        workout_id: i64,
    ) -> Result<Option<Workout>, DatabaseError> {
        sqlx::query(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = $1 AND user_id = $2"
        ))
        .bind(workout_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .as_ref()
        .map(row_to_workout)
        .transpose()
    }

    /// List a user's workouts, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_workouts(&self, user_id: i64) -> Result<Vec<Workout>, DatabaseError> {
        sqlx::query(&format!(
            r"
            SELECT {WORKOUT_COLUMNS} FROM workouts
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(row_to_workout)
        .collect()
    }

    /// Delete a workout together with its entries and their sets
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `user_id` owns no workout `workout_id`
    pub async fn delete_workout(&self, user_id: i64, workout_id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(workout_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Workout", workout_id));
        }

        Ok(())
    }
}

fn row_to_workout(row: &SqliteRow) -> Result<Workout, DatabaseError> {
    Ok(Workout {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        performed_start_at: row.try_get("performed_start_at")?,
        performed_end_at: row.try_get("performed_end_at")?,
        memo: row.try_get("memo")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
