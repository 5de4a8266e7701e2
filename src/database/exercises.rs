// ABOUTME: Exercise catalog database operations
// ABOUTME: Case-insensitive unique names, body part / laterality consistency, and restrict-on-delete

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use setbook_core::models::{BodyPart, Exercise, Laterality, ValidExercise};

use super::errors::{translate_delete_error, translate_write_error};
use super::{parse_column, Database, DatabaseError};

const EXERCISE_COLUMNS: &str = "id, name, body_part, laterality, memo, created_at, updated_at";

impl Database {
    /// Create exercises table
    ///
    /// # Errors
    ///
    /// Returns an error if table creation fails
    pub(super) async fn migrate_exercises(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS exercises (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE COLLATE NOCASE CHECK (length(name) <= 255),
                body_part TEXT NOT NULL CHECK (
                    body_part IN ('legs', 'back', 'shoulders', 'arms', 'chest', 'cardio')
                ),
                laterality TEXT CHECK (laterality IN ('bilateral', 'unilateral')),
                memo TEXT CHECK (memo IS NULL OR length(memo) <= 1000),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                CONSTRAINT exercises_laterality_matches_kind
                    CHECK ((body_part = 'cardio') = (laterality IS NULL))
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a validated exercise
    ///
    /// # Errors
    ///
    /// Returns a `name: taken` validation error if the name is already used
    /// (ignoring case), or a query error on any other failure
    pub async fn create_exercise(&self, exercise: &ValidExercise) -> Result<Exercise, DatabaseError> {
        let now = Utc::now();
        let row = sqlx::query(&format!(
            r"
            INSERT INTO exercises (name, body_part, laterality, memo, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {EXERCISE_COLUMNS}
            "
        ))
        .bind(&exercise.name)
        .bind(exercise.body_part.as_str())
        .bind(exercise.laterality.map(Laterality::as_str))
        .bind(&exercise.memo)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(translate_write_error)?;

        row_to_exercise(&row)
    }

    /// Replace an exercise's attributes
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the exercise does not exist, or a `name: taken`
    /// validation error on a name collision
    pub async fn update_exercise(
        &self,
        exercise_id: i64,
        exercise: &ValidExercise,
    ) -> Result<Exercise, DatabaseError> {
        let row = sqlx::query(&format!(
            r"
            UPDATE exercises
            SET name = $2, body_part = $3, laterality = $4, memo = $5, updated_at = $6
            WHERE id = $1
            RETURNING {EXERCISE_COLUMNS}
            "
        ))
        .bind(exercise_id)
        .bind(&exercise.name)
        .bind(exercise.body_part.as_str())
        .bind(exercise.laterality.map(Laterality::as_str))
        .bind(&exercise.memo)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(translate_write_error)?
        .ok_or_else(|| DatabaseError::not_found("Exercise", exercise_id))?;

        row_to_exercise(&row)
    }

    /// Get an exercise by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_exercise(&self, exercise_id: i64) -> Result<Option<Exercise>, DatabaseError> {
        sqlx::query(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises WHERE id = $1"
        ))
        .bind(exercise_id)
        .fetch_optional(&self.pool)
        .await?
        .as_ref()
        .map(row_to_exercise)
        .transpose()
    }

    /// List every exercise, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_exercises(&self) -> Result<Vec<Exercise>, DatabaseError> {
        sqlx::query(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(row_to_exercise)
        .collect()
    }

    /// Whether any workout entry references the exercise
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn exercise_is_referenced(&self, exercise_id: i64) -> Result<bool, DatabaseError> {
        let referenced: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM workout_exercises WHERE exercise_id = $1)",
        )
        .bind(exercise_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(referenced)
    }

    /// Whether another exercise already uses `name`, ignoring case
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn exercise_name_taken(
        &self,
        name: &str,
        except_id: Option<i64>,
    ) -> Result<bool, DatabaseError> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM exercises WHERE name = $1 AND id IS NOT $2)",
        )
        .bind(name)
        .bind(except_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    /// Delete an exercise no workout entry references
    ///
    /// # Errors
    ///
    /// Returns `RestrictedDeletion` while any workout entry references the
    /// exercise, or `NotFound` if it does not exist
    pub async fn delete_exercise(&self, exercise_id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM exercises WHERE id = $1")
            .bind(exercise_id)
            .execute(&self.pool)
            .await
            .map_err(|e| translate_delete_error(e, "Exercise", exercise_id))?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Exercise", exercise_id));
        }

        Ok(())
    }
}

pub(super) fn row_to_exercise(row: &SqliteRow) -> Result<Exercise, DatabaseError> {
    let body_part: String = row.try_get("body_part")?;
    let laterality: Option<String> = row.try_get("laterality")?;

    Ok(Exercise {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        body_part: parse_column::<BodyPart>(&body_part, "body_part")?,
        laterality: laterality
            .as_deref()
            .map(|value| parse_column::<Laterality>(value, "laterality"))
            .transpose()?,
        memo: row.try_get("memo")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
