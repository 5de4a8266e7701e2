// ABOUTME: Workout set database operations with a type discriminator column
// ABOUTME: Maps StrengthSet / CardioSet rows to the set metrics sum type and stores per-set volume

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use setbook_core::constants::set_types;
use setbook_core::models::{SetKind, SetMetrics, ValidSet, WorkoutSet};

use super::errors::translate_write_error;
use super::{parse_column, Database, DatabaseError};

const SET_COLUMNS: &str = "id, workout_exercise_id, order_index, type, weight, reps, \
    duration_seconds, calories, volume, created_at, updated_at";

impl Database {
    /// Create workout_sets table
    ///
    /// # Errors
    ///
    /// Returns an error if table creation fails
    pub(super) async fn migrate_workout_sets(&self) -> Result<(), DatabaseError> {
        sqlx::query(&format!(
            r"
            CREATE TABLE IF NOT EXISTS workout_sets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                workout_exercise_id INTEGER NOT NULL
                    REFERENCES workout_exercises(id) ON DELETE CASCADE,
                order_index INTEGER NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('{strength}', '{cardio}')),
                weight INTEGER CHECK (weight IS NULL OR weight >= 0),
                reps INTEGER CHECK (reps IS NULL OR reps >= 1),
                duration_seconds INTEGER CHECK (duration_seconds IS NULL OR duration_seconds >= 1),
                calories INTEGER CHECK (calories IS NULL OR calories >= 0),
                volume INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                CONSTRAINT workout_sets_order_index_positive CHECK (order_index >= 1),
                CONSTRAINT workout_sets_fields_match_type CHECK (
                    (type = '{strength}' AND weight IS NOT NULL AND reps IS NOT NULL
                        AND duration_seconds IS NULL AND calories IS NULL)
                    OR (type = '{cardio}' AND weight IS NULL AND reps IS NULL AND volume = 0)
                ),
                UNIQUE (workout_exercise_id, order_index)
            )
            ",
            strength = set_types::STRENGTH,
            cardio = set_types::CARDIO,
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a validated set with its computed volume
    ///
    /// # Errors
    ///
    /// Returns an `order_index: taken` validation error if the position is
    /// already used under the same workout exercise
    pub async fn create_workout_set(&self, set: &ValidSet) -> Result<WorkoutSet, DatabaseError> {
        let columns = MetricColumns::from(set.metrics);
        let now = Utc::now();
        let row = sqlx::query(&format!(
            r"
            INSERT INTO workout_sets
                (workout_exercise_id, order_index, type, weight, reps, duration_seconds,
                 calories, volume, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING {SET_COLUMNS}
            "
        ))
        .bind(set.workout_exercise_id)
        .bind(set.order_index)
        .bind(set.metrics.kind().as_str())
        .bind(columns.weight)
        .bind(columns.reps)
        .bind(columns.duration_seconds)
        .bind(columns.calories)
        .bind(set.volume)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(translate_write_error)?;

        row_to_workout_set(&row)
    }

    /// Replace a set's attributes and stored volume
    ///
    /// The `type` column is never rewritten.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the set does not exist, or an
    /// `order_index: taken` validation error on a position collision
    pub async fn update_workout_set(
        &self,
        set_id: i64,
        set: &ValidSet,
    ) -> Result<WorkoutSet, DatabaseError> {
        let columns = MetricColumns::from(set.metrics);
        let row = sqlx::query(&format!(
            r"
            UPDATE workout_sets
            SET order_index = $2, weight = $3, reps = $4, duration_seconds = $5,
                calories = $6, volume = $7, updated_at = $8
            WHERE id = $1 AND type = $9
            RETURNING {SET_COLUMNS}
            "
        ))
        .bind(set_id)
        .bind(set.order_index)
        .bind(columns.weight)
        .bind(columns.reps)
        .bind(columns.duration_seconds)
        .bind(columns.calories)
        .bind(set.volume)
        .bind(Utc::now())
        .bind(set.metrics.kind().as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(translate_write_error)?
        .ok_or_else(|| DatabaseError::not_found("WorkoutSet", set_id))?;

        row_to_workout_set(&row)
    }

    /// Get a set by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_workout_set(&self, set_id: i64) -> Result<Option<WorkoutSet>, DatabaseError> {
        sqlx::query(&format!(
            "SELECT {SET_COLUMNS} FROM workout_sets WHERE id = $1"
        ))
        .bind(set_id)
        .fetch_optional(&self.pool)
        .await?
        .as_ref()
        .map(row_to_workout_set)
        .transpose()
    }

    /// List every set in a workout, grouped by entry and ordered by position
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_sets_for_workout(
        &self,
        workout_id: i64,
    ) -> Result<Vec<WorkoutSet>, DatabaseError> {
        sqlx::query(
            r"
            SELECT workout_sets.* FROM workout_sets
            JOIN workout_exercises ON workout_exercises.id = workout_sets.workout_exercise_id
            WHERE workout_exercises.workout_id = $1
            ORDER BY workout_exercises.order_index ASC, workout_sets.order_index ASC
            ",
        )
        .bind(workout_id)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(row_to_workout_set)
        .collect()
    }

    /// Number of sets logged under one workout exercise
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn count_workout_sets(&self, workout_exercise_id: i64) -> Result<i64, DatabaseError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM workout_sets WHERE workout_exercise_id = $1")
                .bind(workout_exercise_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Delete a set
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the set does not exist
    pub async fn delete_workout_set(&self, set_id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM workout_sets WHERE id = $1")
            .bind(set_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("WorkoutSet", set_id));
        }

        Ok(())
    }
}

/// Nullable metric columns for one row
struct MetricColumns {
    weight: Option<i64>,
    reps: Option<i64>,
    duration_seconds: Option<i64>,
    calories: Option<i64>,
}

impl From<SetMetrics> for MetricColumns {
    fn from(metrics: SetMetrics) -> Self {
        match metrics {
            SetMetrics::Strength { weight, reps } => Self {
                weight: Some(weight),
                reps: Some(reps),
                duration_seconds: None,
                calories: None,
            },
            SetMetrics::Cardio {
                duration_seconds,
                calories,
            } => Self {
                weight: None,
                reps: None,
                duration_seconds,
                calories,
            },
        }
    }
}

fn row_to_workout_set(row: &SqliteRow) -> Result<WorkoutSet, DatabaseError> {
    let kind: String = row.try_get("type")?;
    let metrics = match parse_column::<SetKind>(&kind, "type")? {
        SetKind::Strength => SetMetrics::Strength {
            weight: row.try_get::<Option<i64>, _>("weight")?.unwrap_or_default(),
            reps: row.try_get::<Option<i64>, _>("reps")?.unwrap_or_default(),
        },
        SetKind::Cardio => SetMetrics::Cardio {
            duration_seconds: row.try_get("duration_seconds")?,
            calories: row.try_get("calories")?,
        },
    };

    Ok(WorkoutSet {
        id: row.try_get("id")?,
        workout_exercise_id: row.try_get("workout_exercise_id")?,
        order_index: row.try_get("order_index")?,
        metrics,
        volume: row.try_get("volume")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
