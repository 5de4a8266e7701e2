// ABOUTME: Workout session entity owned by a user
// ABOUTME: Validates the performed time window and aggregates volume over its entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ValidationCode, ValidationErrors};
use crate::models::WorkoutExerciseDetail;

/// A persisted workout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workout {
    /// Row id
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// When the session started
    pub performed_start_at: DateTime<Utc>,
    /// When the session ended, strictly after the start
    pub performed_end_at: Option<DateTime<Utc>>,
    /// Free-form note
    pub memo: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Workout {
    /// Draft pre-filled with this workout's current values
    #[must_use]
    pub fn to_draft(&self) -> WorkoutDraft {
        WorkoutDraft {
            performed_start_at: Some(self.performed_start_at),
            performed_end_at: self.performed_end_at,
            memo: self.memo.clone(),
        }
    }
}

/// Caller-supplied workout attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutDraft {
    /// Session start
    pub performed_start_at: Option<DateTime<Utc>>,
    /// Session end
    pub performed_end_at: Option<DateTime<Utc>>,
    /// Free-form note
    pub memo: Option<String>,
}

/// Workout attributes that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidWorkout {
    /// Session start
    pub performed_start_at: DateTime<Utc>,
    /// Session end
    pub performed_end_at: Option<DateTime<Utc>>,
    /// Free-form note
    pub memo: Option<String>,
}

impl WorkoutDraft {
    /// Check the time window rules
    ///
    /// # Errors
    ///
    /// Returns the accumulated violations when any rule fails
    pub fn validate(&self) -> Result<ValidWorkout, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let Some(start) = self.performed_start_at else {
            errors.add("performed_start_at", ValidationCode::Blank);
            return Err(errors);
        };

        if let Some(end) = self.performed_end_at {
            if end <= start {
                errors.add("performed_end_at", ValidationCode::MustBeAfterStartTime);
            }
        }

        errors.into_result(ValidWorkout {
            performed_start_at: start,
            performed_end_at: self.performed_end_at,
            memo: self.memo.clone(),
        })
    }
}

/// A workout loaded with every entry, exercise and set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutDetail {
    /// The workout row
    #[serde(flatten)]
    pub workout: Workout,
    /// Entries ordered by `order_index`
    pub exercises: Vec<WorkoutExerciseDetail>,
}

impl WorkoutDetail {
    /// Sum of every entry's total volume, `Some(0)` when empty
    ///
    /// Returns `None` when any entry total or the sum overflows.
    #[must_use]
    pub fn total_volume(&self) -> Option<i64> {
        self.exercises
            .iter()
            .map(WorkoutExerciseDetail::total_volume)
            .try_fold(0_i64, |total, entry| total.checked_add(entry?))
    }
}
