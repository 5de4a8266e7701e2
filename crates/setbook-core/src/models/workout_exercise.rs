// ABOUTME: Workout exercise entries binding one exercise to one workout at a position
// ABOUTME: Entry validation, kind-dispatching set factory, and per-entry volume aggregation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::limits::MIN_ORDER_INDEX;
use crate::errors::{FieldError, ValidationCode, ValidationErrors};
use crate::models::{Exercise, SetAttributes, SetDraft, SetKind, WorkoutSet};

/// A persisted workout entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutExercise {
    /// Row id
    pub id: i64,
    /// Owning workout
    pub workout_id: i64,
    /// Referenced exercise
    pub exercise_id: i64,
    /// 1-based position within the workout
    pub order_index: i64,
    /// Free-form notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl WorkoutExercise {
    /// Bind caller attributes to the set variant dictated by `exercise`
    #[must_use]
    pub const fn build_set(&self, exercise: &Exercise, attributes: SetAttributes) -> SetDraft {
        SetDraft {
            kind: SetKind::for_body_part(exercise.body_part),
            workout_exercise_id: Some(self.id),
            attributes,
        }
    }

    /// Draft pre-filled with this entry's current values
    #[must_use]
    pub fn to_draft(&self) -> WorkoutExerciseDraft {
        WorkoutExerciseDraft {
            exercise_id: Some(self.exercise_id),
            order_index: Some(self.order_index),
            notes: self.notes.clone(),
        }
    }
}

/// Caller-supplied entry attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutExerciseDraft {
    /// Exercise to log
    pub exercise_id: Option<i64>,
    /// 1-based position
    pub order_index: Option<i64>,
    /// Free-form notes
    pub notes: Option<String>,
}

/// Entry attributes that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidWorkoutExercise {
    /// Exercise to log
    pub exercise_id: i64,
    /// 1-based position
    pub order_index: i64,
    /// Free-form notes
    pub notes: Option<String>,
}

impl WorkoutExerciseDraft {
    /// Check the field-level rules; uniqueness is enforced by the store
    ///
    /// # Errors
    ///
    /// Returns the accumulated violations when any rule fails
    pub fn validate(&self) -> Result<ValidWorkoutExercise, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.exercise_id.is_none() {
            errors.add("exercise", ValidationCode::Blank);
        }
        match self.order_index {
            None => errors.add("order_index", ValidationCode::Blank),
            Some(index) if index < MIN_ORDER_INDEX => errors.push(
                FieldError::new("order_index", ValidationCode::GreaterThanOrEqualTo)
                    .with_param("count", MIN_ORDER_INDEX)
                    .with_param("value", index),
            ),
            Some(_) => {}
        }

        match (self.exercise_id, self.order_index) {
            (Some(exercise_id), Some(order_index)) if errors.is_empty() => {
                Ok(ValidWorkoutExercise {
                    exercise_id,
                    order_index,
                    notes: self.notes.clone(),
                })
            }
            _ => Err(errors),
        }
    }
}

/// An entry loaded together with its exercise and ordered sets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutExerciseDetail {
    /// The entry row
    #[serde(flatten)]
    pub entry: WorkoutExercise,
    /// Referenced exercise
    pub exercise: Exercise,
    /// Sets ordered by `order_index`
    pub sets: Vec<WorkoutSet>,
}

impl WorkoutExerciseDetail {
    /// Sum of strength-set volumes; cardio sets contribute zero
    ///
    /// Returns `None` when the sum overflows.
    #[must_use]
    pub fn total_volume(&self) -> Option<i64> {
        total_volume(&self.sets)
    }
}

/// Sum of volume contributions over `sets`, `Some(0)` when empty
///
/// Returns `None` when the sum overflows, matching `strength_volume`.
#[must_use]
pub fn total_volume(sets: &[WorkoutSet]) -> Option<i64> {
    sets.iter()
        .map(WorkoutSet::volume_contribution)
        .try_fold(0_i64, i64::checked_add)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::{BodyPart, Laterality, SetMetrics};

    fn exercise(body_part: BodyPart) -> Exercise {
        let now = Utc::now();
        Exercise {
            id: 7,
            name: "Bench Press".into(),
            body_part,
            laterality: (!body_part.is_cardio()).then_some(Laterality::Bilateral),
            memo: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn entry() -> WorkoutExercise {
        let now = Utc::now();
        WorkoutExercise {
            id: 3,
            workout_id: 1,
            exercise_id: 7,
            order_index: 1,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn set(id: i64, metrics: SetMetrics) -> WorkoutSet {
        let now = Utc::now();
        WorkoutSet {
            id,
            workout_exercise_id: 3,
            order_index: id,
            volume: metrics.volume().unwrap(),
            metrics,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_build_set_dispatches_on_body_part() {
        let attrs = SetAttributes::default();
        assert_eq!(
            entry().build_set(&exercise(BodyPart::Chest), attrs).kind,
            SetKind::Strength
        );
        let draft = entry().build_set(&exercise(BodyPart::Cardio), attrs);
        assert_eq!(draft.kind, SetKind::Cardio);
        assert_eq!(draft.workout_exercise_id, Some(3));
    }

    #[test]
    fn test_total_volume_ignores_cardio() {
        let detail = WorkoutExerciseDetail {
            entry: entry(),
            exercise: exercise(BodyPart::Chest),
            sets: vec![
                set(1, SetMetrics::Strength { weight: 80_000, reps: 5 }),
                set(2, SetMetrics::Strength { weight: 60_000, reps: 10 }),
                set(
                    3,
                    SetMetrics::Cardio {
                        duration_seconds: Some(600),
                        calories: Some(90),
                    },
                ),
            ],
        };
        assert_eq!(detail.total_volume(), Some(1_000_000));
        assert_eq!(total_volume(&[]), Some(0));
    }

    #[test]
    fn test_total_volume_overflow_is_reported() {
        let heavy = SetMetrics::Strength {
            weight: i64::MAX / 2,
            reps: 1,
        };
        let sets = [set(1, heavy), set(2, heavy)];
        assert_eq!(total_volume(&sets), Some(i64::MAX - 1));

        let sets = [set(1, heavy), set(2, heavy), set(3, heavy)];
        assert_eq!(total_volume(&sets), None);
    }

    #[test]
    fn test_draft_rules() {
        let errors = WorkoutExerciseDraft {
            exercise_id: None,
            order_index: Some(0),
            notes: None,
        }
        .validate()
        .unwrap_err();
        assert!(errors.has("exercise", ValidationCode::Blank));
        assert!(errors.has("order_index", ValidationCode::GreaterThanOrEqualTo));

        let errors = WorkoutExerciseDraft::default().validate().unwrap_err();
        assert!(errors.has("order_index", ValidationCode::Blank));

        let valid = entry().to_draft().validate().unwrap();
        assert_eq!(valid.order_index, 1);
    }
}
