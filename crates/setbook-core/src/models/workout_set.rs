// ABOUTME: Set entries logged under a workout exercise, as a strength/cardio sum type
// ABOUTME: Kind-dependent validation, exercise kind cross-check, and per-set volume computation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Workout Sets
//!
//! A set is either a strength set (load × repetitions) or a cardio set
//! (optional duration and energy). The variant is chosen once, from the body
//! part of the exercise the set is logged against, and never changes.
//!
//! Strength sets carry a volume of `weight * reps`, recomputed on every
//! validated write. Cardio sets always carry a volume of zero.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::limits::{MIN_DURATION_SECONDS, MIN_ORDER_INDEX, MIN_REPS};
use crate::constants::{set_types, BASE_FIELD};
use crate::errors::{FieldError, ValidationCode, ValidationErrors};
use crate::models::BodyPart;

/// Concrete set variant, persisted as the `type` discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetKind {
    /// Weight × reps
    #[serde(rename = "StrengthSet")]
    Strength,
    /// Duration and calories
    #[serde(rename = "CardioSet")]
    Cardio,
}

impl SetKind {
    /// The variant every set under an exercise with this body part must use
    #[must_use]
    pub const fn for_body_part(body_part: BodyPart) -> Self {
        if body_part.is_cardio() {
            Self::Cardio
        } else {
            Self::Strength
        }
    }

    /// Discriminator value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strength => set_types::STRENGTH,
            Self::Cardio => set_types::CARDIO,
        }
    }

    /// Whether this variant is allowed under the given body part
    #[must_use]
    pub const fn matches(self, body_part: BodyPart) -> bool {
        matches!(
            (self, body_part.is_cardio()),
            (Self::Strength, false) | (Self::Cardio, true)
        )
    }
}

impl fmt::Display for SetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            set_types::STRENGTH => Ok(Self::Strength),
            set_types::CARDIO => Ok(Self::Cardio),
            other => Err(format!("unknown set type '{other}'")),
        }
    }
}

/// Kind-specific measurements of a set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SetMetrics {
    /// Load and repetitions
    #[serde(rename = "StrengthSet")]
    Strength {
        /// Unit-agnostic load, e.g. grams
        weight: i64,
        /// Repetitions performed
        reps: i64,
    },
    /// Conditioning measurements
    #[serde(rename = "CardioSet")]
    Cardio {
        /// Elapsed time
        duration_seconds: Option<i64>,
        /// Energy expended
        calories: Option<i64>,
    },
}

impl SetMetrics {
    /// Variant of these metrics
    #[must_use]
    pub const fn kind(&self) -> SetKind {
        match self {
            Self::Strength { .. } => SetKind::Strength,
            Self::Cardio { .. } => SetKind::Cardio,
        }
    }

    /// Volume contribution; cardio is always zero
    ///
    /// Returns `None` when `weight * reps` overflows.
    #[must_use]
    pub const fn volume(&self) -> Option<i64> {
        match *self {
            Self::Strength { weight, reps } => weight.checked_mul(reps),
            Self::Cardio { .. } => Some(0),
        }
    }
}

/// `weight * reps`, treating a missing factor as zero
///
/// Returns `None` only when the product overflows.
#[must_use]
pub fn strength_volume(weight: Option<i64>, reps: Option<i64>) -> Option<i64> {
    match (weight, reps) {
        (Some(weight), Some(reps)) => weight.checked_mul(reps),
        _ => Some(0),
    }
}

/// A persisted set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSet {
    /// Row id
    pub id: i64,
    /// Owning workout exercise
    pub workout_exercise_id: i64,
    /// 1-based position within the owning workout exercise
    pub order_index: i64,
    /// Kind-specific measurements
    #[serde(flatten)]
    pub metrics: SetMetrics,
    /// Stored volume as of the last write
    pub volume: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl WorkoutSet {
    /// Variant fixed at creation
    #[must_use]
    pub const fn kind(&self) -> SetKind {
        self.metrics.kind()
    }

    /// Volume this set contributes to its parent's total
    #[must_use]
    pub const fn volume_contribution(&self) -> i64 {
        match self.metrics {
            SetMetrics::Strength { .. } => self.volume,
            SetMetrics::Cardio { .. } => 0,
        }
    }

    /// Attributes describing this set as it is now
    #[must_use]
    pub const fn attributes(&self) -> SetAttributes {
        let (weight, reps, duration_seconds, calories) = match self.metrics {
            SetMetrics::Strength { weight, reps } => (Some(weight), Some(reps), None, None),
            SetMetrics::Cardio {
                duration_seconds,
                calories,
            } => (None, None, duration_seconds, calories),
        };
        SetAttributes {
            order_index: Some(self.order_index),
            weight,
            reps,
            duration_seconds,
            calories,
        }
    }

    /// Draft for replacing this set's attributes; the kind stays fixed
    #[must_use]
    pub const fn draft_update(&self, attributes: SetAttributes) -> SetDraft {
        SetDraft {
            kind: self.kind(),
            workout_exercise_id: Some(self.workout_exercise_id),
            attributes,
        }
    }
}

/// Caller-supplied set attributes, before the kind is applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetAttributes {
    /// 1-based position
    pub order_index: Option<i64>,
    /// Strength only
    pub weight: Option<i64>,
    /// Strength only
    pub reps: Option<i64>,
    /// Cardio only
    pub duration_seconds: Option<i64>,
    /// Cardio only
    pub calories: Option<i64>,
}

/// Set attributes bound to a kind and an owner, ready for validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetDraft {
    /// Variant chosen from the owning exercise
    pub kind: SetKind,
    /// Owning workout exercise
    pub workout_exercise_id: Option<i64>,
    /// Caller values
    pub attributes: SetAttributes,
}

/// A set that passed validation, with its volume computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidSet {
    /// Owning workout exercise
    pub workout_exercise_id: i64,
    /// 1-based position
    pub order_index: i64,
    /// Measurements
    pub metrics: SetMetrics,
    /// Volume to persist
    pub volume: i64,
}

impl SetDraft {
    /// Validate against the body part of the owning exercise
    ///
    /// Every rule is checked and all violations are returned together.
    ///
    /// # Errors
    ///
    /// Returns the accumulated violations when any rule fails
    pub fn validate(&self, body_part: BodyPart) -> Result<ValidSet, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let attrs = &self.attributes;

        if self.workout_exercise_id.is_none() {
            errors.add("workout_exercise", ValidationCode::Blank);
        }
        check_min("order_index", attrs.order_index, MIN_ORDER_INDEX, true, &mut errors);

        if !self.kind.matches(body_part) {
            errors.push(
                FieldError::new(BASE_FIELD, ValidationCode::InvalidExerciseKind)
                    .with_param("value", self.kind.as_str()),
            );
        }

        let metrics = match self.kind {
            SetKind::Strength => {
                check_min("weight", attrs.weight, 0, true, &mut errors);
                check_min("reps", attrs.reps, MIN_REPS, true, &mut errors);
                check_absent("duration_seconds", attrs.duration_seconds, &mut errors);
                check_absent("calories", attrs.calories, &mut errors);
                SetMetrics::Strength {
                    weight: attrs.weight.unwrap_or_default(),
                    reps: attrs.reps.unwrap_or_default(),
                }
            }
            SetKind::Cardio => {
                check_min(
                    "duration_seconds",
                    attrs.duration_seconds,
                    MIN_DURATION_SECONDS,
                    false,
                    &mut errors,
                );
                check_min("calories", attrs.calories, 0, false, &mut errors);
                check_absent("weight", attrs.weight, &mut errors);
                check_absent("reps", attrs.reps, &mut errors);
                SetMetrics::Cardio {
                    duration_seconds: attrs.duration_seconds,
                    calories: attrs.calories,
                }
            }
        };

        let volume = match metrics {
            SetMetrics::Strength { .. } => strength_volume(attrs.weight, attrs.reps),
            SetMetrics::Cardio { .. } => Some(0),
        };
        if volume.is_none() {
            errors.add("volume", ValidationCode::OutOfRange);
        }

        match (self.workout_exercise_id, attrs.order_index, volume) {
            (Some(workout_exercise_id), Some(order_index), Some(volume)) if errors.is_empty() => {
                Ok(ValidSet {
                    workout_exercise_id,
                    order_index,
                    metrics,
                    volume,
                })
            }
            _ => Err(errors),
        }
    }
}

fn check_min(
    field: &str,
    value: Option<i64>,
    min: i64,
    required: bool,
    errors: &mut ValidationErrors,
) {
    match value {
        None if required => errors.add(field, ValidationCode::Blank),
        Some(value) if value < min => errors.push(
            FieldError::new(field, ValidationCode::GreaterThanOrEqualTo)
                .with_param("count", min)
                .with_param("value", value),
        ),
        _ => {}
    }
}

fn check_absent(field: &str, value: Option<i64>, errors: &mut ValidationErrors) {
    if value.is_some() {
        errors.add(field, ValidationCode::Present);
    }
}
