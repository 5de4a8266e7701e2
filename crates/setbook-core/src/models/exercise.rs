// ABOUTME: Exercise catalog entity with body part and laterality enumerations
// ABOUTME: Validates exercise drafts, including the cardio/laterality consistency rule
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::limits::{EXERCISE_MEMO_MAX_CHARS, EXERCISE_NAME_MAX_CHARS};
use crate::errors::{FieldError, ValidationCode, ValidationErrors};

/// Muscle group trained by an exercise; `Cardio` doubles as the kind discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    /// Lower body
    Legs,
    /// Posterior chain and lats
    Back,
    /// Deltoids
    Shoulders,
    /// Biceps, triceps, forearms
    Arms,
    /// Pectorals
    Chest,
    /// Conditioning work measured by time and energy, not load
    Cardio,
}

impl BodyPart {
    /// Every body part in declaration order
    pub const ALL: [Self; 6] = [
        Self::Legs,
        Self::Back,
        Self::Shoulders,
        Self::Arms,
        Self::Chest,
        Self::Cardio,
    ];

    /// Storage and wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Legs => "legs",
            Self::Back => "back",
            Self::Shoulders => "shoulders",
            Self::Arms => "arms",
            Self::Chest => "chest",
            Self::Cardio => "cardio",
        }
    }

    /// Whether sets under this body part are cardio sets
    #[must_use]
    pub const fn is_cardio(self) -> bool {
        matches!(self, Self::Cardio)
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BodyPart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|part| part.as_str() == s)
            .ok_or_else(|| format!("unknown body part '{s}'"))
    }
}

/// Whether a strength exercise uses both limbs together or one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Laterality {
    /// Both limbs together
    Bilateral,
    /// One limb at a time
    Unilateral,
}

impl Laterality {
    /// Storage and wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bilateral => "bilateral",
            Self::Unilateral => "unilateral",
        }
    }
}

impl fmt::Display for Laterality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Laterality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bilateral" => Ok(Self::Bilateral),
            "unilateral" => Ok(Self::Unilateral),
            other => Err(format!("unknown laterality '{other}'")),
        }
    }
}

/// A persisted exercise definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// Row id
    pub id: i64,
    /// Display name, unique across the catalog
    pub name: String,
    /// Trained muscle group
    pub body_part: BodyPart,
    /// `None` exactly when `body_part` is cardio
    pub laterality: Option<Laterality>,
    /// Free-form note
    pub memo: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Exercise {
    /// Whether sets logged against this exercise are cardio sets
    #[must_use]
    pub const fn is_cardio(&self) -> bool {
        self.body_part.is_cardio()
    }

    /// Draft pre-filled with this exercise's current values
    #[must_use]
    pub fn to_draft(&self) -> ExerciseDraft {
        ExerciseDraft {
            name: Some(self.name.clone()),
            body_part: Some(self.body_part),
            laterality: self.laterality,
            memo: self.memo.clone(),
        }
    }
}

/// Caller-supplied exercise attributes before validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseDraft {
    /// Display name
    pub name: Option<String>,
    /// Trained muscle group
    pub body_part: Option<BodyPart>,
    /// Limb usage; must be absent for cardio
    pub laterality: Option<Laterality>,
    /// Free-form note
    pub memo: Option<String>,
}

/// Exercise attributes that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidExercise {
    /// Trimmed display name
    pub name: String,
    /// Trained muscle group
    pub body_part: BodyPart,
    /// `None` exactly when `body_part` is cardio
    pub laterality: Option<Laterality>,
    /// Free-form note
    pub memo: Option<String>,
}

impl ExerciseDraft {
    /// Check every exercise rule, reporting all violations together
    ///
    /// # Errors
    ///
    /// Returns the accumulated violations when any rule fails
    pub fn validate(&self) -> Result<ValidExercise, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = self.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            errors.add("name", ValidationCode::Blank);
        } else if name.chars().count() > EXERCISE_NAME_MAX_CHARS {
            errors.push(
                FieldError::new("name", ValidationCode::TooLong)
                    .with_param("count", EXERCISE_NAME_MAX_CHARS),
            );
        }

        if self.body_part.is_none() {
            errors.add("body_part", ValidationCode::Blank);
        }

        // Presence/absence is decided before anything looks at the laterality value
        match (self.body_part, self.laterality) {
            (Some(BodyPart::Cardio), Some(_)) => errors.add("laterality", ValidationCode::Present),
            (Some(part), None) if !part.is_cardio() => {
                errors.add("laterality", ValidationCode::Blank);
            }
            _ => {}
        }

        if let Some(memo) = &self.memo {
            if memo.chars().count() > EXERCISE_MEMO_MAX_CHARS {
                errors.push(
                    FieldError::new("memo", ValidationCode::TooLong)
                        .with_param("count", EXERCISE_MEMO_MAX_CHARS),
                );
            }
        }

        match self.body_part {
            Some(body_part) if errors.is_empty() => Ok(ValidExercise {
                name: name.to_owned(),
                body_part,
                laterality: self.laterality,
                memo: self.memo.clone().filter(|memo| !memo.is_empty()),
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft(body_part: BodyPart, laterality: Option<Laterality>) -> ExerciseDraft {
        ExerciseDraft {
            name: Some("Bench Press".into()),
            body_part: Some(body_part),
            laterality,
            memo: None,
        }
    }

    #[test]
    fn test_cardio_requires_absent_laterality() {
        let errors = draft(BodyPart::Cardio, Some(Laterality::Bilateral))
            .validate()
            .unwrap_err();
        assert!(errors.has("laterality", ValidationCode::Present));

        assert!(draft(BodyPart::Cardio, None).validate().is_ok());
    }

    #[test]
    fn test_strength_requires_laterality() {
        let errors = draft(BodyPart::Chest, None).validate().unwrap_err();
        assert!(errors.has("laterality", ValidationCode::Blank));

        let valid = draft(BodyPart::Chest, Some(Laterality::Bilateral))
            .validate()
            .unwrap();
        assert_eq!(valid.name, "Bench Press");
        assert_eq!(valid.laterality, Some(Laterality::Bilateral));
    }

    #[test]
    fn test_reports_all_violations_together() {
        let errors = ExerciseDraft {
            name: Some("   ".into()),
            body_part: None,
            laterality: None,
            memo: Some("x".repeat(EXERCISE_MEMO_MAX_CHARS + 1)),
        }
        .validate()
        .unwrap_err();

        assert!(errors.has("name", ValidationCode::Blank));
        assert!(errors.has("body_part", ValidationCode::Blank));
        assert!(errors.has("memo", ValidationCode::TooLong));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_name_length_limit() {
        let mut long = draft(BodyPart::Legs, Some(Laterality::Unilateral));
        long.name = Some("a".repeat(EXERCISE_NAME_MAX_CHARS));
        assert!(long.validate().is_ok());

        long.name = Some("a".repeat(EXERCISE_NAME_MAX_CHARS + 1));
        let errors = long.validate().unwrap_err();
        let error = errors.for_field("name").next().unwrap();
        assert_eq!(error.code, ValidationCode::TooLong);
        assert_eq!(error.params["count"], 255);
    }

    #[test]
    fn test_body_part_round_trips_through_str() {
        for part in BodyPart::ALL {
            assert_eq!(part.as_str().parse::<BodyPart>().unwrap(), part);
        }
        assert!("neck".parse::<BodyPart>().is_err());
    }
}
