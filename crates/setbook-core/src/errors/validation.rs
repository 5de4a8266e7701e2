// ABOUTME: Field-scoped validation errors collected across every rule of an entity
// ABOUTME: Provides ValidationCode, FieldError, and the accumulating ValidationErrors list
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Machine-readable reason a field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationCode {
    /// Required value missing or whitespace-only
    Blank,
    /// Value must be absent but was supplied
    Present,
    /// Value exceeds its maximum length
    TooLong,
    /// Value below its lower bound
    GreaterThanOrEqualTo,
    /// Value collides with an existing record
    Taken,
    /// Value does not match the expected format
    InvalidFormat,
    /// End time not strictly after start time
    MustBeAfterStartTime,
    /// Set kind does not agree with the exercise's body part
    InvalidExerciseKind,
    /// Change would break records that already reference this one
    KindLocked,
    /// Derived value overflowed its representable range
    OutOfRange,
}

impl ValidationCode {
    /// Stable wire name of this code
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::Present => "present",
            Self::TooLong => "too_long",
            Self::GreaterThanOrEqualTo => "greater_than_or_equal_to",
            Self::Taken => "taken",
            Self::InvalidFormat => "invalid_format",
            Self::MustBeAfterStartTime => "must_be_after_start_time",
            Self::InvalidExerciseKind => "invalid_exercise_kind",
            Self::KindLocked => "kind_locked",
            Self::OutOfRange => "out_of_range",
        }
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single violated rule on one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// Attribute name, or `base` for record-level rules
    pub field: String,
    /// Which rule was violated
    pub code: ValidationCode,
    /// Rule parameters such as `count` for length limits
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, Value>,
}

impl FieldError {
    /// Create an error without parameters
    pub fn new(field: impl Into<String>, code: ValidationCode) -> Self {
        Self {
            field: field.into(),
            code,
            params: Map::new(),
        }
    }

    /// Attach a rule parameter
    #[must_use]
    pub fn with_param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_owned(), value.into());
        self
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.code)
    }
}

/// Every rule an entity violated, in the order the rules were checked
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Empty collection
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record a violation without parameters
    pub fn add(&mut self, field: impl Into<String>, code: ValidationCode) {
        self.errors.push(FieldError::new(field, code));
    }

    /// Record a fully built violation
    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    /// Append every violation from another collection
    pub fn extend(&mut self, other: Self) {
        self.errors.extend(other.errors);
    }

    /// True when no rule was violated
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of violations
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether `field` has a violation with `code`
    #[must_use]
    pub fn has(&self, field: &str, code: ValidationCode) -> bool {
        self.errors
            .iter()
            .any(|error| error.field == field && error.code == code)
    }

    /// Violations recorded against `field`
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.errors.iter().filter(move |error| error.field == field)
    }

    /// Borrow the violations
    #[must_use]
    pub fn as_slice(&self) -> &[FieldError] {
        &self.errors
    }

    /// Consume into the underlying list
    #[must_use]
    pub fn into_vec(self) -> Vec<FieldError> {
        self.errors
    }

    /// `Ok(value)` when empty, otherwise `Err(self)`
    ///
    /// # Errors
    ///
    /// Returns the collection itself when at least one violation was recorded
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl StdError for ValidationErrors {}
