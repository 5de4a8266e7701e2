// ABOUTME: Translation of SQLite constraint failures into domain database errors
// ABOUTME: Unique and check violations become field validation errors, blocked deletes become RestrictedDeletion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use sqlx::error::ErrorKind;
use tracing::debug;

use setbook_core::errors::{DatabaseError, FieldError, ValidationCode, ValidationErrors};

/// Unique constraints, by the column list SQLite reports, and the field they guard
const UNIQUE_FIELDS: &[(&str, &str)] = &[
    ("users.firebase_uid", "firebase_uid"),
    ("exercises.name", "name"),
    (
        "workout_exercises.workout_id, workout_exercises.order_index",
        "order_index",
    ),
    (
        "workout_exercises.workout_id, workout_exercises.exercise_id",
        "exercise",
    ),
    (
        "workout_sets.workout_exercise_id, workout_sets.order_index",
        "order_index",
    ),
];

/// Named check constraints and the field rule each one mirrors
const CHECK_FIELDS: &[(&str, &str, ValidationCode)] = &[
    (
        "exercises_laterality_matches_kind",
        "laterality",
        ValidationCode::InvalidFormat,
    ),
    (
        "workout_exercises_order_index_positive",
        "order_index",
        ValidationCode::GreaterThanOrEqualTo,
    ),
    (
        "workout_sets_order_index_positive",
        "order_index",
        ValidationCode::GreaterThanOrEqualTo,
    ),
];

/// Translate a failed insert or update
///
/// Constraint violations that correspond to a field rule come back as
/// [`DatabaseError::Validation`]; everything else is a query error.
pub(crate) fn translate_write_error(error: sqlx::Error) -> DatabaseError {
    let Some(db_error) = error.as_database_error() else {
        return error.into();
    };

    let message = db_error.message();
    let field_error = match db_error.kind() {
        ErrorKind::UniqueViolation => unique_field(message)
            .map(|field| FieldError::new(field, ValidationCode::Taken)),
        ErrorKind::CheckViolation => check_field(message)
            .map(|(field, code)| FieldError::new(field, code)),
        _ => None,
    };

    match field_error {
        Some(field_error) => {
            debug!(
                constraint = %message,
                field = %field_error.field,
                "Write rejected by constraint"
            );
            DatabaseError::Validation(ValidationErrors::from(field_error))
        }
        None => error.into(),
    }
}

/// Translate a failed delete of a row other rows may still reference
pub(crate) fn translate_delete_error(
    error: sqlx::Error,
    entity_type: &'static str,
    entity_id: i64,
) -> DatabaseError {
    let is_restricted = error
        .as_database_error()
        .is_some_and(|db_error| matches!(db_error.kind(), ErrorKind::ForeignKeyViolation));

    if is_restricted {
        debug!(entity_type, entity_id, "Delete blocked by referencing rows");
        DatabaseError::RestrictedDeletion {
            entity_type,
            entity_id: entity_id.to_string(),
        }
    } else {
        error.into()
    }
}

/// Field guarded by the unique constraint named in a SQLite error message
///
/// SQLite reports `UNIQUE constraint failed: table.col[, table.col]`.
fn unique_field(message: &str) -> Option<&'static str> {
    let columns = message.split_once(": ").map_or(message, |(_, cols)| cols);
    UNIQUE_FIELDS
        .iter()
        .find(|(constraint, _)| *constraint == columns.trim())
        .map(|(_, field)| *field)
}

/// Field rule mirrored by the named check constraint in a SQLite error message
fn check_field(message: &str) -> Option<(&'static str, ValidationCode)> {
    CHECK_FIELDS
        .iter()
        .find(|(constraint, _, _)| message.contains(constraint))
        .map(|(_, field, code)| (*field, *code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_field_lookup() {
        assert_eq!(
            unique_field("UNIQUE constraint failed: exercises.name"),
            Some("name")
        );
        assert_eq!(
            unique_field(
                "UNIQUE constraint failed: workout_exercises.workout_id, workout_exercises.exercise_id"
            ),
            Some("exercise")
        );
        assert_eq!(
            unique_field(
                "UNIQUE constraint failed: workout_sets.workout_exercise_id, workout_sets.order_index"
            ),
            Some("order_index")
        );
        assert_eq!(unique_field("UNIQUE constraint failed: other.col"), None);
    }

    #[test]
    fn test_check_field_lookup() {
        assert_eq!(
            check_field("CHECK constraint failed: exercises_laterality_matches_kind"),
            Some(("laterality", ValidationCode::InvalidFormat))
        );
        assert_eq!(check_field("CHECK constraint failed: something_else"), None);
    }
}
