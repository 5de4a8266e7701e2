// ABOUTME: Structured error types for persistence operations
// ABOUTME: Distinguishes missing rows, blocked deletes, constraint violations, and query failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

use super::{AppError, ValidationErrors};

/// Errors surfaced by repositories
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Row does not exist (or is not visible to the caller)
    #[error("{entity_type} '{entity_id}' not found")]
    NotFound {
        /// Kind of record
        entity_type: &'static str,
        /// Identifier that was looked up
        entity_id: String,
    },

    /// Delete refused because dependent rows still reference the record
    #[error("cannot delete {entity_type} '{entity_id}': still referenced")]
    RestrictedDeletion {
        /// Kind of record
        entity_type: &'static str,
        /// Identifier of the record
        entity_id: String,
    },

    /// Write rejected by a storage constraint that maps onto a field rule
    #[error("constraint violation: {0}")]
    Validation(ValidationErrors),

    /// Any other storage failure
    #[error("database query failed: {context}")]
    QueryError {
        /// Driver message
        context: String,
    },
}

impl DatabaseError {
    /// Build a `NotFound` for the given entity
    pub fn not_found(entity_type: &'static str, entity_id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            entity_id: entity_id.to_string(),
        }
    }
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        Self::QueryError {
            context: error.to_string(),
        }
    }
}

impl From<DatabaseError> for AppError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound {
                entity_type,
                entity_id,
            } => Self::not_found(entity_type).with_resource_id(entity_id),
            DatabaseError::RestrictedDeletion {
                entity_type,
                entity_id,
            } => Self::restricted_deletion(format!(
                "{entity_type} is still referenced and cannot be deleted"
            ))
            .with_resource_id(entity_id),
            DatabaseError::Validation(errors) => Self::validation(errors),
            query @ DatabaseError::QueryError { .. } => {
                Self::database("Database operation failed").with_source(query)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::errors::{ErrorCode, ValidationCode};

    #[test]
    fn test_not_found_maps_to_resource_not_found() {
        let error = AppError::from(DatabaseError::not_found("Workout", 42));
        assert_eq!(error.code, ErrorCode::ResourceNotFound);
        assert_eq!(error.context.resource_id.as_deref(), Some("42"));
    }

    #[test]
    fn test_constraint_violation_maps_to_validation() {
        let mut errors = ValidationErrors::new();
        errors.add("name", ValidationCode::Taken);
        let error = AppError::from(DatabaseError::Validation(errors));
        assert_eq!(error.code, ErrorCode::ValidationFailed);
        assert_eq!(error.violations()[0].field, "name");
    }
}
