// ABOUTME: Unified error handling system with standard error codes and HTTP status mapping
// ABOUTME: Defines AppError, ErrorCode, and conversions from the domain-specific error types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Every service operation returns [`AppResult`]. Domain-specific errors
//! ([`AuthError`], [`DatabaseError`], [`ValidationErrors`]) keep their own
//! structure and convert into [`AppError`] at the service boundary so the
//! (external) API layer has one shape to render.

/// Identity token verification errors
pub mod auth;
/// Persistence errors surfaced by repositories
pub mod database;
/// Field-scoped validation error collection
pub mod validation;

pub use auth::AuthError;
pub use database::DatabaseError;
pub use validation::{FieldError, ValidationCode, ValidationErrors};

use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes used throughout the application
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authentication (1000-1999)
    /// No credentials were presented
    #[serde(rename = "AUTH_REQUIRED")]
    AuthRequired = 1000,
    /// Credentials failed verification
    #[serde(rename = "AUTH_INVALID")]
    AuthInvalid = 1001,
    /// Credentials were valid once but have expired
    #[serde(rename = "AUTH_EXPIRED")]
    AuthExpired = 1002,

    // Validation (3000-3999)
    /// Caller-supplied argument structurally missing
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// Entity failed one or more domain invariants
    #[serde(rename = "VALIDATION_FAILED")]
    ValidationFailed = 3001,

    // Resource Management (4000-4999)
    /// Referenced entity does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,
    /// Delete blocked by a referential-integrity rule
    #[serde(rename = "RESTRICTED_DELETION")]
    RestrictedDeletion = 4001,

    // External Services (5000-5999)
    /// Identity provider or other upstream failure
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,

    // Configuration (6000-6999)
    /// Required configuration is missing
    #[serde(rename = "CONFIG_MISSING")]
    ConfigMissing = 6001,
    /// Configuration value could not be parsed
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6002,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Storage failure not attributable to caller input
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput => 400,
            Self::AuthRequired | Self::AuthInvalid | Self::AuthExpired => 401,
            Self::ResourceNotFound => 404,
            Self::RestrictedDeletion => 409,
            Self::ValidationFailed => 422,
            Self::ExternalServiceError => 502,
            Self::InternalError
            | Self::DatabaseError
            | Self::ConfigMissing
            | Self::ConfigInvalid => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::AuthRequired => "Authentication is required to access this resource",
            Self::AuthInvalid => "The provided authentication credentials are invalid",
            Self::AuthExpired => "The authentication token has expired",
            Self::InvalidInput => "The provided input is invalid",
            Self::ValidationFailed => "The submitted record failed validation",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::RestrictedDeletion => "The resource is still referenced and cannot be deleted",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::ConfigMissing => "Required configuration is missing",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InternalError => "An internal server error occurred",
            Self::DatabaseError => "Database operation failed",
        }
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Resource identifier if applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// Every violated rule, reported together
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<FieldError>,
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add a resource ID to the error context
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.context.resource_id = Some(resource_id.into());
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Violations carried by a `ValidationFailed` error (empty otherwise)
    #[must_use]
    pub fn violations(&self) -> &[FieldError] {
        &self.context.violations
    }

    /// Authentication required
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "Authentication required")
    }

    /// Invalid authentication
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Delete blocked because other records still reference the resource
    pub fn restricted_deletion(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RestrictedDeletion, message)
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Entity failed validation; all violations are kept
    #[must_use]
    pub fn validation(errors: ValidationErrors) -> Self {
        let mut error = Self::new(
            ErrorCode::ValidationFailed,
            format!("Validation failed: {errors}"),
        );
        error.context.violations = errors.into_vec();
        error
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// External service error
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error payload
    pub error: ErrorResponseDetails,
}

/// Body of an [`ErrorResponse`]
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Field-scoped violations for validation failures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
                errors: error.context.violations,
            },
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        Self::validation(errors)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::AuthRequired.http_status(), 401);
        assert_eq!(ErrorCode::ValidationFailed.http_status(), 422);
        assert_eq!(ErrorCode::RestrictedDeletion.http_status(), 409);
        assert_eq!(ErrorCode::ResourceNotFound.http_status(), 404);
        assert_eq!(ErrorCode::InternalError.http_status(), 500);
    }

    #[test]
    fn test_validation_error_keeps_every_violation() {
        let mut errors = ValidationErrors::new();
        errors.add("name", ValidationCode::Blank);
        errors.add("body_part", ValidationCode::Blank);

        let error = AppError::from(errors);
        assert_eq!(error.code, ErrorCode::ValidationFailed);
        assert_eq!(error.violations().len(), 2);
    }

    #[test]
    fn test_error_response_serialization() {
        let mut errors = ValidationErrors::new();
        errors.add("order_index", ValidationCode::Taken);
        let response = ErrorResponse::from(AppError::validation(errors));

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("VALIDATION_FAILED"));
        assert!(json.contains("order_index"));
        assert!(json.contains("taken"));
    }
}
