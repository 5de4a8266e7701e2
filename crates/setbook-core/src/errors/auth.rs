// ABOUTME: Identity token verification error types
// ABOUTME: Separates caller mistakes, verification failures, and key or configuration problems
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

use super::{AppError, ErrorCode};

/// Why an identity token was not accepted
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token or project id missing from the call itself
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Token is malformed, badly signed, or a claim check failed
    #[error("token verification failed: {reason}")]
    Verification {
        /// Which check failed
        reason: String,
    },

    /// Token names a signing key the provider does not publish
    #[error("no public key found for kid '{kid}'")]
    KeyNotFound {
        /// Key id from the token header
        kid: String,
    },

    /// Public keys could not be retrieved or parsed
    #[error("failed to fetch signing keys: {0}")]
    KeyFetch(String),

    /// Verifier is not configured correctly
    #[error("authentication misconfigured: {0}")]
    Configuration(String),
}

impl AuthError {
    /// Shorthand for a failed verification check
    pub fn verification(reason: impl Into<String>) -> Self {
        Self::Verification {
            reason: reason.into(),
        }
    }

    /// Whether this error should be reported to callers as an invalid token
    #[must_use]
    pub const fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            Self::Verification { .. } | Self::KeyNotFound { .. } | Self::KeyFetch(_)
        )
    }
}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> Self {
        match &error {
            AuthError::InvalidArgument(message) => Self::invalid_input(message.clone()),
            AuthError::Verification { .. } | AuthError::KeyNotFound { .. } => {
                Self::new(ErrorCode::AuthInvalid, "Invalid token").with_source(error)
            }
            AuthError::KeyFetch(message) => {
                Self::external_service("identity provider", message.clone()).with_source(error)
            }
            AuthError::Configuration(message) => {
                Self::new(ErrorCode::ConfigInvalid, message.clone())
            }
        }
    }
}
