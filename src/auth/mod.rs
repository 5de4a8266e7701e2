// ABOUTME: Request authentication from bearer token to resolved user
// ABOUTME: Bearer extraction, Firebase token verification, and user upsert from verified claims
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Authentication
//!
//! A request is authenticated in three steps:
//!
//! 1. [`extract_bearer_token`] pulls the token out of the `Authorization` header
//! 2. [`firebase::FirebaseAuth`] verifies it and returns the claim set
//! 3. [`user_resolver::UserResolver`] maps the claims to a stored user
//!
//! [`Authenticator`] runs all three. Nothing is written unless verification
//! succeeds.

pub mod claims;
pub mod clock;
pub mod firebase;
pub mod keys;
pub mod user_resolver;

use std::sync::Arc;

use tracing::warn;

use setbook_core::errors::{AppError, AppResult, ErrorCode};
use setbook_core::models::User;

pub use claims::FirebaseClaims;
pub use firebase::FirebaseAuth;
pub use user_resolver::UserResolver;

const BEARER_PREFIX: &str = "Bearer ";

/// Token from an `Authorization: Bearer <token>` header value
///
/// Returns `None` for a missing header, another scheme, or an empty token.
#[must_use]
pub fn extract_bearer_token(header: Option<&str>) -> Option<&str> {
    header?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Verifies bearer tokens and resolves the user behind them
#[derive(Clone)]
pub struct Authenticator {
    verifier: Arc<FirebaseAuth>,
    resolver: UserResolver,
}

impl Authenticator {
    /// Combine a verifier and a resolver
    #[must_use]
    pub fn new(verifier: Arc<FirebaseAuth>, resolver: UserResolver) -> Self {
        Self { verifier, resolver }
    }

    /// Authenticate a request from its `Authorization` header value
    ///
    /// # Errors
    ///
    /// - `AuthRequired` when no bearer token is present
    /// - `AuthInvalid` when the token fails verification
    /// - A validation or database error when the user cannot be resolved
    pub async fn authenticate(&self, authorization: Option<&str>) -> AppResult<User> {
        let token = extract_bearer_token(authorization).ok_or_else(AppError::auth_required)?;

        let claims = self.verifier.verify_id_token(token).await.map_err(|e| {
            if e.is_verification_failure() {
                warn!(error = %e, "Rejected bearer token");
                AppError::new(ErrorCode::AuthInvalid, "Invalid token").with_source(e)
            } else {
                AppError::from(e)
            }
        })?;

        self.resolver.resolve_from_claims(&claims).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token(Some("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token(Some("Bearer ")), None);
        assert_eq!(extract_bearer_token(Some("Basic abc")), None);
        assert_eq!(extract_bearer_token(Some("bearer abc")), None);
        assert_eq!(extract_bearer_token(None), None);
    }
}
