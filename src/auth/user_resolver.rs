// ABOUTME: Maps verified Firebase claims to a stored user, creating or refreshing it
// ABOUTME: Upsert-by-subject with claim sanitization and the deployment's field presence policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use tracing::{debug, info};

use setbook_core::errors::{AppError, AppResult, ValidationCode, ValidationErrors};
use setbook_core::models::{User, UserFieldPolicy, UserProfile};

use super::claims::FirebaseClaims;
use crate::database::repositories::UserRepository;

/// Resolves verified claims to the user they belong to
#[derive(Clone)]
pub struct UserResolver {
    users: Arc<dyn UserRepository>,
    policy: UserFieldPolicy,
}

impl UserResolver {
    /// Resolver writing through `users` and enforcing `policy`
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>, policy: UserFieldPolicy) -> Self {
        Self { users, policy }
    }

    /// Find or create the user for `claims.sub` and refresh its profile
    ///
    /// Profile fields are always overwritten with the sanitized claim values,
    /// so a claim that disappears clears the stored field.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the subject is empty or the sanitized
    /// profile violates the field policy, or a database error if the write fails
    pub async fn resolve_from_claims(&self, claims: &FirebaseClaims) -> AppResult<User> {
        let firebase_uid = claims.sub.trim();
        if firebase_uid.is_empty() {
            let mut errors = ValidationErrors::new();
            errors.add("firebase_uid", ValidationCode::Blank);
            return Err(AppError::validation(errors));
        }

        let profile = UserProfile::from_claims(
            claims.email.as_deref(),
            claims.name.as_deref(),
            claims.picture.as_deref(),
        );
        profile.validate(self.policy)?;

        if let Some(existing) = self.users.get_by_firebase_uid(firebase_uid).await? {
            let user = self.users.update_profile(existing.id, &profile).await?;
            debug!(
                user_id = user.id,
                firebase_uid = %firebase_uid,
                "Refreshed user profile from token claims"
            );
            return Ok(user);
        }

        let user = self.users.create(firebase_uid, &profile).await?;
        info!(
            user_id = user.id,
            firebase_uid = %firebase_uid,
            provider = %claims.provider,
            "Created user on first sign-in"
        );
        Ok(user)
    }
}
