// ABOUTME: User records keyed by the identity provider's subject id
// ABOUTME: Claim sanitization and per-deployment field presence policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{ValidationCode, ValidationErrors};

/// Same shape as the HTML5 email input rule
static EMAIL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .ok()
});

static IMAGE_URL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^https?://.+").ok());

/// A persisted user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Row id
    pub id: i64,
    /// Identity provider subject; unique and immutable
    pub firebase_uid: String,
    /// Lower-cased email
    pub email: Option<String>,
    /// Display name
    pub name: Option<String>,
    /// Avatar URL
    pub image_url: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last refresh timestamp
    pub updated_at: DateTime<Utc>,
}

/// Which profile fields a deployment insists on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFieldPolicy {
    /// Reject users without an email
    pub require_email: bool,
    /// Reject users without a display name
    pub require_name: bool,
}

/// Profile fields refreshed from every verified token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Lower-cased email
    pub email: Option<String>,
    /// Display name
    pub name: Option<String>,
    /// Avatar URL
    pub image_url: Option<String>,
}

impl UserProfile {
    /// Sanitize raw claim values
    #[must_use]
    pub fn from_claims(email: Option<&str>, name: Option<&str>, picture: Option<&str>) -> Self {
        Self {
            email: sanitize_email(email),
            name: sanitize_name(name),
            image_url: sanitize_image_url(picture),
        }
    }

    /// Check the profile against the deployment policy
    ///
    /// # Errors
    ///
    /// Returns the accumulated violations when any rule fails
    pub fn validate(&self, policy: UserFieldPolicy) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        match &self.email {
            None if policy.require_email => errors.add("email", ValidationCode::Blank),
            Some(email) if !is_valid_email(email) => {
                errors.add("email", ValidationCode::InvalidFormat);
            }
            _ => {}
        }
        if policy.require_name && self.name.is_none() {
            errors.add("name", ValidationCode::Blank);
        }

        errors.into_result(())
    }
}

/// Trim and lower-case; blank becomes `None`
#[must_use]
pub fn sanitize_email(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(str::to_lowercase)
}

/// Trim; blank becomes `None`
#[must_use]
pub fn sanitize_name(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
}

/// Keep only `http(s)://` URLs
#[must_use]
pub fn sanitize_image_url(value: Option<&str>) -> Option<String> {
    let url = value?.trim();
    IMAGE_URL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(url))
        .then(|| url.to_owned())
}

/// Whether `value` looks like an email address
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(value))
}
