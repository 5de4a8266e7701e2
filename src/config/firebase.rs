// ABOUTME: Firebase Authentication configuration for identity token verification
// ABOUTME: Project id, emulator mode, key cache fallback TTL, and certificate endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::environment::{non_blank, parse_bool_var, ConfigError};
use crate::constants::{env_config, firebase};

/// Firebase Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FirebaseConfig {
    /// Firebase project id; expected token audience
    pub project_id: String,
    /// Accept unsigned tokens from the local emulator
    pub use_emulator: bool,
    /// Key cache lifetime when the certificate response has no `max-age`
    pub default_key_ttl_secs: i64,
    /// Certificate endpoint
    pub certs_url: String,
}

impl FirebaseConfig {
    /// Production settings for `project_id`
    #[must_use]
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            use_emulator: false,
            default_key_ttl_secs: firebase::DEFAULT_KEY_CACHE_TTL_SECS,
            certs_url: firebase::CERTS_URL.to_owned(),
        }
    }

    /// Load Firebase configuration through a variable lookup
    ///
    /// Environment variables:
    /// - `FIREBASE_PROJECT_ID` - Firebase project id (required)
    /// - `USE_FIREBASE_EMULATOR` - Accept unsigned emulator tokens (default: false)
    /// - `FIREBASE_KEY_CACHE_TTL_SECS` - Fallback public key cache TTL (default: 3600, max: one week)
    /// - `FIREBASE_CERTS_URL` - Certificate endpoint override
    ///
    /// # Errors
    ///
    /// Returns an error if the project id is missing or a value fails to parse
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let project_id =
            non_blank(lookup, env_config::FIREBASE_PROJECT_ID).ok_or(ConfigError::Missing {
                key: env_config::FIREBASE_PROJECT_ID,
            })?;

        let use_emulator = parse_bool_var(lookup, env_config::USE_FIREBASE_EMULATOR, false)?;
        if use_emulator {
            warn!("Firebase emulator mode enabled: unsigned tokens will be accepted");
        }

        let default_key_ttl_secs = match non_blank(lookup, env_config::FIREBASE_KEY_CACHE_TTL_SECS)
        {
            None => firebase::DEFAULT_KEY_CACHE_TTL_SECS,
            Some(value) => value
                .parse::<i64>()
                .ok()
                .filter(|ttl| (0..=firebase::MAX_KEY_CACHE_TTL_SECS).contains(ttl))
                .ok_or(ConfigError::Invalid {
                    key: env_config::FIREBASE_KEY_CACHE_TTL_SECS,
                    value,
                    reason: "expected between 0 and 604800 seconds",
                })?,
        };

        Ok(Self {
            project_id,
            use_emulator,
            default_key_ttl_secs,
            certs_url: non_blank(lookup, env_config::FIREBASE_CERTS_URL)
                .unwrap_or_else(|| firebase::CERTS_URL.to_owned()),
        })
    }
}
