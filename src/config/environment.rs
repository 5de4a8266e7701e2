// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and fail-fast configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management

use std::env;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use setbook_core::errors::{AppError, ErrorCode};
use setbook_core::models::UserFieldPolicy;

use super::FirebaseConfig;
use crate::constants::{defaults, env_config};

/// Configuration could not be loaded
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A mandatory variable is unset or blank
    #[error("required configuration '{key}' is not set")]
    Missing {
        /// Variable name
        key: &'static str,
    },

    /// A variable is set but cannot be parsed
    #[error("invalid value '{value}' for '{key}': {reason}")]
    Invalid {
        /// Variable name
        key: &'static str,
        /// Raw value
        value: String,
        /// What was expected
        reason: &'static str,
    },
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let code = match error {
            ConfigError::Missing { .. } => ErrorCode::ConfigMissing,
            ConfigError::Invalid { .. } => ErrorCode::ConfigInvalid,
        };
        Self::new(code, error.to_string())
    }
}

/// Environment type for deployment behavior
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Database connection settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: defaults::DATABASE_URL.to_owned(),
        }
    }
}

/// Complete startup configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Identity token verification
    pub firebase: FirebaseConfig,
    /// Which user profile fields are mandatory
    pub user_fields: UserFieldPolicy,
}

impl ServerConfig {
    /// Load configuration from process environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `FIREBASE_PROJECT_ID` is unset or any value fails to parse
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading configuration from environment variables");
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns an error if `FIREBASE_PROJECT_ID` is unset or any value fails to parse
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            environment: lookup(env_config::ENVIRONMENT)
                .map(|value| Environment::from_str_or_default(&value))
                .unwrap_or_default(),
            database: DatabaseConfig {
                url: non_blank(&lookup, env_config::DATABASE_URL)
                    .unwrap_or_else(|| defaults::DATABASE_URL.to_owned()),
            },
            firebase: FirebaseConfig::from_lookup(&lookup)?,
            user_fields: UserFieldPolicy {
                require_email: parse_bool_var(&lookup, env_config::SETBOOK_REQUIRE_EMAIL, false)?,
                require_name: parse_bool_var(&lookup, env_config::SETBOOK_REQUIRE_NAME, false)?,
            },
        };

        info!(
            environment = %config.environment,
            project_id = %config.firebase.project_id,
            emulator = config.firebase.use_emulator,
            "Configuration loaded"
        );

        Ok(config)
    }
}

/// Trimmed value of `key`, or `None` when unset or blank
pub(crate) fn non_blank<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Parse a boolean variable, falling back to `default` when unset
pub(crate) fn parse_bool_var<F>(
    lookup: &F,
    key: &'static str,
    default: bool,
) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    non_blank(lookup, key).map_or(Ok(default), |value| {
        parse_bool(&value).ok_or(ConfigError::Invalid {
            key,
            value,
            reason: "expected a boolean",
        })
    })
}

/// Accepts `1/0`, `true/false`, `yes/no`, `on/off` in any case
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
