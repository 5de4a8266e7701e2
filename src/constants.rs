// ABOUTME: System-wide constants for the Setbook API
// ABOUTME: Identity provider endpoints, environment variable names, and configuration defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Constants Module

/// Service names used in structured logging
pub mod service_names {
    /// Library and API service name
    pub const SETBOOK_API: &str = "setbook-api";
    /// Administrative CLI name
    pub const SETBOOK_ADMIN: &str = "setbook-admin";
}

/// Firebase identity provider constants
pub mod firebase {
    /// Google's public x509 certificates for Firebase ID tokens
    pub const CERTS_URL: &str =
        "https://www.googleapis.com/robot/v1/metadata/x509/securetoken@system.gserviceaccount.com";

    /// Issuer prefix; the project id is appended
    pub const ISSUER_PREFIX: &str = "https://securetoken.google.com/";

    /// Key cache lifetime when the response carries no usable `max-age`
    pub const DEFAULT_KEY_CACHE_TTL_SECS: i64 = 3600;

    /// Longest key cache lifetime accepted from a header or configuration (one week)
    pub const MAX_KEY_CACHE_TTL_SECS: i64 = 7 * 24 * 3600;

    /// Algorithm of unsigned emulator tokens
    pub const EMULATOR_ALGORITHM: &str = "none";

    /// Provider reported when the token carries no `firebase.sign_in_provider`
    pub const UNKNOWN_PROVIDER: &str = "unknown";
}

/// Environment variable names read by the configuration layer
pub mod env_config {
    /// Firebase project id (required)
    pub const FIREBASE_PROJECT_ID: &str = "FIREBASE_PROJECT_ID";
    /// Accept unsigned emulator tokens
    pub const USE_FIREBASE_EMULATOR: &str = "USE_FIREBASE_EMULATOR";
    /// Fallback key cache TTL
    pub const FIREBASE_KEY_CACHE_TTL_SECS: &str = "FIREBASE_KEY_CACHE_TTL_SECS";
    /// Override for the certificate endpoint
    pub const FIREBASE_CERTS_URL: &str = "FIREBASE_CERTS_URL";
    /// Database connection URL
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    /// Require an email on every user
    pub const SETBOOK_REQUIRE_EMAIL: &str = "SETBOOK_REQUIRE_EMAIL";
    /// Require a display name on every user
    pub const SETBOOK_REQUIRE_NAME: &str = "SETBOOK_REQUIRE_NAME";
}

/// Configuration defaults
pub mod defaults {
    /// SQLite file used when `DATABASE_URL` is unset
    pub const DATABASE_URL: &str = "sqlite:./data/setbook.db";
}
