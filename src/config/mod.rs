// ABOUTME: Configuration management module for startup-time settings
// ABOUTME: Loads environment, database, identity provider, and user field policy settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for the Setbook API
//!
//! All configuration is read once at startup into a [`ServerConfig`].
//! Construction fails when a mandatory value is missing, so a misconfigured
//! deployment never serves a request.

/// Environment and server configuration
pub mod environment;
/// Firebase token verification settings
pub mod firebase;

pub use environment::{ConfigError, DatabaseConfig, Environment, ServerConfig};
pub use firebase::FirebaseConfig;
