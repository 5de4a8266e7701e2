// ABOUTME: Main library entry point for the Setbook workout logging API
// ABOUTME: Identity token verification, user resolution, persistence, and workout services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// Crate-level attributes:
// - deny(unsafe_code): Zero-tolerance unsafe policy
#![deny(unsafe_code)]

//! # Setbook API
//!
//! Backend core for a strength and conditioning log. Users authenticate with
//! Firebase ID tokens; each user records workouts made of exercise entries,
//! and each entry holds strength or cardio sets.
//!
//! ## Architecture
//!
//! - **`setbook_core`**: Pure domain types, validation, and volume aggregation
//! - **Auth**: Bearer extraction, Firebase token verification, user upsert
//! - **Database**: SQLite schema and repository traits
//! - **Services**: Exercise catalog and workout logging operations
//! - **Config**: Environment-driven configuration validated at startup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use setbook_api::config::ServerConfig;
//! use setbook_api::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Verifying tokens for project {}", config.firebase.project_id);
//!     Ok(())
//! }
//! ```

/// Bearer token verification and user resolution
pub mod auth;

/// Environment configuration
pub mod config;

/// Application constants
pub mod constants;

/// SQLite storage and repositories
pub mod database;

/// Error types, re-exported from `setbook_core`
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Domain models, re-exported from `setbook_core`
pub mod models;

/// Exercise catalog and workout services
pub mod services;
