// ABOUTME: SQLite storage for users, exercises, workouts, workout exercises, and sets
// ABOUTME: Owns the connection pool, runs idempotent migrations, and maps rows to domain models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! [`Database`] wraps one `SqlitePool` with foreign key enforcement switched
//! on. Entity operations live in one file per table as `impl Database`
//! blocks; the [`repositories`] module exposes them behind traits.
//!
//! Every constraint the domain relies on is declared in the schema, so a
//! write that races past a service-level check still fails cleanly and is
//! translated by [`errors`] into the same shape as a validation failure.

pub mod errors;
mod exercises;
pub mod repositories;
mod users;
mod workout_exercises;
mod workout_sets;
mod workouts;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

pub use setbook_core::errors::DatabaseError;

/// Database manager for the workout log
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to `database_url` and run migrations
    ///
    /// The database file is created when missing. In-memory databases are
    /// held on a single connection so every query sees the same data.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the connection fails, or a
    /// migration fails
    pub async fn new(database_url: &str) -> Result<Self, DatabaseError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options.connect_with(options).await?;
        debug!(url = %database_url, "Connected to SQLite database");

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    ///
    /// Parents are created before children so foreign keys resolve.
    ///
    /// # Errors
    ///
    /// Returns an error if any table or index cannot be created
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        self.migrate_users().await?;
        self.migrate_exercises().await?;
        self.migrate_workouts().await?;
        self.migrate_workout_exercises().await?;
        self.migrate_workout_sets().await?;

        info!("Database migrations completed");
        Ok(())
    }
}

/// Parse a TEXT column holding an enum value
fn parse_column<T>(value: &str, column: &str) -> Result<T, DatabaseError>
where
    T: FromStr<Err = String>,
{
    value.parse().map_err(|e| DatabaseError::QueryError {
        context: format!("invalid {column} value in database: {e}"),
    })
}
