// ABOUTME: Operator command-line tool for the Setbook database and token verification
// ABOUTME: Runs migrations, verifies Firebase ID tokens, lists exercises, and reports workout volume
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Usage:
//! ```bash
//! # Create or upgrade the schema
//! cargo run --bin setbook-admin -- migrate
//!
//! # Verify a token and upsert the user it belongs to
//! cargo run --bin setbook-admin -- verify-token eyJhbGciOi...
//!
//! # List the exercise catalog
//! cargo run --bin setbook-admin -- exercises
//!
//! # Per-exercise and total volume of one workout
//! cargo run --bin setbook-admin -- workout-volume --user <firebase_uid> --workout 12
//! ```

use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use setbook_api::auth::{FirebaseAuth, UserResolver};
use setbook_api::config::ServerConfig;
use setbook_api::constants::service_names;
use setbook_api::database::repositories::{UserRepository, UserRepositoryImpl};
use setbook_api::database::Database;
use setbook_api::logging::{LogFormat, LoggingConfig};
use setbook_api::models::Laterality;
use setbook_api::services::{ExerciseCatalog, WorkoutService};

#[derive(Parser)]
#[command(
    name = "setbook-admin",
    about = "Setbook operator tools",
    long_about = "Maintain the Setbook database and inspect tokens and workouts from the command line."
)]
struct AdminArgs {
    #[command(subcommand)]
    command: AdminCommand,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Subcommand)]
enum AdminCommand {
    /// Create or upgrade the database schema
    Migrate,

    /// Verify a Firebase ID token and resolve its user
    VerifyToken {
        /// Raw ID token (without the `Bearer ` prefix)
        token: String,
    },

    /// List every exercise, newest first
    Exercises,

    /// Show the volume of one workout
    WorkoutVolume {
        /// Firebase UID of the workout owner
        #[arg(long)]
        user: String,

        /// Workout id
        #[arg(long)]
        workout: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = AdminArgs::parse();

    LoggingConfig {
        level: if args.verbose { "debug" } else { "info" }.to_owned(),
        format: LogFormat::Compact,
        service_name: service_names::SETBOOK_ADMIN.to_owned(),
        ..LoggingConfig::default()
    }
    .init()?;

    let config = ServerConfig::from_env()?;
    let database_url = args
        .database_url
        .unwrap_or_else(|| config.database.url.clone());

    info!("Connecting to database: {}", database_url);
    let database = Database::new(&database_url).await?;

    match args.command {
        AdminCommand::Migrate => {
            database.migrate().await?;
            println!("Database schema is up to date");
        }
        AdminCommand::VerifyToken { token } => {
            verify_token_command(&config, &database, &token).await?;
        }
        AdminCommand::Exercises => {
            exercises_command(&database).await?;
        }
        AdminCommand::WorkoutVolume { user, workout } => {
            workout_volume_command(&database, &user, workout).await?;
        }
    }

    Ok(())
}

/// Verify a token, then create or refresh its user
async fn verify_token_command(
    config: &ServerConfig,
    database: &Database,
    token: &str,
) -> Result<()> {
    let firebase = FirebaseAuth::new(config.firebase.clone());
    let claims = firebase.verify_id_token(token).await?;

    println!("Token valid");
    println!("  subject:  {}", claims.sub);
    println!("  provider: {}", claims.provider);
    println!("  expires:  {}", claims.exp);

    let resolver = UserResolver::new(
        Arc::new(UserRepositoryImpl::new(database.clone())),
        config.user_fields,
    );
    let user = resolver.resolve_from_claims(&claims).await?;
    println!(
        "  user:     #{} email={} name={}",
        user.id,
        user.email.as_deref().unwrap_or("-"),
        user.name.as_deref().unwrap_or("-")
    );

    Ok(())
}

/// Print the exercise catalog
async fn exercises_command(database: &Database) -> Result<()> {
    let exercises = ExerciseCatalog::from_database(database).list().await?;
    if exercises.is_empty() {
        println!("No exercises defined");
        return Ok(());
    }

    for exercise in exercises {
        println!(
            "{:>5}  {:<32} {:<10} {}",
            exercise.id,
            exercise.name,
            exercise.body_part.as_str(),
            exercise.laterality.map_or("-", Laterality::as_str)
        );
    }

    Ok(())
}

/// Print per-exercise and total volume of a workout
async fn workout_volume_command(
    database: &Database,
    firebase_uid: &str,
    workout_id: i64,
) -> Result<()> {
    let user = UserRepositoryImpl::new(database.clone())
        .get_by_firebase_uid(firebase_uid)
        .await?
        .ok_or_else(|| anyhow!("No user with firebase uid '{firebase_uid}'"))?;

    let detail = WorkoutService::from_database(database)
        .workout_detail(user.id, workout_id)
        .await?;

    println!(
        "Workout #{} started {}",
        detail.workout.id, detail.workout.performed_start_at
    );
    for entry in &detail.exercises {
        println!(
            "  {:>2}. {:<32} sets={:<3} volume={}",
            entry.entry.order_index,
            entry.exercise.name,
            entry.sets.len(),
            display_volume(entry.total_volume())
        );
    }
    println!("Total volume: {}", display_volume(detail.total_volume()));

    Ok(())
}

fn display_volume(volume: Option<i64>) -> String {
    volume.map_or_else(|| "out of range".to_owned(), |volume| volume.to_string())
}
