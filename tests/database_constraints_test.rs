// ABOUTME: Integration tests for the SQLite schema and repository layer
// ABOUTME: Migration idempotence on a file database and translation of constraint violations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use tempfile::TempDir;

use common::{create_test_database, create_test_user, init_test_logging};
use setbook_api::database::repositories::{
    ExerciseRepository, ExerciseRepositoryImpl, UserRepository, UserRepositoryImpl,
};
use setbook_api::database::{Database, DatabaseError};
use setbook_api::errors::ValidationCode;
use setbook_api::models::{BodyPart, Laterality, UserProfile, ValidExercise};

fn exercise(name: &str, body_part: BodyPart, laterality: Option<Laterality>) -> ValidExercise {
    ValidExercise {
        name: name.to_owned(),
        body_part,
        laterality,
        memo: None,
    }
}

#[tokio::test]
async fn test_file_database_survives_reopen() -> Result<()> {
    init_test_logging();
    let dir = TempDir::new()?;
    let url = format!("sqlite:{}", dir.path().join("setbook.db").display());

    let database = Database::new(&url).await?;
    let user = create_test_user(&database, "uid-persisted").await?;
    database.migrate().await?;
    database.pool().close().await;

    let reopened = Database::new(&url).await?;
    let stored = UserRepositoryImpl::new(reopened.clone())
        .get(user.id)
        .await?
        .unwrap();
    assert_eq!(stored.firebase_uid, "uid-persisted");
    Ok(())
}

#[tokio::test]
async fn test_duplicate_subject_is_taken() -> Result<()> {
    let database = create_test_database().await?;
    let users = UserRepositoryImpl::new(database.clone());

    users.create("uid-1", &UserProfile::default()).await?;
    let error = users
        .create("uid-1", &UserProfile::default())
        .await
        .unwrap_err();

    match error {
        DatabaseError::Validation(errors) => {
            assert!(errors.has("firebase_uid", ValidationCode::Taken));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_schema_rejects_laterality_on_cardio() -> Result<()> {
    let database = create_test_database().await?;
    let exercises = ExerciseRepositoryImpl::new(database.clone());

    let error = exercises
        .create(&exercise("Rowing", BodyPart::Cardio, Some(Laterality::Bilateral)))
        .await
        .unwrap_err();
    match error {
        DatabaseError::Validation(errors) => {
            assert!(errors.has("laterality", ValidationCode::InvalidFormat));
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    let error = exercises
        .create(&exercise("Squat", BodyPart::Legs, None))
        .await
        .unwrap_err();
    assert!(matches!(error, DatabaseError::Validation(_)));
    Ok(())
}

#[tokio::test]
async fn test_name_taken_ignores_case_and_excluded_id() -> Result<()> {
    let database = create_test_database().await?;
    let exercises = ExerciseRepositoryImpl::new(database.clone());
    let row = exercises
        .create(&exercise("Deadlift", BodyPart::Back, Some(Laterality::Bilateral)))
        .await?;

    assert!(exercises.name_taken("deadLIFT", None).await?);
    assert!(!exercises.name_taken("deadLIFT", Some(row.id)).await?);
    assert!(!exercises.name_taken("Romanian Deadlift", None).await?);
    Ok(())
}

#[tokio::test]
async fn test_missing_rows_are_not_found() -> Result<()> {
    let database = create_test_database().await?;
    let users = UserRepositoryImpl::new(database.clone());
    let exercises = ExerciseRepositoryImpl::new(database.clone());

    assert!(users.get(404).await?.is_none());
    assert!(users.get_by_firebase_uid("nobody").await?.is_none());
    assert!(matches!(
        users.update_profile(404, &UserProfile::default()).await,
        Err(DatabaseError::NotFound { .. })
    ));
    assert!(matches!(
        exercises
            .update(404, &exercise("Squat", BodyPart::Legs, Some(Laterality::Bilateral)))
            .await,
        Err(DatabaseError::NotFound { .. })
    ));
    assert!(!exercises.is_referenced(404).await?);
    Ok(())
}
