// ABOUTME: User repository implementation backed by SQLite
// ABOUTME: Delegates subject id lookups and profile writes to Database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;

use setbook_core::models::{User, UserProfile};

use super::UserRepository;
use crate::database::{Database, DatabaseError};

/// SQLite implementation of `UserRepository`
pub struct UserRepositoryImpl {
    db: Database,
}

impl UserRepositoryImpl {
    /// Create a new `UserRepository` with the given database connection
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(
        &self,
        firebase_uid: &str,
        profile: &UserProfile,
    ) -> Result<User, DatabaseError> {
        self.db.create_user(firebase_uid, profile).await
    }

    async fn update_profile(
        &self,
        user_id: i64,
        profile: &UserProfile,
    ) -> Result<User, DatabaseError> {
        self.db.update_user_profile(user_id, profile).await
    }

    async fn get(&self, user_id: i64) -> Result<Option<User>, DatabaseError> {
        self.db.get_user(user_id).await
    }

    async fn get_by_firebase_uid(&self, firebase_uid: &str) -> Result<Option<User>, DatabaseError> {
        self.db.get_user_by_firebase_uid(firebase_uid).await
    }
}
