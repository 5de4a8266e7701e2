// ABOUTME: User database operations keyed by the identity provider's subject id
// ABOUTME: Creates users on first sign-in and refreshes their profile on every later one

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use setbook_core::models::{User, UserProfile};

use super::errors::translate_write_error;
use super::{Database, DatabaseError};

const USER_COLUMNS: &str = "id, firebase_uid, email, name, image_url, created_at, updated_at";

impl Database {
    /// Create users table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub(super) async fn migrate_users(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                firebase_uid TEXT NOT NULL UNIQUE,
                email TEXT,
                name TEXT,
                image_url TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Create a user for a subject id seen for the first time
    ///
    /// # Errors
    ///
    /// Returns a `taken` validation error if the subject id already exists,
    /// or a query error on any other failure
    pub async fn create_user(
        &self,
        firebase_uid: &str,
        profile: &UserProfile,
    ) -> Result<User, DatabaseError> {
        let now = Utc::now();
        let row = sqlx::query(&format!(
            r"
            INSERT INTO users (firebase_uid, email, name, image_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(firebase_uid)
        .bind(&profile.email)
        .bind(&profile.name)
        .bind(&profile.image_url)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(translate_write_error)?;

        row_to_user(&row)
    }

    /// Overwrite a user's profile fields, including clearing them
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user does not exist
    pub async fn update_user_profile(
        &self,
        user_id: i64,
        profile: &UserProfile,
    ) -> Result<User, DatabaseError> {
        let row = sqlx::query(&format!(
            r"
            UPDATE users SET email = $2, name = $3, image_url = $4, updated_at = $5
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(user_id)
        .bind(&profile.email)
        .bind(&profile.name)
        .bind(&profile.image_url)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(translate_write_error)?
        .ok_or_else(|| DatabaseError::not_found("User", user_id))?;

        row_to_user(&row)
    }

    /// Get a user by row id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_user(&self, user_id: i64) -> Result<Option<User>, DatabaseError> {
        sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .as_ref()
            .map(row_to_user)
            .transpose()
    }

    /// Get a user by the identity provider's subject id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_user_by_firebase_uid(
        &self,
        firebase_uid: &str,
    ) -> Result<Option<User>, DatabaseError> {
        sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE firebase_uid = $1"
        ))
        .bind(firebase_uid)
        .fetch_optional(&self.pool)
        .await?
        .as_ref()
        .map(row_to_user)
        .transpose()
    }
}

fn row_to_user(row: &SqliteRow) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.try_get("id")?,
        firebase_uid: row.try_get("firebase_uid")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        image_url: row.try_get("image_url")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
