// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides database, clock, key fetcher, token signing, and entity creation helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `setbook_api`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use std::collections::HashMap;
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use anyhow::Result;
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tracing::Level;

use setbook_api::auth::clock::Clock;
use setbook_api::auth::keys::{FetchedCertificates, InMemoryKeyCache, KeyFetcher};
use setbook_api::auth::FirebaseAuth;
use setbook_api::config::FirebaseConfig;
use setbook_api::database::repositories::{UserRepository, UserRepositoryImpl};
use setbook_api::database::Database;
use setbook_api::errors::{AppError, AuthError, ValidationCode};
use setbook_api::models::{
    BodyPart, Exercise, ExerciseDraft, Laterality, User, UserProfile, Workout, WorkoutDraft,
};
use setbook_api::services::{ExerciseCatalog, WorkoutService};

pub const PROJECT_ID: &str = "setbook-test";
pub const KEY_ID: &str = "test-key-1";

pub const SIGNING_KEY: &str = include_str!("fixtures/signing_key.pem");
pub const SIGNING_CERT: &str = include_str!("fixtures/signing_cert.pem");
pub const FOREIGN_KEY: &str = include_str!("fixtures/foreign_key.pem");

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new("sqlite::memory:").await?)
}

// ============================================================================
// Clock and key source doubles
// ============================================================================

/// Fixed instant all token tests start from
pub fn test_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Key fetcher serving fixed certificates and counting calls
#[derive(Debug)]
pub struct StaticKeyFetcher {
    certificates: HashMap<String, String>,
    max_age_secs: Option<i64>,
    calls: AtomicUsize,
}

impl StaticKeyFetcher {
    /// Publishes the fixture certificate under [`KEY_ID`]
    pub fn new(max_age_secs: Option<i64>) -> Self {
        Self {
            certificates: HashMap::from([(KEY_ID.to_owned(), SIGNING_CERT.to_owned())]),
            max_age_secs,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyFetcher for StaticKeyFetcher {
    async fn fetch(&self) -> Result<FetchedCertificates, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(FetchedCertificates {
            certificates: self.certificates.clone(),
            max_age_secs: self.max_age_secs,
        })
    }
}

/// Verifier wired to the fixture key set and a manual clock
pub struct TestVerifier {
    pub auth: Arc<FirebaseAuth>,
    pub fetcher: Arc<StaticKeyFetcher>,
    pub clock: Arc<ManualClock>,
}

pub fn create_test_verifier(config: FirebaseConfig, max_age_secs: Option<i64>) -> TestVerifier {
    init_test_logging();
    let fetcher = Arc::new(StaticKeyFetcher::new(max_age_secs));
    let clock = Arc::new(ManualClock::new(test_epoch()));
    let auth = Arc::new(FirebaseAuth::with_components(
        config,
        fetcher.clone(),
        Arc::new(InMemoryKeyCache::new()),
        clock.clone(),
    ));
    TestVerifier {
        auth,
        fetcher,
        clock,
    }
}

// ============================================================================
// Token builders
// ============================================================================

/// Claims of a token that passes every check at [`test_epoch`]
pub fn valid_claims(sub: &str) -> Value {
    let now = test_epoch().timestamp();
    json!({
        "iss": format!("https://securetoken.google.com/{PROJECT_ID}"),
        "aud": PROJECT_ID,
        "sub": sub,
        "iat": now - 60,
        "exp": now + 3600,
        "auth_time": now - 120,
        "email": "Lifter@Example.com",
        "email_verified": true,
        "name": "Sam Lifter",
        "picture": "https://cdn.example.com/sam.png",
        "firebase": { "sign_in_provider": "google.com" }
    })
}

/// RS256 token signed with `private_key_pem` under `kid`
pub fn sign_token_with(claims: &Value, kid: &str, private_key_pem: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_owned());
    let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes()).unwrap();
    encode(&header, claims, &key).unwrap()
}

/// RS256 token signed with the fixture key under [`KEY_ID`]
pub fn sign_token(claims: &Value) -> String {
    sign_token_with(claims, KEY_ID, SIGNING_KEY)
}

/// Unsigned token as produced by the local auth emulator
pub fn emulator_token(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).unwrap());
    format!("{header}.{payload}.")
}

// ============================================================================
// Entity helpers
// ============================================================================

pub async fn create_test_user(database: &Database, firebase_uid: &str) -> Result<User> {
    let users = UserRepositoryImpl::new(database.clone());
    Ok(users.create(firebase_uid, &UserProfile::default()).await?)
}

pub fn strength_exercise(name: &str, body_part: BodyPart) -> ExerciseDraft {
    ExerciseDraft {
        name: Some(name.to_owned()),
        body_part: Some(body_part),
        laterality: Some(Laterality::Bilateral),
        memo: None,
    }
}

pub fn cardio_exercise(name: &str) -> ExerciseDraft {
    ExerciseDraft {
        name: Some(name.to_owned()),
        body_part: Some(BodyPart::Cardio),
        laterality: None,
        memo: None,
    }
}

pub async fn create_test_exercise(database: &Database, draft: &ExerciseDraft) -> Result<Exercise> {
    Ok(ExerciseCatalog::from_database(database).create(draft).await?)
}

pub async fn create_test_workout(database: &Database, user_id: i64) -> Result<Workout> {
    let draft = WorkoutDraft {
        performed_start_at: Some(test_epoch()),
        performed_end_at: Some(test_epoch() + Duration::minutes(75)),
        memo: Some("push day".to_owned()),
    };
    Ok(WorkoutService::from_database(database)
        .create_workout(user_id, &draft)
        .await?)
}

/// Whether `error` carries a violation of `code` on `field`
pub fn has_violation(error: &AppError, field: &str, code: ValidationCode) -> bool {
    error
        .violations()
        .iter()
        .any(|violation| violation.field == field && violation.code == code)
}
