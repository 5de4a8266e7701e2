// ABOUTME: Integration tests for resolving verified claims to stored users
// ABOUTME: Covers first sign-in, profile refresh, field policy, and end-to-end bearer authentication
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use anyhow::Result;
use serde_json::json;

use common::{
    create_test_database, create_test_verifier, has_violation, sign_token, valid_claims,
    PROJECT_ID,
};
use setbook_api::auth::claims::{FirebaseClaims, FirebaseSpecificClaims};
use setbook_api::auth::{Authenticator, UserResolver};
use setbook_api::config::FirebaseConfig;
use setbook_api::database::repositories::{UserRepository, UserRepositoryImpl};
use setbook_api::database::Database;
use setbook_api::errors::{ErrorCode, ValidationCode};
use setbook_api::models::UserFieldPolicy;

fn claims(sub: &str) -> FirebaseClaims {
    FirebaseClaims {
        iss: format!("https://securetoken.google.com/{PROJECT_ID}"),
        aud: PROJECT_ID.to_owned(),
        sub: sub.to_owned(),
        iat: 0,
        exp: 0,
        auth_time: Some(0),
        email: Some("  Lifter@Example.COM ".to_owned()),
        email_verified: Some(true),
        name: Some(" Sam Lifter ".to_owned()),
        picture: Some("https://cdn.example.com/sam.png".to_owned()),
        firebase: FirebaseSpecificClaims::default(),
        provider: "password".to_owned(),
    }
}

fn resolver(database: &Database, policy: UserFieldPolicy) -> UserResolver {
    UserResolver::new(Arc::new(UserRepositoryImpl::new(database.clone())), policy)
}

#[tokio::test]
async fn test_first_sign_in_creates_sanitized_user() -> Result<()> {
    let database = create_test_database().await?;
    let resolver = resolver(&database, UserFieldPolicy::default());

    let user = resolver.resolve_from_claims(&claims("uid-1")).await?;

    assert_eq!(user.firebase_uid, "uid-1");
    assert_eq!(user.email.as_deref(), Some("lifter@example.com"));
    assert_eq!(user.name.as_deref(), Some("Sam Lifter"));
    assert_eq!(
        user.image_url.as_deref(),
        Some("https://cdn.example.com/sam.png")
    );

    let stored = UserRepositoryImpl::new(database.clone())
        .get_by_firebase_uid("uid-1")
        .await?
        .unwrap();
    assert_eq!(stored, user);
    Ok(())
}

#[tokio::test]
async fn test_returning_user_is_refreshed_not_duplicated() -> Result<()> {
    let database = create_test_database().await?;
    let resolver = resolver(&database, UserFieldPolicy::default());

    let first = resolver.resolve_from_claims(&claims("uid-1")).await?;

    let mut changed = claims("uid-1");
    changed.name = Some("Samantha".to_owned());
    changed.email = None;
    changed.picture = Some("not a url".to_owned());
    let second = resolver.resolve_from_claims(&changed).await?;

    assert_eq!(second.id, first.id);
    assert_eq!(second.created_at, first.created_at);
    assert_eq!(second.name.as_deref(), Some("Samantha"));
    assert_eq!(second.email, None);
    assert_eq!(second.image_url, None);
    assert!(second.updated_at >= first.updated_at);
    Ok(())
}

#[tokio::test]
async fn test_distinct_subjects_get_distinct_users() -> Result<()> {
    let database = create_test_database().await?;
    let resolver = resolver(&database, UserFieldPolicy::default());

    let a = resolver.resolve_from_claims(&claims("uid-a")).await?;
    let b = resolver.resolve_from_claims(&claims("uid-b")).await?;

    assert_ne!(a.id, b.id);
    Ok(())
}

#[tokio::test]
async fn test_policy_violation_writes_nothing() -> Result<()> {
    let database = create_test_database().await?;
    let strict = UserFieldPolicy {
        require_email: true,
        require_name: true,
    };
    let resolver = resolver(&database, strict);

    let mut anonymous = claims("uid-anon");
    anonymous.email = Some("   ".to_owned());
    anonymous.name = None;

    let error = resolver.resolve_from_claims(&anonymous).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ValidationFailed);
    assert!(has_violation(&error, "email", ValidationCode::Blank));
    assert!(has_violation(&error, "name", ValidationCode::Blank));

    let stored = UserRepositoryImpl::new(database.clone())
        .get_by_firebase_uid("uid-anon")
        .await?;
    assert!(stored.is_none());
    Ok(())
}

#[tokio::test]
async fn test_malformed_email_is_rejected() -> Result<()> {
    let database = create_test_database().await?;
    let resolver = resolver(&database, UserFieldPolicy::default());

    let mut bad = claims("uid-1");
    bad.email = Some("lifter-at-example".to_owned());

    let error = resolver.resolve_from_claims(&bad).await.unwrap_err();
    assert!(has_violation(&error, "email", ValidationCode::InvalidFormat));
    Ok(())
}

#[tokio::test]
async fn test_blank_subject_is_rejected() -> Result<()> {
    let database = create_test_database().await?;
    let resolver = resolver(&database, UserFieldPolicy::default());

    let error = resolver.resolve_from_claims(&claims("  ")).await.unwrap_err();
    assert!(has_violation(&error, "firebase_uid", ValidationCode::Blank));
    Ok(())
}

#[tokio::test]
async fn test_authenticator_resolves_bearer_token() -> Result<()> {
    let database = create_test_database().await?;
    let verifier = create_test_verifier(FirebaseConfig::new(PROJECT_ID), Some(3600));
    let authenticator = Authenticator::new(
        verifier.auth.clone(),
        resolver(&database, UserFieldPolicy::default()),
    );

    let token = sign_token(&valid_claims("uid-bearer"));
    let header = format!("Bearer {token}");
    let user = authenticator.authenticate(Some(&header)).await?;

    assert_eq!(user.firebase_uid, "uid-bearer");
    assert_eq!(user.email.as_deref(), Some("lifter@example.com"));

    let again = authenticator.authenticate(Some(&header)).await?;
    assert_eq!(again.id, user.id);
    Ok(())
}

#[tokio::test]
async fn test_authenticator_rejects_missing_or_bad_tokens() -> Result<()> {
    let database = create_test_database().await?;
    let verifier = create_test_verifier(FirebaseConfig::new(PROJECT_ID), Some(3600));
    let authenticator = Authenticator::new(
        verifier.auth.clone(),
        resolver(&database, UserFieldPolicy::default()),
    );

    for header in [None, Some("Basic dXNlcjpwYXNz"), Some("Bearer   ")] {
        let error = authenticator.authenticate(header).await.unwrap_err();
        assert_eq!(error.code, ErrorCode::AuthRequired, "{header:?}");
    }

    let mut expired = valid_claims("uid-expired");
    expired["exp"] = json!(0);
    let header = format!("Bearer {}", sign_token(&expired));
    let error = authenticator.authenticate(Some(&header)).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::AuthInvalid);
    assert_eq!(error.http_status(), 401);

    let stored = UserRepositoryImpl::new(database.clone())
        .get_by_firebase_uid("uid-expired")
        .await?;
    assert!(stored.is_none());
    Ok(())
}
