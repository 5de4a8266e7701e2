// ABOUTME: Integration tests for Firebase ID token verification
// ABOUTME: Signature, claim timing, key rotation, cache expiry, and emulator mode
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::fmt::Debug;

use chrono::Duration;
use serde_json::json;

use common::{
    create_test_verifier, emulator_token, sign_token, sign_token_with, test_epoch, valid_claims,
    FOREIGN_KEY, KEY_ID, PROJECT_ID, SIGNING_KEY,
};
use setbook_api::config::FirebaseConfig;
use setbook_api::errors::{AppError, AuthError, ErrorCode};

fn config() -> FirebaseConfig {
    FirebaseConfig::new(PROJECT_ID)
}

fn assert_verification_failure(result: Result<impl Debug, AuthError>, reason: &str) {
    match result {
        Err(AuthError::Verification { reason: actual }) => {
            assert!(
                actual.contains(reason),
                "expected reason containing '{reason}', got '{actual}'"
            );
        }
        other => panic!("expected verification failure '{reason}', got {other:?}"),
    }
}

#[tokio::test]
async fn test_valid_token_returns_claims() {
    let verifier = create_test_verifier(config(), Some(3600));
    let token = sign_token(&valid_claims("uid-123"));

    let claims = verifier.auth.verify_id_token(&token).await.unwrap();

    assert_eq!(claims.sub, "uid-123");
    assert_eq!(claims.aud, PROJECT_ID);
    assert_eq!(claims.provider, "google.com");
    assert_eq!(claims.email.as_deref(), Some("Lifter@Example.com"));
    assert_eq!(claims.email_verified, Some(true));
    assert_eq!(claims.name.as_deref(), Some("Sam Lifter"));
    assert_eq!(verifier.fetcher.calls(), 1);
}

#[tokio::test]
async fn test_provider_defaults_to_unknown() {
    let verifier = create_test_verifier(config(), Some(3600));
    let mut claims = valid_claims("uid-123");
    claims.as_object_mut().unwrap().remove("firebase");

    let claims = verifier
        .auth
        .verify_id_token(&sign_token(&claims))
        .await
        .unwrap();
    assert_eq!(claims.provider, "unknown");
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let verifier = create_test_verifier(config(), Some(3600));
    let now = test_epoch().timestamp();

    let mut claims = valid_claims("uid-123");
    claims["exp"] = json!(now - 1);
    assert_verification_failure(
        verifier.auth.verify_id_token(&sign_token(&claims)).await,
        "expired",
    );

    claims["exp"] = json!(now);
    assert_verification_failure(
        verifier.auth.verify_id_token(&sign_token(&claims)).await,
        "expired",
    );
}

#[tokio::test]
async fn test_token_expires_as_clock_advances() {
    let verifier = create_test_verifier(config(), Some(86_400));
    let token = sign_token(&valid_claims("uid-123"));

    assert!(verifier.auth.verify_id_token(&token).await.is_ok());

    verifier.clock.advance(Duration::seconds(3600));
    assert_verification_failure(verifier.auth.verify_id_token(&token).await, "expired");
}

#[tokio::test]
async fn test_future_issue_and_auth_times_are_rejected() {
    let verifier = create_test_verifier(config(), Some(3600));
    let now = test_epoch().timestamp();

    let mut claims = valid_claims("uid-123");
    claims["auth_time"] = json!(now + 30);
    assert_verification_failure(
        verifier.auth.verify_id_token(&sign_token(&claims)).await,
        "auth_time",
    );

    let mut claims = valid_claims("uid-123");
    claims["iat"] = json!(now + 30);
    assert_verification_failure(
        verifier.auth.verify_id_token(&sign_token(&claims)).await,
        "future",
    );

    let mut claims = valid_claims("uid-123");
    claims["iat"] = json!(now);
    claims["auth_time"] = json!(now);
    assert!(verifier
        .auth
        .verify_id_token(&sign_token(&claims))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_missing_auth_time_is_rejected() {
    let verifier = create_test_verifier(config(), Some(3600));
    let mut claims = valid_claims("uid-123");
    claims.as_object_mut().unwrap().remove("auth_time");

    assert_verification_failure(
        verifier.auth.verify_id_token(&sign_token(&claims)).await,
        "auth_time",
    );
}

#[tokio::test]
async fn test_empty_subject_is_rejected() {
    let verifier = create_test_verifier(config(), Some(3600));

    assert_verification_failure(
        verifier
            .auth
            .verify_id_token(&sign_token(&valid_claims("   ")))
            .await,
        "subject",
    );

    let mut claims = valid_claims("uid-123");
    claims.as_object_mut().unwrap().remove("sub");
    assert_verification_failure(
        verifier.auth.verify_id_token(&sign_token(&claims)).await,
        "subject",
    );
}

#[tokio::test]
async fn test_wrong_audience_or_issuer_is_rejected() {
    let verifier = create_test_verifier(config(), Some(3600));

    let mut claims = valid_claims("uid-123");
    claims["aud"] = json!("someone-else");
    assert_verification_failure(
        verifier.auth.verify_id_token(&sign_token(&claims)).await,
        "audience",
    );

    let mut claims = valid_claims("uid-123");
    claims["iss"] = json!("https://securetoken.google.com/someone-else");
    assert_verification_failure(
        verifier.auth.verify_id_token(&sign_token(&claims)).await,
        "issuer",
    );

    let token = sign_token(&valid_claims("uid-123"));
    assert_verification_failure(
        verifier.auth.verify(&token, "someone-else").await,
        "invalid",
    );
}

#[tokio::test]
async fn test_unknown_key_id_is_key_not_found() {
    let verifier = create_test_verifier(config(), Some(3600));
    let token = sign_token_with(&valid_claims("uid-123"), "rotated-away", SIGNING_KEY);

    let error = verifier.auth.verify_id_token(&token).await.unwrap_err();

    assert!(matches!(&error, AuthError::KeyNotFound { kid } if kid == "rotated-away"));
    assert!(error.is_verification_failure());
    assert_eq!(AppError::from(error).code, ErrorCode::AuthInvalid);
}

#[tokio::test]
async fn test_signature_from_foreign_key_is_rejected() {
    let verifier = create_test_verifier(config(), Some(3600));
    let token = sign_token_with(&valid_claims("uid-123"), KEY_ID, FOREIGN_KEY);

    assert_verification_failure(verifier.auth.verify_id_token(&token).await, "signature");
}

#[tokio::test]
async fn test_tampered_payload_is_rejected() {
    let verifier = create_test_verifier(config(), Some(3600));
    let token = sign_token(&valid_claims("uid-123"));
    let forged = emulator_token(&valid_claims("uid-admin"));

    let mut segments: Vec<&str> = token.split('.').collect();
    segments[1] = forged.split('.').nth(1).unwrap();
    let tampered = segments.join(".");

    assert_verification_failure(verifier.auth.verify_id_token(&tampered).await, "signature");
}

#[tokio::test]
async fn test_cached_keys_are_reused_until_expiry() {
    let verifier = create_test_verifier(config(), Some(600));
    let mut claims = valid_claims("uid-123");
    claims["exp"] = json!(test_epoch().timestamp() + 7200);
    let token = sign_token(&claims);

    verifier.auth.verify_id_token(&token).await.unwrap();
    verifier.auth.verify_id_token(&token).await.unwrap();
    assert_eq!(verifier.fetcher.calls(), 1);

    verifier.clock.advance(Duration::seconds(599));
    verifier.auth.verify_id_token(&token).await.unwrap();
    assert_eq!(verifier.fetcher.calls(), 1);

    verifier.clock.advance(Duration::seconds(1));
    verifier.auth.verify_id_token(&token).await.unwrap();
    assert_eq!(verifier.fetcher.calls(), 2);
}

#[tokio::test]
async fn test_missing_max_age_uses_configured_ttl() {
    let mut config = config();
    config.default_key_ttl_secs = 120;
    let verifier = create_test_verifier(config, None);
    let token = sign_token(&valid_claims("uid-123"));

    verifier.auth.verify_id_token(&token).await.unwrap();
    verifier.clock.advance(Duration::seconds(119));
    verifier.auth.verify_id_token(&token).await.unwrap();
    assert_eq!(verifier.fetcher.calls(), 1);

    verifier.clock.advance(Duration::seconds(1));
    verifier.auth.verify_id_token(&token).await.unwrap();
    assert_eq!(verifier.fetcher.calls(), 2);
}

#[tokio::test]
async fn test_oversized_max_age_falls_back_to_configured_ttl() {
    let verifier = create_test_verifier(config(), Some(10_000_000_000_000));
    let token = sign_token(&valid_claims("uid-123"));

    verifier.auth.verify_id_token(&token).await.unwrap();
    verifier.clock.advance(Duration::seconds(3599));
    verifier.auth.verify_id_token(&token).await.unwrap();
    assert_eq!(verifier.fetcher.calls(), 1);

    verifier.clock.advance(Duration::seconds(1));
    verifier.auth.verify_id_token(&token).await.unwrap();
    assert_eq!(verifier.fetcher.calls(), 2);
}

#[tokio::test]
async fn test_unrepresentable_ttl_is_a_key_fetch_error() {
    let mut config = config();
    config.default_key_ttl_secs = i64::MAX;
    let verifier = create_test_verifier(config, None);
    let token = sign_token(&valid_claims("uid-123"));

    let result = verifier.auth.verify_id_token(&token).await;
    assert!(
        matches!(result, Err(AuthError::KeyFetch(_))),
        "expected key fetch error, got {result:?}"
    );
}

#[tokio::test]
async fn test_unknown_kid_forces_refetch() {
    let verifier = create_test_verifier(config(), Some(3600));

    verifier
        .auth
        .verify_id_token(&sign_token(&valid_claims("uid-123")))
        .await
        .unwrap();
    assert_eq!(verifier.fetcher.calls(), 1);

    let token = sign_token_with(&valid_claims("uid-123"), "next-key", SIGNING_KEY);
    assert!(verifier.auth.verify_id_token(&token).await.is_err());
    assert_eq!(verifier.fetcher.calls(), 2);
}

#[tokio::test]
async fn test_emulator_tokens_require_emulator_mode() {
    let token = emulator_token(&valid_claims("uid-emulated"));

    let verifier = create_test_verifier(config(), Some(3600));
    assert_verification_failure(verifier.auth.verify_id_token(&token).await, "unsigned");

    let mut emulator = config();
    emulator.use_emulator = true;
    let verifier = create_test_verifier(emulator, Some(3600));
    let claims = verifier.auth.verify_id_token(&token).await.unwrap();
    assert_eq!(claims.sub, "uid-emulated");
    assert_eq!(verifier.fetcher.calls(), 0);
}

#[tokio::test]
async fn test_emulator_tokens_still_get_claim_checks() {
    let mut emulator = config();
    emulator.use_emulator = true;
    let verifier = create_test_verifier(emulator, Some(3600));

    let mut claims = valid_claims("uid-emulated");
    claims["exp"] = json!(test_epoch().timestamp() - 10);
    assert_verification_failure(
        verifier.auth.verify_id_token(&emulator_token(&claims)).await,
        "expired",
    );

    let mut claims = valid_claims("uid-emulated");
    claims["aud"] = json!("someone-else");
    assert_verification_failure(
        verifier.auth.verify_id_token(&emulator_token(&claims)).await,
        "audience",
    );
}

#[tokio::test]
async fn test_missing_inputs_are_invalid_arguments() {
    let verifier = create_test_verifier(config(), Some(3600));

    assert!(matches!(
        verifier.auth.verify_id_token("  ").await,
        Err(AuthError::InvalidArgument(_))
    ));

    let token = sign_token(&valid_claims("uid-123"));
    let error = verifier.auth.verify(&token, "").await.unwrap_err();
    assert!(matches!(error, AuthError::InvalidArgument(_)));
    assert!(!error.is_verification_failure());
    assert_eq!(AppError::from(error).code, ErrorCode::InvalidInput);
    assert_eq!(verifier.fetcher.calls(), 0);
}

#[tokio::test]
async fn test_malformed_tokens_are_rejected() {
    let verifier = create_test_verifier(config(), Some(3600));

    assert_verification_failure(
        verifier.auth.verify_id_token("not-a-token").await,
        "three segments",
    );
    assert_verification_failure(
        verifier.auth.verify_id_token("a.b.c").await,
        "malformed",
    );
}
