// ABOUTME: Firebase Authentication token validation module
// ABOUTME: Verifies Firebase ID tokens using Google's public keys with injected key cache and clock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Firebase Authentication Token Validation
//!
//! This module provides:
//! - Firebase ID token validation using Google's public keys
//! - Key fetching and TTL caching through swappable [`KeyFetcher`] / [`KeyCache`]
//! - Claim checks against an injected [`Clock`]
//!
//! ## Security Model
//!
//! - Public keys fetched from Google's official endpoint
//! - Keys cached for the `max-age` of the certificate response
//! - A cached key set is never used at or after its expiry
//! - Tokens validated for signature (RS256), issuer, audience, `exp`, `iat`,
//!   `auth_time`, and a non-empty subject
//! - Unsigned tokens are accepted only in emulator mode, and still go
//!   through every claim check
//!
//! ## Usage
//!
//! ```rust,no_run
//! use setbook_api::auth::firebase::FirebaseAuth;
//! use setbook_api::config::FirebaseConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let firebase = FirebaseAuth::new(FirebaseConfig::new("my-project"));
//!
//! let claims = firebase.verify_id_token("eyJ...").await?;
//! println!("User: {} via {}", claims.sub, claims.provider);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use setbook_core::errors::AuthError;

use super::claims::{FirebaseClaims, TokenHeader};
use super::clock::{Clock, SystemClock};
use super::keys::{
    convert_certs_to_keys, GoogleKeyFetcher, InMemoryKeyCache, KeyCache, KeyFetcher, PublicKeySet,
};
use crate::config::FirebaseConfig;
use crate::constants::firebase::{
    EMULATOR_ALGORITHM, ISSUER_PREFIX, MAX_KEY_CACHE_TTL_SECS, UNKNOWN_PROVIDER,
};

/// Firebase Authentication handler
///
/// One long-lived instance owns the key cache; share it behind an `Arc`.
pub struct FirebaseAuth {
    /// Firebase configuration
    config: FirebaseConfig,
    /// Certificate source
    fetcher: Arc<dyn KeyFetcher>,
    /// Key storage
    cache: Arc<dyn KeyCache>,
    /// Verification time source
    clock: Arc<dyn Clock>,
}

impl FirebaseAuth {
    /// Create a handler that fetches from Google and caches in process
    #[must_use]
    pub fn new(config: FirebaseConfig) -> Self {
        let fetcher = Arc::new(GoogleKeyFetcher::new(config.certs_url.clone()));
        Self::with_components(
            config,
            fetcher,
            Arc::new(InMemoryKeyCache::new()),
            Arc::new(SystemClock),
        )
    }

    /// Create a handler with explicit collaborators
    #[must_use]
    pub fn with_components(
        config: FirebaseConfig,
        fetcher: Arc<dyn KeyFetcher>,
        cache: Arc<dyn KeyCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            fetcher,
            cache,
            clock,
        }
    }

    /// Get the configured Firebase project ID
    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.config.project_id
    }

    /// Verify a token against the configured project
    ///
    /// # Errors
    ///
    /// See [`FirebaseAuth::verify`]
    pub async fn verify_id_token(&self, token: &str) -> Result<FirebaseClaims, AuthError> {
        self.verify(token, &self.config.project_id).await
    }

    /// Verify a Firebase ID token issued for `project_id`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The token or project id is empty (`InvalidArgument`)
    /// - The token is malformed, badly signed, expired, issued in the future,
    ///   has a future or missing `auth_time`, or an empty subject (`Verification`)
    /// - No published key matches the token's `kid` (`KeyNotFound`)
    /// - The key directory cannot be fetched (`KeyFetch`)
    pub async fn verify(&self, token: &str, project_id: &str) -> Result<FirebaseClaims, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::InvalidArgument("token is required".to_owned()));
        }
        if project_id.trim().is_empty() {
            return Err(AuthError::InvalidArgument(
                "project id is required".to_owned(),
            ));
        }

        let header: TokenHeader = decode_segment(token, 0, "header")?;
        let now = self.clock.now();

        let mut claims = if header.alg == EMULATOR_ALGORITHM {
            if !self.config.use_emulator {
                debug!("Rejected unsigned token outside emulator mode");
                return Err(AuthError::verification("unsigned tokens are not accepted"));
            }
            decode_segment::<FirebaseClaims>(token, 1, "payload")?
        } else {
            self.decode_signed(token, &header, project_id, now).await?
        };

        check_claims(&claims, project_id, now)?;

        claims.provider = claims
            .firebase
            .sign_in_provider
            .clone()
            .unwrap_or_else(|| UNKNOWN_PROVIDER.to_owned());

        info!(
            user_id = %claims.sub,
            provider = %claims.provider,
            "Firebase token validated successfully"
        );
        debug!(
            user_id = %claims.sub,
            email = claims.email.as_deref().unwrap_or("(none)"),
            "Firebase token claims detail"
        );

        Ok(claims)
    }

    /// Verify the RS256 signature plus issuer and audience
    async fn decode_signed(
        &self,
        token: &str,
        header: &TokenHeader,
        project_id: &str,
        now: DateTime<Utc>,
    ) -> Result<FirebaseClaims, AuthError> {
        if header.alg != "RS256" {
            debug!(alg = %header.alg, "Firebase token uses unexpected algorithm");
            return Err(AuthError::verification(format!(
                "unexpected signing algorithm '{}'",
                header.alg
            )));
        }

        let kid = header.kid.as_deref().ok_or_else(|| {
            debug!("Firebase token missing key ID (kid) in header");
            AuthError::verification("token missing key id")
        })?;

        let pem_key = self.public_key(kid, now).await?;
        let decoding_key = DecodingKey::from_rsa_pem(pem_key.as_bytes()).map_err(|e| {
            warn!(error = %e, kid = %kid, "Failed to create decoding key from PEM");
            AuthError::verification(format!("unusable public key: {e}"))
        })?;

        // exp/iat/auth_time are checked against the injected clock afterwards
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[project_id]);
        validation.set_issuer(&[expected_issuer(project_id)]);
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;

        decode::<FirebaseClaims>(token, &decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Firebase token validation failed");
                AuthError::verification(match e.kind() {
                    ErrorKind::InvalidSignature => "invalid signature".to_owned(),
                    ErrorKind::InvalidAudience => "invalid audience".to_owned(),
                    ErrorKind::InvalidIssuer => "invalid issuer".to_owned(),
                    ErrorKind::MissingRequiredClaim(claim) => format!("missing claim '{claim}'"),
                    _ => format!("malformed token: {e}"),
                })
            })
    }

    /// Public key for `kid`, refreshing the cache on a miss or expiry
    async fn public_key(&self, kid: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        if let Some(key) = self.cache.get(kid, now).await {
            debug!(kid = %kid, "Using cached Firebase public key");
            return Ok(key);
        }

        let keys = self.refresh_keys(now).await?;
        keys.get(kid).map(str::to_owned).ok_or_else(|| {
            debug!(kid = %kid, "Firebase public key not found for kid");
            AuthError::KeyNotFound {
                kid: kid.to_owned(),
            }
        })
    }

    /// Fetch, convert and store a fresh key set
    async fn refresh_keys(&self, now: DateTime<Utc>) -> Result<PublicKeySet, AuthError> {
        info!("Fetching Firebase public keys");

        let fetched = self.fetcher.fetch().await?;
        let cache_ttl = fetched
            .max_age_secs
            .filter(|secs| (0..=MAX_KEY_CACHE_TTL_SECS).contains(secs))
            .unwrap_or(self.config.default_key_ttl_secs);
        let expires_at = Duration::try_seconds(cache_ttl)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                warn!(cache_ttl_secs = cache_ttl, "Firebase key cache TTL out of range");
                AuthError::KeyFetch(format!("key cache TTL of {cache_ttl}s is out of range"))
            })?;
        let keys = PublicKeySet::new(convert_certs_to_keys(fetched.certificates)?, expires_at);

        info!(
            num_keys = keys.len(),
            cache_ttl_secs = cache_ttl,
            expires_at = %keys.expires_at(),
            "Firebase public keys cached"
        );

        self.cache.store(keys.clone()).await;
        Ok(keys)
    }
}

/// `iss` a token for `project_id` must carry
fn expected_issuer(project_id: &str) -> String {
    format!("{ISSUER_PREFIX}{project_id}")
}

/// Decode one base64url JSON segment without checking the signature
fn decode_segment<T: DeserializeOwned>(
    token: &str,
    index: usize,
    what: &str,
) -> Result<T, AuthError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(AuthError::verification("token must have three segments"));
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(segments[index].trim_end_matches('='))
        .map_err(|e| AuthError::verification(format!("malformed token {what}: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::verification(format!("malformed token {what}: {e}")))
}

/// Claim checks applied to every token, signed or not
fn check_claims(
    claims: &FirebaseClaims,
    project_id: &str,
    now: DateTime<Utc>,
) -> Result<(), AuthError> {
    let now = now.timestamp();

    if claims.iss != expected_issuer(project_id) {
        return Err(AuthError::verification("invalid issuer"));
    }
    if claims.aud != project_id {
        return Err(AuthError::verification("invalid audience"));
    }
    if claims.exp <= now {
        return Err(AuthError::verification("token has expired"));
    }
    if claims.iat > now {
        return Err(AuthError::verification("token issued in the future"));
    }
    match claims.auth_time {
        None => return Err(AuthError::verification("missing auth_time")),
        Some(auth_time) if auth_time > now => {
            return Err(AuthError::verification("auth_time is in the future"));
        }
        Some(_) => {}
    }
    if claims.sub.trim().is_empty() {
        return Err(AuthError::verification("missing subject"));
    }

    Ok(())
}
