// ABOUTME: Firebase signing key retrieval and time-bounded caching
// ABOUTME: Fetches Google's x509 certificates, converts them to public keys, and caches them by kid
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Signing key fetch and cache
//!
//! Both halves sit behind traits so the verifier does not care where keys
//! come from or where they are kept. [`InMemoryKeyCache`] is the default
//! process-local store; a shared store can implement [`KeyCache`] instead.

use std::collections::HashMap;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use reqwest::header::CACHE_CONTROL;
use reqwest::{Client, Response};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use x509_parser::prelude::*;

use setbook_core::errors::AuthError;

use crate::constants::firebase::MAX_KEY_CACHE_TTL_SECS;

/// Public keys valid until a fixed instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeySet {
    /// Key ID to PEM-encoded public key mapping
    keys: HashMap<String, String>,
    /// When the set stops being usable
    expires_at: DateTime<Utc>,
}

impl PublicKeySet {
    /// Keys usable until `expires_at`
    #[must_use]
    pub const fn new(keys: HashMap<String, String>, expires_at: DateTime<Utc>) -> Self {
        Self { keys, expires_at }
    }

    /// PEM public key for `kid`
    #[must_use]
    pub fn get(&self, kid: &str) -> Option<&str> {
        self.keys.get(kid).map(String::as_str)
    }

    /// Whether the set may no longer be used at `now`
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Expiry instant
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Number of keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the set holds no keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Storage for the current key set
#[async_trait]
pub trait KeyCache: Send + Sync {
    /// Key for `kid`, only if the stored set has not expired at `now`
    async fn get(&self, kid: &str, now: DateTime<Utc>) -> Option<String>;

    /// Replace the stored set
    async fn store(&self, keys: PublicKeySet);
}

/// Process-local key cache
#[derive(Debug, Default)]
pub struct InMemoryKeyCache {
    cached: RwLock<Option<PublicKeySet>>,
}

impl InMemoryKeyCache {
    /// Empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyCache for InMemoryKeyCache {
    async fn get(&self, kid: &str, now: DateTime<Utc>) -> Option<String> {
        let cache = self.cached.read().await;
        cache
            .as_ref()
            .filter(|set| !set.is_expired_at(now))
            .and_then(|set| set.get(kid))
            .map(str::to_owned)
    }

    async fn store(&self, keys: PublicKeySet) {
        let mut cache = self.cached.write().await;
        *cache = Some(keys);
    }
}

/// Raw certificates as returned by the provider
#[derive(Debug, Clone, Default)]
pub struct FetchedCertificates {
    /// Key id to PEM x509 certificate
    pub certificates: HashMap<String, String>,
    /// `max-age` from `Cache-Control`, if present and parseable
    pub max_age_secs: Option<i64>,
}

/// Source of the provider's signing certificates
#[async_trait]
pub trait KeyFetcher: Send + Sync {
    /// Fetch the current certificate directory
    async fn fetch(&self) -> Result<FetchedCertificates, AuthError>;
}

/// Fetches certificates from Google's public endpoint over HTTPS
#[derive(Debug, Clone)]
pub struct GoogleKeyFetcher {
    http_client: Client,
    certs_url: String,
}

impl GoogleKeyFetcher {
    /// Fetcher for `certs_url`
    #[must_use]
    pub fn new(certs_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            certs_url: certs_url.into(),
        }
    }
}

#[async_trait]
impl KeyFetcher for GoogleKeyFetcher {
    async fn fetch(&self) -> Result<FetchedCertificates, AuthError> {
        debug!(url = %self.certs_url, "Fetching Firebase public keys");

        let response = self
            .http_client
            .get(&self.certs_url)
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(|e| {
                warn!(error = %e, "Failed to fetch Firebase public keys");
                AuthError::KeyFetch(e.to_string())
            })?;

        let max_age_secs = response
            .headers()
            .get(CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_max_age);

        let certificates: HashMap<String, String> = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse Firebase public keys response");
            AuthError::KeyFetch(format!("invalid certificate response: {e}"))
        })?;

        Ok(FetchedCertificates {
            certificates,
            max_age_secs,
        })
    }
}

/// Parse max-age value from a Cache-Control header
///
/// Example: "public, max-age=3600, must-revalidate" -> 3600
///
/// Values above `MAX_KEY_CACHE_TTL_SECS` are treated as unparseable
#[must_use]
pub fn parse_max_age(cache_control: &str) -> Option<i64> {
    cache_control
        .split(',')
        .map(str::trim)
        .find_map(|directive| directive.strip_prefix("max-age="))
        .and_then(|value| value.trim_matches('"').parse::<i64>().ok())
        .filter(|secs| (0..=MAX_KEY_CACHE_TTL_SECS).contains(secs))
}

/// Convert x509 certificates to PEM-encoded public keys, skipping unparseable entries
///
/// # Errors
///
/// Returns an error if no certificate yields a key
pub fn convert_certs_to_keys(
    certs: HashMap<String, String>,
) -> Result<HashMap<String, String>, AuthError> {
    let mut keys = HashMap::with_capacity(certs.len());
    for (kid, cert_pem) in certs {
        match extract_public_key_from_cert(&cert_pem) {
            Ok(public_key_pem) => {
                keys.insert(kid, public_key_pem);
            }
            Err(e) => {
                warn!(kid = %kid, error = %e, "Failed to extract public key from certificate");
            }
        }
    }

    if keys.is_empty() {
        return Err(AuthError::KeyFetch(
            "no valid Firebase public keys found".to_owned(),
        ));
    }

    Ok(keys)
}

/// Extract the subject public key from a PEM x509 certificate as a PEM `PUBLIC KEY`
///
/// # Errors
///
/// Returns an error if the PEM or certificate cannot be parsed
pub fn extract_public_key_from_cert(cert_pem: &str) -> Result<String, AuthError> {
    let (_, pem) = parse_x509_pem(cert_pem.as_bytes())
        .map_err(|e| AuthError::KeyFetch(format!("failed to parse x509 PEM: {e}")))?;

    let (_, cert) = X509Certificate::from_der(&pem.contents)
        .map_err(|e| AuthError::KeyFetch(format!("failed to parse x509 certificate: {e}")))?;

    let encoded = STANDARD.encode(cert.public_key().raw);
    let body = encoded
        .as_bytes()
        .chunks(64)
        .map(String::from_utf8_lossy)
        .collect::<Vec<_>>()
        .join("\n");

    Ok(format!(
        "-----BEGIN PUBLIC KEY-----\n{body}\n-----END PUBLIC KEY-----\n"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_parse_max_age() {
        assert_eq!(
            parse_max_age("public, max-age=19302, must-revalidate, no-transform"),
            Some(19302)
        );
        assert_eq!(parse_max_age("max-age=0"), Some(0));
        assert_eq!(parse_max_age("no-cache"), None);
        assert_eq!(parse_max_age("max-age=soon"), None);
        assert_eq!(parse_max_age("max-age=-5"), None);
        assert_eq!(parse_max_age("max-age=604800"), Some(604_800));
        assert_eq!(parse_max_age("max-age=604801"), None);
        assert_eq!(parse_max_age("max-age=10000000000000"), None);
    }

    #[tokio::test]
    async fn test_cache_never_serves_expired_keys() {
        let now = Utc::now();
        let cache = InMemoryKeyCache::new();
        let keys = HashMap::from([("kid-1".to_owned(), "pem".to_owned())]);
        cache
            .store(PublicKeySet::new(keys, now + Duration::seconds(10)))
            .await;

        assert_eq!(cache.get("kid-1", now).await.as_deref(), Some("pem"));
        assert!(cache.get("kid-2", now).await.is_none());
        assert!(cache
            .get("kid-1", now + Duration::seconds(10))
            .await
            .is_none());
    }

    #[test]
    fn test_invalid_certificates_are_rejected() {
        let certs = HashMap::from([("kid".to_owned(), "not a certificate".to_owned())]);
        assert!(matches!(
            convert_certs_to_keys(certs),
            Err(AuthError::KeyFetch(_))
        ));
    }
}
