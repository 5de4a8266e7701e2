// ABOUTME: Firebase ID token header and claim set types
// ABOUTME: Claims are deserialized leniently and then checked explicitly against the verification time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Claim set of a Firebase ID token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FirebaseClaims {
    /// `https://securetoken.google.com/<project-id>` for genuine tokens
    pub iss: String,
    /// Project id the token was minted for
    pub aud: String,
    /// Subject (Firebase user UID); empty when absent so the subject check can reject it
    #[serde(default)]
    pub sub: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// When the user actually authenticated
    #[serde(default)]
    pub auth_time: Option<i64>,
    /// Email as reported by the provider, unsanitized
    pub email: Option<String>,
    /// Provider's verification flag for `email`
    pub email_verified: Option<bool>,
    /// Display name, unsanitized
    pub name: Option<String>,
    /// Avatar URL, unsanitized
    pub picture: Option<String>,
    /// Nested `firebase` object
    #[serde(default)]
    pub firebase: FirebaseSpecificClaims,
    /// Copied from `firebase.sign_in_provider` after verification
    #[serde(skip)]
    pub provider: String,
}

/// The nested `firebase` claim
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FirebaseSpecificClaims {
    /// `google.com`, `password`, `apple.com`, ...
    pub sign_in_provider: Option<String>,
    /// Provider identities keyed by provider id
    pub identities: Option<HashMap<String, Value>>,
}

/// The parts of a token header needed before the signature is checked
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TokenHeader {
    /// Signing algorithm, `none` for emulator tokens
    pub alg: String,
    /// Signing key id
    #[serde(default)]
    pub kid: Option<String>,
}
