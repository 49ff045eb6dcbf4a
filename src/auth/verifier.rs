// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access token verification against a user pool's JWKS.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. the header names a key (`kid`) present in the pool's key set
//!    (one coalesced refetch is attempted for unknown key IDs),
//! 2. the signature verifies with that key and its algorithm,
//! 3. the payload decodes into [`AccessTokenClaims`],
//! 4. `token_use` is `access`,
//! 5. `exp` is not in the past (`now == exp` still passes).

use std::time::Duration;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Validation};
use url::Url;

use super::claims::AccessTokenClaims;
use super::error::VerifyError;
use super::jwks::JwksCache;

/// Build the JWKS discovery URL for a user pool.
///
/// Region and pool ID must be non-empty and limited to the characters AWS
/// uses for them, so neither can redirect the fetch to another host or path.
pub fn jwks_url(region: &str, user_pool_id: &str) -> Result<String, VerifyError> {
    if region.is_empty() || user_pool_id.is_empty() {
        return Err(VerifyError::Config(
            "region and user pool ID must both be set".to_string(),
        ));
    }
    if !region.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(VerifyError::Config(format!("invalid region {region:?}")));
    }
    if !user_pool_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(VerifyError::Config(format!(
            "invalid user pool ID {user_pool_id:?}"
        )));
    }

    let url = format!(
        "https://cognito-idp.{region}.amazonaws.com/{user_pool_id}/.well-known/jwks.json"
    );
    Url::parse(&url).map_err(|e| VerifyError::Config(format!("invalid JWKS URL: {e}")))?;
    Ok(url)
}

/// Verifies Cognito access tokens for one user pool.
///
/// Cheap to clone; clones share the key-set cache.
#[derive(Clone)]
pub struct TokenVerifier {
    keys: JwksCache,
}

impl TokenVerifier {
    /// Verifier for the pool identified by `region` and `user_pool_id`.
    pub fn new(
        region: &str,
        user_pool_id: &str,
        fetch_timeout: Duration,
    ) -> Result<Self, VerifyError> {
        let url = jwks_url(region, user_pool_id)?;
        Ok(Self::with_key_cache(JwksCache::new(url, fetch_timeout)?))
    }

    /// Verifier over an existing key-set cache.
    pub fn with_key_cache(keys: JwksCache) -> Self {
        Self { keys }
    }

    pub fn key_cache(&self) -> &JwksCache {
        &self.keys
    }

    /// Verify `token` and return its claims.
    pub async fn verify(&self, token: &str) -> Result<AccessTokenClaims, VerifyError> {
        self.verify_at(token, chrono::Utc::now().timestamp()).await
    }

    /// Verify `token` as of `now` (seconds since epoch).
    pub async fn verify_at(&self, token: &str, now: i64) -> Result<AccessTokenClaims, VerifyError> {
        let header = decode_header(token).map_err(|_| VerifyError::InvalidSignature)?;
        let kid = header.kid.ok_or(VerifyError::InvalidSignature)?;

        let mut snapshot = self.keys.current().await?;
        if !snapshot.keys.contains(&kid) {
            // Keys may have rotated since the last fetch.
            snapshot = self.keys.refresh_after(snapshot.generation).await?;
        }
        let key = snapshot
            .keys
            .get(&kid)
            .ok_or(VerifyError::InvalidSignature)?;

        // Expiry is checked below with an inclusive boundary and no leeway.
        let mut validation = Validation::new(key.algorithm);
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let claims = decode::<AccessTokenClaims>(token, &key.key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::Json(_) | ErrorKind::Utf8(_) => VerifyError::MalformedClaims,
                _ => VerifyError::InvalidSignature,
            })?
            .claims;

        if !claims.is_access_token() {
            return Err(VerifyError::WrongTokenType);
        }
        if claims.is_expired_at(now) {
            return Err(VerifyError::Expired);
        }

        Ok(claims)
    }
}
