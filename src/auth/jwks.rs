// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching and caching.
//!
//! ## Behaviour
//!
//! - Keys are converted to [`DecodingKey`]s once per fetch and shared behind
//!   an `Arc`, so request handling never parses JWK material.
//! - Fetches are serialized by a dedicated lock with a re-check after
//!   acquiring it: any number of concurrent cold-cache callers produce one
//!   HTTP request, whether it succeeds or fails.
//! - Every attempt is recorded under that lock. A caller that queued behind
//!   an attempt takes its outcome instead of fetching again, and no fetch
//!   starts within the minimum refresh interval of the previous one.
//! - A stale key set is served when a refresh fails.
//!
//! ## Usage
//!
//! Build one `JwksCache` per user pool at startup; the
//! [`TokenVerifier`](super::TokenVerifier) and the background
//! [`KeySetRefresher`](crate::key_refresher::KeySetRefresher) share it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet, KeyAlgorithm};
use jsonwebtoken::{Algorithm, DecodingKey};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::error::VerifyError;

/// Default JWKS cache TTL (5 minutes).
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Minimum spacing between fetches triggered by unknown key IDs or failures.
const DEFAULT_MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// A public key ready for signature verification.
#[derive(Clone)]
pub struct VerificationKey {
    pub key: DecodingKey,
    pub algorithm: Algorithm,
}

/// Verification keys indexed by key ID.
#[derive(Clone, Default)]
pub struct KeySet {
    keys: HashMap<String, VerificationKey>,
}

impl KeySet {
    /// Convert a fetched JWK set. Keys without a `kid` or of an unsupported
    /// type are skipped.
    pub fn from_jwks(jwks: &JwkSet) -> Self {
        let mut keys = HashMap::with_capacity(jwks.keys.len());
        for jwk in &jwks.keys {
            let Some(kid) = jwk.common.key_id.clone() else {
                warn!("Skipping JWK without key ID");
                continue;
            };
            match jwk_to_verification_key(jwk) {
                Ok(key) => {
                    keys.insert(kid, key);
                }
                Err(reason) => warn!(kid = %kid, reason, "Skipping unusable JWK"),
            }
        }
        Self { keys }
    }

    pub fn get(&self, kid: &str) -> Option<&VerificationKey> {
        self.keys.get(kid)
    }

    pub fn contains(&self, kid: &str) -> bool {
        self.keys.contains_key(kid)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Key set as observed by one caller.
///
/// `generation` increases with every successful fetch; it lets a caller ask
/// for "something newer than what I saw" without refetching when another
/// caller already did.
#[derive(Clone)]
pub struct KeySnapshot {
    pub keys: Arc<KeySet>,
    pub generation: u64,
}

/// JWKS cache entry.
struct CacheEntry {
    keys: Arc<KeySet>,
    generation: u64,
    /// Readers may use the entry without refetching until this instant.
    usable_until: Instant,
}

/// Outcome of the most recent fetch attempt. Guarded by the fetch lock.
#[derive(Default)]
struct FetchState {
    completed_at: Option<Instant>,
    last_error: Option<VerifyError>,
}

impl FetchState {
    /// Whether an attempt finished after `instant`.
    fn completed_since(&self, instant: Instant) -> bool {
        self.completed_at.is_some_and(|at| at > instant)
    }

    fn attempted_within(&self, interval: Duration) -> bool {
        self.completed_at.is_some_and(|at| at.elapsed() < interval)
    }
}

impl CacheEntry {
    fn snapshot(&self) -> KeySnapshot {
        KeySnapshot {
            keys: Arc::clone(&self.keys),
            generation: self.generation,
        }
    }

    fn is_usable(&self) -> bool {
        Instant::now() < self.usable_until
    }
}

/// JWKS manager with caching and fetch coalescing.
#[derive(Clone)]
pub struct JwksCache {
    /// JWKS URL (pool's well-known endpoint)
    jwks_url: String,
    cache_ttl: Duration,
    min_refresh_interval: Duration,
    cache: Arc<RwLock<Option<CacheEntry>>>,
    /// Held for the duration of every network fetch
    fetch_lock: Arc<Mutex<FetchState>>,
    client: reqwest::Client,
}

impl JwksCache {
    /// Create a new JWKS cache.
    ///
    /// `fetch_timeout` bounds every request to the JWKS endpoint.
    pub fn new(jwks_url: impl Into<String>, fetch_timeout: Duration) -> Result<Self, VerifyError> {
        let client = reqwest::Client::builder()
            .timeout(fetch_timeout)
            .build()
            .map_err(|e| VerifyError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            jwks_url: jwks_url.into(),
            cache_ttl: DEFAULT_CACHE_TTL,
            min_refresh_interval: DEFAULT_MIN_REFRESH_INTERVAL,
            cache: Arc::new(RwLock::new(None)),
            fetch_lock: Arc::new(Mutex::new(FetchState::default())),
            client,
        })
    }

    /// Create with custom cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Create with a custom minimum spacing between miss-driven refreshes.
    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    /// Get the JWKS URL.
    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    /// Current key set, fetching it if the cache is empty or expired.
    ///
    /// Falls back to the previous key set if the fetch fails. With nothing
    /// cached, a failure recorded within the minimum refresh interval is
    /// returned without another fetch.
    pub async fn current(&self) -> Result<KeySnapshot, VerifyError> {
        if let Some(snapshot) = self.usable_snapshot().await {
            return Ok(snapshot);
        }

        let queued_at = Instant::now();
        let mut state = self.fetch_lock.lock().await;

        // Another caller may have fetched while we waited for the lock.
        if let Some(snapshot) = self.usable_snapshot().await {
            return Ok(snapshot);
        }
        if state.completed_since(queued_at) || state.attempted_within(self.min_refresh_interval) {
            return self.previous_outcome(&state).await;
        }

        match self.fetch_and_store(&mut state).await {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => self.stale_or(e).await,
        }
    }

    /// Fetch a newer key set than `seen_generation`, typically because a
    /// token named a key ID the cached set does not contain.
    ///
    /// Returns without fetching if another caller already replaced that
    /// generation, if an attempt finished while this caller waited, or if
    /// the last attempt, failed or not, is more recent than the minimum
    /// refresh interval.
    pub async fn refresh_after(&self, seen_generation: u64) -> Result<KeySnapshot, VerifyError> {
        let queued_at = Instant::now();
        let mut state = self.fetch_lock.lock().await;

        if let Some(entry) = &*self.cache.read().await {
            if entry.generation != seen_generation {
                return Ok(entry.snapshot());
            }
        }
        if state.completed_since(queued_at) || state.attempted_within(self.min_refresh_interval) {
            debug!(
                generation = seen_generation,
                "Key set fetched recently, not refetching"
            );
            return self.previous_outcome(&state).await;
        }

        match self.fetch_and_store(&mut state).await {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => self.stale_or(e).await,
        }
    }

    /// Force refresh the JWKS cache, returning the number of usable keys.
    ///
    /// On failure the previous key set, if any, stays in place.
    pub async fn refresh(&self) -> Result<usize, VerifyError> {
        let mut state = self.fetch_lock.lock().await;
        let snapshot = self.fetch_and_store(&mut state).await?;
        Ok(snapshot.keys.len())
    }

    /// Error of the most recent fetch attempt, if it failed.
    pub async fn last_error(&self) -> Option<VerifyError> {
        self.fetch_lock.lock().await.last_error.clone()
    }

    /// Check if JWKS is currently cached and valid.
    pub async fn is_cached(&self) -> bool {
        let cache = self.cache.read().await;
        cache.as_ref().is_some_and(CacheEntry::is_usable)
    }

    async fn usable_snapshot(&self) -> Option<KeySnapshot> {
        let cache = self.cache.read().await;
        cache
            .as_ref()
            .filter(|entry| entry.is_usable())
            .map(CacheEntry::snapshot)
    }

    /// Answer from the cache and the recorded attempt instead of fetching.
    async fn previous_outcome(&self, state: &FetchState) -> Result<KeySnapshot, VerifyError> {
        if let Some(entry) = &*self.cache.read().await {
            return Ok(entry.snapshot());
        }
        Err(state
            .last_error
            .clone()
            .unwrap_or_else(|| VerifyError::KeyFetch("key set not loaded".into())))
    }

    /// Serve the previous key set after a failed fetch, if there is one.
    async fn stale_or(&self, error: VerifyError) -> Result<KeySnapshot, VerifyError> {
        let cache = self.cache.read().await;
        match &*cache {
            Some(entry) => {
                warn!(error = %error, generation = entry.generation, "Serving stale signing keys");
                Ok(entry.snapshot())
            }
            None => Err(error),
        }
    }

    /// Fetch and swap in a new entry, recording the attempt in `state`.
    async fn fetch_and_store(&self, state: &mut FetchState) -> Result<KeySnapshot, VerifyError> {
        let result = self.fetch_jwks().await;
        state.completed_at = Some(Instant::now());
        state.last_error = result.as_ref().err().cloned();

        let jwks = match result {
            Ok(jwks) => jwks,
            Err(e) => {
                warn!(error = %e, url = %self.jwks_url, "Key set fetch failed");
                // Throttle retries while the endpoint is failing.
                if let Some(entry) = self.cache.write().await.as_mut() {
                    let retry_at = Instant::now() + self.min_refresh_interval;
                    entry.usable_until = entry.usable_until.max(retry_at);
                }
                return Err(e);
            }
        };

        let keys = Arc::new(KeySet::from_jwks(&jwks));
        let now = Instant::now();
        let mut cache = self.cache.write().await;
        let generation = cache.as_ref().map_or(1, |entry| entry.generation + 1);
        let entry = CacheEntry {
            keys,
            generation,
            usable_until: now + self.cache_ttl,
        };
        let snapshot = entry.snapshot();
        *cache = Some(entry);

        info!(
            keys = snapshot.keys.len(),
            generation, "Fetched signing key set"
        );
        Ok(snapshot)
    }

    /// Fetch JWKS from the endpoint.
    async fn fetch_jwks(&self) -> Result<JwkSet, VerifyError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| VerifyError::KeyFetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VerifyError::KeyFetch(format!(
                "HTTP {} from JWKS endpoint",
                response.status()
            )));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| VerifyError::KeyFetch(e.to_string()))
    }
}

/// Convert a JWK to a verification key.
fn jwk_to_verification_key(jwk: &Jwk) -> Result<VerificationKey, &'static str> {
    match &jwk.algorithm {
        AlgorithmParameters::RSA(rsa) => {
            let key = DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
                .map_err(|_| "invalid RSA components")?;

            let algorithm = match jwk.common.key_algorithm {
                None | Some(KeyAlgorithm::RS256) => Algorithm::RS256,
                Some(KeyAlgorithm::RS384) => Algorithm::RS384,
                Some(KeyAlgorithm::RS512) => Algorithm::RS512,
                Some(KeyAlgorithm::PS256) => Algorithm::PS256,
                Some(KeyAlgorithm::PS384) => Algorithm::PS384,
                Some(KeyAlgorithm::PS512) => Algorithm::PS512,
                Some(_) => return Err("algorithm does not match RSA key"),
            };

            Ok(VerificationKey { key, algorithm })
        }
        AlgorithmParameters::EllipticCurve(ec) => {
            let key = DecodingKey::from_ec_components(&ec.x, &ec.y)
                .map_err(|_| "invalid EC components")?;

            let algorithm = match jwk.common.key_algorithm {
                None | Some(KeyAlgorithm::ES256) => Algorithm::ES256,
                Some(KeyAlgorithm::ES384) => Algorithm::ES384,
                Some(_) => return Err("algorithm does not match EC key"),
            };

            Ok(VerificationKey { key, algorithm })
        }
        _ => Err("unsupported key type"),
    }
}
