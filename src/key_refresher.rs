// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Signing Key Refresher
//!
//! Background task that keeps the user pool's key set warm so request
//! handling rarely waits on a JWKS fetch.
//!
//! ## Strategy
//!
//! Every `interval` (default 240 s, below the cache TTL) the refresher calls
//! [`JwksCache::refresh`]. A failed refresh is logged and leaves the previous
//! key set in place; readers keep using it until the next successful fetch.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken` for graceful shutdown.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::auth::JwksCache;

/// Periodically refreshes a [`JwksCache`].
pub struct KeySetRefresher {
    keys: JwksCache,
    interval: Duration,
}

impl KeySetRefresher {
    pub fn new(keys: JwksCache, interval: Duration) -> Self {
        Self { keys, interval }
    }

    /// Run the refresh loop until the cancellation token is triggered.
    ///
    /// Should be spawned as a background task:
    /// ```rust,ignore
    /// tokio::spawn(refresher.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.interval.as_secs(),
            jwks_url = %self.keys.jwks_url(),
            "Signing key refresher starting"
        );

        loop {
            if shutdown.is_cancelled() {
                info!("Signing key refresher shutting down");
                return;
            }

            self.refresh_step().await;

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {},
                _ = shutdown.cancelled() => {
                    info!("Signing key refresher shutting down");
                    return;
                }
            }
        }
    }

    async fn refresh_step(&self) {
        match self.keys.refresh().await {
            Ok(count) => debug!(keys = count, "Signing keys refreshed"),
            Err(e) => warn!(error = %e, "Signing key refresh failed"),
        }
    }
}
