// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use cognito_auth_gateway::{
    api::router,
    auth::TokenVerifier,
    config::AppConfig,
    gateway::CognitoGateway,
    key_refresher::KeySetRefresher,
    state::AppState,
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment may be set directly.
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    telemetry::init(config.log_format).context("Failed to install tracing subscriber")?;

    info!(credentials = ?config.credentials, "Configuration loaded");

    let verifier = TokenVerifier::new(
        &config.credentials.region,
        &config.credentials.user_pool_id,
        config.jwks_fetch_timeout,
    )
    .context("Failed to build token verifier")?;

    let gateway = CognitoGateway::from_credentials(config.credentials.clone()).await;

    let shutdown = CancellationToken::new();
    let refresher = KeySetRefresher::new(verifier.key_cache().clone(), config.jwks_refresh_interval);
    let refresher_handle = tokio::spawn(refresher.run(shutdown.clone()));

    let state = AppState::new(Arc::new(gateway), verifier);
    let app = router(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "Cognito auth gateway listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await
        .context("HTTP server failed")?;

    shutdown.cancel();
    if let Err(e) = refresher_handle.await {
        warn!(error = %e, "Signing key refresher task failed");
    }
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "Failed to listen for shutdown signal");
            shutdown.cancelled().await;
        }
    }
    shutdown.cancel();
}
