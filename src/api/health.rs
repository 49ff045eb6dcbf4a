// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall health status ("ok" or "degraded").
    pub status: String,
    /// Individual health checks and their results.
    pub checks: HealthChecks,
}

/// Individual health check results.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// Whether the service process is running.
    pub service: String,
    /// Signing key set status ("ok", "stale" or "unavailable").
    pub jwks: String,
}

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Signing key availability as seen by token verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyStatus {
    Ok,
    /// Keys are served from an earlier fetch; the latest attempt failed.
    Stale,
    Unavailable,
}

impl KeyStatus {
    fn as_str(self) -> &'static str {
        match self {
            KeyStatus::Ok => "ok",
            KeyStatus::Stale => "stale",
            KeyStatus::Unavailable => "unavailable",
        }
    }
}

/// Check the pool's signing keys through the same throttled path that
/// verification uses, so probes never add fetches during an outage.
async fn check_jwks(state: &AppState) -> KeyStatus {
    let keys = state.verifier.key_cache();
    if keys.current().await.is_err() {
        return KeyStatus::Unavailable;
    }
    if keys.last_error().await.is_some() {
        KeyStatus::Stale
    } else {
        KeyStatus::Ok
    }
}

/// Health check endpoint handler.
///
/// Returns 200 if all checks pass, 503 if any check fails.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = ReadyResponse),
        (status = 503, description = "Service is unhealthy", body = ReadyResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let jwks = check_jwks(&state).await;
    let jwks_ok = jwks != KeyStatus::Unavailable;

    let response = ReadyResponse {
        status: if jwks_ok { "ok" } else { "degraded" }.to_string(),
        checks: HealthChecks {
            service: "ok".to_string(),
            jwks: jwks.as_str().to_string(),
        },
    };

    let status = if jwks_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness probe handler.
///
/// Returns 200 once signing keys are available, stale ones included.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadyResponse),
        (status = 503, description = "Service is not ready", body = ReadyResponse)
    )
)]
pub async fn readiness(state: State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    health(state).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{test_state, FakeProvider};
    use crate::auth::{JwksCache, TokenVerifier};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn liveness_is_always_ok() {
        let Json(body) = liveness().await;
        assert_eq!(body.status, "ok");
    }

    #[tokio::test]
    async fn unreachable_jwks_is_degraded() {
        let (status, Json(body)) = health(State(test_state(FakeProvider::default()))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "degraded");
        assert_eq!(body.checks.service, "ok");
        assert_eq!(body.checks.jwks, "unavailable");
    }

    fn state_for(server: &MockServer) -> AppState {
        let keys = JwksCache::new(
            format!("{}/.well-known/jwks.json", server.uri()),
            Duration::from_secs(2),
        )
        .unwrap();
        AppState::new(
            Arc::new(FakeProvider::default()),
            TokenVerifier::with_key_cache(keys),
        )
    }

    #[tokio::test]
    async fn repeated_probes_during_an_outage_fetch_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;
        let state = state_for(&server);

        for _ in 0..5 {
            let (status, Json(body)) = readiness(State(state.clone())).await;
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(body.checks.jwks, "unavailable");
        }

        server.verify().await;
    }

    #[tokio::test]
    async fn stale_keys_are_reported_but_ready() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "keys": [] })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let state = state_for(&server);

        let (status, Json(body)) = health(State(state.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.checks.jwks, "ok");

        assert!(state.verifier.key_cache().refresh().await.is_err());

        let (status, Json(body)) = health(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.checks.jwks, "stale");
    }
}
