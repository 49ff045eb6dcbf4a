// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::require_access_token,
    models::{
        AuthResponse, CodeDelivery, CodeDeliveryResponse, ConfirmAccountRequest,
        ConfirmForgotPasswordRequest, ForgotPasswordRequest, MessageResponse,
        RefreshTokenRequest, SignInRequest, SignOutRequest, SignUpRequest,
    },
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    let account_routes = Router::new()
        .route("/auth/signup", post(auth::sign_up))
        .route("/auth/login", post(auth::sign_in))
        .route("/auth/confirm-account", post(auth::confirm_account))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route(
            "/auth/confirm-forgot-password",
            post(auth::confirm_forgot_password),
        )
        .route("/auth/resend-code", post(auth::resend_confirmation_code))
        .route("/auth/refresh", post(auth::refresh_tokens))
        .route("/auth/logout", post(auth::sign_out));

    let protected_routes = Router::new()
        .route("/auth/me", get(users::get_current_user))
        .route_layer(from_fn_with_state(
            state.verifier.clone(),
            require_access_token,
        ));

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    Router::new()
        .merge(account_routes)
        .merge(protected_routes)
        .merge(health_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::sign_up,
        auth::sign_in,
        auth::confirm_account,
        auth::forgot_password,
        auth::confirm_forgot_password,
        auth::resend_confirmation_code,
        auth::refresh_tokens,
        auth::sign_out,
        users::get_current_user,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            SignUpRequest,
            SignInRequest,
            ConfirmAccountRequest,
            ForgotPasswordRequest,
            ConfirmForgotPasswordRequest,
            RefreshTokenRequest,
            SignOutRequest,
            MessageResponse,
            AuthResponse,
            CodeDelivery,
            CodeDeliveryResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Auth", description = "Account lifecycle backed by the user pool"),
        (name = "Users", description = "Authenticated user information"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;


#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::test_support::{test_state, FakeProvider};

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(test_state(FakeProvider::default()));
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn me_requires_a_token() {
        let response = router(test_state(FakeProvider::default()))
            .oneshot(Request::builder().uri("/auth/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            String::from_utf8(bytes.to_vec()).unwrap(),
            r#"{"message":"Authorization token is required."}"#
        );
    }

    #[tokio::test]
    async fn openapi_lists_every_auth_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/auth/signup",
            "/auth/login",
            "/auth/confirm-account",
            "/auth/forgot-password",
            "/auth/confirm-forgot-password",
            "/auth/resend-code",
            "/auth/refresh",
            "/auth/logout",
            "/auth/me",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[tokio::test]
    async fn liveness_route_is_public() {
        let response = router(test_state(FakeProvider::default()))
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
