// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer-token middleware in front of a protected route.

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header::AUTHORIZATION, Request, StatusCode},
    middleware::from_fn_with_state,
    response::Response,
    routing::get,
    Router,
};
use cognito_auth_gateway::auth::{require_access_token, Auth, TokenVerifier};
use common::{access_claims, jwks_server, now, sign, sign_with, verifier_for, FOREIGN_KEY_PEM, POOL_KID};
use serde_json::json;
use tower::ServiceExt;

const INVALID_TOKEN_BODY: &str = r#"{"message":"Invalid authorization token."}"#;

async fn whoami(Auth(claims): Auth) -> String {
    claims.sub.unwrap_or_default()
}

fn app(verifier: TokenVerifier) -> Router {
    Router::new()
        .route("/whoami", get(whoami))
        .route_layer(from_fn_with_state(verifier.clone(), require_access_token))
        .with_state(verifier)
}

async fn call(app: Router, authorization: Option<&str>) -> Response {
    let mut request = Request::builder().uri("/whoami");
    if let Some(value) = authorization {
        request = request.header(AUTHORIZATION, value);
    }
    app.oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn valid_token_reaches_handler() {
    let server = jwks_server().await;
    let token = sign(&access_claims(now() + 3600));

    let response = call(app(verifier_for(&server)), Some(&format!("Bearer {token}"))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_string(response).await,
        "4a1b2c3d-0000-4000-8000-1234567890ab"
    );
}

#[tokio::test]
async fn bare_token_without_scheme_is_accepted() {
    let server = jwks_server().await;
    let token = sign(&access_claims(now() + 3600));

    let response = call(app(verifier_for(&server)), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_header_has_its_own_message() {
    let server = jwks_server().await;

    let response = call(app(verifier_for(&server)), None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_string(response).await,
        r#"{"message":"Authorization token is required."}"#
    );
}

#[tokio::test]
async fn every_rejection_looks_the_same() {
    let server = jwks_server().await;
    let verifier = verifier_for(&server);

    let mut id_token = access_claims(now() + 3600);
    id_token["token_use"] = json!("id");

    let tokens = [
        sign(&access_claims(now() - 60)),
        sign(&id_token),
        sign_with(&access_claims(now() + 3600), POOL_KID, FOREIGN_KEY_PEM),
        sign_with(&access_claims(now() + 3600), "unknown-kid", FOREIGN_KEY_PEM),
        "not.a.jwt".to_string(),
    ];

    for token in tokens {
        let response = call(app(verifier.clone()), Some(&format!("Bearer {token}"))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_string(response).await, INVALID_TOKEN_BODY);
    }
}

#[tokio::test]
async fn unreachable_key_endpoint_is_unauthorized() {
    let server = wiremock::MockServer::start().await;
    let verifier = verifier_for(&server);
    // Nothing mounted: the key endpoint answers 404.
    let token = sign(&access_claims(now() + 3600));

    let response = call(app(verifier), Some(&format!("Bearer {token}"))).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_string(response).await, INVALID_TOKEN_BODY);
}
