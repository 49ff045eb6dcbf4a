// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fake user pool key endpoint and token minting for integration tests.

#![allow(dead_code)]

use std::time::Duration;

use cognito_auth_gateway::auth::{JwksCache, TokenVerifier};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const JWKS_PATH: &str = "/us-east-1_TestPool/.well-known/jwks.json";

pub const POOL_KID: &str = "pool-key-1";
pub const ROTATED_KID: &str = "pool-key-2";

/// Private half of the key published in the fake key set.
pub const POOL_KEY_PEM: &[u8] = include_bytes!("../fixtures/pool_signing_key.pem");
/// Key the pool never published.
pub const FOREIGN_KEY_PEM: &[u8] = include_bytes!("../fixtures/foreign_signing_key.pem");

/// Base64url modulus of `pool_signing_key.pem`.
const POOL_KEY_N: &str = "qbywKRS4MZHEjllUrYbuwHADG4EFkEUPUbWPPSxP1Ij1bEkV7jnAcGUqIBkKtU7tvYmazzn40PFJs4neB8DcssVqyS7gyROmZNNYR40LVxVIPXqvhnRDmSpkZpYYhi1plbU4jbrFZBeQZmnpa5EcNEzMDT5oHxTbMBQ6FMGDipBylAX1kXWroUcUOvNTLde-up-Yqgiuvh2DwLIqmUQXD9cUwpw05kst1ajglhvJ5v0T0U2Fz3skYpzFWsfR75bGenEaH9yhH3_R-aDphhL8erqT9oJNzgYVuWxmEdNZQkkDXKdJI7ZKF4PJ3dhBBk3NPlh8rhFx_7IhS3r5e2v9ZQ";
const POOL_KEY_E: &str = "AQAB";

/// Key set publishing the pool key under each of `kids`.
pub fn jwks_body(kids: &[&str]) -> Value {
    let keys: Vec<Value> = kids
        .iter()
        .map(|kid| {
            json!({
                "kty": "RSA",
                "kid": kid,
                "alg": "RS256",
                "use": "sig",
                "n": POOL_KEY_N,
                "e": POOL_KEY_E
            })
        })
        .collect();
    json!({ "keys": keys })
}

/// Mock key endpoint serving the pool key under [`POOL_KID`].
pub async fn jwks_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JWKS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(jwks_body(&[POOL_KID])))
        .mount(&server)
        .await;
    server
}

pub fn key_cache_for(server: &MockServer) -> JwksCache {
    JwksCache::new(format!("{}{}", server.uri(), JWKS_PATH), Duration::from_secs(2)).unwrap()
}

pub fn verifier_for(server: &MockServer) -> TokenVerifier {
    TokenVerifier::with_key_cache(key_cache_for(server))
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Typical Cognito access token payload.
pub fn access_claims(exp: i64) -> Value {
    json!({
        "sub": "4a1b2c3d-0000-4000-8000-1234567890ab",
        "iss": "https://cognito-idp.us-east-1.amazonaws.com/us-east-1_TestPool",
        "client_id": "test-client-id",
        "origin_jti": "6b0e2b8c-1111-4111-8111-abcdefabcdef",
        "event_id": "0f5e7f4e-2222-4222-8222-fedcbafedcba",
        "token_use": "access",
        "scope": "aws.cognito.signin.user.admin",
        "auth_time": exp - 3600,
        "iat": exp - 3600,
        "exp": exp,
        "jti": "9c8d7e6f-3333-4333-8333-0123456789ab",
        "username": "4a1b2c3d-0000-4000-8000-1234567890ab",
        "cognito:groups": ["admins"]
    })
}

/// Sign `claims` with RS256 under `kid`.
pub fn sign_with(claims: &Value, kid: &str, pem: &[u8]) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let key = EncodingKey::from_rsa_pem(pem).unwrap();
    encode(&header, claims, &key).unwrap()
}

/// Sign `claims` with the pool key under [`POOL_KID`].
pub fn sign(claims: &Value) -> String {
    sign_with(claims, POOL_KID, POOL_KEY_PEM)
}
