// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token verification errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::MessageResponse;

/// Message returned when the `Authorization` header is absent.
pub const MISSING_TOKEN_MESSAGE: &str = "Authorization token is required.";
/// Message returned for every verification failure.
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid authorization token.";

/// Why a bearer token was rejected.
///
/// The variants are for logging and tests; the HTTP boundary collapses all
/// of them into one `401` body so callers cannot tell an expired token from a
/// forged one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    /// Region or user pool ID missing or unusable. Fatal at startup.
    #[error("verifier misconfigured: {0}")]
    Config(String),
    /// The key set could not be fetched or parsed. Transient.
    #[error("failed to fetch signing keys: {0}")]
    KeyFetch(String),
    /// No key for the token's `kid`, or the signature does not verify.
    #[error("token signature is invalid")]
    InvalidSignature,
    /// The payload is not a claims object with the required claims.
    #[error("token claims are malformed")]
    MalformedClaims,
    /// `token_use` is not `access`.
    #[error("token is not an access token")]
    WrongTokenType,
    /// `exp` is in the past.
    #[error("token has expired")]
    Expired,
}

impl VerifyError {
    /// Stable identifier used in structured logs.
    pub fn reason(&self) -> &'static str {
        match self {
            VerifyError::Config(_) => "config",
            VerifyError::KeyFetch(_) => "key_fetch",
            VerifyError::InvalidSignature => "invalid_signature",
            VerifyError::MalformedClaims => "malformed_claims",
            VerifyError::WrongTokenType => "wrong_token_type",
            VerifyError::Expired => "expired",
        }
    }

    /// Only key fetches may be retried; every other rejection is final.
    pub fn is_retryable(&self) -> bool {
        matches!(self, VerifyError::KeyFetch(_))
    }
}

impl IntoResponse for VerifyError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(MessageResponse::new(INVALID_TOKEN_MESSAGE)),
        )
            .into_response()
    }
}

/// Rejection produced by the bearer-token middleware and extractor.
#[derive(Debug)]
pub enum AuthRejection {
    /// No `Authorization` header, or an empty one
    MissingToken,
    /// A token was presented and failed verification
    Invalid(VerifyError),
}

impl From<VerifyError> for AuthRejection {
    fn from(error: VerifyError) -> Self {
        AuthRejection::Invalid(error)
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::MissingToken => (
                StatusCode::UNAUTHORIZED,
                Json(MessageResponse::new(MISSING_TOKEN_MESSAGE)),
            )
                .into_response(),
            AuthRejection::Invalid(error) => error.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn every_rejection_renders_the_same_body() {
        let errors = [
            VerifyError::KeyFetch("connection refused".into()),
            VerifyError::InvalidSignature,
            VerifyError::MalformedClaims,
            VerifyError::WrongTokenType,
            VerifyError::Expired,
        ];

        for error in errors {
            let response = error.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body = String::from_utf8(body_bytes.to_vec()).unwrap();
            assert_eq!(body, r#"{"message":"Invalid authorization token."}"#);
        }
    }

    #[tokio::test]
    async fn missing_token_has_its_own_message() {
        let response = AuthRejection::MissingToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["message"], "Authorization token is required.");
    }

    #[test]
    fn only_key_fetch_is_retryable() {
        assert!(VerifyError::KeyFetch("timeout".into()).is_retryable());
        assert!(!VerifyError::Expired.is_retryable());
        assert!(!VerifyError::InvalidSignature.is_retryable());
        assert!(!VerifyError::Config("empty region".into()).is_retryable());
    }

    #[test]
    fn reasons_are_distinct() {
        assert_eq!(VerifyError::Expired.reason(), "expired");
        assert_eq!(VerifyError::WrongTokenType.reason(), "wrong_token_type");
        assert_eq!(VerifyError::KeyFetch(String::new()).reason(), "key_fetch");
    }
}
