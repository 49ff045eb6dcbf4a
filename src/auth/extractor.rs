// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for verified access token claims.
//!
//! ```rust,ignore
//! async fn my_handler(Auth(claims): Auth) -> impl IntoResponse {
//!     // claims is AccessTokenClaims
//! }
//! ```

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use super::error::AuthRejection;
use super::middleware::authenticate;
use super::verifier::TokenVerifier;
use super::AccessTokenClaims;

/// Claims of the access token presented with the request.
///
/// Reuses the claims stored by
/// [`require_access_token`](super::require_access_token) when the route sits
/// behind it, and verifies the `Authorization` header itself otherwise.
pub struct Auth(pub AccessTokenClaims);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
    TokenVerifier: FromRef<S>,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<AccessTokenClaims>().cloned() {
            return Ok(Auth(claims));
        }

        let verifier = TokenVerifier::from_ref(state);
        let claims = authenticate(&parts.headers, &verifier).await?;
        Ok(Auth(claims))
    }
}
