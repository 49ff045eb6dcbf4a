// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer-token middleware for Axum.
//!
//! Apply it to a router subtree that requires an access token:
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/auth/me", get(users::get_current_user))
//!     .layer(axum::middleware::from_fn_with_state(
//!         state.verifier.clone(),
//!         require_access_token,
//!     ));
//! ```
//!
//! Verified claims are stored in the request extensions, where the
//! [`Auth`](super::Auth) extractor picks them up.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::error::{AuthRejection, VerifyError};
use super::verifier::TokenVerifier;
use super::AccessTokenClaims;

/// Authentication middleware function.
pub async fn require_access_token(
    State(verifier): State<TokenVerifier>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(request.headers(), &verifier).await {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(rejection) => rejection.into_response(),
    }
}

/// Verify the bearer token in `headers`.
pub(crate) async fn authenticate(
    headers: &HeaderMap,
    verifier: &TokenVerifier,
) -> Result<AccessTokenClaims, AuthRejection> {
    let value = headers
        .get(AUTHORIZATION)
        .filter(|value| !value.as_bytes().iter().all(u8::is_ascii_whitespace))
        .ok_or(AuthRejection::MissingToken)?;
    let token = value
        .to_str()
        .ok()
        .and_then(bearer_token)
        .ok_or(AuthRejection::Invalid(VerifyError::InvalidSignature))?;

    verifier.verify(token).await.map_err(|e| {
        debug!(reason = e.reason(), error = %e, "Rejected bearer token");
        AuthRejection::from(e)
    })
}

/// Extract the token from an `Authorization` value.
///
/// The `Bearer ` scheme prefix is optional; a bare token is accepted as-is.
fn bearer_token(value: &str) -> Option<&str> {
    let value = value.trim();
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}
