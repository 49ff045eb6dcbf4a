// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::Json;

use crate::auth::{AccessTokenClaims, Auth};

/// Get the claims of the presented access token.
///
/// Sits behind the bearer-token middleware, so only verified, unexpired
/// access tokens reach it.
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Verified access token claims"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_current_user(Auth(claims): Auth) -> Json<AccessTokenClaims> {
    Json(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_claims_unchanged() {
        let claims: AccessTokenClaims = serde_json::from_value(serde_json::json!({
            "token_use": "access",
            "exp": 4102444800i64,
            "sub": "user-123",
            "cognito:groups": ["admins"],
            "custom": "kept"
        }))
        .unwrap();

        let Json(body) = get_current_user(Auth(claims.clone())).await;
        assert_eq!(body, claims);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["cognito:groups"][0], "admins");
        assert_eq!(json["custom"], "kept");
    }
}
