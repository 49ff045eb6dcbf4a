// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access token claims.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Value of `token_use` that authorizes API calls.
pub const ACCESS_TOKEN_USE: &str = "access";

/// Claims carried by a Cognito access token.
///
/// `token_use` and `exp` are required: a token without them, or with them
/// of the wrong type, fails to decode. Cognito's other standard claims are
/// typed but optional, and anything else lands in `extra`, so the full
/// payload survives the round trip.
///
/// See: https://docs.aws.amazon.com/cognito/latest/developerguide/amazon-cognito-user-pools-using-the-access-token.html
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// `access` for access tokens, `id` for ID tokens
    pub token_use: String,

    /// Expiration timestamp (seconds since epoch)
    #[serde(deserialize_with = "numeric_date")]
    pub exp: i64,

    /// Subject (Cognito user UUID)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Issuer (`https://cognito-idp.<region>.amazonaws.com/<pool>`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Issued at timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// App client that requested the token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Space-separated OAuth scopes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    #[serde(
        default,
        rename = "cognito:groups",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub groups: Vec<String>,

    /// Every other claim, untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AccessTokenClaims {
    pub fn is_access_token(&self) -> bool {
        self.token_use == ACCESS_TOKEN_USE
    }

    /// Inclusive: a token is still valid during the second it expires.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.exp
    }

    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scope.as_deref().unwrap_or_default().split_whitespace()
    }
}

/// Accept `exp` as any JSON number; fractional seconds are truncated.
fn numeric_date<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    number
        .as_i64()
        .or_else(|| number.as_f64().map(|f| f as i64))
        .ok_or_else(|| serde::de::Error::custom("exp is not a representable timestamp"))
}
