// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies for the REST API. Field names are camelCase
//! on the wire. All types derive `ToSchema` for the OpenAPI document.
//!
//! ## Validation
//!
//! Every request type implements [`Validate`]. The account handlers run it
//! right after deserialization; any failure, including a body that does not
//! parse, becomes `400 {"message":"Invalid input data."}`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::gateway::AuthTokens;

/// Message returned for every malformed request body.
pub const INVALID_INPUT_MESSAGE: &str = "Invalid input data.";

// =============================================================================
// Validation
// =============================================================================

/// Field-level checks run after a request body is deserialized.
pub trait Validate {
    fn validate(&self) -> Result<(), ApiError>;
}

fn invalid_input() -> ApiError {
    ApiError::bad_request(INVALID_INPUT_MESSAGE)
}

fn require(value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(invalid_input());
    }
    Ok(())
}

/// Syntactic e-mail check: `local@domain.tld`, no whitespace.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty() && !host.starts_with('.'),
        None => false,
    }
}

fn require_email(value: &str) -> Result<(), ApiError> {
    if !is_valid_email(value) {
        return Err(invalid_input());
    }
    Ok(())
}

// =============================================================================
// Requests
// =============================================================================

/// New account registration. `username` is the user's e-mail address.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[schema(example = "alice@example.com")]
    pub username: String,
    pub password: String,
    /// Stored as the user's `name` attribute.
    pub name: String,
}

impl Validate for SignUpRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require_email(&self.username)?;
        require(&self.password)?;
        require(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    #[schema(example = "alice@example.com")]
    pub username: String,
    pub password: String,
}

impl Validate for SignInRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require_email(&self.username)?;
        require(&self.password)
    }
}

/// Confirmation code sent by e-mail after sign-up.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmAccountRequest {
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "123456")]
    pub code: String,
}

impl Validate for ConfirmAccountRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require_email(&self.email)?;
        require(&self.code)
    }
}

/// Identifies the user for a password reset or a code resend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub username: String,
}

impl Validate for ForgotPasswordRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require(&self.username)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmForgotPasswordRequest {
    pub username: String,
    /// The new password.
    pub password: String,
    #[schema(example = "123456")]
    pub confirmation_code: String,
}

impl Validate for ConfirmForgotPasswordRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require(&self.username)?;
        require(&self.password)?;
        require(&self.confirmation_code)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

impl Validate for RefreshTokenRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require(&self.refresh_token)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignOutRequest {
    pub access_token: String,
}

impl Validate for SignOutRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require(&self.access_token)
    }
}

// =============================================================================
// Responses
// =============================================================================

/// Body of every plain success or error response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Tokens issued on sign-in or refresh.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub id_token: String,
    /// Omitted on refresh unless the pool rotated the refresh token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Access token lifetime in seconds.
    #[schema(example = 3600)]
    pub expires_in: i32,
}

impl From<AuthTokens> for AuthResponse {
    fn from(tokens: AuthTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            id_token: tokens.id_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
        }
    }
}

/// Where a confirmation or reset code was sent.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CodeDelivery {
    /// Masked destination, e.g. `a***@e***.com`.
    pub destination: Option<String>,
    #[schema(example = "EMAIL")]
    pub delivery_medium: Option<String>,
    #[schema(example = "email")]
    pub attribute_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CodeDeliveryResponse {
    pub message: String,
    pub code_delivery: Option<CodeDelivery>,
}
