// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Identity Provider Gateway
//!
//! The boundary between HTTP handlers and the user pool. Handlers only see
//! [`IdentityProvider`]; [`CognitoGateway`] implements it over the AWS SDK
//! and computes the secret hash for every call that needs one.

pub mod cognito;
pub mod error;

use async_trait::async_trait;

pub use cognito::CognitoGateway;
pub use error::GatewayError;

use crate::models::{
    CodeDelivery, ConfirmAccountRequest, ConfirmForgotPasswordRequest, ForgotPasswordRequest,
    RefreshTokenRequest, SignInRequest, SignOutRequest, SignUpRequest,
};

/// Tokens issued by a successful sign-in or refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthTokens {
    pub access_token: String,
    pub id_token: String,
    /// Absent on refresh unless the pool rotates refresh tokens.
    pub refresh_token: Option<String>,
    pub token_type: String,
    pub expires_in: i32,
}

/// User pool operations exposed over HTTP.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<(), GatewayError>;

    async fn sign_in(&self, request: &SignInRequest) -> Result<AuthTokens, GatewayError>;

    async fn confirm_account(&self, request: &ConfirmAccountRequest) -> Result<(), GatewayError>;

    /// Start a password reset. Returns where the code was sent, if reported.
    async fn forgot_password(
        &self,
        request: &ForgotPasswordRequest,
    ) -> Result<Option<CodeDelivery>, GatewayError>;

    async fn confirm_forgot_password(
        &self,
        request: &ConfirmForgotPasswordRequest,
    ) -> Result<(), GatewayError>;

    async fn resend_confirmation_code(
        &self,
        request: &ForgotPasswordRequest,
    ) -> Result<Option<CodeDelivery>, GatewayError>;

    async fn refresh_tokens(
        &self,
        request: &RefreshTokenRequest,
    ) -> Result<AuthTokens, GatewayError>;

    /// Revoke every token issued to the owner of the access token.
    async fn sign_out(&self, request: &SignOutRequest) -> Result<(), GatewayError>;
}
