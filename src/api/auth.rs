// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account endpoints: sign-up, sign-in, confirmation, password reset, token
//! refresh and sign-out.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::debug;

use crate::{
    error::ApiError,
    models::{
        AuthResponse, CodeDeliveryResponse, ConfirmAccountRequest, ConfirmForgotPasswordRequest,
        ForgotPasswordRequest, MessageResponse, RefreshTokenRequest, SignInRequest,
        SignOutRequest, SignUpRequest, Validate, INVALID_INPUT_MESSAGE,
    },
    state::AppState,
};

/// Unwrap and validate a JSON body. Parse failures and failed checks give the
/// same `400` response.
fn validated<T: Validate>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(error = %rejection.body_text(), "Rejected request body");
        ApiError::bad_request(INVALID_INPUT_MESSAGE)
    })?;
    request.validate()?;
    Ok(request)
}

#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignUpRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "User registered", body = MessageResponse),
        (status = 400, description = "Invalid input or sign-up rejected", body = MessageResponse),
        (status = 429, description = "Throttled by the identity provider", body = MessageResponse),
        (status = 502, description = "Identity provider failure", body = MessageResponse)
    )
)]
pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let request = validated(payload)?;
    state.gateway.sign_up(&request).await?;
    Ok(Json(MessageResponse::new("Successfully signed up user!")))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = SignInRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Tokens issued", body = AuthResponse),
        (status = 400, description = "Invalid input or sign-in rejected", body = MessageResponse),
        (status = 429, description = "Throttled by the identity provider", body = MessageResponse),
        (status = 502, description = "Identity provider failure", body = MessageResponse)
    )
)]
pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let request = validated(payload)?;
    let tokens = state.gateway.sign_in(&request).await?;
    Ok(Json(tokens.into()))
}

/// Confirm a new account with the code e-mailed at sign-up.
#[utoipa::path(
    post,
    path = "/auth/confirm-account",
    request_body = ConfirmAccountRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Account confirmed", body = MessageResponse),
        (status = 400, description = "Invalid input or code", body = MessageResponse)
    )
)]
pub async fn confirm_account(
    State(state): State<AppState>,
    payload: Result<Json<ConfirmAccountRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let request = validated(payload)?;
    state.gateway.confirm_account(&request).await?;
    Ok(Json(MessageResponse::new("Account confirmed.")))
}

#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Reset code sent", body = CodeDeliveryResponse),
        (status = 400, description = "Invalid input or unknown user", body = MessageResponse)
    )
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    payload: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> Result<Json<CodeDeliveryResponse>, ApiError> {
    let request = validated(payload)?;
    let code_delivery = state.gateway.forgot_password(&request).await?;
    Ok(Json(CodeDeliveryResponse {
        message: "Password reset code sent.".to_string(),
        code_delivery,
    }))
}

/// Set a new password using the reset code.
#[utoipa::path(
    post,
    path = "/auth/confirm-forgot-password",
    request_body = ConfirmForgotPasswordRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Invalid input, code or password", body = MessageResponse)
    )
)]
pub async fn confirm_forgot_password(
    State(state): State<AppState>,
    payload: Result<Json<ConfirmForgotPasswordRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let request = validated(payload)?;
    state.gateway.confirm_forgot_password(&request).await?;
    Ok(Json(MessageResponse::new("Password successfully changed.")))
}

#[utoipa::path(
    post,
    path = "/auth/resend-code",
    request_body = ForgotPasswordRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Confirmation code resent", body = CodeDeliveryResponse),
        (status = 400, description = "Invalid input or unknown user", body = MessageResponse)
    )
)]
pub async fn resend_confirmation_code(
    State(state): State<AppState>,
    payload: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> Result<Json<CodeDeliveryResponse>, ApiError> {
    let request = validated(payload)?;
    let code_delivery = state.gateway.resend_confirmation_code(&request).await?;
    Ok(Json(CodeDeliveryResponse {
        message: "Confirmation code resent.".to_string(),
        code_delivery,
    }))
}

#[utoipa::path(
    post,
    path = "/auth/refresh",
    request_body = RefreshTokenRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "New tokens issued", body = AuthResponse),
        (status = 400, description = "Invalid input or refresh token", body = MessageResponse)
    )
)]
pub async fn refresh_tokens(
    State(state): State<AppState>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let request = validated(payload)?;
    let tokens = state.gateway.refresh_tokens(&request).await?;
    Ok(Json(tokens.into()))
}

/// Sign out everywhere, revoking all tokens of the access token's owner.
#[utoipa::path(
    post,
    path = "/auth/logout",
    request_body = SignOutRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Signed out", body = MessageResponse),
        (status = 400, description = "Invalid input or access token", body = MessageResponse)
    )
)]
pub async fn sign_out(
    State(state): State<AppState>,
    payload: Result<Json<SignOutRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let request = validated(payload)?;
    state.gateway.sign_out(&request).await?;
    Ok(Json(MessageResponse::new("Successfully signed out.")))
}
