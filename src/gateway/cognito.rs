// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Amazon Cognito user pool integration.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_cognitoidentityprovider::{
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    types::{AttributeType, AuthFlowType, AuthenticationResultType, CodeDeliveryDetailsType},
    Client,
};
use tracing::{info, warn};

use super::{AuthTokens, GatewayError, IdentityProvider};
use crate::auth::compute_secret_hash;
use crate::config::Credentials;
use crate::models::{
    CodeDelivery, ConfirmAccountRequest, ConfirmForgotPasswordRequest, ForgotPasswordRequest,
    RefreshTokenRequest, SignInRequest, SignOutRequest, SignUpRequest,
};

const NAME_ATTRIBUTE: &str = "name";
const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// [`IdentityProvider`] backed by a Cognito app client with a secret.
#[derive(Debug, Clone)]
pub struct CognitoGateway {
    client: Client,
    credentials: Credentials,
}

impl CognitoGateway {
    /// Build an SDK client for the pool's region. AWS credentials come from
    /// the default provider chain.
    pub async fn from_credentials(credentials: Credentials) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(credentials.region.clone()))
            .load()
            .await;
        Self::new(Client::new(&sdk_config), credentials)
    }

    pub fn new(client: Client, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
        }
    }

    fn secret_hash(&self, username: &str) -> String {
        compute_secret_hash(
            &self.credentials.client_id,
            &self.credentials.client_secret,
            username,
        )
    }
}

#[async_trait]
impl IdentityProvider for CognitoGateway {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<(), GatewayError> {
        let name = AttributeType::builder()
            .name(NAME_ATTRIBUTE)
            .value(&request.name)
            .build()
            .map_err(|e| {
                warn!(operation = "sign_up", error = %e, "Failed to build user attribute");
                GatewayError::InvalidParameter
            })?;

        let output = self
            .client
            .sign_up()
            .client_id(&self.credentials.client_id)
            .username(&request.username)
            .password(&request.password)
            .user_attributes(name)
            .secret_hash(self.secret_hash(&request.username))
            .send()
            .await
            .map_err(|e| classify("sign_up", e))?;

        info!(
            operation = "sign_up",
            confirmed = output.user_confirmed(),
            "User signed up"
        );
        Ok(())
    }

    async fn sign_in(&self, request: &SignInRequest) -> Result<AuthTokens, GatewayError> {
        let output = self
            .client
            .initiate_auth()
            .auth_flow(AuthFlowType::UserPasswordAuth)
            .client_id(&self.credentials.client_id)
            .auth_parameters("USERNAME", &request.username)
            .auth_parameters("PASSWORD", &request.password)
            .auth_parameters("SECRET_HASH", self.secret_hash(&request.username))
            .send()
            .await
            .map_err(|e| classify("sign_in", e))?;

        if let Some(challenge) = output.challenge_name() {
            info!(operation = "sign_in", challenge = challenge.as_str(), "Sign-in challenge issued");
            return Err(GatewayError::ChallengeRequired {
                challenge: challenge.as_str().to_string(),
            });
        }

        let result = output
            .authentication_result()
            .ok_or(GatewayError::IncompleteResponse)?;
        tokens_from_result(result)
    }

    async fn confirm_account(&self, request: &ConfirmAccountRequest) -> Result<(), GatewayError> {
        self.client
            .confirm_sign_up()
            .client_id(&self.credentials.client_id)
            .username(&request.email)
            .confirmation_code(&request.code)
            .secret_hash(self.secret_hash(&request.email))
            .send()
            .await
            .map_err(|e| classify("confirm_account", e))?;
        Ok(())
    }

    async fn forgot_password(
        &self,
        request: &ForgotPasswordRequest,
    ) -> Result<Option<CodeDelivery>, GatewayError> {
        let output = self
            .client
            .forgot_password()
            .client_id(&self.credentials.client_id)
            .username(&request.username)
            .secret_hash(self.secret_hash(&request.username))
            .send()
            .await
            .map_err(|e| classify("forgot_password", e))?;

        Ok(output.code_delivery_details().map(code_delivery_from))
    }

    async fn confirm_forgot_password(
        &self,
        request: &ConfirmForgotPasswordRequest,
    ) -> Result<(), GatewayError> {
        self.client
            .confirm_forgot_password()
            .client_id(&self.credentials.client_id)
            .username(&request.username)
            .confirmation_code(&request.confirmation_code)
            .password(&request.password)
            .secret_hash(self.secret_hash(&request.username))
            .send()
            .await
            .map_err(|e| classify("confirm_forgot_password", e))?;
        Ok(())
    }

    async fn resend_confirmation_code(
        &self,
        request: &ForgotPasswordRequest,
    ) -> Result<Option<CodeDelivery>, GatewayError> {
        let output = self
            .client
            .resend_confirmation_code()
            .client_id(&self.credentials.client_id)
            .username(&request.username)
            .secret_hash(self.secret_hash(&request.username))
            .send()
            .await
            .map_err(|e| classify("resend_confirmation_code", e))?;

        Ok(output.code_delivery_details().map(code_delivery_from))
    }

    async fn refresh_tokens(
        &self,
        request: &RefreshTokenRequest,
    ) -> Result<AuthTokens, GatewayError> {
        // Authenticated with the client secret itself; no username, no hash.
        let output = self
            .client
            .get_tokens_from_refresh_token()
            .client_id(&self.credentials.client_id)
            .client_secret(&self.credentials.client_secret)
            .refresh_token(&request.refresh_token)
            .send()
            .await
            .map_err(|e| classify("refresh_tokens", e))?;

        let result = output
            .authentication_result()
            .ok_or(GatewayError::IncompleteResponse)?;
        tokens_from_result(result)
    }

    async fn sign_out(&self, request: &SignOutRequest) -> Result<(), GatewayError> {
        self.client
            .global_sign_out()
            .access_token(&request.access_token)
            .send()
            .await
            .map_err(|e| classify("sign_out", e))?;
        Ok(())
    }
}

/// Convert an SDK failure into a [`GatewayError`], logging the details that
/// never reach the client.
fn classify<E, R>(operation: &'static str, err: SdkError<E, R>) -> GatewayError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let error = match err.code() {
        Some(code) => GatewayError::from_code(Some(code), err.message()),
        None => GatewayError::Provider {
            code: transport_failure_kind(&err).to_string(),
        },
    };

    if error.is_client_error() {
        info!(operation, code = err.code().unwrap_or_default(), "Identity provider rejected request");
    } else {
        warn!(
            operation,
            code = err.code().unwrap_or_default(),
            error = %DisplayErrorContext(&err),
            "Identity provider request failed"
        );
    }
    error
}

fn transport_failure_kind<E, R>(err: &SdkError<E, R>) -> &'static str {
    match err {
        SdkError::ConstructionFailure(_) => "construction_failure",
        SdkError::TimeoutError(_) => "timeout",
        SdkError::DispatchFailure(_) => "dispatch_failure",
        SdkError::ResponseError(_) => "response_error",
        SdkError::ServiceError(_) => "service_error",
        _ => "unknown",
    }
}

fn tokens_from_result(result: &AuthenticationResultType) -> Result<AuthTokens, GatewayError> {
    let access_token = result
        .access_token()
        .ok_or(GatewayError::IncompleteResponse)?;
    let id_token = result.id_token().ok_or(GatewayError::IncompleteResponse)?;

    Ok(AuthTokens {
        access_token: access_token.to_string(),
        id_token: id_token.to_string(),
        refresh_token: result.refresh_token().map(str::to_string),
        token_type: result
            .token_type()
            .unwrap_or(DEFAULT_TOKEN_TYPE)
            .to_string(),
        expires_in: result.expires_in(),
    })
}

fn code_delivery_from(details: &CodeDeliveryDetailsType) -> CodeDelivery {
    CodeDelivery {
        destination: details.destination().map(str::to_string),
        delivery_medium: details.delivery_medium().map(|m| m.as_str().to_string()),
        attribute_name: details.attribute_name().map(str::to_string),
    }
}
