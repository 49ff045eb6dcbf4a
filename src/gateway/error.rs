// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity provider failures.

/// What went wrong talking to the identity provider.
///
/// Classified once from the provider's error code so callers match on
/// variants instead of inspecting SDK error types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// Password rejected by the pool's password policy. Carries the
    /// provider's policy message, which is safe to show.
    #[error("{0}")]
    InvalidPassword(String),

    #[error("An account with the given email already exists.")]
    UsernameExists,

    #[error("Incorrect username or password.")]
    NotAuthorized,

    #[error("User is not confirmed.")]
    UserNotConfirmed,

    #[error("User does not exist.")]
    UserNotFound,

    #[error("Password reset required for the user.")]
    PasswordResetRequired,

    #[error("Invalid verification code provided, please try again.")]
    CodeMismatch,

    #[error("Invalid code provided, please request a code again.")]
    ExpiredCode,

    #[error("Invalid request parameters.")]
    InvalidParameter,

    /// Throttled by the provider.
    #[error("Attempt limit exceeded, please try again later.")]
    LimitExceeded,

    /// Sign-in needs another step (MFA, new password) this service does not
    /// drive.
    #[error("Additional authentication challenge required: {challenge}.")]
    ChallengeRequired { challenge: String },

    /// The provider answered without the tokens it should have returned.
    #[error("Authentication result or ID token is missing.")]
    IncompleteResponse,

    /// Anything else, including transport failures. The code is for logs.
    #[error("Identity provider request failed.")]
    Provider { code: String },
}

impl GatewayError {
    /// Classify a provider error code.
    ///
    /// `message` is only kept for password policy failures.
    pub fn from_code(code: Option<&str>, message: Option<&str>) -> Self {
        match code {
            Some("InvalidPasswordException") => GatewayError::InvalidPassword(
                message
                    .filter(|m| !m.is_empty())
                    .unwrap_or("Password does not conform to policy.")
                    .to_string(),
            ),
            Some("UsernameExistsException") => GatewayError::UsernameExists,
            Some("NotAuthorizedException") => GatewayError::NotAuthorized,
            Some("UserNotConfirmedException") => GatewayError::UserNotConfirmed,
            Some("UserNotFoundException") => GatewayError::UserNotFound,
            Some("PasswordResetRequiredException") => GatewayError::PasswordResetRequired,
            Some("CodeMismatchException") => GatewayError::CodeMismatch,
            Some("ExpiredCodeException") => GatewayError::ExpiredCode,
            Some("InvalidParameterException") => GatewayError::InvalidParameter,
            Some(
                "LimitExceededException"
                | "TooManyRequestsException"
                | "TooManyFailedAttemptsException",
            ) => GatewayError::LimitExceeded,
            Some(other) => GatewayError::Provider {
                code: other.to_string(),
            },
            None => GatewayError::Provider {
                code: "unknown".to_string(),
            },
        }
    }

    /// True when the caller can fix the request and retry.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            GatewayError::LimitExceeded
                | GatewayError::IncompleteResponse
                | GatewayError::Provider { .. }
        )
    }
}
