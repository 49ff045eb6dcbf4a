// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::gateway::GatewayError;
use crate::models::MessageResponse;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }
}

impl From<GatewayError> for ApiError {
    fn from(error: GatewayError) -> Self {
        let message = error.to_string();
        match error {
            GatewayError::LimitExceeded => Self::too_many_requests(message),
            GatewayError::IncompleteResponse | GatewayError::Provider { .. } => {
                Self::bad_gateway(message)
            }
            _ => Self::bad_request(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(MessageResponse::new(self.message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_status_and_message() {
        let bad = ApiError::bad_request("bad");
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);
        assert_eq!(bad.message, "bad");

        let slow = ApiError::too_many_requests("slow down");
        assert_eq!(slow.status, StatusCode::TOO_MANY_REQUESTS);

        let upstream = ApiError::bad_gateway("upstream");
        assert_eq!(upstream.status, StatusCode::BAD_GATEWAY);
        assert_eq!(upstream.message, "upstream");
    }

    #[test]
    fn gateway_errors_map_to_statuses() {
        let cases = [
            (GatewayError::UsernameExists, StatusCode::BAD_REQUEST),
            (GatewayError::NotAuthorized, StatusCode::BAD_REQUEST),
            (GatewayError::CodeMismatch, StatusCode::BAD_REQUEST),
            (
                GatewayError::InvalidPassword("too short".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                GatewayError::ChallengeRequired {
                    challenge: "SMS_MFA".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (GatewayError::LimitExceeded, StatusCode::TOO_MANY_REQUESTS),
            (GatewayError::IncompleteResponse, StatusCode::BAD_GATEWAY),
            (
                GatewayError::Provider {
                    code: "InternalErrorException".into(),
                },
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status, status);
        }
    }

    #[test]
    fn invalid_password_message_is_surfaced() {
        let err = ApiError::from(GatewayError::InvalidPassword(
            "Password did not conform with policy: Password must have symbol characters".into(),
        ));
        assert_eq!(
            err.message,
            "Password did not conform with policy: Password must have symbol characters"
        );
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"message":"bad data"}"#);
    }
}
