// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cognito `SECRET_HASH` computation.
//!
//! App clients configured with a client secret require every user-facing call
//! (sign-up, sign-in, confirmation, password reset, resend code) to carry
//! `Base64(HMAC_SHA256(client_secret, username || client_id))`.

use base64ct::{Base64, Encoding};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute the secret hash for `username` under the given app client.
///
/// The message is the username followed by the client ID; Cognito rejects
/// any other ordering.
pub fn compute_secret_hash(client_id: &str, client_secret: &str, username: &str) -> String {
    // HMAC accepts keys of any length, including empty.
    let mut mac = HmacSha256::new_from_slice(client_secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC-SHA256 accepts keys of any length"));
    mac.update(username.as_bytes());
    mac.update(client_id.as_bytes());
    Base64::encode_string(&mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine};

    #[test]
    fn known_answer() {
        assert_eq!(
            compute_secret_hash("id", "secret", "user"),
            "MxgSLVWWuCPi6cBwY3ucSUqsoWEe0Ox93kc1u6Bsr2E="
        );
    }

    #[test]
    fn email_username_known_answer() {
        assert_eq!(
            compute_secret_hash("client-id", "client-secret", "alice@example.com"),
            "sdWYXbCR79nQTSGLjdIIScXPRoMoiaj0trWzF8kEGXg="
        );
    }

    #[test]
    fn empty_inputs_are_valid() {
        assert_eq!(
            compute_secret_hash("", "", ""),
            "thNnmggU2ex3L5XXeMNfxf8Wl8STcVZTxscSFEKSxa0="
        );
    }

    #[test]
    fn output_is_base64_of_a_sha256_digest() {
        for (id, secret, user) in [
            ("id", "secret", "user"),
            ("7h2k", "s3cr3t-with-symbols/+=", "bob@example.com"),
            ("x", "", "ünïcödé"),
        ] {
            let hash = compute_secret_hash(id, secret, user);
            assert_eq!(hash.len(), 44);
            assert_eq!(STANDARD.decode(&hash).unwrap().len(), 32);
            assert_eq!(hash, compute_secret_hash(id, secret, user));
        }
    }

    #[test]
    fn username_and_client_id_are_not_interchangeable() {
        assert_ne!(
            compute_secret_hash("id", "secret", "user"),
            compute_secret_hash("user", "secret", "id")
        );
    }
}
