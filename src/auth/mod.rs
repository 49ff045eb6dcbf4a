// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Cognito secret hashing and access token verification.
//!
//! ## Auth Flow
//!
//! 1. A client signs in through `/auth/login` and receives Cognito tokens
//! 2. The client sends `Authorization: Bearer <access token>`
//! 3. The server:
//!    - Looks up the signing key by `kid` in the pool's cached JWKS
//!    - Verifies the signature, `token_use == "access"` and `exp`
//!    - Exposes the typed claims to handlers via [`Auth`]
//!
//! ## Security
//!
//! - Every rejection reaches the client as the same `401` body
//! - JWKS is fetched over HTTPS from the pool's well-known URL and cached
//! - No clock skew leeway on `exp`

pub mod claims;
pub mod error;
pub mod extractor;
pub mod jwks;
pub mod middleware;
pub mod secret_hash;
pub mod verifier;

pub use claims::AccessTokenClaims;
pub use error::{AuthRejection, VerifyError};
pub use extractor::Auth;
pub use jwks::JwksCache;
pub use middleware::require_access_token;
pub use secret_hash::compute_secret_hash;
pub use verifier::{jwks_url, TokenVerifier};
