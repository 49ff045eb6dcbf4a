// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cognito Auth Gateway - REST front end for an Amazon Cognito user pool
//!
//! Exposes sign-up, sign-in, confirmation, password reset, token refresh and
//! sign-out over HTTP, and verifies Cognito access tokens against the pool's
//! published signing keys.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Secret hashing and access token verification (JWKS)
//! - `gateway` - Identity provider boundary (Cognito SDK)
//! - `key_refresher` - Background signing key refresh

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod key_refresher;
pub mod models;
pub mod state;
pub mod telemetry;
