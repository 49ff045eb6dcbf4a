// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::TokenVerifier;
use crate::gateway::IdentityProvider;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn IdentityProvider>,
    pub verifier: TokenVerifier,
}

impl AppState {
    pub fn new(gateway: Arc<dyn IdentityProvider>, verifier: TokenVerifier) -> Self {
        Self { gateway, verifier }
    }
}

impl FromRef<AppState> for TokenVerifier {
    fn from_ref(state: &AppState) -> Self {
        state.verifier.clone()
    }
}
