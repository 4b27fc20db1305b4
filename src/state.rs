// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{CredentialVerifier, TokenService};

/// Shared, read-only application state.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub credentials: Arc<dyn CredentialVerifier>,
}

impl AppState {
    pub fn new(tokens: TokenService, credentials: impl CredentialVerifier + 'static) -> Self {
        Self {
            tokens: Arc::new(tokens),
            credentials: Arc::new(credentials),
        }
    }
}
