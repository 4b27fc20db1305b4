// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login path: credentials in, signed token out.
//!
//! A single attempt moves from awaiting credentials to exactly one terminal
//! state. `Ok` is authenticated, `Err` is rejected. There are no retries and
//! no lockout; one failed attempt is one failed request.

use serde::Deserialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use super::{
    credentials::{CredentialVerifier, CredentialsError},
    service::{IssuedToken, TokenService},
    AuthError,
};

/// Login request body.
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authenticates one login request.
pub struct AuthenticationStage<'a> {
    tokens: &'a TokenService,
    verifier: &'a dyn CredentialVerifier,
}

impl<'a> AuthenticationStage<'a> {
    pub fn new(tokens: &'a TokenService, verifier: &'a dyn CredentialVerifier) -> Self {
        Self { tokens, verifier }
    }

    /// Run the attempt against a raw request body.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredentials`] for an unreadable body or bad
    /// credentials; [`AuthError::InternalError`] if the credential store or
    /// token signing fails.
    pub fn attempt(&self, body: &[u8]) -> Result<IssuedToken, AuthError> {
        let request: LoginRequest = serde_json::from_slice(body).map_err(|e| {
            warn!(error = %e, "Unreadable login request");
            AuthError::InvalidCredentials
        })?;

        self.authenticate(&request)
    }

    /// Run the attempt against already parsed credentials.
    ///
    /// # Errors
    ///
    /// Same as [`attempt`](Self::attempt).
    pub fn authenticate(&self, request: &LoginRequest) -> Result<IssuedToken, AuthError> {
        let user = self
            .verifier
            .verify(&request.username, &request.password)
            .map_err(|e| match e {
                CredentialsError::Invalid => {
                    warn!(username = %request.username, "Login rejected");
                    AuthError::InvalidCredentials
                }
                CredentialsError::Unavailable(msg) => {
                    warn!(error = %msg, "Credential store unavailable");
                    AuthError::InternalError("credential store unavailable".to_string())
                }
            })?;

        let issued = self
            .tokens
            .issue(&user.principal, &user.roles)
            .map_err(|e| AuthError::InternalError(e.to_string()))?;

        info!(principal = %user.principal, "Login succeeded");
        Ok(issued)
    }
}
